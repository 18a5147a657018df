use std::env;
use std::fs;

use log::info;
use rs_ngram_core::document::Document;
use rs_ngram_core::io::build_output_path;
use rs_ngram_core::model::config::{Backoff, NGramConfig, StartSeed};
use rs_ngram_core::model::distribution::NGramDistribution;
use rs_ngram_core::tokenizer::WordTokenizer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Corpus file, one document per line (default: ./data/corpus.txt)
    let corpus = env::args().nth(1).unwrap_or_else(|| "./data/corpus.txt".to_owned());

    // Order of the model: 3 learns trigrams, backing off to bigrams and unigrams
    let mut config = NGramConfig::new(3)?;

    // Unseen pairs score 0 with 'Strict'; 'Chained' backs off to lower orders
    config.backoff = Backoff::Chained;

    // Attempting an invalid order
    match config.set_order(0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Order 0 is invalid: {}", e),
    }

    // Load the cached .bin model if it exists, train and cache it otherwise.
    // The cache is tied to the corpus, delete it after changing the config.
    let cache = build_output_path(&corpus, "bin")?;
    let model: NGramDistribution = if cache.exists() {
        info!("Loading cached model from {}", cache.display());
        postcard::from_bytes(&fs::read(&cache)?)?
    } else {
        let model = NGramDistribution::from_path(&corpus, &WordTokenizer, config)?;
        fs::write(&cache, postcard::to_stdvec(&model)?)?;
        info!("Cached model to {}", cache.display());
        model
    };

    println!("N = {}", model.n_value());
    for k in 0..=model.n_value() {
        println!(
            "order {}: {} contexts, D = {:.4}",
            k,
            model.kth_distribution(k)?.len(),
            model.discount(k)?
        );
    }

    // Asking for an order above N fails instead of clamping
    match model.kth_distribution(model.n_value() + 1) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{}", e),
    }

    println!("P(the) = {:.4}", model.prob_word("the"));
    println!("P(sat | the cat) = {:.4}", model.prob(&["the", "cat"], "sat"));

    // Same seed, same sentence
    for seed in 0..5 {
        println!("Sentence {}: {}", seed, model.random_sentence(seed, 12)?);
    }
    println!("Random start: {}", model.generate(42, 8, &StartSeed::Random)?);
    let start = StartSeed::Custom(vec!["the".to_owned(), "dog".to_owned()]);
    println!("Custom start: {}", model.generate(42, 8, &start)?);

    // Score a held-out sentence
    let document = Document::new("the cat sat on the log", &WordTokenizer);
    match model.perplexity(&document) {
        Ok(p) => println!("Perplexity of {:?}: {:.4}", document.tokens().join(" "), p),
        Err(e) => println!("Cannot score document: {}", e),
    }

    // Too short for a trigram window
    let short = Document::new("the", &WordTokenizer);
    if let Err(e) = model.perplexity(&short) {
        println!("{}", e);
    }

    Ok(())
}
