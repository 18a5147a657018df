use std::collections::BTreeSet;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::config::{Backoff, NGramConfig};
use super::level::{FrequencyTable, Level, ProbabilityTable};
use crate::document::Document;
use crate::error::{NGramError, Result};
use crate::io::read_lines;
use crate::tokenizer::{Tokenizer, join};

/// A smoothed distribution over n-grams of words, characters or tags.
///
/// The model is a chain of levels indexed by order: level `k` learns
/// k-grams and backs off to level `k - 1`, down to the empty order-0 base.
/// Smoothing is absolute discounting, applied at every order from N down to 1.
///
/// # Responsibilities
/// - Count the k-grams of a corpus for every order `1..=N`
/// - Derive one discount constant per order
/// - Compute the smoothed distribution of every order, lowest first
/// - Answer probability, log-likelihood and perplexity queries
///
/// # Invariants
/// - `levels.len() == N + 1` and `levels[k]` has order `k`
/// - Tables never change after training; every query takes `&self`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NGramDistribution {
	/// Training configuration (order and backoff policy).
	config: NGramConfig,

	/// Separator joining context tokens, taken from the training tokenizer.
	separator: String,

	/// Levels `0..=N`; level 0 is the empty base case.
	levels: Vec<Level>,

	/// Distinct order-N contexts as token lists, sorted.
	/// Drawn from by `StartSeed::Random`.
	contexts: Vec<Vec<String>>,
}

impl NGramDistribution {
	/// Trains a model on `documents`.
	///
	/// Windows never cross document boundaries. Levels are built leaves
	/// first: each order is counted, discounted and smoothed before the
	/// next one, which reads its distribution when backing off.
	pub fn train<T: Tokenizer + ?Sized>(documents: &[Document], tokenizer: &T, config: NGramConfig) -> Self {
		let n = config.order();
		let separator = tokenizer.separator().to_owned();
		info!("Training order-{} model on {} documents", n, documents.len());

		let total_tokens: usize = documents.iter().map(Document::len).sum();
		if total_tokens == 0 {
			warn!("Training corpus is empty: every table stays empty and every discount is 0");
		} else if documents.iter().all(|document| document.len() < n) {
			warn!("No document has {} tokens: the order-{} table stays empty", n, n);
		}

		let mut levels: Vec<Level> = Vec::with_capacity(n + 1);
		levels.push(Level::new(0));

		for k in 1..=n {
			let mut level = Level::new(k);
			for document in documents {
				level.add_tokens(document.tokens(), &separator);
			}
			level.calc_discount();
			let (n1, n2) = level.count_of_counts();
			debug!(
				"Order {}: {} contexts, n1 = {}, n2 = {}, D = {:.6}",
				level.order(),
				level.frequencies().len(),
				n1,
				n2,
				level.discount()
			);

			level.calc_dist(|word| Self::unigram_style(&levels, k - 1, word));
			levels.push(level);
		}

		let contexts: BTreeSet<Vec<String>> = documents
			.iter()
			.filter(|document| n > 1 && document.len() >= n)
			.flat_map(|document| document.tokens().windows(n).map(move |window| window[..n - 1].to_vec()))
			.collect();

		info!("Finished training: {} tokens, {} order-{} contexts", total_tokens, contexts.len(), n);

		Self {
			config,
			separator,
			levels,
			contexts: contexts.into_iter().collect(),
		}
	}

	/// Trains a model on a single document.
	pub fn from_text<T: Tokenizer + ?Sized>(text: &str, tokenizer: &T, config: NGramConfig) -> Self {
		let document = Document::new(text, tokenizer);
		Self::train(std::slice::from_ref(&document), tokenizer, config)
	}

	/// Trains a model on a corpus file, one document per non-empty line.
	///
	/// # Errors
	/// Returns `Io` if the file cannot be read.
	pub fn from_path<P, T>(path: P, tokenizer: &T, config: NGramConfig) -> Result<Self>
	where
		P: AsRef<Path>,
		T: Tokenizer + ?Sized,
	{
		let documents: Vec<Document> = read_lines(&path)?
			.iter()
			.map(|line| Document::new(line, tokenizer))
			.collect();
		info!("Loaded {} documents from {}", documents.len(), path.as_ref().display());
		Ok(Self::train(&documents, tokenizer, config))
	}

	/// Unigram-style probability of `word` seen from order `k`.
	///
	/// Order 0 scores 0. Order 1 reads its empty context. Higher orders have
	/// no empty context, so they defer to the order below.
	fn unigram_style(levels: &[Level], k: usize, word: &str) -> f64 {
		match k {
			0 => 0.0,
			1 => levels[1].unigram(word),
			_ => Self::unigram_style(levels, k - 1, word),
		}
	}

	/// Returns N, the order of the model.
	pub fn n_value(&self) -> usize {
		self.config.order()
	}

	/// Returns the training configuration.
	pub fn config(&self) -> &NGramConfig {
		&self.config
	}

	/// Returns the separator used to join tokens.
	pub fn separator(&self) -> &str {
		&self.separator
	}

	/// Probability of `word` following the context tokens `prev`.
	///
	/// Only the last `N - 1` tokens of `prev` are used; a shorter `prev`
	/// queries the order `prev.len() + 1`. Unseen pairs are handled by the
	/// configured `Backoff` policy.
	pub fn prob<S: AsRef<str>>(&self, prev: &[S], word: &str) -> f64 {
		let width = prev.len().min(self.n_value() - 1);
		let context = &prev[prev.len() - width..];
		match self.config.backoff {
			Backoff::Strict => self.levels[width + 1].prob(&join(context, &self.separator), word),
			Backoff::Chained => self.chained_prob(context, word),
		}
	}

	/// Probability of the single token `word` (order-1 lookup).
	pub fn prob_word(&self, word: &str) -> f64 {
		self.levels[1].unigram(word)
	}

	/// Backoff chain used by `Backoff::Chained`.
	fn chained_prob<S: AsRef<str>>(&self, context: &[S], word: &str) -> f64 {
		let level = &self.levels[context.len() + 1];
		let key = join(context, &self.separator);

		let lower = || match context.split_first() {
			Some((_, rest)) => self.chained_prob(rest, word),
			None => 0.0,
		};

		match level.distribution().get(&key) {
			Some(row) => match row.get(word) {
				Some(p) => *p,
				None => level.backoff_weight(&key) * lower(),
			},
			None => lower(),
		}
	}

	/// Returns the level of order `k`, or `OrderOutOfRange`.
	fn checked_level(&self, k: usize) -> Result<&Level> {
		self.levels.get(k).ok_or(NGramError::OrderOutOfRange { k, n: self.n_value() })
	}

	/// Level access for generation; callers guarantee `k <= N`.
	pub(crate) fn level(&self, k: usize) -> &Level {
		&self.levels[k]
	}

	/// Distinct order-N contexts, sorted.
	pub(crate) fn contexts(&self) -> &[Vec<String>] {
		&self.contexts
	}

	/// Returns the distribution of k-grams, for `0 <= k <= N`.
	///
	/// Order 0 is always an empty table.
	///
	/// # Errors
	/// Returns `OrderOutOfRange` if `k > N`.
	pub fn kth_distribution(&self, k: usize) -> Result<&ProbabilityTable> {
		Ok(self.checked_level(k)?.distribution())
	}

	/// Returns the raw k-gram counts, for `0 <= k <= N`.
	///
	/// # Errors
	/// Returns `OrderOutOfRange` if `k > N`.
	pub fn kth_frequencies(&self, k: usize) -> Result<&FrequencyTable> {
		Ok(self.checked_level(k)?.frequencies())
	}

	/// Returns the absolute discount of order `k`, for `0 <= k <= N`.
	///
	/// # Errors
	/// Returns `OrderOutOfRange` if `k > N`.
	pub fn discount(&self, k: usize) -> Result<f64> {
		Ok(self.checked_level(k)?.discount())
	}

	/// Calculates the log-likelihood of `document` under this model.
	///
	/// Sums `ln P(token | context)` over every order-N window. A document
	/// without any full window has a log-likelihood of 0.
	///
	/// # Errors
	/// Returns `ZeroProbability` for the first window the model scores 0,
	/// rather than producing `-inf`.
	pub fn log_likelihood(&self, document: &Document) -> Result<f64> {
		let n = self.n_value();
		let mut sum = 0.0;
		for window in document.tokens().windows(n) {
			let (context, token) = window.split_at(n - 1);
			let token = &token[0];
			let p = self.prob(context, token);
			if p <= 0.0 {
				return Err(NGramError::ZeroProbability {
					context: join(context, &self.separator),
					token: token.clone(),
				});
			}
			sum += p.ln();
		}
		Ok(sum)
	}

	/// Calculates the perplexity of `document`: `exp(-LL / windows)`.
	///
	/// # Errors
	/// - `DocumentTooShort` if the document has fewer than N tokens
	/// - `ZeroProbability` as for `log_likelihood`
	pub fn perplexity(&self, document: &Document) -> Result<f64> {
		let n = self.n_value();
		if document.len() < n {
			return Err(NGramError::DocumentTooShort { tokens: document.len(), n });
		}
		let windows = (document.len() - n + 1) as f64;
		Ok((-self.log_likelihood(document)? / windows).exp())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tokenizer::{CharTokenizer, WordTokenizer};

	fn bigram(text: &str) -> NGramDistribution {
		NGramDistribution::from_text(text, &WordTokenizer, NGramConfig::new(2).unwrap())
	}

	#[test]
	fn levels_cover_every_order() {
		let model = NGramDistribution::from_text("a b c d", &WordTokenizer, NGramConfig::new(3).unwrap());
		assert_eq!(model.n_value(), 3);
		assert_eq!(model.levels.len(), 4);
		for (k, level) in model.levels.iter().enumerate() {
			assert_eq!(level.order(), k);
		}
	}

	#[test]
	fn bigram_probabilities_back_off_to_unigrams() {
		let model = bigram("a b a b a c");
		let d1 = 1.0 / 3.0;
		let p_b = (2.0 - d1) / 6.0;
		let p_c = (1.0 - d1) / 6.0;
		// bigrams ab:2 ba:2 ac:1 → D = 1 / 5
		let d2 = 0.2;
		let expected_b = (2.0 - d2) / 3.0 + d2 / 3.0 * 2.0 * p_b;
		let expected_c = (1.0 - d2) / 3.0 + d2 / 3.0 * 2.0 * p_c;
		assert!((model.prob(&["a"], "b") - expected_b).abs() < 1e-12);
		assert!((model.prob(&["a"], "c") - expected_c).abs() < 1e-12);
		assert!((model.prob_word("b") - p_b).abs() < 1e-12);
	}

	#[test]
	fn short_prev_queries_lower_order() {
		let model = bigram("a b a b a c");
		let empty: [&str; 0] = [];
		assert_eq!(model.prob(&empty, "a"), model.prob_word("a"));
		assert_eq!(model.prob(&["x", "a"], "b"), model.prob(&["a"], "b"));
	}

	#[test]
	fn order_zero_is_empty_and_out_of_range_fails() {
		let model = bigram("a b a b a c");
		assert!(model.kth_distribution(0).unwrap().is_empty());
		assert!(model.kth_frequencies(0).unwrap().is_empty());
		assert_eq!(model.discount(0).unwrap(), 0.0);
		assert!(matches!(
			model.kth_distribution(3),
			Err(NGramError::OrderOutOfRange { k: 3, n: 2 })
		));
		assert!(model.discount(7).is_err());
	}

	#[test]
	fn chained_backoff_scores_unseen_pairs() {
		let text = "a b a b a c";
		let strict = bigram(text);
		let chained = NGramDistribution::from_text(
			text,
			&WordTokenizer,
			NGramConfig::new(2).unwrap().with_backoff(Backoff::Chained),
		);

		// seen pairs agree
		assert_eq!(strict.prob(&["a"], "b"), chained.prob(&["a"], "b"));

		// unseen context: strict is 0, chained is the unigram
		assert_eq!(strict.prob(&["c"], "a"), 0.0);
		assert_eq!(chained.prob(&["c"], "a"), chained.prob_word("a"));

		// seen context, unseen word: backoff weight times unigram
		let weight = 0.2 * 1.0 / 2.0;
		assert_eq!(strict.prob(&["b"], "c"), 0.0);
		assert!((chained.prob(&["b"], "c") - weight * chained.prob_word("c")).abs() < 1e-12);

		// unseen everywhere
		assert_eq!(chained.prob(&["a"], "z"), 0.0);
	}

	#[test]
	fn character_models_join_without_separator() {
		let model = NGramDistribution::from_text("abab", &CharTokenizer, NGramConfig::new(3).unwrap());
		let trigrams = model.kth_frequencies(3).unwrap();
		assert_eq!(trigrams["ab"]["a"], 1);
		assert_eq!(trigrams["ba"]["b"], 1);
		assert!(model.prob(&["a", "b"], "a") > 0.0);
	}

	#[test]
	fn perplexity_matches_log_likelihood() {
		let model = bigram("a b a b a c");
		let document = Document::new("a b a c", &WordTokenizer);
		let expected = model.prob(&["a"], "b").ln() + model.prob(&["b"], "a").ln() + model.prob(&["a"], "c").ln();
		let ll = model.log_likelihood(&document).unwrap();
		assert!((ll - expected).abs() < 1e-12);
		let perplexity = model.perplexity(&document).unwrap();
		assert!((perplexity - (-expected / 3.0).exp()).abs() < 1e-9);
	}

	#[test]
	fn zero_probability_is_an_error() {
		let model = bigram("a b a b a c");
		let document = Document::new("a b c", &WordTokenizer);
		match model.log_likelihood(&document) {
			Err(NGramError::ZeroProbability { context, token }) => {
				assert_eq!(context, "b");
				assert_eq!(token, "c");
			}
			other => panic!("expected ZeroProbability, got {:?}", other),
		}
		assert!(model.perplexity(&document).is_err());
	}

	#[test]
	fn short_documents_fail_perplexity() {
		let model = bigram("a b a b a c");
		let document = Document::new("a", &WordTokenizer);
		assert_eq!(model.log_likelihood(&document).unwrap(), 0.0);
		assert!(matches!(
			model.perplexity(&document),
			Err(NGramError::DocumentTooShort { tokens: 1, n: 2 })
		));
	}
}
