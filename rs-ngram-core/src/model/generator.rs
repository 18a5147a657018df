use std::collections::{BTreeMap, VecDeque};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::StartSeed;
use super::distribution::NGramDistribution;
use crate::error::{NGramError, Result};
use crate::tokenizer::join;

impl NGramDistribution {
	/// Generates `num_words` tokens from the model, starting from nothing.
	///
	/// Output is fully determined by `seed` and the trained tables: the same
	/// seed on the same model always yields the same sentence.
	///
	/// # Errors
	/// Returns `EmptyModel` if the model was trained on no tokens.
	pub fn random_sentence(&self, seed: u64, num_words: usize) -> Result<String> {
		self.generate(seed, num_words, &StartSeed::False)
	}

	/// Generates a sequence, with control over the starting window.
	///
	/// The start tokens selected by `start_seed` are emitted first, then
	/// `num_words` generated tokens. All tokens are joined with the
	/// training tokenizer's separator.
	///
	/// # Behavior
	/// - The window holds the last `N - 1` tokens
	/// - Each step draws one uniform value in `[0, 1)`
	/// - A context never observed (or carrying no mass) drops its oldest
	///   token and the draw is replayed one order down, to order 1 at most
	/// - If order 1 itself carries no mass, the token is drawn by raw count
	///
	/// # Errors
	/// Returns `EmptyModel` if the model was trained on no tokens.
	pub fn generate(&self, seed: u64, num_words: usize, start_seed: &StartSeed) -> Result<String> {
		if self.level(1).is_empty() {
			return Err(NGramError::EmptyModel);
		}

		let mut rng = StdRng::seed_from_u64(seed);
		let width = self.n_value() - 1;

		let mut words: Vec<String> = match start_seed {
			StartSeed::False => Vec::new(),
			StartSeed::Random => self.get_prev(&mut rng),
			StartSeed::Custom(tokens) => tokens.clone(),
		};

		let mut window: VecDeque<String> = words[words.len().saturating_sub(width)..].iter().cloned().collect();

		for _ in 0..num_words {
			let next = self.next_token(&window, rng.random::<f64>())?;
			if width > 0 {
				if window.len() == width {
					window.pop_front();
				}
				window.push_back(next.clone());
			}
			words.push(next);
		}

		Ok(join(&words, self.separator()))
	}

	/// Draws an observed order-N context.
	///
	/// Returns no tokens for unigram models or when no document reached N
	/// tokens; generation then starts from an empty window.
	fn get_prev(&self, rng: &mut StdRng) -> Vec<String> {
		let contexts = self.contexts();
		if contexts.is_empty() {
			return Vec::new();
		}
		contexts[rng.random_range(0..contexts.len())].clone()
	}

	/// Picks the continuation of `window` that the uniform value `rand` lands on.
	fn next_token(&self, window: &VecDeque<String>, rand: f64) -> Result<String> {
		let tokens: Vec<&str> = window.iter().map(String::as_str).collect();

		for start in 0..=tokens.len() {
			let context = &tokens[start..];
			let level = self.level(context.len() + 1);
			let key = join(context, self.separator());
			if let Some(word) = level
				.distribution()
				.get(&key)
				.and_then(|dist| Self::get_word(rand, dist, |p| *p))
			{
				return Ok(word.to_owned());
			}
		}

		// Every unigram was discounted to 0: fall back to raw counts
		self.level(1)
			.frequencies()
			.get("")
			.and_then(|counts| Self::get_word(rand, counts, |count| *count as f64))
			.map(str::to_owned)
			.ok_or(NGramError::EmptyModel)
	}

	/// Selects a token from a distribution given a uniform value in `[0, 1)`.
	///
	/// Tokens are visited in key order; each owns an interval proportional to
	/// its weight, scaled so the intervals cover the distribution's total
	/// mass. Returns `None` if the total mass is 0.
	fn get_word<'d, V, F>(rand: f64, dist: &'d BTreeMap<String, V>, weight: F) -> Option<&'d str>
	where
		F: Fn(&V) -> f64,
	{
		let total: f64 = dist.values().map(&weight).sum();
		if total <= 0.0 {
			return None;
		}

		let target = rand * total;
		let mut cumulative = 0.0;
		let mut fallback: Option<&str> = None;
		for (word, value) in dist {
			let w = weight(value);
			if w <= 0.0 {
				continue;
			}
			cumulative += w;
			if target < cumulative {
				return Some(word);
			}
			fallback = Some(word);
		}

		// Rounding can leave `target` just past the last interval
		fallback
	}
}
