use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::tokenizer::NGramTokenizer;

/// Occurrence counts of k-grams: context → continuation → count.
///
/// Continuations are ordered so iteration over a context is reproducible.
pub type FrequencyTable = HashMap<String, BTreeMap<String, usize>>;

/// Smoothed probabilities of k-grams: context → continuation → P(w | c).
pub type ProbabilityTable = HashMap<String, BTreeMap<String, f64>>;

/// One order of the model chain.
///
/// A `Level` of order `k` holds the counts of every observed k-gram, the
/// absolute discount derived from them, and the smoothed distribution.
/// Order 0 is the base case: it stays empty and scores every token 0.
///
/// # Invariants
/// - Every stored count is >= 1
/// - `0 <= discount <= 1`
/// - Every stored probability is in `[0, 1]`
/// - Tables are filled once, during training
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub(crate) struct Level {
	/// Number of tokens per n-gram.
	k: usize,

	/// Raw k-gram counts.
	freqs: FrequencyTable,

	/// Smoothed distribution, filled by `calc_dist`.
	dist: ProbabilityTable,

	/// Absolute discount D.
	discount: f64,
}

impl Level {
	/// Creates an empty level of order `k`.
	pub(crate) fn new(k: usize) -> Self {
		Self { k, ..Self::default() }
	}

	/// Counts every k-token window of `tokens`.
	///
	/// Streams shorter than `k` contribute nothing. Order 0 never counts.
	pub(crate) fn add_tokens<S: AsRef<str>>(&mut self, tokens: &[S], separator: &str) {
		for (context, next) in NGramTokenizer::new(self.k, separator).windows(tokens) {
			*self
				.freqs
				.entry(context)
				.or_default()
				.entry(next.to_owned())
				.or_insert(0) += 1;
		}
	}

	/// Computes `D = n1 / (n1 + 2 * n2)`.
	///
	/// - n1 = number of k-grams seen exactly once
	/// - n2 = number of k-grams seen exactly twice
	///
	/// D is 0 when `n1 + 2 * n2 == 0` (empty table, or every count >= 3).
	pub(crate) fn calc_discount(&mut self) {
		let (n1, n2) = self.count_of_counts();
		let denominator = n1 + 2 * n2;
		self.discount = if denominator == 0 {
			0.0
		} else {
			n1 as f64 / denominator as f64
		};
	}

	/// Number of k-grams seen exactly once and exactly twice.
	pub(crate) fn count_of_counts(&self) -> (usize, usize) {
		let mut n1 = 0;
		let mut n2 = 0;
		for count in self.freqs.values().flat_map(BTreeMap::values) {
			match *count {
				1 => n1 += 1,
				2 => n2 += 1,
				_ => (),
			}
		}
		(n1, n2)
	}

	/// Computes the absolute-discounting distribution.
	///
	/// `P(w | c) = max(c(c, w) - D, 0) / C(c) + D / C(c) * |S(c)| * lower(w)`
	///
	/// `lower` is the unigram-style probability of the order below; it must
	/// already be final when this runs.
	pub(crate) fn calc_dist<F: Fn(&str) -> f64>(&mut self, lower: F) {
		let mut dist = ProbabilityTable::with_capacity(self.freqs.len());
		for (context, continuations) in &self.freqs {
			let total = continuations.values().sum::<usize>() as f64;
			let distinct = continuations.len() as f64;
			let backoff_mass = self.discount / total * distinct;

			let row = continuations
				.iter()
				.map(|(word, count)| {
					let seen = (*count as f64 - self.discount).max(0.0) / total;
					let p = seen + backoff_mass * lower(word);
					(word.clone(), p.clamp(0.0, 1.0))
				})
				.collect();
			dist.insert(context.clone(), row);
		}
		self.dist = dist;
	}

	/// Probability of `word` after the joined `context`, 0 if either is unseen.
	pub(crate) fn prob(&self, context: &str, word: &str) -> f64 {
		self.dist
			.get(context)
			.and_then(|row| row.get(word))
			.copied()
			.unwrap_or(0.0)
	}

	/// Probability of `word` under the empty context.
	///
	/// Only order 1 has an empty context; higher orders return 0 here.
	pub(crate) fn unigram(&self, word: &str) -> f64 {
		self.prob("", word)
	}

	/// Mass reserved for the order below after `context`: `D * |S(c)| / C(c)`.
	///
	/// Returns 0 for an unseen context.
	pub(crate) fn backoff_weight(&self, context: &str) -> f64 {
		match self.freqs.get(context) {
			Some(continuations) => {
				let total: usize = continuations.values().sum();
				self.discount * continuations.len() as f64 / total as f64
			}
			None => 0.0,
		}
	}

	pub(crate) fn order(&self) -> usize {
		self.k
	}

	pub(crate) fn discount(&self) -> f64 {
		self.discount
	}

	pub(crate) fn frequencies(&self) -> &FrequencyTable {
		&self.freqs
	}

	pub(crate) fn distribution(&self) -> &ProbabilityTable {
		&self.dist
	}

	/// True when no k-gram was observed.
	pub(crate) fn is_empty(&self) -> bool {
		self.freqs.is_empty()
	}
}
