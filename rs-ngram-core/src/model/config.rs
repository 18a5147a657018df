use serde::{Deserialize, Serialize};

use crate::error::{NGramError, Result};

/// How `prob` behaves when the queried pair was not observed in training.
///
/// # Variants
/// - `Strict`: an unseen context, or an unseen word in a seen context,
///   scores 0. Callers that need backoff query `kth_distribution` themselves.
/// - `Chained`: an unseen context drops its oldest token and retries at the
///   next lower order; an unseen word in a seen context scores the context's
///   backoff weight `D * |S(c)| / C(c)` times the chained probability one
///   order down. Order 0 always scores 0.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Backoff {
	#[default]
	Strict,
	Chained,
}

/// Strategy used to fill the context window before generation begins.
///
/// # Variants
/// - `Random`: start from an observed order-N context, drawn with the same
///   seeded generator as the rest of the sentence.
/// - `Custom(tokens)`: start from caller-provided tokens.
/// - `False`: start from an empty window; the first token is drawn from the
///   unigram distribution.
///
/// Start tokens are part of the output and come before the generated ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StartSeed {
	Random,
	Custom(Vec<String>),
	#[default]
	False,
}

/// Training configuration of an `NGramDistribution`.
///
/// # Invariants
/// - `order` is always >= 1
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NGramConfig {
	/// N, the length of the longest n-gram the model learns.
	order: usize,

	/// Behavior of probability queries on unseen pairs.
	pub backoff: Backoff,
}

impl NGramConfig {
	/// Creates a configuration for an order-`order` model with strict backoff.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `order < 1`.
	pub fn new(order: usize) -> Result<Self> {
		if order < 1 {
			return Err(NGramError::InvalidOrder(order));
		}
		Ok(Self { order, backoff: Backoff::Strict })
	}

	/// Returns the model order N.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Sets the model order.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `order < 1`; the configuration is unchanged.
	pub fn set_order(&mut self, order: usize) -> Result<()> {
		if order < 1 {
			return Err(NGramError::InvalidOrder(order));
		}
		self.order = order;
		Ok(())
	}

	/// Builder-style variant of setting `backoff`.
	pub fn with_backoff(mut self, backoff: Backoff) -> Self {
		self.backoff = backoff;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn order_zero_is_rejected() {
		assert!(matches!(NGramConfig::new(0), Err(NGramError::InvalidOrder(0))));

		let mut config = NGramConfig::new(3).unwrap();
		assert!(config.set_order(0).is_err());
		assert_eq!(config.order(), 3);
		config.set_order(2).unwrap();
		assert_eq!(config.order(), 2);
	}

	#[test]
	fn strict_backoff_is_the_default() {
		let config = NGramConfig::new(2).unwrap();
		assert_eq!(config.backoff, Backoff::Strict);
		let config = config.with_backoff(Backoff::Chained);
		assert_eq!(config.backoff, Backoff::Chained);
	}
}
