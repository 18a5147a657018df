//! Error types for training and querying n-gram distributions.

/// Errors raised by `NGramDistribution` and its collaborators.
///
/// Unseen contexts or tokens are never errors on their own: table lookups
/// simply return a probability of 0. Errors are reserved for queries whose
/// answer would otherwise be undefined (out-of-range orders, `ln(0)`,
/// division by a zero window count).
#[derive(Debug, thiserror::Error)]
pub enum NGramError {
	/// The model order must be at least 1.
	#[error("n-gram order must be >= 1, got {0}")]
	InvalidOrder(usize),

	/// A per-order accessor was called with `k > n`.
	#[error("order {k} is out of range [0, {n}]")]
	OrderOutOfRange {
		/// The requested order.
		k: usize,
		/// The model order.
		n: usize,
	},

	/// The model assigns zero probability to an observed window.
	#[error("zero probability for token {token:?} after context {context:?}")]
	ZeroProbability {
		/// The joined context of the window.
		context: String,
		/// The continuation token of the window.
		token: String,
	},

	/// Perplexity needs at least one full window.
	#[error("document has {tokens} tokens, at least {n} are required")]
	DocumentTooShort {
		/// Number of tokens in the document.
		tokens: usize,
		/// The model order.
		n: usize,
	},

	/// Generation was requested from a model trained on no tokens.
	#[error("the model was trained on an empty corpus")]
	EmptyModel,

	/// I/O error while loading a corpus.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// Result type for n-gram operations.
pub type Result<T> = std::result::Result<T, NGramError>;
