use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tokenizer::Tokenizer;

/// A tokenized document.
///
/// Holds the ordered token content used for training and scoring, plus a
/// free-form count table that tokenizers can accumulate into
/// (see `NGramTokenizer::tokenize`).
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Document {
	tokens: Vec<String>,
	counts: HashMap<String, usize>,
}

impl Document {
	/// Tokenizes `text` into a new document.
	pub fn new<T: Tokenizer + ?Sized>(text: &str, tokenizer: &T) -> Self {
		Self::from_tokens(tokenizer.tokens(text))
	}

	/// Builds a document from already tokenized content.
	pub fn from_tokens(tokens: Vec<String>) -> Self {
		Self { tokens, counts: HashMap::new() }
	}

	/// The ordered token content.
	pub fn tokens(&self) -> &[String] {
		&self.tokens
	}

	/// Number of tokens.
	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	/// Adds `count` occurrences of `key`.
	///
	/// A zero count is ignored, so every stored count stays strictly positive.
	pub fn increment(&mut self, key: &str, count: usize) {
		if count == 0 {
			return;
		}
		*self.counts.entry(key.to_owned()).or_insert(0) += count;
	}

	/// Counts accumulated through `increment`.
	pub fn counts(&self) -> &HashMap<String, usize> {
		&self.counts
	}
}
