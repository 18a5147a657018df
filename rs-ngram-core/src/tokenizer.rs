//! Tokenizers feeding the n-gram model.
//!
//! The model never normalizes text: case, punctuation and segmentation are
//! fixed by the tokenizer. A tokenizer also decides the separator used to
//! join tokens, both for context keys and for generated output.

use crate::document::Document;

/// Splits raw text into an ordered token sequence.
pub trait Tokenizer {
	/// Returns the tokens of `text`, in order.
	fn tokens(&self, text: &str) -> Vec<String>;

	/// Separator used to join tokens into context keys and sentences.
	fn separator(&self) -> &str {
		" "
	}
}

/// Whitespace-separated word tokens, kept verbatim.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
	fn tokens(&self, text: &str) -> Vec<String> {
		text.split_whitespace().map(str::to_owned).collect()
	}
}

/// One token per character (Unicode scalar value).
///
/// Tokens are joined without a separator, so `"ab"` is the context made of
/// `'a'` then `'b'`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CharTokenizer;

impl Tokenizer for CharTokenizer {
	fn tokens(&self, text: &str) -> Vec<String> {
		text.chars().map(String::from).collect()
	}

	fn separator(&self) -> &str {
		""
	}
}

/// Emits the windows of order `k` over a token stream.
///
/// Each window is split into its context (first `k - 1` tokens, joined by the
/// separator; empty for `k = 1`) and its continuation (the `k`-th token).
#[derive(Clone, Debug)]
pub struct NGramTokenizer<'a> {
	k: usize,
	separator: &'a str,
}

impl<'a> NGramTokenizer<'a> {
	/// Creates a tokenizer for windows of `k` tokens.
	///
	/// `k = 0` yields no windows.
	pub fn new(k: usize, separator: &'a str) -> Self {
		Self { k, separator }
	}

	/// Returns every `(context, continuation)` pair of the token stream.
	///
	/// Streams shorter than `k` produce nothing.
	pub fn windows<'t, S: AsRef<str>>(
		&self,
		tokens: &'t [S],
	) -> impl Iterator<Item = (String, &'t str)> {
		let k = self.k;
		let separator = self.separator;
		// `windows(0)` panics, so order 0 maps to an empty slice
		let source = if k == 0 { &tokens[..0] } else { tokens };
		source.windows(k.max(1)).map(move |window| {
			let context = join(&window[..k - 1], separator);
			(context, window[k - 1].as_ref())
		})
	}

	/// Accumulates the count of every joined k-gram of `document` into it.
	pub fn tokenize(&self, document: &mut Document) {
		let mut grams: Vec<String> = Vec::new();
		for (context, token) in self.windows(document.tokens()) {
			let gram = if context.is_empty() {
				token.to_owned()
			} else {
				format!("{context}{}{token}", self.separator)
			};
			grams.push(gram);
		}
		for gram in grams {
			document.increment(&gram, 1);
		}
	}
}

/// Joins tokens with `separator`.
pub(crate) fn join<S: AsRef<str>>(tokens: &[S], separator: &str) -> String {
	let mut out = String::new();
	for (i, token) in tokens.iter().enumerate() {
		if i > 0 {
			out.push_str(separator);
		}
		out.push_str(token.as_ref());
	}
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn word_tokens_are_verbatim() {
		let tokens = WordTokenizer.tokens("The  cat,\tthe\ncat.");
		assert_eq!(tokens, vec!["The", "cat,", "the", "cat."]);
	}

	#[test]
	fn char_tokens_split_scalars() {
		let tokens = CharTokenizer.tokens("né!");
		assert_eq!(tokens, vec!["n", "é", "!"]);
		assert_eq!(CharTokenizer.separator(), "");
	}

	#[test]
	fn windows_split_context_and_continuation() {
		let tokens = WordTokenizer.tokens("a b c d");
		let windows: Vec<_> = NGramTokenizer::new(3, " ").windows(&tokens).collect();
		assert_eq!(
			windows,
			vec![("a b".to_owned(), "c"), ("b c".to_owned(), "d")]
		);
	}

	#[test]
	fn unigram_windows_have_empty_context() {
		let tokens = WordTokenizer.tokens("x y");
		let windows: Vec<_> = NGramTokenizer::new(1, " ").windows(&tokens).collect();
		assert_eq!(windows, vec![(String::new(), "x"), (String::new(), "y")]);
	}

	#[test]
	fn short_streams_and_order_zero_yield_nothing() {
		let tokens = WordTokenizer.tokens("a b");
		assert_eq!(NGramTokenizer::new(3, " ").windows(&tokens).count(), 0);
		assert_eq!(NGramTokenizer::new(0, " ").windows(&tokens).count(), 0);
	}

	#[test]
	fn tokenize_accumulates_into_document() {
		let mut document = Document::new("a b a b", &WordTokenizer);
		NGramTokenizer::new(2, " ").tokenize(&mut document);
		assert_eq!(document.counts().get("a b"), Some(&2));
		assert_eq!(document.counts().get("b a"), Some(&1));
	}
}
