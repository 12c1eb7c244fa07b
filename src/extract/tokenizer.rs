//! Tokenizer seam.
//!
//! Real deployments plug a proper NLP tokenizer in behind [`Tokenizer`];
//! [`WordTokenizer`] is enough for lexicon lookups on plain prose.

/// Splits text into lower-case tokens for lexicon lookup.
pub trait Tokenizer {
    /// Tokens of `text`, in order.
    fn tokens(&self, text: &str) -> Vec<String>;
}

/// Splits on anything that is not alphanumeric, `'` or `_`, and lower-cases.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn tokens(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '_'))
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect()
    }
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn tokens(&self, text: &str) -> Vec<String> {
        self(text)
    }
}
