//! Token counting for prompt budgets.

use tiktoken_rs::CoreBPE;

use super::error::ModelError;

/// Estimates how many tokens a prompt takes, using the `p50k_base` encoding
/// shared by the completion models.
pub struct Tokenizer {
    bpe: CoreBPE,
}

impl Tokenizer {
    pub fn new() -> Result<Self, ModelError> {
        let bpe = tiktoken_rs::p50k_base().map_err(|e| ModelError::Tokenizer(e.to_string()))?;
        Ok(Self { bpe })
    }

    /// Number of tokens `text` encodes to.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer").field("encoding", &"p50k_base").finish()
    }
}
