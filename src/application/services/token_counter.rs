use std::sync::LazyLock;

use tiktoken_rs::CoreBPE;

static TOKENIZER: LazyLock<Option<CoreBPE>> = LazyLock::new(|| match tiktoken_rs::cl100k_base() {
    Ok(bpe) => Some(bpe),
    Err(e) => {
        tracing::warn!(error = %e, "Tokenizer unavailable, using length approximation");
        None
    }
});

/// Count tokens with cl100k_base, falling back to the `len / 4`
/// approximation when the tokenizer cannot be initialized.
pub fn count_tokens(text: &str) -> usize {
    match TOKENIZER.as_ref() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len(),
        None => text.len() / 4,
    }
}
