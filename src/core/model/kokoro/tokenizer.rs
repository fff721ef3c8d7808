use tracing::warn;

use super::vocab::{PAD_TOKEN, char_to_id};

/// Longest phoneme sequence the model accepts, excluding the two pad tokens
pub const MAX_PHONEME_TOKENS: usize = 510;

/// Map a phoneme string to token ids.
///
/// Characters outside the vocabulary are dropped. Sequences longer than
/// [`MAX_PHONEME_TOKENS`] are truncated.
pub fn tokenize(phonemes: &str) -> Vec<i64> {
    let mut tokens: Vec<i64> = phonemes.chars().filter_map(char_to_id).collect();

    if tokens.len() > MAX_PHONEME_TOKENS {
        warn!(
            "Phoneme sequence of {} tokens truncated to {}",
            tokens.len(),
            MAX_PHONEME_TOKENS
        );
        tokens.truncate(MAX_PHONEME_TOKENS);
    }

    tokens
}

/// Surround a token sequence with the boundary pad token
pub fn pad_tokens(tokens: &[i64]) -> Vec<i64> {
    let mut padded = Vec::with_capacity(tokens.len() + 2);
    padded.push(PAD_TOKEN);
    padded.extend_from_slice(tokens);
    padded.push(PAD_TOKEN);
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_known_chars() {
        assert_eq!(tokenize("hə"), vec![50, 83]);
    }

    #[test]
    fn test_unknown_chars_dropped() {
        assert_eq!(tokenize("a€b"), vec![43, 44]);
        assert!(tokenize("€€").is_empty());
    }

    #[test]
    fn test_truncates_long_sequences() {
        let long = "a".repeat(MAX_PHONEME_TOKENS + 40);
        assert_eq!(tokenize(&long).len(), MAX_PHONEME_TOKENS);
    }

    #[test]
    fn test_pad_tokens() {
        assert_eq!(pad_tokens(&[43, 44]), vec![0, 43, 44, 0]);
        assert_eq!(pad_tokens(&[]), vec![0, 0]);
    }
}
