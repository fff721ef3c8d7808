//! Text to IPA conversion for Kokoro
//!
//! eSpeak-NG runs in process through `espeak-rs` (built with the `kokoro`
//! feature). The library keeps global state, so every call is serialized
//! through a process-wide lock. Language mapping and phoneme post-processing
//! are always compiled.
//!
//! eSpeak-NG data must be present on the host:
//! - Ubuntu/Debian: `sudo apt-get install espeak-ng libespeak-ng-dev`
//! - macOS: `brew install espeak-ng`

use once_cell::sync::Lazy;
use regex::Regex;

use super::vocab::char_to_id;
use crate::core::model::ModelError;

/// Rewrites applied to eSpeak output for every language
static PHONEME_REWRITES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        // "two hundred" is run together by eSpeak
        (r"([a-zɹː])(hˈʌndɹɪd)", "$1 $2"),
        // Plural/possessive z detached before punctuation or at the end
        (r#" z([;:,.!?¡¿—…"«»“” ])"#, "z$1"),
        (r" z$", "z"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

/// American "ninety" is flapped unless the vowel is long
static AMERICAN_REWRITES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"nˈaɪnti([^ː])", "nˈaɪndi$1"),
        (r"nˈaɪnti$", "nˈaɪndi"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

/// Map a configured language code onto the eSpeak voice
pub fn espeak_language(code: &str) -> Result<&'static str, ModelError> {
    match code.trim().to_lowercase().as_str() {
        "a" | "en" | "en-us" => Ok("en-us"),
        "b" | "en-gb" => Ok("en-gb"),
        other => Err(ModelError::Phonemization(format!(
            "Unsupported language '{other}'. Expected 'en-us' or 'en-gb'"
        ))),
    }
}

/// Adapt raw eSpeak output to the symbols the model was trained on.
///
/// Unknown symbols are dropped and whitespace is collapsed.
pub fn postprocess_phonemes(raw: &str, language: &str) -> String {
    let mut phonemes = raw
        .replace("kəkˈoːɹoʊ", "kˈoʊkəɹoʊ")
        .replace("kəkˈɔːɹəʊ", "kˈəʊkəɹəʊ")
        .chars()
        .map(|c| match c {
            'ʲ' => 'j',
            'r' => 'ɹ',
            'x' => 'k',
            'ɬ' => 'l',
            _ => c,
        })
        .collect::<String>();

    for (pattern, replacement) in PHONEME_REWRITES.iter() {
        phonemes = pattern.replace_all(&phonemes, *replacement).into_owned();
    }
    if language == "en-us" {
        for (pattern, replacement) in AMERICAN_REWRITES.iter() {
            phonemes = pattern.replace_all(&phonemes, *replacement).into_owned();
        }
    }

    phonemes
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| char_to_id(*c).is_some())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(feature = "kokoro")]
pub use espeak::EspeakPhonemizer;

#[cfg(feature = "kokoro")]
mod espeak {
    use once_cell::sync::Lazy;
    use parking_lot::Mutex;

    use super::super::normalize::normalize_text;
    use super::{espeak_language, postprocess_phonemes};
    use crate::core::model::ModelError;

    static ESPEAK_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    /// Phonemizer bound to one eSpeak language
    #[derive(Debug, Clone)]
    pub struct EspeakPhonemizer {
        language: &'static str,
    }

    impl EspeakPhonemizer {
        /// Resolve the language and run a trial phonemization so a broken
        /// eSpeak install fails the model load instead of the first request.
        pub fn new(language: &str) -> Result<Self, ModelError> {
            let phonemizer = Self {
                language: espeak_language(language)?,
            };
            phonemizer.raw_phonemes("test")?;
            Ok(phonemizer)
        }

        pub fn phonemize(&self, text: &str) -> Result<String, ModelError> {
            let normalized = normalize_text(text);
            if normalized.is_empty() {
                return Ok(String::new());
            }

            let raw = self.raw_phonemes(&normalized)?;
            Ok(postprocess_phonemes(&raw, self.language))
        }

        fn raw_phonemes(&self, text: &str) -> Result<String, ModelError> {
            let _guard = ESPEAK_LOCK.lock();
            espeak_rs::text_to_phonemes(text, self.language, None, true, false)
                .map(|parts| parts.join(""))
                .map_err(|e| ModelError::Phonemization(format!("eSpeak failed: {e}")))
        }
    }
}
