//! Kokoro v1.0 phoneme vocabulary
//!
//! Ids are not contiguous; the table mirrors the model's training config.
//! Id 0 is reserved for the boundary pad token.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Boundary token placed at both ends of every sequence
pub const PAD_TOKEN: i64 = 0;

const VOCAB_ENTRIES: &[(char, i64)] = &[
    (';', 1),
    (':', 2),
    (',', 3),
    ('.', 4),
    ('!', 5),
    ('?', 6),
    ('\u{2014}', 9),  // —
    ('\u{2026}', 10), // …
    ('"', 11),
    ('(', 12),
    (')', 13),
    ('\u{201c}', 14), // “
    ('\u{201d}', 15), // ”
    (' ', 16),
    ('\u{0303}', 17), // combining tilde
    ('\u{02a3}', 18), // ʣ
    ('\u{02a5}', 19), // ʥ
    ('\u{02a6}', 20), // ʦ
    ('\u{02a8}', 21), // ʨ
    ('\u{1d5d}', 22), // ᵝ
    ('\u{ab67}', 23), // ꭧ
    ('A', 24),
    ('I', 25),
    ('O', 31),
    ('Q', 33),
    ('S', 35),
    ('T', 36),
    ('W', 39),
    ('Y', 41),
    ('\u{1d4a}', 42), // ᵊ
    ('a', 43),
    ('b', 44),
    ('c', 45),
    ('d', 46),
    ('e', 47),
    ('f', 48),
    ('h', 50),
    ('i', 51),
    ('j', 52),
    ('k', 53),
    ('l', 54),
    ('m', 55),
    ('n', 56),
    ('o', 57),
    ('p', 58),
    ('q', 59),
    ('r', 60),
    ('s', 61),
    ('t', 62),
    ('u', 63),
    ('v', 64),
    ('w', 65),
    ('x', 66),
    ('y', 67),
    ('z', 68),
    ('\u{0251}', 69),  // ɑ
    ('\u{0250}', 70),  // ɐ
    ('\u{0252}', 71),  // ɒ
    ('\u{00e6}', 72),  // æ
    ('\u{03b2}', 75),  // β
    ('\u{0254}', 76),  // ɔ
    ('\u{0255}', 77),  // ɕ
    ('\u{00e7}', 78),  // ç
    ('\u{0256}', 80),  // ɖ
    ('\u{00f0}', 81),  // ð
    ('\u{02a4}', 82),  // ʤ
    ('\u{0259}', 83),  // ə
    ('\u{025a}', 85),  // ɚ
    ('\u{025b}', 86),  // ɛ
    ('\u{025c}', 87),  // ɜ
    ('\u{025f}', 90),  // ɟ
    ('\u{0261}', 92),  // ɡ
    ('\u{0265}', 99),  // ɥ
    ('\u{0268}', 101), // ɨ
    ('\u{026a}', 102), // ɪ
    ('\u{029d}', 103), // ʝ
    ('\u{026f}', 110), // ɯ
    ('\u{0270}', 111), // ɰ
    ('\u{014b}', 112), // ŋ
    ('\u{0273}', 113), // ɳ
    ('\u{0272}', 114), // ɲ
    ('\u{0274}', 115), // ɴ
    ('\u{00f8}', 116), // ø
    ('\u{0278}', 118), // ɸ
    ('\u{03b8}', 119), // θ
    ('\u{0153}', 120), // œ
    ('\u{0279}', 123), // ɹ
    ('\u{027e}', 125), // ɾ
    ('\u{027b}', 126), // ɻ
    ('\u{0281}', 128), // ʁ
    ('\u{027d}', 129), // ɽ
    ('\u{0282}', 130), // ʂ
    ('\u{0283}', 131), // ʃ
    ('\u{0288}', 132), // ʈ
    ('\u{02a7}', 133), // ʧ
    ('\u{028a}', 135), // ʊ
    ('\u{028b}', 136), // ʋ
    ('\u{028c}', 138), // ʌ
    ('\u{0263}', 139), // ɣ
    ('\u{0264}', 140), // ɤ
    ('\u{03c7}', 142), // χ
    ('\u{028e}', 143), // ʎ
    ('\u{0292}', 147), // ʒ
    ('\u{0294}', 148), // ʔ
    ('\u{02c8}', 156), // ˈ
    ('\u{02cc}', 157), // ˌ
    ('\u{02d0}', 158), // ː
    ('\u{02b0}', 162), // ʰ
    ('\u{02b2}', 164), // ʲ
    ('\u{2193}', 169), // ↓
    ('\u{2192}', 171), // →
    ('\u{2197}', 172), // ↗
    ('\u{2198}', 173), // ↘
    ('\u{1d7b}', 177), // ᵻ
];

/// Character to token id mapping
pub static VOCAB: Lazy<HashMap<char, i64>> =
    Lazy::new(|| VOCAB_ENTRIES.iter().copied().collect());

/// Get the token id for a character, if it exists
pub fn char_to_id(c: char) -> Option<i64> {
    VOCAB.get(&c).copied()
}
