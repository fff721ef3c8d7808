//! Kokoro-82M backend
//!
//! Text is normalized, phonemized with eSpeak-NG, mapped through the Kokoro vocabulary,
//! conditioned on a per-voice style row and run through the ONNX model.
//! Asset handling and text processing are always compiled so `init` works
//! without the runtime; eSpeak and inference require the `kokoro` feature.

pub mod assets;
pub mod normalize;
pub mod phonemizer;
pub mod styles;
pub mod tokenizer;
pub mod vocab;

#[cfg(feature = "kokoro")]
mod session;
#[cfg(not(feature = "kokoro"))]
mod stub;

#[cfg(feature = "kokoro")]
pub use session::{KokoroModel, load};
#[cfg(not(feature = "kokoro"))]
pub use stub::load;
