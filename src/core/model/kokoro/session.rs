//! ONNX Runtime session for Kokoro-82M

use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, Result};
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::{Session, SessionInputValue, SessionInputs};
use ort::value::{Tensor, Value};
use parking_lot::Mutex;
use tracing::{debug, info};

use super::phonemizer::EspeakPhonemizer;
use super::styles::{STYLE_DIM, VoiceStyle, VoiceStyles};
use super::tokenizer::{pad_tokens, tokenize};
use super::assets;
use crate::core::audio::SampleBuffer;
use crate::core::model::{ChunkIter, ModelConfig, ModelError, SpeechModel, split_segments};

const STYLE_INPUT: &str = "style";
const SPEED_INPUT: &str = "speed";
const TOKEN_INPUTS: &[&str] = &["input_ids", "tokens"];

/// Kokoro model with its voices and phonemizer
pub struct KokoroModel {
    session: Mutex<Session>,
    tokens_input: String,
    audio_output: String,
    styles: VoiceStyles,
    phonemizer: EspeakPhonemizer,
}

/// Load the Kokoro backend from local assets
pub fn load(config: &ModelConfig, voice_ids: &[&str]) -> Result<Box<dyn SpeechModel>> {
    Ok(Box::new(KokoroModel::new(config, voice_ids)?))
}

impl KokoroModel {
    pub fn new(config: &ModelConfig, voice_ids: &[&str]) -> Result<Self> {
        let model_path = assets::model_path(config)?;
        let voices_dir = assets::voices_dir(config)?;

        let phonemizer = EspeakPhonemizer::new(&config.language)?;

        info!("Loading Kokoro model from: {:?}", model_path);
        let session = Self::create_session(&model_path, config.num_threads)?;

        let input_names: Vec<String> = session.inputs.iter().map(|i| i.name.clone()).collect();
        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        debug!("Kokoro model inputs: {:?}", input_names);
        debug!("Kokoro model outputs: {:?}", output_names);

        let tokens_input = TOKEN_INPUTS
            .iter()
            .find(|name| input_names.iter().any(|n| n == *name))
            .map(|name| name.to_string())
            .with_context(|| format!("Model has no token input, found {input_names:?}"))?;

        for required in [STYLE_INPUT, SPEED_INPUT] {
            if !input_names.iter().any(|n| n == required) {
                anyhow::bail!("Model is missing required input '{required}'");
            }
        }

        let audio_output = output_names
            .first()
            .cloned()
            .context("Model declares no outputs")?;

        let styles = VoiceStyles::load_dir(&voices_dir, voice_ids)?;
        info!("Loaded {} Kokoro voice(s) from {:?}", styles.len(), voices_dir);

        Ok(Self {
            session: Mutex::new(session),
            tokens_input,
            audio_output,
            styles,
            phonemizer,
        })
    }

    fn create_session(model_path: &Path, num_threads: Option<usize>) -> Result<Session> {
        let mut builder =
            SessionBuilder::new()?.with_optimization_level(GraphOptimizationLevel::Level3)?;

        if let Some(num_threads) = num_threads {
            builder = builder
                .with_intra_threads(num_threads)?
                .with_inter_threads(1)?;
        }

        Ok(builder.commit_from_file(model_path)?)
    }

    fn synthesize_segment(
        &self,
        segment: &str,
        style: &VoiceStyle,
        speed: f32,
    ) -> Result<SampleBuffer, ModelError> {
        let phonemes = self.phonemizer.phonemize(segment)?;
        let tokens = tokenize(&phonemes);
        if tokens.is_empty() {
            debug!("Segment produced no phoneme tokens, skipping");
            return Ok(SampleBuffer::new());
        }

        let embedding = style.embedding(tokens.len());
        self.infer(pad_tokens(&tokens), embedding.to_vec(), speed)
            .map_err(|e| ModelError::Inference(e.to_string()))
    }

    fn infer(&self, tokens: Vec<i64>, style: Vec<f32>, speed: f32) -> ort::Result<SampleBuffer> {
        let seq_len = tokens.len();
        let inputs: Vec<(Cow<'_, str>, SessionInputValue<'_>)> = vec![
            (
                Cow::Borrowed(self.tokens_input.as_str()),
                SessionInputValue::Owned(Value::from(Tensor::from_array(([1, seq_len], tokens))?)),
            ),
            (
                Cow::Borrowed(STYLE_INPUT),
                SessionInputValue::Owned(Value::from(Tensor::from_array(([1, STYLE_DIM], style))?)),
            ),
            (
                Cow::Borrowed(SPEED_INPUT),
                SessionInputValue::Owned(Value::from(Tensor::from_array(([1], vec![speed]))?)),
            ),
        ];

        let mut session = self.session.lock();
        let outputs = session.run(SessionInputs::from(inputs))?;
        let (shape, data) = outputs[self.audio_output.as_str()].try_extract_tensor::<f32>()?;

        debug!("Kokoro inference: {} tokens -> audio shape {:?}", seq_len, shape);

        Ok(data.to_vec())
    }
}

impl SpeechModel for KokoroModel {
    fn generate<'a>(&'a self, text: &'a str, voice_id: &'a str, speed: f32) -> ChunkIter<'a> {
        let style = match self.styles.style_for(voice_id) {
            Ok(style) => style,
            Err(e) => return Box::new(std::iter::once(Err(e))),
        };

        Box::new(
            split_segments(text).map(move |segment| self.synthesize_segment(segment, style, speed)),
        )
    }
}
