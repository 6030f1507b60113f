//! 合成流水线
//!
//! Segmenter → Filter → Voice Resolver → Synthesizer → Assembler

mod assembler;
mod controller;
mod scratch;
mod synthesizer;

pub use assembler::Assembler;
pub use controller::{
    Artifact, PipelineController, PipelineOutcome, PipelineRequest, PipelineState, SpeechInput,
};
pub use scratch::{CleanupReport, ScratchArea};
pub use synthesizer::{text_prefix, SegmentSynthesizer, SynthesisResult, TEXT_PREFIX_CHARS};
