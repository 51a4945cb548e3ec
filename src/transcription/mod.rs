//! Transcription Module
//!
//! Speech-to-text through a cloud provider.

mod whisper;

pub use whisper::*;
