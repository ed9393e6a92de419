//! synth-core: the Voice data model and VoiceBank container for the
//! polyphonic synthesizer daemon.
//!
//! This crate owns no DSP math and no networking — it is the shared record
//! type that `synth-dsp` renders and `synth-control` reflects over.

pub mod bank;
pub mod consts;
pub mod error;
pub mod types;
pub mod voice;

pub use bank::VoiceBank;
pub use error::{CoreError, CoreResult};
pub use types::{FilterType, MixMode, OscType, VState};
pub use voice::{AdsrStep, BiquadSection, FilterChain, Glide, Oscillator, Voice};
