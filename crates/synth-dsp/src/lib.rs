//! synth-dsp: the stateless per-voice rendering engine — oscillators,
//! mixer, filter chain and ADSR — plus the shared sine table and LFSR.

pub mod adsr;
pub mod filter;
pub mod lfsr;
pub mod render;
pub mod sine;
pub mod waveform;

pub use lfsr::Lfsr;
pub use render::Engine;
pub use sine::SineTable;
