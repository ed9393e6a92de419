//! Enumerated types shared by every sub-oscillator, the mixer, the filter
//! chain and the ADSR state machine.

/// Waveform generator selection, shared by osc1, osc2, vibrato and tremolo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OscType {
    #[default]
    Off,
    Sine,
    Square,
    Triangle,
    Noise,
    /// Present in the column domain for completeness; always renders 0.
    Wavetable,
}

/// Two-operator mixing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MixMode {
    #[default]
    None,
    Sum,
    Am,
    Fm,
    Ring,
    HardSync,
}

/// Biquad chain topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    #[default]
    Off,
    Low,
    High,
    Band,
    Stop,
}

/// Voice lifecycle state. `Release` is reachable only by an explicit write
/// while `Sustain`; it resumes ADSR advancement exactly like writing `On`
/// from `Sustain` (see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VState {
    #[default]
    Free,
    InUse,
    On,
    Sustain,
    Release,
}
