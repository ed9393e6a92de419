//! Fixed engine-wide constants. These are invariants of the design, not
//! configuration — nothing in the control plane can change them.

/// Audio sample rate, fixed per the data model invariant.
pub const SAMPLE_RATE: f64 = 44_100.0;

/// Number of voice slots in the bank.
pub const VOICE_COUNT: usize = 20;

/// Upper frequency clamp for oscillators (osc1/osc2/vibrato/tremolo/glide).
pub const MX_OSC_FREQ: f64 = 9000.0;

/// Upper frequency clamp for filter corner frequencies.
pub const MX_FILT_FREQ: f64 = 20_000.0;

/// Lower clamp shared by every frequency-bearing column.
pub const MIN_FREQ: f64 = 0.01;

/// Duty-cycle symmetry clamp bounds.
pub const MIN_SYMMETRY: f32 = 0.01;
pub const MAX_SYMMETRY: f32 = 0.999;

/// Filter Q clamp bounds.
pub const MIN_FLTQ: f32 = 0.1;
pub const MAX_FLTQ: f32 = 25.0;

/// Number of entries in the first-quadrant sine table.
pub const NSINES: usize = 1000;

/// LFSR seed and Galois-form feedback polynomial.
pub const LFSR_INIT: u32 = 0x1111_1111;
pub const LFSR_POLY: u32 = 0x4600_0000;

/// Last valid ADSR step index; writing past it forces the voice FREE.
pub const MX_ADSR_STEP: usize = 7;
pub const ADSR_STEP_COUNT: usize = MX_ADSR_STEP + 1;

/// Sentinel step time (ms) that freezes the envelope in SUSTAIN.
pub const SUSTAIN_VALUE_MS: u32 = 60_000;

/// Full-scale 16-bit signed amplitude.
pub const FULL_VOLUME: i32 = (1 << 15) - 1;

/// TCP control port, overridable at startup via `SYNTH_PORT`.
pub const DEFAULT_PORT: u16 = 8889;

/// Max simultaneous control-plane connections; oldest is evicted on overflow.
pub const MX_UI: usize = 20;

/// Per-connection command/response buffer sizes.
pub const MXCMD: usize = 5000;
pub const MXRSP: usize = 50_000;
