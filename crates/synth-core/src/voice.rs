//! The Voice record: the unit of polyphony. One Voice is a complete
//! subtractive synthesis chain — two oscillators, two LFOs, a filter chain
//! and an ADSR envelope — addressable both by the DSP engine (by index,
//! every sample) and by the control plane (by column name, on demand).

use crate::consts::ADSR_STEP_COUNT;
use crate::types::{FilterType, MixMode, OscType, VState};

/// Shared shape of osc1, osc2, the vibrato LFO and the tremolo LFO.
///
/// `gain` and `out` are meaningful for all four; `phaseoffset` is rarely
/// written by clients but kept uniform across the four generators since the
/// waveform evaluator treats them identically.
#[derive(Debug, Clone, Copy, Default)]
pub struct Oscillator {
    pub otype: OscType,
    pub freq: f32,
    pub phasestep: f32,
    pub phaseacc: f32,
    pub symmetry: f32,
    pub phaseoffset: f32,
    pub gain: f32,
    pub out: f32,
}

impl Oscillator {
    fn default_voice() -> Self {
        Oscillator {
            otype: OscType::Off,
            freq: 440.0,
            phasestep: 440.0 / crate::consts::SAMPLE_RATE as f32,
            phaseacc: 0.0,
            symmetry: 0.5,
            phaseoffset: 0.0,
            gain: 0.0,
            out: 0.0,
        }
    }

    fn default_lfo() -> Self {
        Oscillator {
            otype: OscType::Off,
            freq: 5.0,
            phasestep: 5.0 / crate::consts::SAMPLE_RATE as f32,
            phaseacc: 0.0,
            symmetry: 0.5,
            phaseoffset: 0.0,
            gain: 1.0,
            out: 0.0,
        }
    }
}

/// Portamento state, carried on osc1 only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Glide {
    pub glidefreq: f32,
    pub glidems: u32,
    pub glidecount: u32,
    pub glidestep: f32,
}

/// One biquad section, Direct Form I: explicit input/output delay cells
/// rather than the transposed form, per the filter's derivation formulas.
#[derive(Debug, Clone, Copy, Default)]
pub struct BiquadSection {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
    pub in1: f32,
    pub in2: f32,
    pub out1: f32,
    pub out2: f32,
}

/// Two-section cascadable filter chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterChain {
    pub flttype: FilterType,
    pub fltf1: f32,
    pub fltf2: f32,
    pub fltrolloff: u8,
    pub fltq: f32,
    pub sec1: BiquadSection,
    pub sec2: BiquadSection,
}

impl FilterChain {
    /// A voice's at-rest filter: both corners at 440Hz, 6dB/octave, Q 1 —
    /// matching the original's init so a client that sets `flttype` without
    /// first touching `fltf1`/`fltf2` doesn't get a degenerate `tan(0)` coefficient.
    fn default_voice() -> Self {
        FilterChain {
            flttype: FilterType::Off,
            fltf1: 440.0,
            fltf2: 440.0,
            fltrolloff: 6,
            fltq: 1.0,
            sec1: BiquadSection::default(),
            sec2: BiquadSection::default(),
        }
    }
}

/// One ADSR breakpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdsrStep {
    pub time_ms: u32,
    pub gain: f32,
}

/// A complete voice record: the row of the `voices` table.
#[derive(Debug, Clone)]
pub struct Voice {
    pub idx: usize,
    pub noteid: String,
    pub chordid: String,

    pub vstate: VState,
    pub ontime: u32,
    pub adsridx: usize,
    pub steps: [AdsrStep; ADSR_STEP_COUNT],

    pub osc1: Oscillator,
    pub osc2: Oscillator,
    pub vibrato: Oscillator,
    pub tremolo: Oscillator,

    pub glide: Glide,
    /// Derived from `vibdepth` on write: `vibo1phase = vibdepth / SAMPLE_RATE`.
    pub vibdepth: f32,
    pub vibo1phase: f32,
    pub tremdepth: f32,

    pub mixmode: MixMode,
    pub outputgain: f32,

    pub filter: FilterChain,

    /// Set by osc2 whenever its phase wraps this tick; consumed by HARDSYNC.
    pub sync: bool,

    /// Floating-point sample in [-1, +1], the per-tick DSP output.
    pub voiceout: f32,
    /// `voiceout` projected to 16-bit signed PCM, read-only.
    pub vout: i16,
}

impl Voice {
    /// Resets this voice to the default FREE state described in the data
    /// model: FREE, oscillators off, a sine-like sustain-only envelope, no
    /// glide, no filter.
    pub fn reset(&mut self, idx: usize) {
        self.idx = idx;
        self.noteid.clear();
        self.chordid.clear();

        self.vstate = VState::Free;
        self.ontime = 0;
        self.adsridx = 0;
        self.steps = [AdsrStep { time_ms: crate::consts::SUSTAIN_VALUE_MS, gain: 1.0 }; ADSR_STEP_COUNT];

        self.osc1 = Oscillator::default_voice();
        self.osc2 = Oscillator::default_voice();
        self.vibrato = Oscillator::default_lfo();
        self.tremolo = Oscillator::default_lfo();

        self.glide = Glide::default();
        self.vibdepth = 0.0;
        self.vibo1phase = 0.0;
        self.tremdepth = 0.0;

        self.mixmode = MixMode::None;
        self.outputgain = 1.0;

        self.filter = FilterChain::default_voice();

        self.sync = false;
        self.voiceout = 0.0;
        self.vout = 0;
    }
}

impl Default for Voice {
    fn default() -> Self {
        let mut v = Voice {
            idx: 0,
            noteid: String::new(),
            chordid: String::new(),
            vstate: VState::Free,
            ontime: 0,
            adsridx: 0,
            steps: [AdsrStep::default(); ADSR_STEP_COUNT],
            osc1: Oscillator::default(),
            osc2: Oscillator::default(),
            vibrato: Oscillator::default(),
            tremolo: Oscillator::default(),
            glide: Glide::default(),
            vibdepth: 0.0,
            vibo1phase: 0.0,
            tremdepth: 0.0,
            mixmode: MixMode::None,
            outputgain: 1.0,
            filter: FilterChain::default(),
            sync: false,
            voiceout: 0.0,
            vout: 0,
        };
        v.reset(0);
        v
    }
}
