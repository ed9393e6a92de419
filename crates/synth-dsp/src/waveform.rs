//! Duty-cycle phase scaling and waveform evaluation, shared by osc1, osc2,
//! vibrato and tremolo.

use synth_core::consts::NSINES;
use synth_core::OscType;

use crate::lfsr::Lfsr;
use crate::sine::SineTable;

/// Scales a raw phase step by the duty-cycle asymmetry rule: for the first
/// half of the cycle the phase moves at one rate, for the second half at
/// the complementary rate.
#[inline]
pub fn scale_phasestep(phstep: f32, phaseacc: f32, symmetry: f32) -> f32 {
    if phaseacc < 0.5 {
        0.5 * phstep / (1.0 - symmetry)
    } else {
        0.5 * phstep / symmetry
    }
}

/// Advances `phaseacc` by `phstep`, wrapping to `[0, 1)`. Returns `true` if
/// the phase wrapped (crossed zero) this tick.
#[inline]
pub fn advance_phase(phaseacc: &mut f32, phstep: f32) -> bool {
    *phaseacc += phstep;
    if *phaseacc >= 1.0 {
        *phaseacc -= phaseacc.floor();
        true
    } else {
        false
    }
}

/// Evaluates a waveform generator at `p = (phaseacc + phaseoffset) mod 1`.
pub fn eval(
    otype: OscType,
    phaseacc: f32,
    phaseoffset: f32,
    sine: &SineTable,
    lfsr: &Lfsr,
) -> f32 {
    let p = (phaseacc + phaseoffset).rem_euclid(1.0);
    match otype {
        OscType::Off | OscType::Wavetable => 0.0,
        OscType::Square => {
            if p < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        OscType::Triangle => {
            if p < 0.25 {
                4.0 * p
            } else if p < 0.75 {
                2.0 - 4.0 * p
            } else {
                4.0 * p - 4.0
            }
        }
        OscType::Sine => {
            let idx_f = if p < 0.25 {
                4.0 * p
            } else if p < 0.5 {
                2.0 - 4.0 * p
            } else if p < 0.75 {
                4.0 * (p - 0.5)
            } else {
                2.0 - 4.0 * (p - 0.5)
            };
            let idx = ((NSINES - 1) as f32 * idx_f) as usize;
            let v = sine.at(idx);
            if p > 0.5 {
                -v
            } else {
                v
            }
        }
        OscType::Noise => lfsr.noise_sample(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_halves() {
        let sine = SineTable::new();
        let lfsr = Lfsr::new();
        assert_eq!(eval(OscType::Square, 0.1, 0.0, &sine, &lfsr), 1.0);
        assert_eq!(eval(OscType::Square, 0.6, 0.0, &sine, &lfsr), -1.0);
    }

    #[test]
    fn triangle_peak_and_trough() {
        let sine = SineTable::new();
        let lfsr = Lfsr::new();
        assert!((eval(OscType::Triangle, 0.25, 0.0, &sine, &lfsr) - 1.0).abs() < 1e-6);
        assert!((eval(OscType::Triangle, 0.75, 0.0, &sine, &lfsr) - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn sine_quarter_cycle_near_peak() {
        let sine = SineTable::new();
        let lfsr = Lfsr::new();
        let v = eval(OscType::Sine, 0.25, 0.0, &sine, &lfsr);
        assert!((v - 1.0).abs() < 1e-2);
    }

    #[test]
    fn phase_advance_wraps() {
        let mut acc = 0.9;
        let wrapped = advance_phase(&mut acc, 0.3);
        assert!(wrapped);
        assert!((0.0..1.0).contains(&acc));
    }
}
