//! Eight-step linearly interpolated envelope with sustain capture.

use synth_core::consts::{MX_ADSR_STEP, SAMPLE_RATE, SUSTAIN_VALUE_MS};
use synth_core::{AdsrStep, VState};

/// Applies one tick of envelope gain to `sample`, advancing `vstate`,
/// `adsridx` and `ontime` as needed. Returns the enveloped sample.
pub fn apply(
    sample: f32,
    vstate: &mut VState,
    adsridx: &mut usize,
    ontime: &mut u32,
    steps: &[AdsrStep],
) -> f32 {
    let prev_gain = if *adsridx == 0 { 0.0 } else { steps[*adsridx - 1].gain };

    if *vstate == VState::Sustain {
        return sample * prev_gain;
    }

    let target_gain = if *adsridx == MX_ADSR_STEP { 0.0 } else { steps[*adsridx].gain };
    if target_gain == 0.0 {
        *vstate = VState::Free;
        return 0.0;
    }

    let steptime = if steps[*adsridx].time_ms == 0 { 1 } else { steps[*adsridx].time_ms };
    let ontime_ms = (1000.0 * *ontime as f64 / SAMPLE_RATE) as u32;

    let out = sample * (prev_gain + (target_gain - prev_gain) * (ontime_ms as f32 / steptime as f32));

    if ontime_ms >= steptime {
        *adsridx += 1;
        *ontime = 0;
        if *adsridx > MX_ADSR_STEP {
            *vstate = VState::Free;
            return 0.0;
        }
    } else if steptime == SUSTAIN_VALUE_MS {
        *adsridx += 1;
        *vstate = VState::Sustain;
    } else {
        *ontime += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps_with(time_ms: u32, gain: f32) -> [AdsrStep; 8] {
        let mut s = [AdsrStep { time_ms: SUSTAIN_VALUE_MS, gain: 1.0 }; 8];
        s[0] = AdsrStep { time_ms, gain };
        s
    }

    #[test]
    fn halfway_through_a_100ms_attack_is_half_gain() {
        let steps = steps_with(100, 1.0);
        let mut vstate = VState::On;
        let mut adsridx = 0usize;
        // ontime such that ontime_ms == 50
        let mut ontime = (SAMPLE_RATE * 50.0 / 1000.0) as u32;
        let out = apply(1.0, &mut vstate, &mut adsridx, &mut ontime, &steps);
        assert!((out - 0.5).abs() < 0.02);
    }

    #[test]
    fn zero_target_gain_terminates() {
        let mut steps = [AdsrStep { time_ms: SUSTAIN_VALUE_MS, gain: 1.0 }; 8];
        steps[0] = AdsrStep { time_ms: 0, gain: 0.0 };
        let mut vstate = VState::On;
        let mut adsridx = 0usize;
        let mut ontime = 0u32;
        let out = apply(1.0, &mut vstate, &mut adsridx, &mut ontime, &steps);
        assert_eq!(out, 0.0);
        assert_eq!(vstate, VState::Free);
    }

    #[test]
    fn sustain_value_step_enters_sustain() {
        let steps = steps_with(SUSTAIN_VALUE_MS, 1.0);
        let mut vstate = VState::On;
        let mut adsridx = 0usize;
        let mut ontime = 0u32;
        apply(1.0, &mut vstate, &mut adsridx, &mut ontime, &steps);
        assert_eq!(vstate, VState::Sustain);
        assert_eq!(adsridx, 1);
    }

    #[test]
    fn sustain_freezes_gain_at_prev_step() {
        let steps = steps_with(100, 0.7);
        let mut vstate = VState::Sustain;
        let mut adsridx = 1usize;
        let mut ontime = 12345u32;
        let out = apply(1.0, &mut vstate, &mut adsridx, &mut ontime, &steps);
        assert!((out - 0.7).abs() < 1e-6);
        assert_eq!(ontime, 12345);
    }
}
