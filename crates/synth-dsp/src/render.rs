//! The per-sample DSP engine: `render_sample` advances one voice by exactly
//! one tick; `render_block` drives every voice in the bank for `n` ticks and
//! hands the mixed 16-bit PCM stream to a sink closure.

use synth_core::consts::FULL_VOLUME;
use synth_core::{MixMode, OscType, VState, Voice, VoiceBank};

use crate::adsr;
use crate::filter;
use crate::lfsr::Lfsr;
use crate::sine::SineTable;
use crate::waveform::{self, advance_phase, scale_phasestep};

/// Shared read-only state every voice's render pass consults: the sine
/// table and (per voice) an independent LFSR draw.
pub struct Engine {
    pub sine: SineTable,
}

impl Engine {
    pub fn new() -> Self {
        Engine { sine: SineTable::new() }
    }

    /// Advances `voice` by one sample tick. `lfsr` is the single noise
    /// register shared by the whole bank: advancing it once per voice per
    /// tick gives each voice an independent slice of the same sequence,
    /// rather than every voice replaying an identical stream from its own
    /// identically-seeded register.
    pub fn render_sample(&self, voice: &mut Voice, lfsr: &mut Lfsr) {
        lfsr.advance();

        if matches!(voice.vstate, VState::Free | VState::InUse) {
            voice.voiceout = 0.0;
            voice.vout = 0;
            return;
        }

        voice.sync = false;
        let mut o2out = 0.0f32;
        if voice.mixmode != MixMode::None {
            let phstep = scale_phasestep(voice.osc2.phasestep, voice.osc2.phaseacc, voice.osc2.symmetry);
            let wrapped = advance_phase(&mut voice.osc2.phaseacc, phstep);
            voice.sync = wrapped;
            o2out = waveform::eval(voice.osc2.otype, voice.osc2.phaseacc, voice.osc2.phaseoffset, &self.sine, lfsr)
                * voice.osc2.gain;
            voice.osc2.out = o2out;
        }

        let mut vibout = 0.0f32;
        let vib_active = !matches!(voice.vibrato.otype, OscType::Off | OscType::Wavetable);
        if vib_active {
            let phstep = scale_phasestep(voice.vibrato.phasestep, voice.vibrato.phaseacc, voice.vibrato.symmetry);
            advance_phase(&mut voice.vibrato.phaseacc, phstep);
            vibout = waveform::eval(voice.vibrato.otype, voice.vibrato.phaseacc, voice.vibrato.phaseoffset, &self.sine, lfsr)
                * voice.vibrato.gain;
            voice.vibrato.out = vibout;
        }

        if voice.glide.glidecount > 0 {
            voice.osc1.phasestep += voice.glide.glidestep;
            voice.glide.glidecount -= 1;
            if voice.glide.glidecount == 0 {
                voice.glide.glidems = 0;
                voice.osc1.phasestep = voice.glide.glidefreq / synth_core::consts::SAMPLE_RATE as f32;
            }
        }

        let mut phstep = voice.osc1.phasestep;
        if vib_active {
            phstep += voice.vibo1phase * vibout;
            phstep = phstep.rem_euclid(1.0);
        }
        if voice.osc2.otype != OscType::Off && voice.mixmode == MixMode::Fm {
            phstep += voice.osc1.phasestep * o2out;
            phstep = phstep.rem_euclid(1.0);
        }

        let phstep = scale_phasestep(phstep, voice.osc1.phaseacc, voice.osc1.symmetry);
        advance_phase(&mut voice.osc1.phaseacc, phstep);

        let o1out = waveform::eval(voice.osc1.otype, voice.osc1.phaseacc, voice.osc1.phaseoffset, &self.sine, lfsr)
            * voice.osc1.gain;
        voice.osc1.out = o1out;

        if voice.mixmode == MixMode::HardSync && voice.sync {
            voice.osc1.phaseacc = 0.0;
        }

        voice.voiceout = match voice.mixmode {
            MixMode::Sum => o1out + o2out,
            MixMode::Am => o1out * (o2out + 1.0),
            MixMode::Ring => o1out * o2out,
            MixMode::None | MixMode::Fm | MixMode::HardSync => o1out,
        };

        let trem_active = !matches!(voice.tremolo.otype, OscType::Off | OscType::Wavetable);
        if trem_active {
            let phstep = scale_phasestep(voice.tremolo.phasestep, voice.tremolo.phaseacc, voice.tremolo.symmetry);
            advance_phase(&mut voice.tremolo.phaseacc, phstep);
            let tremout = waveform::eval(voice.tremolo.otype, voice.tremolo.phaseacc, voice.tremolo.phaseoffset, &self.sine, lfsr)
                * voice.tremolo.gain;
            voice.tremolo.out = tremout;
            voice.voiceout *= 1.0 - voice.tremdepth * tremout;
        }

        voice.voiceout = filter::process(&mut voice.filter, voice.voiceout);

        voice.voiceout = adsr::apply(
            voice.voiceout,
            &mut voice.vstate,
            &mut voice.adsridx,
            &mut voice.ontime,
            &voice.steps,
        );

        voice.voiceout *= voice.outputgain;
        voice.vout = (voice.voiceout.clamp(-1.0, 1.0) * FULL_VOLUME as f32) as i16;
    }

    /// Renders `n` sample ticks across every voice in `bank`, summing active
    /// voices and clipping to `[-1, 1]` before the 16-bit projection. Calls
    /// `sink` once per tick with the big-endian PCM bytes for that tick.
    /// `lfsr` is the single noise register shared across the whole bank.
    pub fn render_block(&self, bank: &mut VoiceBank, lfsr: &mut Lfsr, n: usize, mut sink: impl FnMut([u8; 2])) {
        for _ in 0..n {
            let mut mixed = 0.0f32;
            for voice in bank.iter_mut() {
                self.render_sample(voice, lfsr);
                mixed += voice.voiceout;
            }
            let clipped = mixed.clamp(-1.0, 1.0);
            let sample = (clipped * FULL_VOLUME as f32) as i16;
            sink(sample.to_be_bytes());
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synth_core::consts::SAMPLE_RATE;

    #[test]
    fn free_voice_produces_silence() {
        let engine = Engine::new();
        let mut voice = Voice::default();
        let mut lfsr = Lfsr::new();
        engine.render_sample(&mut voice, &mut lfsr);
        assert_eq!(voice.voiceout, 0.0);
        assert_eq!(voice.vout, 0);
    }

    #[test]
    fn phase_accumulators_stay_in_unit_range() {
        let engine = Engine::new();
        let mut voice = Voice::default();
        voice.vstate = VState::On;
        voice.osc1.otype = OscType::Sine;
        voice.osc1.freq = 440.0;
        voice.osc1.phasestep = 440.0 / SAMPLE_RATE as f32;
        voice.osc1.gain = 1.0;
        voice.outputgain = 1.0;
        voice.steps[0].time_ms = synth_core::consts::SUSTAIN_VALUE_MS;
        voice.steps[0].gain = 1.0;
        let mut lfsr = Lfsr::new();
        for _ in 0..2000 {
            engine.render_sample(&mut voice, &mut lfsr);
            assert!((0.0..1.0).contains(&voice.osc1.phaseacc));
            assert!(voice.voiceout.is_finite());
        }
    }

    #[test]
    fn hard_sync_resets_osc1_on_osc2_wrap() {
        let engine = Engine::new();
        let mut voice = Voice::default();
        voice.vstate = VState::On;
        voice.mixmode = MixMode::HardSync;
        voice.osc1.otype = OscType::Sine;
        voice.osc1.freq = 100.0;
        voice.osc1.phasestep = 100.0 / SAMPLE_RATE as f32;
        voice.osc1.phaseacc = 0.9;
        voice.osc1.gain = 1.0;
        voice.osc2.otype = OscType::Square;
        voice.osc2.freq = 2000.0;
        voice.osc2.phasestep = 2000.0 / SAMPLE_RATE as f32;
        voice.osc2.phaseacc = 0.999;
        voice.steps[0].time_ms = synth_core::consts::SUSTAIN_VALUE_MS;
        voice.steps[0].gain = 1.0;
        let mut lfsr = Lfsr::new();
        engine.render_sample(&mut voice, &mut lfsr);
        assert!(voice.sync);
        assert_eq!(voice.osc1.phaseacc, 0.0);
    }
}
