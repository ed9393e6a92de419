//! End-to-end scenarios driving the control plane and the DSP engine
//! together, the way a real client session would.

use synth_control::{protocol, VoicesTable};
use synth_core::consts::SAMPLE_RATE;
use synth_core::{MixMode, OscType, VState, VoiceBank};
use synth_dsp::{Engine, Lfsr};

fn render_pcm(engine: &Engine, bank: &mut VoiceBank, lfsr: &mut Lfsr, n: usize) -> Vec<i16> {
    let mut out = Vec::with_capacity(n);
    engine.render_block(bank, lfsr, n, |bytes| out.push(i16::from_be_bytes(bytes)));
    out
}

fn send(table: &VoicesTable, bank: &mut VoiceBank, line: &str) -> String {
    let (resp, _) = protocol::drive(table, bank, &format!("{line}\n"));
    resp
}

#[test]
fn silent_boot_produces_zero_pcm() {
    let table = VoicesTable::new();
    let mut bank = VoiceBank::new();
    let engine = Engine::new();
    let mut lfsr = Lfsr::new();

    assert_eq!(send(&table, &mut bank, "SELECT 0 vstate").trim(), "OK FREE");

    let pcm = render_pcm(&engine, &mut bank, &mut lfsr, 4410);
    assert!(pcm.iter().all(|&s| s == 0));
}

#[test]
fn sine_440_hz_has_zero_crossings_every_fifty_samples() {
    let table = VoicesTable::new();
    let mut bank = VoiceBank::new();
    let engine = Engine::new();
    let mut lfsr = Lfsr::new();

    send(&table, &mut bank, "UPDATE 0 noteid A4");
    send(&table, &mut bank, "UPDATE 0 o1type SINE");
    send(&table, &mut bank, "UPDATE 0 o1freq 440");
    send(&table, &mut bank, "UPDATE 0 o1gain 1");
    send(&table, &mut bank, "UPDATE 0 outputgain 1");
    // A 1ms attack to full gain, then held (step1 repeats gain 1 until the
    // sustain-valued step), so the window under test sits at full volume
    // rather than partway up a 1000ms attack ramp.
    send(&table, &mut bank, "UPDATE 0 step0time 1");
    send(&table, &mut bank, "UPDATE 0 step0gain 1");
    send(&table, &mut bank, "UPDATE 0 step1time 60000");
    send(&table, &mut bank, "UPDATE 0 step1gain 1");
    send(&table, &mut bank, "UPDATE 0 vstate ON");

    let pcm = render_pcm(&engine, &mut bank, &mut lfsr, 441);

    assert!(pcm.iter().any(|&s| s > 20000));
    assert!(pcm.iter().any(|&s| s < -20000));

    let mut crossings = Vec::new();
    for i in 1..pcm.len() {
        if (pcm[i - 1] >= 0) != (pcm[i] >= 0) {
            crossings.push(i);
        }
    }
    for pair in crossings.windows(2) {
        let gap = pair[1] - pair[0];
        assert!((45..=55).contains(&gap), "zero crossing gap {gap} not near 50 samples");
    }
}

#[test]
fn glide_reaches_target_frequency_after_full_duration() {
    let table = VoicesTable::new();
    let mut bank = VoiceBank::new();
    let engine = Engine::new();
    let mut lfsr = Lfsr::new();

    send(&table, &mut bank, "UPDATE 0 o1type SINE");
    send(&table, &mut bank, "UPDATE 0 o1freq 200");
    send(&table, &mut bank, "UPDATE 0 step0time 60000");
    send(&table, &mut bank, "UPDATE 0 step0gain 1");
    send(&table, &mut bank, "UPDATE 0 vstate ON");
    send(&table, &mut bank, "UPDATE 0 glidefreq 400");
    send(&table, &mut bank, "UPDATE 0 glidems 1000");

    render_pcm(&engine, &mut bank, &mut lfsr, 22050);
    let halfway = send(&table, &mut bank, "SELECT 0 o1freq");
    let halfway: f64 = halfway.trim().trim_start_matches("OK ").parse().unwrap();
    assert!((halfway - 300.0).abs() < 5.0, "expected ~300Hz halfway through glide, got {halfway}");

    render_pcm(&engine, &mut bank, &mut lfsr, 22050);
    let done = send(&table, &mut bank, "SELECT 0 o1freq");
    let done: f64 = done.trim().trim_start_matches("OK ").parse().unwrap();
    assert!((done - 400.0).abs() < 1.0, "expected ~400Hz after full glide, got {done}");

    let glidecount = send(&table, &mut bank, "SELECT 0 glidems");
    assert_eq!(glidecount.trim(), "OK 0");
}

#[test]
fn fm_mix_produces_non_uniform_zero_crossing_spacing() {
    let table = VoicesTable::new();
    let mut bank = VoiceBank::new();
    let engine = Engine::new();
    let mut lfsr = Lfsr::new();

    send(&table, &mut bank, "UPDATE 0 o1type SINE");
    send(&table, &mut bank, "UPDATE 0 o1freq 440");
    send(&table, &mut bank, "UPDATE 0 o1gain 1");
    send(&table, &mut bank, "UPDATE 0 o2type SINE");
    send(&table, &mut bank, "UPDATE 0 o2freq 110");
    send(&table, &mut bank, "UPDATE 0 o2gain 1");
    send(&table, &mut bank, "UPDATE 0 mixmode FM");
    send(&table, &mut bank, "UPDATE 0 step0time 60000");
    send(&table, &mut bank, "UPDATE 0 step0gain 1");
    send(&table, &mut bank, "UPDATE 0 vstate ON");

    let pcm = render_pcm(&engine, &mut bank, &mut lfsr, (0.5 * SAMPLE_RATE) as usize);

    let mut gaps = Vec::new();
    let mut last = None;
    for (i, &s) in pcm.iter().enumerate() {
        if s >= 0 && pcm.get(i.wrapping_sub(1)).is_some_and(|&p| p < 0) {
            if let Some(prev) = last {
                gaps.push(i - prev);
            }
            last = Some(i);
        }
    }
    let min = *gaps.iter().min().unwrap();
    let max = *gaps.iter().max().unwrap();
    assert!(max - min > 5, "FM mix should vary period under modulation, got gaps {gaps:?}");
}

#[test]
fn filter_rolloff_and_q_snap_on_write() {
    let table = VoicesTable::new();
    let mut bank = VoiceBank::new();

    send(&table, &mut bank, "UPDATE 0 o1type SQUARE");
    send(&table, &mut bank, "UPDATE 0 o1freq 100");
    send(&table, &mut bank, "UPDATE 0 flttype LOW");
    send(&table, &mut bank, "UPDATE 0 fltf1 200");
    send(&table, &mut bank, "UPDATE 0 fltrolloff 12");
    send(&table, &mut bank, "UPDATE 0 fltq 1");

    send(&table, &mut bank, "UPDATE 0 fltrolloff 9");
    assert_eq!(send(&table, &mut bank, "SELECT 0 fltrolloff").trim(), "OK 6");

    send(&table, &mut bank, "UPDATE 0 fltq 100");
    assert_eq!(send(&table, &mut bank, "SELECT 0 fltq").trim(), "OK 25");
}

#[test]
fn voice_terminates_and_frees_when_target_gain_is_zero() {
    let table = VoicesTable::new();
    let mut bank = VoiceBank::new();
    let engine = Engine::new();
    let mut lfsr = Lfsr::new();

    send(&table, &mut bank, "UPDATE 0 o1type SINE");
    send(&table, &mut bank, "UPDATE 0 o1freq 440");
    send(&table, &mut bank, "UPDATE 0 o1gain 1");
    send(&table, &mut bank, "UPDATE 0 step0time 1");
    send(&table, &mut bank, "UPDATE 0 step0gain 0");
    send(&table, &mut bank, "UPDATE 0 vstate ON");

    render_pcm(&engine, &mut bank, &mut lfsr, 10);
    assert_eq!(bank.get(0).unwrap().vstate, VState::Free);
    assert_eq!(bank.get(0).unwrap().mixmode, MixMode::None);
    assert_eq!(bank.get(0).unwrap().osc1.otype, OscType::Sine);
}
