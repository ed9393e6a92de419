//! The `voices` table: the reflected view of `VoiceBank` that SELECT/UPDATE
//! statements address by row index and column name.

use synth_core::consts::{MIN_FREQ, MX_FILT_FREQ, MX_OSC_FREQ, SAMPLE_RATE};
use synth_core::{FilterType, MixMode, OscType, VState, VoiceBank};
use synth_dsp::filter::derive_coefficients;

use crate::column::{ColFlags, ColType, ColumnDef};
use crate::error::{ControlError, ControlResult};
use crate::value::Value;

fn clamp_f32(x: f32, lo: f32, hi: f32) -> f32 {
    x.max(lo).min(hi)
}

fn osc_type_name(t: OscType) -> &'static str {
    match t {
        OscType::Off => "OFF",
        OscType::Sine => "SINE",
        OscType::Square => "SQUARE",
        OscType::Triangle => "TRIANGLE",
        OscType::Noise => "NOISE",
        OscType::Wavetable => "WAVETABLE",
    }
}

fn osc_type_from_str(s: &str) -> OscType {
    match s.to_ascii_uppercase().as_str() {
        "SINE" => OscType::Sine,
        "SQUARE" => OscType::Square,
        "TRIANGLE" => OscType::Triangle,
        "NOISE" => OscType::Noise,
        "WAVETABLE" => OscType::Wavetable,
        _ => OscType::Off,
    }
}

fn mixmode_name(m: MixMode) -> &'static str {
    match m {
        MixMode::None => "NONE",
        MixMode::Sum => "SUM",
        MixMode::Am => "AM",
        MixMode::Fm => "FM",
        MixMode::Ring => "RING",
        MixMode::HardSync => "HARDSYNC",
    }
}

fn mixmode_from_str(s: &str) -> MixMode {
    match s.to_ascii_uppercase().as_str() {
        "SUM" => MixMode::Sum,
        "AM" => MixMode::Am,
        "FM" => MixMode::Fm,
        "RING" => MixMode::Ring,
        "HARDSYNC" => MixMode::HardSync,
        _ => MixMode::None,
    }
}

fn vstate_name(v: VState) -> &'static str {
    match v {
        VState::Free => "FREE",
        VState::InUse => "INUSE",
        VState::On => "ON",
        VState::Sustain => "SUSTAIN",
        VState::Release => "RELEASE",
    }
}

fn vstate_from_str(s: &str) -> Option<VState> {
    match s.to_ascii_uppercase().as_str() {
        "FREE" => Some(VState::Free),
        "INUSE" => Some(VState::InUse),
        "ON" => Some(VState::On),
        "SUSTAIN" => Some(VState::Sustain),
        "RELEASE" => Some(VState::Release),
        _ => None,
    }
}

fn filttype_name(t: FilterType) -> &'static str {
    match t {
        FilterType::Off => "OFF",
        FilterType::Low => "LOW",
        FilterType::High => "HIGH",
        FilterType::Band => "BAND",
        FilterType::Stop => "STOP",
    }
}

fn filttype_from_str(s: &str) -> FilterType {
    match s.to_ascii_uppercase().as_str() {
        "LOW" => FilterType::Low,
        "HIGH" => FilterType::High,
        "BAND" => FilterType::Band,
        "STOP" => FilterType::Stop,
        _ => FilterType::Off,
    }
}

/// The `voices` table's column catalogue, grounded in the write-callback
/// and read-callback tables: clamp-and-derive on write, reconstruct
/// glide-mutated fields on read.
pub struct VoicesTable {
    pub columns: Vec<ColumnDef>,
}

macro_rules! osc_freq_column {
    ($name:literal, $help:literal, $osc:ident) => {
        ColumnDef::new(
            $name,
            ColType::Float,
            ColFlags::NONE,
            $help,
            |v| Value::Float((v.$osc.phasestep as f64) * SAMPLE_RATE),
            |v, val| {
                let f = clamp_f32(val.as_f64()? as f32, MIN_FREQ as f32, MX_OSC_FREQ as f32);
                v.$osc.freq = f;
                v.$osc.phasestep = f / SAMPLE_RATE as f32;
                Ok(())
            },
        )
    };
}

macro_rules! symmetry_column {
    ($name:literal, $help:literal, $osc:ident) => {
        ColumnDef::new(
            $name,
            ColType::Float,
            ColFlags::NONE,
            $help,
            |v| Value::Float(v.$osc.symmetry as f64),
            |v, val| {
                v.$osc.symmetry = clamp_f32(val.as_f64()? as f32, 0.01, 0.999);
                Ok(())
            },
        )
    };
}

macro_rules! step_columns {
    ($cols:expr, $i:expr) => {{
        $cols.push(ColumnDef::new(
            Box::leak(format!("step{}time", $i).into_boxed_str()),
            ColType::Int,
            ColFlags::NONE,
            "ADSR step time in milliseconds; 60000 enters SUSTAIN",
            move |v| Value::Int(v.steps[$i].time_ms as i64),
            move |v, val| {
                v.steps[$i].time_ms = val.as_i64()?.max(0) as u32;
                Ok(())
            },
        ));
        $cols.push(ColumnDef::new(
            Box::leak(format!("step{}gain", $i).into_boxed_str()),
            ColType::Float,
            ColFlags::NONE,
            "ADSR step target gain; 0 terminates the voice",
            move |v| Value::Float(v.steps[$i].gain as f64),
            move |v, val| {
                v.steps[$i].gain = val.as_f64()? as f32;
                Ok(())
            },
        ));
    }};
}

impl VoicesTable {
    pub fn new() -> Self {
        let mut columns = Vec::new();

        columns.push(ColumnDef::new(
            "idx",
            ColType::Int,
            ColFlags::READONLY,
            "row index, assigned at bank creation",
            |v| Value::Int(v.idx as i64),
            |_, _| unreachable!("readonly columns never reach the setter"),
        ));
        columns.push(ColumnDef::new(
            "noteid",
            ColType::Str,
            ColFlags::NONE,
            "client-assigned note label, no DSP behavior",
            |v| Value::Str(v.noteid.clone()),
            |v, val| {
                v.noteid = val.as_str();
                Ok(())
            },
        ));
        columns.push(ColumnDef::new(
            "chordid",
            ColType::Str,
            ColFlags::NONE,
            "client-assigned chord label, no DSP behavior",
            |v| Value::Str(v.chordid.clone()),
            |v, val| {
                v.chordid = val.as_str();
                Ok(())
            },
        ));

        columns.push(ColumnDef::new(
            "vstate",
            ColType::Str,
            ColFlags::NONE,
            "FREE, INUSE, ON, SUSTAIN, or forced RELEASE",
            |v| Value::Str(vstate_name(v.vstate).to_string()),
            |v, val| {
                let text = val.as_str();
                let new_state = vstate_from_str(&text)
                    .ok_or_else(|| ControlError::BadValue("vstate".into(), text.clone()))?;
                apply_vstate_transition(v, new_state);
                Ok(())
            },
        ));
        columns.push(ColumnDef::new(
            "ontime",
            ColType::Int,
            ColFlags::READONLY,
            "sample ticks elapsed since the current ADSR step began",
            |v| Value::Int(v.ontime as i64),
            |_, _| unreachable!(),
        ));
        columns.push(ColumnDef::new(
            "adsridx",
            ColType::Int,
            ColFlags::READONLY,
            "current ADSR step index, 0..=7",
            |v| Value::Int(v.adsridx as i64),
            |_, _| unreachable!(),
        ));

        for i in 0..synth_core::consts::ADSR_STEP_COUNT {
            step_columns!(columns, i);
        }

        columns.push(ColumnDef::new(
            "o1type",
            ColType::Str,
            ColFlags::NONE,
            "osc1 waveform: OFF, SINE, SQUARE, TRIANGLE, NOISE, WAVETABLE",
            |v| Value::Str(osc_type_name(v.osc1.otype).to_string()),
            |v, val| {
                v.osc1.otype = osc_type_from_str(&val.as_str());
                Ok(())
            },
        ));
        columns.push(ColumnDef::new(
            "o2type",
            ColType::Str,
            ColFlags::NONE,
            "osc2 waveform",
            |v| Value::Str(osc_type_name(v.osc2.otype).to_string()),
            |v, val| {
                v.osc2.otype = osc_type_from_str(&val.as_str());
                Ok(())
            },
        ));
        columns.push(ColumnDef::new(
            "vibtype",
            ColType::Str,
            ColFlags::NONE,
            "vibrato LFO waveform",
            |v| Value::Str(osc_type_name(v.vibrato.otype).to_string()),
            |v, val| {
                v.vibrato.otype = osc_type_from_str(&val.as_str());
                Ok(())
            },
        ));
        columns.push(ColumnDef::new(
            "tremtype",
            ColType::Str,
            ColFlags::NONE,
            "tremolo LFO waveform",
            |v| Value::Str(osc_type_name(v.tremolo.otype).to_string()),
            |v, val| {
                v.tremolo.otype = osc_type_from_str(&val.as_str());
                Ok(())
            },
        ));

        columns.push(osc_freq_column!("o1freq", "osc1 frequency in Hz; rederived from phasestep on read", osc1));
        columns.push(osc_freq_column!("o2freq", "osc2 frequency in Hz; rederived from phasestep on read", osc2));
        columns.push(osc_freq_column!("vibfreq", "vibrato LFO frequency in Hz", vibrato));
        columns.push(osc_freq_column!("tremfreq", "tremolo LFO frequency in Hz", tremolo));

        columns.push(symmetry_column!("o1symmetry", "osc1 duty-cycle asymmetry, 0.01..0.999", osc1));
        columns.push(symmetry_column!("o2symmetry", "osc2 duty-cycle asymmetry (mirrored), 0.01..0.999", osc2));
        columns.push(symmetry_column!("vibsymmetry", "vibrato duty-cycle asymmetry", vibrato));
        columns.push(symmetry_column!("tremsymmetry", "tremolo duty-cycle asymmetry", tremolo));

        columns.push(ColumnDef::new(
            "o1gain",
            ColType::Float,
            ColFlags::NONE,
            "osc1 output scale",
            |v| Value::Float(v.osc1.gain as f64),
            |v, val| {
                v.osc1.gain = val.as_f64()? as f32;
                Ok(())
            },
        ));
        columns.push(ColumnDef::new(
            "o2gain",
            ColType::Float,
            ColFlags::NONE,
            "osc2 output scale",
            |v| Value::Float(v.osc2.gain as f64),
            |v, val| {
                v.osc2.gain = val.as_f64()? as f32;
                Ok(())
            },
        ));
        columns.push(ColumnDef::new(
            "outputgain",
            ColType::Float,
            ColFlags::NONE,
            "final per-voice output scale, applied after the envelope",
            |v| Value::Float(v.outputgain as f64),
            |v, val| {
                v.outputgain = val.as_f64()? as f32;
                Ok(())
            },
        ));

        columns.push(ColumnDef::new(
            "mixmode",
            ColType::Str,
            ColFlags::NONE,
            "NONE, SUM, AM, FM, RING, HARDSYNC",
            |v| Value::Str(mixmode_name(v.mixmode).to_string()),
            |v, val| {
                v.mixmode = mixmode_from_str(&val.as_str());
                Ok(())
            },
        ));

        columns.push(ColumnDef::new(
            "glidefreq",
            ColType::Float,
            ColFlags::NONE,
            "glide target frequency in Hz",
            |v| Value::Float(v.glide.glidefreq as f64),
            |v, val| {
                v.glide.glidefreq = clamp_f32(val.as_f64()? as f32, MIN_FREQ as f32, MX_OSC_FREQ as f32);
                Ok(())
            },
        ));
        columns.push(ColumnDef::new(
            "glidems",
            ColType::Int,
            ColFlags::NONE,
            "glide duration in milliseconds; derives glidecount and glidestep",
            |v| Value::Int(v.glide.glidems as i64),
            |v, val| {
                let ms = val.as_i64()?.clamp(0, 10_000_000) as u32;
                v.glide.glidems = ms;
                let count = (SAMPLE_RATE * ms as f64 / 1000.0) as u32;
                v.glide.glidecount = count;
                v.glide.glidestep = if count == 0 {
                    0.0
                } else {
                    (v.glide.glidefreq / SAMPLE_RATE as f32 - v.osc1.phasestep) / count as f32
                };
                Ok(())
            },
        ));

        columns.push(ColumnDef::new(
            "vibdepth",
            ColType::Float,
            ColFlags::NONE,
            "vibrato depth in Hz; derives vibo1phase",
            |v| Value::Float(v.vibdepth as f64),
            |v, val| {
                v.vibdepth = val.as_f64()? as f32;
                v.vibo1phase = v.vibdepth / SAMPLE_RATE as f32;
                Ok(())
            },
        ));
        columns.push(ColumnDef::new(
            "tremdepth",
            ColType::Float,
            ColFlags::NONE,
            "tremolo depth, scales (1 - tremdepth*tremout)",
            |v| Value::Float(v.tremdepth as f64),
            |v, val| {
                v.tremdepth = val.as_f64()? as f32;
                Ok(())
            },
        ));

        columns.push(ColumnDef::new(
            "flttype",
            ColType::Str,
            ColFlags::NONE,
            "OFF, LOW, HIGH, BAND, STOP; recomputes both biquad sections",
            |v| Value::Str(filttype_name(v.filter.flttype).to_string()),
            |v, val| {
                v.filter.flttype = filttype_from_str(&val.as_str());
                derive_coefficients(&mut v.filter);
                Ok(())
            },
        ));
        columns.push(ColumnDef::new(
            "fltf1",
            ColType::Float,
            ColFlags::NONE,
            "filter section 1 corner frequency in Hz, 1..20000",
            |v| Value::Float(v.filter.fltf1 as f64),
            |v, val| {
                v.filter.fltf1 = clamp_f32(val.as_f64()? as f32, 1.0, MX_FILT_FREQ as f32);
                derive_coefficients(&mut v.filter);
                Ok(())
            },
        ));
        columns.push(ColumnDef::new(
            "fltf2",
            ColType::Float,
            ColFlags::NONE,
            "filter section 2 corner frequency in Hz, 1..20000",
            |v| Value::Float(v.filter.fltf2 as f64),
            |v, val| {
                v.filter.fltf2 = clamp_f32(val.as_f64()? as f32, 1.0, MX_FILT_FREQ as f32);
                derive_coefficients(&mut v.filter);
                Ok(())
            },
        ));
        columns.push(ColumnDef::new(
            "fltq",
            ColType::Float,
            ColFlags::NONE,
            "filter Q, 0.1..25",
            |v| Value::Float(v.filter.fltq as f64),
            |v, val| {
                v.filter.fltq = clamp_f32(val.as_f64()? as f32, 0.1, 25.0);
                derive_coefficients(&mut v.filter);
                Ok(())
            },
        ));
        columns.push(ColumnDef::new(
            "fltrolloff",
            ColType::Int,
            ColFlags::NONE,
            "filter roll-off, snapped to 6 or 12 dB/octave",
            |v| Value::Int(v.filter.fltrolloff as i64),
            |v, val| {
                let raw = val.as_i64()?.clamp(6, 12) as u8;
                v.filter.fltrolloff = 6 * (raw / 6);
                derive_coefficients(&mut v.filter);
                Ok(())
            },
        ));

        VoicesTable { columns }
    }

    pub fn column(&self, name: &str) -> ControlResult<&ColumnDef> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| ControlError::UnknownColumn(name.to_string()))
    }

    pub fn select(&self, bank: &VoiceBank, row: usize, col: &str) -> ControlResult<Value> {
        let voice = bank.get(row).map_err(|_| ControlError::RowOutOfRange(row, bank.len()))?;
        Ok(self.column(col)?.read(voice))
    }

    pub fn update(&self, bank: &mut VoiceBank, row: usize, col: &str, text: &str) -> ControlResult<()> {
        match self.try_update(bank, row, col, text) {
            Ok(()) => Ok(()),
            Err(e) => {
                log::warn!("rejected UPDATE {row} {col} {text:?}: {e}");
                Err(e)
            }
        }
    }

    fn try_update(&self, bank: &mut VoiceBank, row: usize, col: &str, text: &str) -> ControlResult<()> {
        let len = bank.len();
        let voice = bank.get_mut(row).map_err(|_| ControlError::RowOutOfRange(row, len))?;
        let column = self.column(col)?;
        let value = Value::parse(col, text)?;
        column.write(voice, value)
    }
}

impl Default for VoicesTable {
    fn default() -> Self {
        Self::new()
    }
}

/// `vstate` old→new derivations from the write-callback catalogue.
/// `RELEASE` is accepted only from `SUSTAIN` and resumes the envelope
/// exactly like writing `ON` from `SUSTAIN` (see DESIGN.md).
fn apply_vstate_transition(v: &mut synth_core::Voice, new_state: VState) {
    match (v.vstate, new_state) {
        (VState::Free, VState::On) | (VState::InUse, VState::On) => {
            v.ontime = 0;
            v.adsridx = 0;
            v.vstate = VState::On;
        }
        (VState::Sustain, VState::On) | (VState::Sustain, VState::Release) => {
            if v.adsridx == synth_core::consts::MX_ADSR_STEP {
                v.vstate = VState::Free;
                v.voiceout = 0.0;
                v.vout = 0;
            } else {
                v.vstate = VState::On;
            }
        }
        _ => {
            v.vstate = new_state;
        }
    }
}
