//! Biquad filter chain: Direct Form I processing plus the bilinear-transform
//! coefficient derivation used by the control plane's `flttype` write
//! callback.

use synth_core::consts::SAMPLE_RATE;
use synth_core::{BiquadSection, FilterChain, FilterType};

/// Runs one Direct Form I biquad section for one input sample.
#[inline]
pub fn process_section(sec: &mut BiquadSection, input: f32) -> f32 {
    let out0 = sec.b0 * input + sec.b1 * sec.in1 + sec.b2 * sec.in2 - sec.a1 * sec.out1 - sec.a2 * sec.out2;
    sec.in2 = sec.in1;
    sec.in1 = input;
    sec.out2 = sec.out1;
    sec.out1 = out0;
    out0
}

/// Lowpass coefficients from the tan-based bilinear transform used
/// throughout the filter's derivation table.
pub fn lowpass_coeffs(freq: f32, q: f32) -> (f32, f32, f32, f32, f32) {
    let g = ((std::f64::consts::PI * freq as f64) / SAMPLE_RATE).tan() as f32;
    let d = q * g * g + g + q;
    let b0 = q * g * g / d;
    let b1 = 2.0 * b0;
    let b2 = b0;
    let a1 = 2.0 * q * (g * g - 1.0) / d;
    let a2 = (q * g * g - g + q) / d;
    (b0, b1, b2, a1, a2)
}

/// Highpass coefficients sharing the lowpass section's `a1`/`a2`.
pub fn highpass_coeffs(freq: f32, q: f32) -> (f32, f32, f32, f32, f32) {
    let g = ((std::f64::consts::PI * freq as f64) / SAMPLE_RATE).tan() as f32;
    let d = q * g * g + g + q;
    let b0 = q / d;
    let b1 = -2.0 * b0;
    let b2 = b0;
    let a1 = 2.0 * q * (g * g - 1.0) / d;
    let a2 = (q * g * g - g + q) / d;
    (b0, b1, b2, a1, a2)
}

fn set_coeffs(sec: &mut BiquadSection, c: (f32, f32, f32, f32, f32)) {
    sec.b0 = c.0;
    sec.b1 = c.1;
    sec.b2 = c.2;
    sec.a1 = c.3;
    sec.a2 = c.4;
}

/// Recomputes both biquad sections' coefficients from `fltf1`, `fltf2`,
/// `fltq`, `fltrolloff` and `flttype`. Mirrors the write-callback's
/// derivation table exactly; state cells (`in1,in2,out1,out2`) are left
/// untouched.
pub fn derive_coefficients(chain: &mut FilterChain) {
    match chain.flttype {
        FilterType::Off => return,
        FilterType::Low | FilterType::Stop | FilterType::Band => {
            set_coeffs(&mut chain.sec1, lowpass_coeffs(chain.fltf1, chain.fltq));
        }
        FilterType::High => {
            set_coeffs(&mut chain.sec1, highpass_coeffs(chain.fltf1, chain.fltq));
        }
    }

    match chain.flttype {
        FilterType::Low | FilterType::High if chain.fltrolloff == 12 => {
            chain.sec2 = chain.sec1;
            chain.fltf2 = chain.fltf1;
        }
        FilterType::Band => {
            set_coeffs(&mut chain.sec2, lowpass_coeffs(chain.fltf2, chain.fltq));
        }
        FilterType::Stop => {
            set_coeffs(&mut chain.sec2, highpass_coeffs(chain.fltf2, chain.fltq));
        }
        _ => {}
    }
}

/// Runs the whole chain for one input sample, per the routing table: OFF
/// bypasses; LOW/HIGH run one or two cascaded sections; BAND cascades two
/// lowpasses; STOP runs a lowpass and a highpass on the same input and
/// averages.
pub fn process(chain: &mut FilterChain, input: f32) -> f32 {
    match chain.flttype {
        FilterType::Off => input,
        FilterType::Low | FilterType::High => {
            let out1 = process_section(&mut chain.sec1, input);
            if chain.fltrolloff == 12 {
                process_section(&mut chain.sec2, out1)
            } else {
                out1
            }
        }
        FilterType::Band => {
            let out1 = process_section(&mut chain.sec1, input);
            process_section(&mut chain.sec2, out1)
        }
        FilterType::Stop => {
            let out1 = process_section(&mut chain.sec1, input);
            let out2 = process_section(&mut chain.sec2, input);
            (out1 + out2) / 2.0
        }
    }
}
