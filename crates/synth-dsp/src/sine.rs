//! First-quadrant sine lookup table, folded across all four quadrants by
//! the waveform evaluator.

use synth_core::consts::NSINES;

/// `sin(pi * i / (2 * NSINES))` for `i` in `[0, NSINES)`.
#[derive(Debug, Clone)]
pub struct SineTable {
    table: Vec<f32>,
}

impl SineTable {
    pub fn new() -> Self {
        let table = (0..NSINES)
            .map(|i| ((std::f64::consts::PI * i as f64) / (2.0 * NSINES as f64)).sin() as f32)
            .collect();
        SineTable { table }
    }

    /// Looks up the table at a quadrant-folded index already mapped into
    /// `[0, NSINES)`.
    #[inline]
    pub fn at(&self, idx: usize) -> f32 {
        self.table[idx.min(NSINES - 1)]
    }
}

impl Default for SineTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_quarter_cycle() {
        let t = SineTable::new();
        assert!((t.at(0) - 0.0).abs() < 1e-6);
        assert!((t.at(NSINES - 1) - 1.0).abs() < 1e-3);
    }
}
