//! Wall-clock-paced sample counting: converts elapsed wall time into an
//! exact sample count using integer microsecond arithmetic so rounding
//! error never accumulates across iterations.

use std::time::Instant;

use synth_core::consts::SAMPLE_RATE;

pub struct SampleClock {
    start: Instant,
    prev_us: u64,
}

impl SampleClock {
    pub fn new() -> Self {
        SampleClock { start: Instant::now(), prev_us: 0 }
    }

    /// Returns the number of samples that should have been rendered since
    /// the previous call, using `(now*rate/1e6) - (prev*rate/1e6)` so that
    /// truncation error never accumulates.
    pub fn tick(&mut self) -> u64 {
        let now_us = self.start.elapsed().as_micros() as u64;
        let rate = SAMPLE_RATE as u64;
        let dosamples = (now_us * rate / 1_000_000) - (self.prev_us * rate / 1_000_000);
        self.prev_us = now_us;
        dosamples
    }
}

impl Default for SampleClock {
    fn default() -> Self {
        Self::new()
    }
}
