//! VoiceBank: the fixed-size container of every voice record. Owns no
//! behavior beyond initialization and indexed access — the DSP engine and
//! the control plane both borrow into it.

use crate::consts::VOICE_COUNT;
use crate::error::{CoreError, CoreResult};
use crate::voice::Voice;

/// A fixed array of `VOICE_COUNT` voice records, created once at startup.
#[derive(Debug, Clone)]
pub struct VoiceBank {
    voices: Vec<Voice>,
}

impl VoiceBank {
    /// Builds a bank with every voice already reset to its default FREE
    /// state.
    pub fn new() -> Self {
        let mut bank = VoiceBank { voices: Vec::with_capacity(VOICE_COUNT) };
        for i in 0..VOICE_COUNT {
            let mut v = Voice::default();
            v.reset(i);
            bank.voices.push(v);
        }
        bank
    }

    /// Resets every voice to the default FREE state. Does not reallocate.
    pub fn init(&mut self) {
        for (i, v) in self.voices.iter_mut().enumerate() {
            v.reset(i);
        }
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn get(&self, idx: usize) -> CoreResult<&Voice> {
        self.voices
            .get(idx)
            .ok_or(CoreError::VoiceIndexOutOfRange(idx, self.voices.len()))
    }

    pub fn get_mut(&mut self, idx: usize) -> CoreResult<&mut Voice> {
        let len = self.voices.len();
        self.voices
            .get_mut(idx)
            .ok_or(CoreError::VoiceIndexOutOfRange(idx, len))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Voice> {
        self.voices.iter_mut()
    }
}

impl Default for VoiceBank {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VState;

    #[test]
    fn new_bank_has_voice_count_rows_all_free() {
        let bank = VoiceBank::new();
        assert_eq!(bank.len(), VOICE_COUNT);
        for v in bank.iter() {
            assert_eq!(v.vstate, VState::Free);
        }
    }

    #[test]
    fn init_resets_a_mutated_voice() {
        let mut bank = VoiceBank::new();
        {
            let v = bank.get_mut(3).unwrap();
            v.vstate = VState::On;
            v.ontime = 500;
        }
        bank.init();
        let v = bank.get(3).unwrap();
        assert_eq!(v.vstate, VState::Free);
        assert_eq!(v.ontime, 0);
    }

    #[test]
    fn out_of_range_index_errors() {
        let bank = VoiceBank::new();
        assert!(bank.get(VOICE_COUNT).is_err());
    }
}
