//! Struct-as-table reflection: one descriptor per column, each a pair of
//! closures (getter/setter) together with a name, semantic type tag and
//! flags, stored in a name-indexed descriptor table.

use synth_core::Voice;

use crate::error::{ControlError, ControlResult};
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColType {
    Int,
    Float,
    Str,
}

/// Column flags, mirroring the source's per-column flag byte. Small enough
/// that a hand-rolled bitset reads more plainly than a macro-generated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColFlags(u8);

impl ColFlags {
    pub const NONE: ColFlags = ColFlags(0);
    pub const READONLY: ColFlags = ColFlags(0b0000_0001);
    pub const DISKSAVE: ColFlags = ColFlags(0b0000_0010);

    pub const fn contains(self, other: ColFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for ColFlags {
    type Output = ColFlags;
    fn bitor(self, rhs: ColFlags) -> ColFlags {
        ColFlags(self.0 | rhs.0)
    }
}

type Getter = Box<dyn Fn(&Voice) -> Value + Send + Sync>;
type Setter = Box<dyn Fn(&mut Voice, Value) -> ControlResult<()> + Send + Sync>;

/// One reflected column: name, type, flags, help text and the closures that
/// stand in for the source's (offset, pre-read callback, post-write
/// callback) triple.
pub struct ColumnDef {
    pub name: &'static str,
    pub col_type: ColType,
    pub flags: ColFlags,
    pub help: &'static str,
    get: Getter,
    set: Setter,
}

impl ColumnDef {
    pub fn new(
        name: &'static str,
        col_type: ColType,
        flags: ColFlags,
        help: &'static str,
        get: impl Fn(&Voice) -> Value + Send + Sync + 'static,
        set: impl Fn(&mut Voice, Value) -> ControlResult<()> + Send + Sync + 'static,
    ) -> Self {
        ColumnDef { name, col_type, flags, help, get: Box::new(get), set: Box::new(set) }
    }

    pub fn is_readonly(&self) -> bool {
        self.flags.contains(ColFlags::READONLY)
    }

    /// Invokes the pre-read callback, reconstructing any user-facing value
    /// from internal state (e.g. `freq` from `phasestep`).
    pub fn read(&self, voice: &Voice) -> Value {
        (self.get)(voice)
    }

    /// Invokes the post-write callback. Rejects outright if the column is
    /// READONLY; otherwise the callback may clamp the value in place and
    /// must derive any dependent internal fields.
    pub fn write(&self, voice: &mut Voice, value: Value) -> ControlResult<()> {
        if self.is_readonly() {
            return Err(ControlError::ReadOnly(self.name.to_string()));
        }
        (self.set)(voice, value)
    }
}
