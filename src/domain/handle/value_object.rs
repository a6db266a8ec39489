use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle the managed side keeps instead of a raw native address.
///
/// The upper 32 bits carry the slot generation, the lower 32 bits the slot index.
/// Generations start at 1, so `0` is never a live handle and doubles as "null" on the managed side.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialOrd, PartialEq, Eq, Ord, Hash)]
#[serde(transparent)]
pub struct NativeHandle(u64);

impl NativeHandle {
    pub const NULL: NativeHandle = NativeHandle(0);

    pub(crate) fn new(index: u32, generation: u32) -> Self {
        NativeHandle(((generation as u64) << 32) | index as u64)
    }

    /// Rebuild a handle from the `long` the managed side handed back.
    pub fn from_raw(raw: i64) -> Self {
        NativeHandle(raw as u64)
    }

    pub fn to_raw(self) -> i64 {
        self.0 as i64
    }

    pub fn is_null(self) -> bool {
        self.generation() == 0
    }

    pub(crate) fn index(self) -> u32 {
        self.0 as u32
    }

    pub(crate) fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }
}

impl fmt::Display for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}
