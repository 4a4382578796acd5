//! Hash collections for runtime-side caches.
//!
//! FxHash by default; the `std-hash` feature switches to SipHash for hosts
//! that hash untrusted keys.

pub mod map {
    #[cfg(feature = "std-hash")]
    pub use std::collections::HashMap;

    #[cfg(not(feature = "std-hash"))]
    pub use rustc_hash::FxHashMap as HashMap;
}

/// Hashable `f32`, equal only for bit-identical values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct F32Key(u32);

impl F32Key {
    pub fn new(value: f32) -> Self {
        Self(value.to_bits())
    }

    pub fn get(self) -> f32 {
        f32::from_bits(self.0)
    }
}

impl From<f32> for F32Key {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}
