//! Testing utilities and harness for snapsheet

pub mod rule;

pub use rule::*;

pub mod prelude {
    pub use crate::rule::*;
}
