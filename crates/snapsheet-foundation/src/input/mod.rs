pub mod gestures;
mod types;

pub use types::*;
