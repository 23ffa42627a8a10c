//! Testing utilities and harness for Weft

pub mod fixtures;
pub mod recording;

pub use fixtures::*;
pub use recording::*;

pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::recording::*;
}
