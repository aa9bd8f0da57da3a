//! Core types, errors, and serialization shared by every Conveyor crate.

pub mod encoded;
pub mod error;
pub mod types;

pub use encoded::{DataConverter, EncodingError, JsonDataConverter};
pub use error::{ConveyorError, ConveyorResult, TimeoutType};
pub use types::*;
