pub mod enums;
pub mod lab;
pub mod marker;

pub use enums::*;
pub use lab::*;
pub use marker::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid {field} value: {value}")]
    InvalidEnum { field: String, value: String },
}
