//! agentgen core - IR types, identifier normalization, and error handling

pub mod error;
pub mod ident;
pub mod types;

pub use error::{Error, Result};
pub use ident::{normalize, CasePolicy, SafeName};
pub use types::*;
