//! Shared primitives for Glossa crates

mod error;

pub use error::{ErrorBody, ErrorDetail, HttpError};
