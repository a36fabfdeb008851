//! Types shared by every Overdub crate

mod error;

pub use error::{ErrorBody, ErrorClass, HttpError};
