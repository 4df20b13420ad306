//! Domain validation errors for core domain types.
//!
//! These errors describe a single value that could not be interpreted. The
//! pipeline decides how far each one escalates: a bad fix field drops that
//! row, a bad polygon vertex makes the whole polygon unavailable.
//!
//! # Examples
//!
//! ```
//! use fadtrack::domain::coordinate::dms_to_dd;
//! use fadtrack::domain::error::FormatError;
//!
//! let result = dms_to_dd("north-ish");
//! assert!(matches!(result, Err(FormatError::UnrecognizedDms { .. })));
//! ```

use thiserror::Error;

/// A coordinate or field string did not match any accepted format.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// Neither the degrees-minutes-seconds nor the degrees-minutes pattern matched.
    #[error("unrecognized DMS format: {input:?}")]
    UnrecognizedDms {
        /// The offending input, as received.
        input: String,
    },
}

/// A vertex list could not be turned into a usable polygon ring.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RingError {
    #[error("polygon ring needs at least 3 distinct vertices, got {distinct}")]
    TooFewVertices { distinct: usize },

    #[error("vertex {index} is not a finite coordinate")]
    NonFiniteVertex { index: usize },
}
