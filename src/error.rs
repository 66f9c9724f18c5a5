//! Error types for arithmetic coding.

use thiserror::Error;

/// Error variants for coder operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The alphabet must contain at least one symbol.
    #[error("empty alphabet")]
    EmptyAlphabet,

    /// The alphabet does not fit the chosen probability precision.
    #[error("alphabet of {alphabet} exceeds limit {limit} for this precision")]
    AlphabetTooLarge {
        /// Requested alphabet size.
        alphabet: usize,
        /// Largest alphabet the precision supports.
        limit: u64,
    },

    /// The alphabet can only grow.
    #[error("cannot shrink alphabet from {current} to {requested}")]
    AlphabetNotGrown {
        /// Current alphabet size.
        current: usize,
        /// Requested alphabet size.
        requested: usize,
    },

    /// A symbol outside `0..alphabet` was passed in.
    #[error("symbol {symbol} out of range for alphabet of {alphabet}")]
    SymbolOutOfRange {
        /// Offending symbol.
        symbol: usize,
        /// Alphabet size at the time of the call.
        alphabet: usize,
    },

    /// The probability word width is outside the supported `4..=32` range.
    #[error("unsupported precision: {0} bits")]
    UnsupportedPrecision(u32),

    /// An I/O error occurred in the underlying bit stream.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for coder operations.
pub type Result<T> = std::result::Result<T, Error>;
