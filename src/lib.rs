//! # Adaptive Arithmetic (Range) Coding
//!
//! *Entropy coding at the Shannon limit, one interval at a time.*
//!
//! ## Intuition First
//!
//! Picture the unit interval `[0, 1)` as a number line, and carve it into
//! slices: one per symbol, each as wide as that symbol is probable. To
//! encode a message, step into the slice of its first symbol, re-carve
//! *that* slice the same way, step into the second symbol's sub-slice, and
//! so on. The message becomes a single, very precise number; frequent
//! symbols barely shrink the interval (few bits), rare ones shrink it a
//! lot (many bits).
//!
//! The trick that makes this practical is that encoder and decoder only
//! ever need a fixed-width *window* onto that number: once the top bit of
//! the interval can no longer change, it is shipped out and the window
//! shifts. When the interval straddles the midpoint too tightly to decide,
//! the undecided bit is deferred (the underflow count) and released the
//! moment the next top bit settles.
//!
//! ## The Problem
//!
//! Prefix coders like Huffman must spend a whole number of bits per
//! symbol, losing up to a bit each time against the entropy. Arithmetic
//! coding spends fractional bits, and because the model is consulted one
//! symbol at a time, it can *adapt* as it goes, with the decoder learning
//! in lockstep from the symbols it has already recovered. No table
//! transmission, no two passes.
//!
//! ## Historical Context
//!
//! ```text
//! 1948  Shannon        Entropy as the fundamental limit
//! 1963  Elias          Messages as nested intervals (via Abramson's notes)
//! 1976  Rissanen/Pasco Finite-precision arithmetic coding
//! 1987  Witten,
//!       Neal & Cleary  The CACM implementation that popularized it
//! 1991  Nelson         The DDJ bit-at-a-time coder, basis of countless ports
//! 1999  Subbotin       Carry-less range coder
//! ```
//!
//! ## Mathematical Formulation
//!
//! With cumulative frequencies $P$ over an alphabet of $N$ symbols
//! ($P_0 = 0$, $P_N$ the total), coding symbol $s$ maps the integer
//! interval $[low, high]$ to
//!
//! ```text
//! range = high - low + 1
//! high' = low + range * P[s+1] / total - 1
//! low'  = low + range * P[s]   / total
//! ```
//!
//! followed by renormalization that shifts out settled bits. The expected
//! output approaches $-\sum_s p_s \log_2 p_s$ bits per symbol.
//!
//! ## Complexity Analysis
//!
//! - **Time**: $O(\log N)$ per symbol for the table lookup, plus $O(N)$
//!   for the adaptive count update (contiguous, branch-free).
//! - **Space**: $O(N)$ for the cumulative table.
//!
//! ## Failure Modes
//!
//! 1. **Precision exhaustion**: without underflow handling, an interval
//!    hugging the midpoint starves the coder of shippable bits.
//! 2. **Model saturation**: unbounded counts overflow the `range * freq`
//!    product; the table is halved (monotonicity-preserving) whenever the
//!    total reaches the precision bound.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - **[`Encoder`] / [`Decoder`]**: carry-less range coder pair, generic
//!   over the probability width (`4..=32` bits) and over any
//!   [`BitWrite`] / [`BitRead`] stream.
//! - **[`FrequencyModel`]**: order-0 adaptive model with runtime alphabet
//!   growth.
//! - **Snapshots** ([`EncoderState`] / [`DecoderState`]) and bit-exact
//!   cost estimation for speculative coding.
//!
//! ## References
//!
//! - Witten, I. H., Neal, R. M., Cleary, J. G. (1987). "Arithmetic coding
//!   for data compression." Communications of the ACM 30(6).
//! - Nelson, M. (1991). "Arithmetic Coding + Statistical Modeling = Data
//!   Compression." Dr. Dobb's Journal.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitstream;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod model;
mod window;

pub use bitstream::{BitRead, BitReader, BitWrite, BitWriter};
pub use decoder::{Decoder, DecoderState};
pub use encoder::{Encoder, EncoderState};
pub use error::Error;
pub use model::FrequencyModel;

/// Encoder over 16-bit probabilities (32-bit products).
pub type Encoder16<S> = Encoder<S, 16>;
/// Encoder over 32-bit probabilities (64-bit products).
pub type Encoder32<S> = Encoder<S, 32>;
/// Decoder over 16-bit probabilities (32-bit products).
pub type Decoder16<S> = Decoder<S, 16>;
/// Decoder over 32-bit probabilities (64-bit products).
pub type Decoder32<S> = Decoder<S, 32>;
