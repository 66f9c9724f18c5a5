//! Bit-window constants derived from the probability word width.
//!
//! Every width-dependent constant lives here so the encoder and decoder
//! can never disagree on the window layout.

use crate::error::{Error, Result};

/// Derived constants for a `BITS`-wide coding window.
///
/// Registers are held in `u64`, so `range * freq` products need
/// `2 * BITS - 2` bits and the supported range is `4..=32`.
pub(crate) struct Window<const BITS: u32>;

impl<const BITS: u32> Window<BITS> {
    const VALID: bool = BITS >= 4 && BITS <= 32;

    /// Keeps registers to `BITS` bits after each shift.
    pub(crate) const MASK: u64 = if Self::VALID { (1 << BITS) - 1 } else { 0 };
    /// MSB of the window; the half-way point of the coding interval.
    pub(crate) const HALF: u64 = if Self::VALID { 1 << (BITS - 1) } else { 0 };
    /// Second-MSB; the quarter point.
    pub(crate) const QUARTER: u64 = if Self::VALID { 1 << (BITS - 2) } else { 0 };
    /// Clears both top bits of a register.
    pub(crate) const QUARTER_MASK: u64 = if Self::VALID { Self::QUARTER - 1 } else { 0 };
    /// The cumulative total is rescaled once it reaches this bound.
    pub(crate) const MAX_TOTAL: u64 = Self::QUARTER;
    /// Largest supported alphabet.
    ///
    /// Rescaling bumps collapsed entries back apart, so the total settles
    /// near twice the alphabet size in the worst case; capping the alphabet
    /// at a quarter of `MAX_TOTAL` keeps the settled total below the bound.
    pub(crate) const MAX_ALPHABET: u64 = Self::MAX_TOTAL / 4;

    pub(crate) fn check() -> Result<()> {
        if Self::VALID {
            Ok(())
        } else {
            Err(Error::UnsupportedPrecision(BITS))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_for_16_bits() {
        assert_eq!(Window::<16>::MASK, 0xFFFF);
        assert_eq!(Window::<16>::HALF, 0x8000);
        assert_eq!(Window::<16>::QUARTER, 0x4000);
        assert_eq!(Window::<16>::QUARTER_MASK, 0x3FFF);
        assert_eq!(Window::<16>::MAX_TOTAL, 16384);
    }

    #[test]
    fn rejects_out_of_range_widths() {
        assert!(Window::<3>::check().is_err());
        assert!(Window::<33>::check().is_err());
        assert!(Window::<16>::check().is_ok());
        assert!(Window::<32>::check().is_ok());
    }
}
