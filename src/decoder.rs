//! Adaptive arithmetic decoder.
//!
//! Mirror image of the encoder: a `code` register slides a window over
//! the compressed stream, each symbol is identified by scaling the code
//! into the cumulative table, and the interval arithmetic replays the
//! encoder's narrowing step for step. The model must therefore see the
//! exact symbol sequence the encoder saw, including any mid-stream
//! alphabet growth.

use crate::bitstream::BitRead;
use crate::error::{Error, Result};
use crate::model::FrequencyModel;
use crate::window::Window;

/// Adaptive arithmetic decoder over a bit source.
///
/// Width and alphabet must match the encoder that produced the stream.
pub struct Decoder<S, const BITS: u32> {
    reader: S,
    low: u64,
    high: u64,
    code: u64,
    range: u64,
    model: FrequencyModel,
}

/// Deep snapshot of a [`Decoder`], including its model and code window.
///
/// Restoring does not rewind the bit source; pair snapshots with the
/// source's own position bookkeeping (e.g.
/// [`BitReader::position`](crate::BitReader::position) /
/// [`seek`](crate::BitReader::seek)).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderState {
    low: u64,
    high: u64,
    code: u64,
    range: u64,
    model: FrequencyModel,
}

impl<S: BitRead, const BITS: u32> Decoder<S, BITS> {
    const MASK: u64 = Window::<BITS>::MASK;
    const HALF: u64 = Window::<BITS>::HALF;
    const QUARTER: u64 = Window::<BITS>::QUARTER;
    const QUARTER_MASK: u64 = Window::<BITS>::QUARTER_MASK;
    const MAX_TOTAL: u64 = Window::<BITS>::MAX_TOTAL;
    const MAX_ALPHABET: u64 = Window::<BITS>::MAX_ALPHABET;

    /// Create a decoder over `alphabet` symbols reading from `reader`,
    /// pre-loading a full code window from the stream.
    pub fn new(alphabet: usize, mut reader: S) -> Result<Self> {
        Window::<BITS>::check()?;
        if alphabet as u64 > Self::MAX_ALPHABET {
            return Err(Error::AlphabetTooLarge {
                alphabet,
                limit: Self::MAX_ALPHABET,
            });
        }
        let model = FrequencyModel::new(alphabet)?;
        let code = reader.read(BITS)?;
        Ok(Self {
            reader,
            low: 0,
            high: Self::MASK,
            code,
            range: 0,
            model,
        })
    }

    /// Decode the next symbol.
    pub fn decode(&mut self) -> Result<usize> {
        let total = self.model.total();
        self.range = self.high - self.low + 1;
        // Truncated or corrupt input can drive `code` outside `[low, high]`;
        // wrap rather than panic and let the clamp in lookup absorb it.
        let scaled = self
            .code
            .wrapping_sub(self.low)
            .wrapping_add(1)
            .wrapping_mul(total)
            .wrapping_sub(1)
            / self.range;
        let symbol = self.model.lookup(scaled);
        self.narrow(symbol)?;
        self.adapt(symbol);
        Ok(symbol)
    }

    /// Grow the alphabet to `alphabet` symbols.
    ///
    /// Must be called at the same point in the symbol sequence as on the
    /// encoder side.
    pub fn expand(&mut self, alphabet: usize) -> Result<()> {
        if alphabet as u64 > Self::MAX_ALPHABET {
            return Err(Error::AlphabetTooLarge {
                alphabet,
                limit: Self::MAX_ALPHABET,
            });
        }
        self.model.expand(alphabet)?;
        if self.model.total() >= Self::MAX_TOTAL {
            self.model.rescale();
        }
        Ok(())
    }

    /// Capture a deep snapshot of the coder.
    pub fn save_state(&self) -> DecoderState {
        DecoderState {
            low: self.low,
            high: self.high,
            code: self.code,
            range: self.range,
            model: self.model.clone(),
        }
    }

    /// Roll the coder back to a snapshot, consuming it.
    ///
    /// Clone the snapshot first to restore it more than once.
    pub fn restore_state(&mut self, state: DecoderState) {
        self.low = state.low;
        self.high = state.high;
        self.code = state.code;
        self.range = state.range;
        self.model = state.model;
    }

    /// The adaptive model.
    pub fn model(&self) -> &FrequencyModel {
        &self.model
    }

    /// The underlying bit source.
    pub fn reader(&self) -> &S {
        &self.reader
    }

    /// Mutable access to the bit source, e.g. to reposition it alongside
    /// [`restore_state`](Self::restore_state).
    pub fn reader_mut(&mut self) -> &mut S {
        &mut self.reader
    }

    /// Consume the decoder and hand the bit source back.
    pub fn into_reader(self) -> S {
        self.reader
    }

    /// Replay the encoder's narrowing for `symbol`, refilling the code
    /// window as interval bits shift out.
    fn narrow(&mut self, symbol: usize) -> Result<()> {
        let sym_low = self.model.cum_low(symbol);
        let sym_high = self.model.cum_high(symbol);
        let total = self.model.total();

        self.range = self.high - self.low + 1;
        self.high = self.low + self.range * sym_high / total - 1;
        self.low += self.range * sym_low / total;

        loop {
            if (self.high ^ self.low) & Self::HALF == 0 {
                // MSB settled; the encoder emitted it, we just shift it out.
            } else if (self.low & !self.high & Self::QUARTER) != 0 {
                // Underflow expansion: the encoder deferred a bit here, so
                // the code window flips its second-MSB to stay in step.
                self.code ^= Self::QUARTER;
                self.low &= Self::QUARTER_MASK;
                self.high |= Self::QUARTER;
            } else {
                break;
            }
            self.low = (self.low << 1) & Self::MASK;
            self.high = ((self.high << 1) | 1) & Self::MASK;
            self.code = ((self.code << 1) | self.reader.read(1)?) & Self::MASK;
        }
        Ok(())
    }

    fn adapt(&mut self, symbol: usize) {
        self.model.update(symbol);
        if self.model.total() >= Self::MAX_TOTAL {
            self.model.rescale();
        }
    }
}
