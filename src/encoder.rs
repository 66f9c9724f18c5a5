//! Adaptive arithmetic encoder.
//!
//! Narrows a `[low, high]` interval for each symbol, emitting interval
//! bits through a [`BitWrite`] sink as soon as they stabilize. Bits whose
//! value hinges on a later carry are deferred in an underflow counter and
//! released in one run once the next MSB settles, which keeps the coder
//! carry-less at any window width.

use crate::bitstream::BitWrite;
use crate::error::{Error, Result};
use crate::model::FrequencyModel;
use crate::window::Window;

/// Adaptive arithmetic encoder over a bit sink.
///
/// `BITS` is the probability word width; registers are `u64`, so widths
/// from 4 to 32 bits are supported. Pass `&mut writer` to keep ownership
/// of the sink on the caller's side.
pub struct Encoder<S, const BITS: u32> {
    writer: S,
    low: u64,
    high: u64,
    underflow: u64,
    range: u64,
    model: FrequencyModel,
    flushed: bool,
}

/// Deep snapshot of an [`Encoder`], including its model.
///
/// Snapshots share nothing with the live coder; restoring one rolls the
/// coder back to the exact captured point. Note that already-emitted bits
/// are not recalled, so speculative coding (cost probes, context switches)
/// should only write through the simulating paths between save and restore.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncoderState {
    low: u64,
    high: u64,
    underflow: u64,
    range: u64,
    model: FrequencyModel,
    flushed: bool,
}

impl<S: BitWrite, const BITS: u32> Encoder<S, BITS> {
    const MASK: u64 = Window::<BITS>::MASK;
    const HALF: u64 = Window::<BITS>::HALF;
    const QUARTER: u64 = Window::<BITS>::QUARTER;
    const QUARTER_MASK: u64 = Window::<BITS>::QUARTER_MASK;
    const MAX_TOTAL: u64 = Window::<BITS>::MAX_TOTAL;
    const MAX_ALPHABET: u64 = Window::<BITS>::MAX_ALPHABET;

    /// Create an encoder over `alphabet` symbols writing to `writer`.
    ///
    /// Every symbol starts with weight 1; the model adapts as symbols are
    /// encoded. A matching decoder must be created with the same width and
    /// alphabet.
    pub fn new(alphabet: usize, writer: S) -> Result<Self> {
        Window::<BITS>::check()?;
        if alphabet as u64 > Self::MAX_ALPHABET {
            return Err(Error::AlphabetTooLarge {
                alphabet,
                limit: Self::MAX_ALPHABET,
            });
        }
        Ok(Self {
            writer,
            low: 0,
            high: Self::MASK,
            underflow: 0,
            range: 0,
            model: FrequencyModel::new(alphabet)?,
            flushed: false,
        })
    }

    /// Encode one symbol, emitting any bits that stabilize.
    pub fn encode(&mut self, symbol: usize) -> Result<()> {
        self.narrow(symbol, false)?;
        self.adapt(symbol);
        Ok(())
    }

    /// Emit the terminating bits. Idempotent.
    ///
    /// One more deferred bit joins the underflow run, then the second-MSB
    /// of `low` is emitted followed by the run with the opposite value;
    /// that pins the final interval for a decoder that pre-loaded a full
    /// window.
    pub fn flush(&mut self) -> Result<()> {
        if self.flushed {
            return Ok(());
        }
        self.underflow += 1;
        let bit = (self.low >> (BITS - 2)) & 1;
        self.writer.write(bit, 1)?;
        self.emit_run(bit ^ 1)?;
        self.flushed = true;
        Ok(())
    }

    /// Grow the alphabet to `alphabet` symbols.
    ///
    /// Learned statistics are kept and each new symbol starts with weight
    /// 1. A paired decoder must expand at the same point in the symbol
    /// sequence.
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

    /// Number of bits that encoding `symbol` would emit, without writing.
    ///
    /// Deferred underflow bits and the eventual [`flush`](Self::flush) are
    /// not included. The model is still updated exactly as by
    /// [`encode`](Self::encode), so bracket probes with
    /// [`save_state`](Self::save_state)/[`restore_state`](Self::restore_state).
    pub fn estimate_cost(&mut self, symbol: usize) -> Result<u64> {
        let cost = self.narrow(symbol, true)?;
        self.adapt(symbol);
        Ok(cost)
    }

    /// Accumulated cost of a symbol sequence, short-circuiting once the
    /// running total exceeds `limit`.
    ///
    /// Same model caveat as [`estimate_cost`](Self::estimate_cost).
    pub fn estimate_cost_bounded<I>(&mut self, symbols: I, limit: u64) -> Result<u64>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut cost = 0;
        for symbol in symbols {
            cost += self.estimate_cost(symbol)?;
            if cost > limit {
                break;
            }
        }
        Ok(cost)
    }

    /// Capture a deep snapshot of the coder.
    pub fn save_state(&self) -> EncoderState {
        EncoderState {
            low: self.low,
            high: self.high,
            underflow: self.underflow,
            range: self.range,
            model: self.model.clone(),
            flushed: self.flushed,
        }
    }

    /// Roll the coder back to a snapshot, consuming it.
    ///
    /// Clone the snapshot first to restore it more than once.
    pub fn restore_state(&mut self, state: EncoderState) {
        self.low = state.low;
        self.high = state.high;
        self.underflow = state.underflow;
        self.range = state.range;
        self.model = state.model;
        self.flushed = state.flushed;
    }

    /// The adaptive model.
    pub fn model(&self) -> &FrequencyModel {
        &self.model
    }

    /// The underlying bit sink.
    pub fn writer(&self) -> &S {
        &self.writer
    }

    /// Consume the encoder and hand the bit sink back.
    ///
    /// Call [`flush`](Self::flush) first; dropping an unflushed encoder
    /// loses the bits still pinned in the interval registers.
    pub fn into_writer(self) -> S {
        self.writer
    }

    /// Narrow the interval for `symbol` and renormalize, returning the
    /// number of bits emitted (or that would have been, when simulating).
    fn narrow(&mut self, symbol: usize, simulate: bool) -> Result<u64> {
        let alphabet = self.model.alphabet();
        if symbol >= alphabet {
            return Err(Error::SymbolOutOfRange { symbol, alphabet });
        }

        let sym_low = self.model.cum_low(symbol);
        let sym_high = self.model.cum_high(symbol);
        let total = self.model.total();

        self.range = self.high - self.low + 1;
        self.high = self.low + self.range * sym_high / total - 1;
        self.low += self.range * sym_low / total;

        let mut cost = 0;
        loop {
            if (self.high ^ self.low) & Self::HALF == 0 {
                // Both bounds agree on the MSB: it is final, and so is the
                // value of every deferred underflow bit.
                cost += self.underflow + 1;
                if simulate {
                    self.underflow = 0;
                } else {
                    let msb = self.high >> (BITS - 1);
                    self.writer.write(msb, 1)?;
                    self.emit_run(msb ^ 1)?;
                }
            } else if (self.low & !self.high & Self::QUARTER) != 0 {
                // Interval straddles the midpoint from inside the middle
                // half: defer one bit and expand around the center.
                self.underflow += 1;
                self.low &= Self::QUARTER_MASK;
                self.high |= Self::QUARTER;
            } else {
                break;
            }
            self.low = (self.low << 1) & Self::MASK;
            self.high = ((self.high << 1) | 1) & Self::MASK;
        }
        Ok(cost)
    }

    /// Write the pending underflow run as copies of `bit`, zeroing the
    /// counter.
    fn emit_run(&mut self, bit: u64) -> Result<()> {
        let fill = if bit != 0 { u64::MAX } else { 0 };
        while self.underflow >= 64 {
            self.writer.write(fill, 64)?;
            self.underflow -= 64;
        }
        if self.underflow > 0 {
            self.writer.write(fill, self.underflow as u32)?;
            self.underflow = 0;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstream::BitWriter;

    #[test]
    fn rejects_bad_construction() {
        assert!(matches!(
            Encoder::<_, 16>::new(0, BitWriter::new()),
            Err(Error::EmptyAlphabet)
        ));
        assert!(matches!(
            Encoder::<_, 16>::new(1 << 13, BitWriter::new()),
            Err(Error::AlphabetTooLarge { .. })
        ));
        assert!(matches!(
            Encoder::<_, 40>::new(4, BitWriter::new()),
            Err(Error::UnsupportedPrecision(40))
        ));
    }

    #[test]
    fn rejects_out_of_range_symbols() {
        let mut enc = Encoder::<_, 16>::new(4, BitWriter::new()).unwrap();
        assert!(matches!(
            enc.encode(4),
            Err(Error::SymbolOutOfRange {
                symbol: 4,
                alphabet: 4
            })
        ));
        // The failed call must not have touched the model.
        assert_eq!(enc.model().total(), 4);
    }

    #[test]
    fn flush_is_idempotent() {
        let mut enc = Encoder::<_, 16>::new(2, BitWriter::new()).unwrap();
        enc.encode(1).unwrap();
        enc.flush().unwrap();
        let after_first = enc.writer().bit_len();
        enc.flush().unwrap();
        assert_eq!(enc.writer().bit_len(), after_first);
    }

    #[test]
    fn singleton_alphabet_costs_only_the_flush() {
        let mut enc = Encoder::<_, 16>::new(1, BitWriter::new()).unwrap();
        for _ in 0..100 {
            enc.encode(0).unwrap();
        }
        assert_eq!(enc.writer().bit_len(), 0);
        enc.flush().unwrap();
        assert_eq!(enc.writer().bit_len(), 2);
    }

    #[test]
    fn cost_matches_emitted_bits() {
        let symbols: Vec<usize> = (0..500).map(|i| (i * 7 + i / 3) % 16).collect();
        let mut real = Encoder::<_, 16>::new(16, BitWriter::new()).unwrap();
        let mut sim = Encoder::<_, 16>::new(16, BitWriter::new()).unwrap();

        let mut estimated = 0;
        for &s in &symbols {
            let before = real.writer.bit_len() as u64;
            let cost = sim.estimate_cost(s).unwrap();
            real.encode(s).unwrap();
            assert_eq!(cost, real.writer.bit_len() as u64 - before);
            estimated += cost;
        }

        // Simulation and real encoding walk through identical states.
        assert_eq!(real.save_state(), sim.save_state());

        let pending = real.underflow;
        real.flush().unwrap();
        assert_eq!(real.writer.bit_len() as u64, estimated + pending + 2);
    }

    #[test]
    fn estimate_cost_bounded_short_circuits() {
        let mut enc = Encoder::<_, 16>::new(16, BitWriter::new()).unwrap();
        let checkpoint = enc.save_state();
        let symbols: Vec<usize> = (0..1000).map(|i| i % 16).collect();
        let cost = enc.estimate_cost_bounded(symbols.iter().copied(), 64).unwrap();
        assert!(cost > 64);
        // Far fewer than 1000 symbols' worth of bits were accumulated.
        assert!(cost < 200);
        enc.restore_state(checkpoint);
        assert_eq!(enc.model().total(), 16);
    }

    #[test]
    fn snapshot_brackets_a_probe() {
        let mut enc = Encoder::<_, 16>::new(8, BitWriter::new()).unwrap();
        for s in [1, 5, 2, 7] {
            enc.encode(s).unwrap();
        }
        let checkpoint = enc.save_state();
        let probed = enc.save_state();

        enc.estimate_cost(3).unwrap();
        enc.estimate_cost(3).unwrap();
        assert_ne!(enc.save_state(), probed);

        enc.restore_state(checkpoint);
        assert_eq!(enc.save_state(), probed);
    }
}
