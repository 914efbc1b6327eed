//! A single fixed-width memory unit.
//!
//! Cells store signed integers in two's complement. Writing a value
//! that does not fit never fails: the value wraps around into the
//! representable range, in both directions.
use core::fmt;

/// The widest cell the machine supports.
pub const MAX_CELL_BITS: u32 = i64::BITS;

/// A signed integer cell of a fixed bit width.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Cell {
    bits: u32,
    value: i64,
}

impl Cell {
    /// Create a zeroed cell `bits` wide.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is not in `1..=64`.
    pub fn new(bits: u32) -> Self {
        assert!(
            (1..=MAX_CELL_BITS).contains(&bits),
            "cell width must be between 1 and {MAX_CELL_BITS} bits, got {bits}"
        );
        Self { bits, value: 0 }
    }

    /// The width of this cell in bits.
    pub fn bit_width(&self) -> u32 {
        self.bits
    }

    /// The smallest value this cell can hold, `-2^(bits-1)`.
    pub fn min(&self) -> i64 {
        i64::MIN >> (MAX_CELL_BITS - self.bits)
    }

    /// The largest value this cell can hold, `2^(bits-1) - 1`.
    pub fn max(&self) -> i64 {
        i64::MAX >> (MAX_CELL_BITS - self.bits)
    }

    /// Store a value, wrapping it into range.
    pub fn write(&mut self, value: impl Into<i128>) {
        self.value = wrap(value.into(), self.bits);
    }

    /// Read the stored value.
    pub fn read(&self) -> i64 {
        self.value
    }
}

/// Reduce `value` modulo `2^bits` into the signed range of a `bits` wide cell.
///
/// Truncating to the low 64 bits keeps the residue mod `2^bits` because
/// `2^bits` divides `2^64`; the shift pair then sign-extends from bit `bits - 1`.
pub fn wrap(value: i128, bits: u32) -> i64 {
    let shift = MAX_CELL_BITS - bits;
    ((value as i64) << shift) >> shift
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let c = Cell::new(8);
        assert_eq!(c.min(), -128);
        assert_eq!(c.max(), 127);

        let c = Cell::new(64);
        assert_eq!(c.min(), i64::MIN);
        assert_eq!(c.max(), i64::MAX);

        let c = Cell::new(1);
        assert_eq!(c.min(), -1);
        assert_eq!(c.max(), 0);
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(128, 8), -128);
        assert_eq!(wrap(255, 8), -1);
        assert_eq!(wrap(256, 8), 0);
        assert_eq!(wrap(-129, 8), 127);
        assert_eq!(wrap(-1000, 8), 24);
        assert_eq!(wrap(i128::MAX, 64), -1);
        assert_eq!(wrap(i64::MAX as i128 + 1, 64), i64::MIN);
    }

    #[test]
    #[should_panic]
    fn test_zero_width() {
        Cell::new(0);
    }
}
