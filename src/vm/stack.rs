//! A bounded last-in-first-out stack of cells.
use super::{Cell, Error, StackKind};
use core::fmt;

/// A fixed-capacity stack of cells.
///
/// The stack pointer is `-1` for an empty stack, `0` when it holds one
/// value, and grows up to `capacity - 1` when full. Popping zeroes the
/// vacated cell, so the raw cells always reflect what is live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stack {
    kind: StackKind,
    cells: Vec<Cell>,
    stack_pointer: isize,
}

impl Stack {
    /// Create an empty stack of `capacity` cells, each `bits` wide.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is not in `1..=64`.
    pub fn new(kind: StackKind, capacity: usize, bits: u32) -> Self {
        Self {
            kind,
            cells: vec![Cell::new(bits); capacity],
            stack_pointer: -1,
        }
    }

    /// Which machine stack this is.
    pub fn kind(&self) -> StackKind {
        self.kind
    }

    /// The maximum number of values the stack can hold.
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// The index of the top-of-stack cell, or `-1` when empty.
    pub fn stack_pointer(&self) -> isize {
        self.stack_pointer
    }

    /// The number of values currently on the stack.
    pub fn depth(&self) -> usize {
        (self.stack_pointer + 1) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.stack_pointer < 0
    }

    pub fn is_full(&self) -> bool {
        self.depth() == self.capacity()
    }

    /// Push a value, wrapping it to the cell width.
    pub fn push(&mut self, value: impl Into<i128>) -> Result<(), Error> {
        if self.is_full() {
            return Err(Error::StackOverflow(self.kind));
        }
        self.stack_pointer += 1;
        self.cells[self.stack_pointer as usize].write(value);
        Ok(())
    }

    /// Pop the top value, zeroing the cell it lived in.
    pub fn pop(&mut self) -> Result<i64, Error> {
        if self.is_empty() {
            return Err(Error::StackUnderflow(self.kind));
        }
        let cell = &mut self.cells[self.stack_pointer as usize];
        let value = cell.read();
        cell.write(0);
        self.stack_pointer -= 1;
        Ok(value)
    }

    /// Reset every cell to zero and empty the stack.
    pub fn flush(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.write(0);
        }
        self.stack_pointer = -1;
    }

    /// The live values, from the bottom of the stack to the top.
    pub fn values(&self) -> Vec<i64> {
        self.cells[..self.depth()].iter().map(Cell::read).collect()
    }

    /// The value `n` places below the top, without popping it.
    pub(crate) fn top(&self, n: usize) -> Result<i64, Error> {
        self.require(n + 1)?;
        Ok(self.cells[self.depth() - 1 - n].read())
    }

    /// Fail with an underflow unless at least `n` values are live.
    pub(crate) fn require(&self, n: usize) -> Result<(), Error> {
        if self.depth() < n {
            Err(Error::StackUnderflow(self.kind))
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cell) in self.cells.iter().enumerate() {
            if i as isize == self.stack_pointer {
                write!(f, " {cell} <-TOS ")?;
            } else {
                write!(f, " {cell}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_helpers() {
        let mut s = Stack::new(StackKind::Data, 4, 32);
        s.push(1).unwrap();
        s.push(2).unwrap();
        assert_eq!(s.top(0), Ok(2));
        assert_eq!(s.top(1), Ok(1));
        assert_eq!(s.top(2), Err(Error::StackUnderflow(StackKind::Data)));
        assert!(s.require(2).is_ok());
        assert_eq!(s.require(3), Err(Error::StackUnderflow(StackKind::Data)));
        assert_eq!(s.values(), vec![1, 2]);
    }

    #[test]
    fn test_display() {
        let mut s = Stack::new(StackKind::Return, 3, 32);
        s.push(7).unwrap();
        assert_eq!(s.to_string(), " 7 <-TOS  0 0");
    }
}
