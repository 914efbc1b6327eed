//! The flat addressable memory of the machine.
use super::{Cell, Error};
use core::fmt;
use serde_derive::{Deserialize, Serialize};

/// A fixed-size array of cells, indexed by address.
///
/// Every access is bounds checked. Addresses are `i64` at this
/// boundary because they are usually read out of cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Memory {
    cells: Vec<Cell>,
}

impl Memory {
    /// Create a zeroed memory of `size` cells, each `bits` wide.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is not in `1..=64`.
    pub fn new(size: usize, bits: u32) -> Self {
        Self {
            cells: vec![Cell::new(bits); size],
        }
    }

    /// The number of cells in memory.
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Convert an address to an index, or fail if it is out of bounds.
    pub fn check(&self, address: i64) -> Result<usize, Error> {
        match usize::try_from(address) {
            Ok(i) if i < self.cells.len() => Ok(i),
            _ => Err(Error::AddressOutOfBounds {
                address,
                size: self.cells.len(),
            }),
        }
    }

    pub fn read(&self, address: i64) -> Result<i64, Error> {
        let i = self.check(address)?;
        Ok(self.cells[i].read())
    }

    /// Write a value to an address, wrapping it to the cell width.
    pub fn write(&mut self, address: i64, value: impl Into<i128>) -> Result<(), Error> {
        let i = self.check(address)?;
        self.cells[i].write(value);
        Ok(())
    }

    /// Write a contiguous image starting at `offset`.
    ///
    /// The whole range is checked before anything is written.
    pub fn load(&mut self, offset: usize, image: &[i64]) -> Result<(), Error> {
        if image.is_empty() {
            return Ok(());
        }
        let last = offset as i64 + image.len() as i64 - 1;
        self.check(offset as i64)?;
        self.check(last)?;
        for (cell, value) in self.cells[offset..].iter_mut().zip(image) {
            cell.write(*value);
        }
        Ok(())
    }

    /// Zero every cell.
    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            cell.write(0);
        }
    }

    /// Copy out `count` cells starting at `start`, for inspection.
    ///
    /// The whole range is checked before anything is copied.
    pub fn dump(&self, start: usize, count: usize) -> Result<Dump, Error> {
        if count == 0 {
            return Ok(Dump::default());
        }
        // Addresses past i64::MAX are out of bounds for any memory.
        let address = |i: Option<usize>| {
            i.and_then(|i| i64::try_from(i).ok())
                .unwrap_or(i64::MAX)
        };
        self.check(address(Some(start)))?;
        self.check(address(start.checked_add(count - 1)))?;

        let entries = self.cells[start..start + count]
            .iter()
            .enumerate()
            .map(|(i, cell)| (start + i, cell.read()))
            .collect();
        Ok(Dump(entries))
    }
}

/// A read-only copy of a range of memory, as `(address, value)` pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dump(pub Vec<(usize, i64)>);

impl Dump {
    pub fn values(&self) -> Vec<i64> {
        self.0.iter().map(|(_, value)| *value).collect()
    }
}

impl fmt::Display for Dump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (address, value) in &self.0 {
            writeln!(f, "{address} : {value}")?;
        }
        Ok(())
    }
}
