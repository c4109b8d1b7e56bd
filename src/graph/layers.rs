//! Per-node layer bitsets
//!
//! A [`LayerMatrix`] stores one [`FixedBitSet`] per node. Bit `t` of row `u`
//! is set iff node `u` exists in layer `t`. All rows share the width fixed
//! at construction.

use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// `rows` bitsets, each `width` bits wide
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerMatrix {
    width: usize,
    rows: Vec<FixedBitSet>,
}

impl LayerMatrix {
    /// All-zero matrix
    pub fn new(rows: usize, width: usize) -> Self {
        Self {
            width,
            rows: vec![FixedBitSet::with_capacity(width); rows],
        }
    }

    /// Build from boolean rows; the width is taken from row 0
    ///
    /// # Errors
    ///
    /// Returns [`Error::InconsistentLayerWidth`] if any row differs in length
    /// from the first one.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self> {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut matrix = Self::new(rows.len(), width);

        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(Error::InconsistentLayerWidth {
                    node: index,
                    expected: width,
                    found: row.len(),
                });
            }
            for (layer, &present) in row.iter().enumerate() {
                matrix.rows[index].set(layer, present);
            }
        }

        Ok(matrix)
    }

    /// Every row must be exactly `width` bits long; only deserialized
    /// matrices can violate this
    pub(crate) fn check_width(&self) -> Result<()> {
        match self.rows.iter().position(|row| row.len() != self.width) {
            Some(node) => Err(Error::InconsistentLayerWidth {
                node,
                expected: self.width,
                found: self.rows[node].len(),
            }),
            None => Ok(()),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of layers (bits per row)
    pub fn width(&self) -> usize {
        self.width
    }

    /// Read-only view of one row
    pub fn row(&self, row: usize) -> LayerRow<'_> {
        LayerRow {
            bits: &self.rows[row],
        }
    }

    pub fn contains(&self, row: usize, layer: usize) -> bool {
        debug_assert!(layer < self.width);
        self.rows[row].contains(layer)
    }

    pub fn insert(&mut self, row: usize, layer: usize) {
        self.rows[row].insert(layer);
    }

    pub fn remove(&mut self, row: usize, layer: usize) {
        self.rows[row].set(layer, false);
    }

    /// Replace a row with a bitset of the matrix width
    pub fn set_row(&mut self, row: usize, bits: FixedBitSet) {
        debug_assert_eq!(bits.len(), self.width);
        self.rows[row] = bits;
    }

    /// True if any bit in the whole matrix is set
    pub fn any(&self) -> bool {
        self.rows.iter().any(|row| !row.is_clear())
    }
}

/// Borrowed view of one bitset row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerRow<'a> {
    bits: &'a FixedBitSet,
}

impl<'a> LayerRow<'a> {
    pub fn bits(&self) -> &'a FixedBitSet {
        self.bits
    }

    pub fn contains(&self, layer: usize) -> bool {
        self.bits.contains(layer)
    }

    /// Number of set bits
    pub fn count(&self) -> usize {
        self.bits.count_ones(..)
    }

    pub fn any(&self) -> bool {
        !self.bits.is_clear()
    }

    /// True if the AND with `other` is non-empty
    pub fn intersects(&self, other: LayerRow<'_>) -> bool {
        !self.bits.is_disjoint(other.bits)
    }

    /// Popcount of the AND with `other`
    pub fn and_count(&self, other: LayerRow<'_>) -> usize {
        (self.bits & other.bits).count_ones(..)
    }

    /// Indices of the set bits
    pub fn ones(self) -> impl Iterator<Item = usize> + 'a {
        self.bits.ones()
    }

    /// Indices of the bits set in both rows
    pub fn and(self, other: LayerRow<'a>) -> impl Iterator<Item = usize> + 'a {
        self.bits.intersection(other.bits)
    }

    /// Indices of the bits set in all three rows
    pub fn and3(self, b: LayerRow<'a>, c: LayerRow<'a>) -> impl Iterator<Item = usize> + 'a {
        self.bits.intersection(b.bits).filter(move |&t| c.contains(t))
    }
}
