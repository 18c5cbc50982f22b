//! Peripheral tables
//!
//! A table maps the small logical indices used by callers (port 0, bus 1,
//! channel 3...) to chip-specific peripheral descriptors. Tables are plain
//! values built at startup and handed to the chip driver, so a test can
//! swap in its own addresses.

use crate::error::HalError;

/// Fixed-size index -> descriptor map
///
/// Slots may be empty (`None`); looking one up behaves like an index past
/// the end of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeripheralTable<T, const N: usize> {
    entries: [Option<T>; N],
}

impl<T: Copy, const N: usize> PeripheralTable<T, N> {
    /// Create a table from its slots
    pub const fn new(entries: [Option<T>; N]) -> Self {
        Self { entries }
    }

    /// Number of slots, including empty ones
    pub const fn len(&self) -> usize {
        N
    }

    /// True if the table has no slots at all
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Look up the descriptor for `index`
    pub fn get(&self, index: u32) -> Result<T, HalError> {
        self.entries
            .get(index as usize)
            .copied()
            .flatten()
            .ok_or(HalError::InvalidIndex)
    }

    /// Replace one slot, returning the previous descriptor
    pub fn set(&mut self, index: u32, entry: Option<T>) -> Result<Option<T>, HalError> {
        let slot = self
            .entries
            .get_mut(index as usize)
            .ok_or(HalError::InvalidIndex)?;
        Ok(core::mem::replace(slot, entry))
    }

    /// Iterate over `(index, descriptor)` for every populated slot
    pub fn iter(&self) -> impl Iterator<Item = (u32, T)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, e)| e.map(|e| (i as u32, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TABLE: PeripheralTable<u32, 4> =
        PeripheralTable::new([None, Some(0x100), Some(0x200), Some(0x300)]);

    #[test]
    fn test_empty_slot_is_invalid() {
        assert_eq!(TABLE.get(0), Err(HalError::InvalidIndex));
        assert_eq!(TABLE.get(1), Ok(0x100));
    }

    #[test]
    fn test_set_replaces_slot() {
        let mut table = TABLE;
        assert_eq!(table.set(0, Some(0x50)), Ok(None));
        assert_eq!(table.get(0), Ok(0x50));
        assert_eq!(table.set(4, Some(0x60)), Err(HalError::InvalidIndex));
    }

    #[test]
    fn test_iter_skips_holes() {
        let indices: heapless::Vec<u32, 4> = TABLE.iter().map(|(i, _)| i).collect();
        assert_eq!(indices.as_slice(), &[1, 2, 3]);
    }

    proptest! {
        #[test]
        fn test_lookup_resolves_own_slot(index in 1u32..4) {
            prop_assert_eq!(TABLE.get(index), Ok(0x100 * index));
        }

        #[test]
        fn test_lookup_past_end_fails(index in 4u32..) {
            prop_assert_eq!(TABLE.get(index), Err(HalError::InvalidIndex));
        }
    }
}
