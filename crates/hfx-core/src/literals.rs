//! Side store for numeric literals.
//!
//! The lexer appends every number it scans; the parser reads the most recent
//! entry back when a declaration needs the value. Values live in a byte arena
//! as little-endian `f64`s, addressed by insertion index.

use tracing::warn;

/// Returned by [`LiteralBuffer::add_data`] when the buffer is full.
pub const INVALID_LITERAL_INDEX: u32 = u32::MAX;

const ENTRY_SIZE: usize = std::mem::size_of::<f64>();

/// Capacity limits for a [`LiteralBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralCapacity {
    pub max_entries: usize,
    pub buffer_size: usize,
}

impl Default for LiteralCapacity {
    fn default() -> Self {
        Self {
            max_entries: 1024,
            buffer_size: 8192,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    offset: u32,
}

#[derive(Debug, Clone)]
pub struct LiteralBuffer {
    entries: Vec<Entry>,
    data: Vec<u8>,
    capacity: LiteralCapacity,
}

impl Default for LiteralBuffer {
    fn default() -> Self {
        Self::new(LiteralCapacity::default())
    }
}

impl LiteralBuffer {
    pub fn new(capacity: LiteralCapacity) -> Self {
        Self {
            entries: Vec::with_capacity(capacity.max_entries),
            data: Vec::with_capacity(capacity.buffer_size),
            capacity,
        }
    }

    /// Append a literal, returning its entry index or
    /// [`INVALID_LITERAL_INDEX`] when either limit is reached.
    pub fn add_data(&mut self, value: f64) -> u32 {
        if self.entries.len() >= self.capacity.max_entries {
            warn!(
                max_entries = self.capacity.max_entries,
                "literal buffer out of entries"
            );
            return INVALID_LITERAL_INDEX;
        }
        if self.data.len() + ENTRY_SIZE > self.capacity.buffer_size {
            warn!(
                buffer_size = self.capacity.buffer_size,
                "literal buffer out of memory"
            );
            return INVALID_LITERAL_INDEX;
        }

        let offset = self.data.len() as u32;
        self.data.extend_from_slice(&value.to_le_bytes());
        self.entries.push(Entry { offset });
        (self.entries.len() - 1) as u32
    }

    pub fn get_data(&self, index: u32) -> Option<f64> {
        let entry = self.entries.get(index as usize)?;
        let start = entry.offset as usize;
        let bytes = self.data.get(start..start + ENTRY_SIZE)?;
        let mut raw = [0u8; ENTRY_SIZE];
        raw.copy_from_slice(bytes);
        Some(f64::from_le_bytes(raw))
    }

    pub fn last_entry_index(&self) -> Option<u32> {
        self.entries.len().checked_sub(1).map(|index| index as u32)
    }

    /// Value of the literal appended most recently.
    pub fn last(&self) -> Option<f64> {
        self.last_entry_index()
            .and_then(|index| self.get_data(index))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
