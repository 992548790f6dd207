//! Byte stores backing the stream views.

use crate::error::Result;
use std::path::Path;

/// Contiguous run of a store's bytes, tagged by availability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// Loaded bytes.
    Resident(Vec<u8>),
    /// Bytes that do not exist: a hole, before the start or past the end.
    Absent(usize),
    /// Bytes that exist but have not arrived yet.
    Pending(usize),
}

impl Block {
    /// Number of bytes covered.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Resident(bytes) => bytes.len(),
            Self::Absent(len) | Self::Pending(len) => *len,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Demand-loaded byte source polled by the views.
///
/// Implementations must answer without blocking; data that is not there yet
/// is reported as [`Block::Pending`] and announced later through
/// [`reset_updated`](Self::reset_updated).
pub trait ByteStore {
    /// Blocks covering exactly `count` bytes starting at `offset`.
    fn get(&self, offset: i64, count: usize) -> Vec<Block>;

    /// Total size in bytes.
    fn size(&self) -> u64;

    /// True if data arrived since the last call; clears the flag.
    fn reset_updated(&mut self) -> bool;
}

/// Prefix of the synthetic `mem://` content, followed by every byte value.
const DEMO_PREFIX: &[u8] = b"All your bytes are belong to Us:";

/// In-memory store with a per-byte residency map.
///
/// Bytes start out pending and become resident through
/// [`load`](Self::load). With a trickle rate set, every poll also lands the
/// next few pending bytes, the way a background reader would.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    data: Vec<u8>,
    resident: Vec<bool>,
    updated: bool,
    trickle: usize,
}

impl MemoryStore {
    /// Store over `data`, nothing resident yet.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        let resident = vec![false; data.len()];
        Self {
            data,
            resident,
            updated: false,
            trickle: 0,
        }
    }

    /// Synthetic demo content.
    #[must_use]
    pub fn demo() -> Self {
        let mut data = DEMO_PREFIX.to_vec();
        data.extend(0..=u8::MAX);
        Self::new(data)
    }

    /// Open `mem://…` (the demo content), `file://path` or a plain path.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let (scheme, rest) = uri.split_once("://").unwrap_or(("file", uri));
        match scheme {
            "mem" => Ok(Self::demo()),
            _ => Self::from_path(rest),
        }
    }

    /// Read a whole file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(std::fs::read(path)?))
    }

    /// Land `bytes` pending bytes on every poll.
    #[must_use]
    pub fn with_trickle(mut self, bytes: usize) -> Self {
        self.trickle = bytes;
        self
    }

    /// Mark `[offset, offset + len)` resident and flag an update if anything
    /// changed.
    pub fn load(&mut self, offset: u64, len: u64) {
        let size = self.data.len() as u64;
        let start = offset.min(size) as usize;
        let end = offset.saturating_add(len).min(size) as usize;
        for flag in &mut self.resident[start..end] {
            if !*flag {
                *flag = true;
                self.updated = true;
            }
        }
    }

    /// True if every byte is resident.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.resident.iter().all(|&r| r)
    }

    fn trickle_in(&mut self) {
        if self.trickle == 0 {
            return;
        }
        if let Some(first) = self.resident.iter().position(|&r| !r) {
            self.load(first as u64, self.trickle as u64);
        }
    }
}

impl ByteStore for MemoryStore {
    fn get(&self, offset: i64, count: usize) -> Vec<Block> {
        let mut blocks: Vec<Block> = Vec::new();
        for step in 0..count {
            let pos = offset.saturating_add(step as i64);
            let byte = usize::try_from(pos)
                .ok()
                .filter(|&p| p < self.data.len())
                .map(|p| (self.data[p], self.resident[p]));

            match (blocks.last_mut(), byte) {
                (Some(Block::Resident(bytes)), Some((b, true))) => bytes.push(b),
                (Some(Block::Pending(n)), Some((_, false))) | (Some(Block::Absent(n)), None) => {
                    *n += 1;
                }
                (_, Some((b, true))) => blocks.push(Block::Resident(vec![b])),
                (_, Some((_, false))) => blocks.push(Block::Pending(1)),
                (_, None) => blocks.push(Block::Absent(1)),
            }
        }
        blocks
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn reset_updated(&mut self) -> bool {
        self.trickle_in();
        std::mem::take(&mut self.updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_demo_content() {
        let store = MemoryStore::demo();
        assert_eq!(store.size(), 288);
        assert_eq!(store.get(0, 4), vec![Block::Pending(4)]);
    }

    #[test]
    fn test_blocks_cover_span() {
        let mut store = MemoryStore::new(b"abcdef".to_vec());
        store.load(2, 2);
        let blocks = store.get(-1, 9);
        assert_eq!(
            blocks,
            vec![
                Block::Absent(1),
                Block::Pending(2),
                Block::Resident(b"cd".to_vec()),
                Block::Pending(2),
                Block::Absent(2),
            ]
        );
        assert_eq!(blocks.iter().map(Block::len).sum::<usize>(), 9);
    }

    #[test]
    fn test_reset_updated_clears_flag() {
        let mut store = MemoryStore::new(vec![0; 8]);
        assert!(!store.reset_updated());
        store.load(0, 4);
        assert!(store.reset_updated());
        assert!(!store.reset_updated());
        // Reloading resident bytes is not news
        store.load(0, 4);
        assert!(!store.reset_updated());
    }

    #[test]
    fn test_load_past_end_is_clamped() {
        let mut store = MemoryStore::new(vec![1, 2, 3]);
        store.load(2, 100);
        store.load(50, 1);
        assert_eq!(store.get(0, 3)[1], Block::Resident(vec![3]));
    }

    #[test]
    fn test_trickle_lands_bytes_per_poll() {
        let mut store = MemoryStore::new(vec![7; 5]).with_trickle(2);
        assert!(store.reset_updated());
        assert!(store.reset_updated());
        assert!(store.reset_updated());
        assert!(store.is_complete());
        assert!(!store.reset_updated());
    }

    #[test]
    fn test_from_uri() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"xyz").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        assert_eq!(MemoryStore::from_uri(&path).unwrap().size(), 3);
        assert_eq!(
            MemoryStore::from_uri(&format!("file://{path}"))
                .unwrap()
                .size(),
            3
        );
        assert_eq!(MemoryStore::from_uri("mem://0").unwrap().size(), 288);
        assert!(MemoryStore::from_uri("/definitely/not/here").is_err());
    }
}
