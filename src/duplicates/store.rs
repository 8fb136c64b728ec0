//! The in-memory candidate store: file records, duplicate groups and the
//! size-indexed bucket map.
//!
//! Records enter the store as singleton groups keyed by size. The
//! classifier later replaces each bucket's contents with refined
//! equivalence classes; the reporter and deleter then consume the
//! buckets in descending size order.

use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;
use std::time::SystemTime;

use super::checksum::{self, PARTIAL_SIZE};

/// Lazily computed CRC-32 fingerprint state.
///
/// A zero checksum is a legal value, so "not yet computed" and "failed"
/// are distinct states rather than sentinels. A failed computation is
/// cached like a successful one: fingerprints are attempted at most once
/// per record per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Fingerprint {
    #[default]
    Pending,
    Failed,
    Ready(u32),
}

impl Fingerprint {
    fn value(self) -> Option<u32> {
        match self {
            Fingerprint::Ready(crc) => Some(crc),
            _ => None,
        }
    }
}

/// One candidate file discovered by the scanner.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Path as built during the scan
    pub path: PathBuf,
    /// Size in bytes from the follow-symlinks stat
    pub size: u64,
    /// Device id of the physical identity pair
    pub device: u64,
    /// Inode of the physical identity pair
    pub inode: u64,
    /// Last modification time; stored, not consulted by the core
    pub modified: Option<SystemTime>,
    /// Whether deletion policy must never select this file
    pub read_only: bool,
    crc_partial: Fingerprint,
    crc_full: Fingerprint,
}

impl FileRecord {
    /// Create a record with no physical identity; the scanner fills in
    /// device, inode and mtime from the stat results.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, read_only: bool) -> Self {
        Self {
            path,
            size,
            device: 0,
            inode: 0,
            modified: None,
            read_only,
            crc_partial: Fingerprint::default(),
            crc_full: Fingerprint::default(),
        }
    }

    /// Checksum of the first `min(size, 1024)` bytes, computed on first
    /// use. For files of at most 1024 bytes the full fingerprint is
    /// filled in at the same time, since the two are identical by
    /// definition. Returns `None` if the computation failed.
    pub fn partial_crc(&mut self) -> Option<u32> {
        if self.crc_partial == Fingerprint::Pending {
            match checksum::partial_checksum(&self.path, self.size) {
                Ok(crc) => {
                    self.crc_partial = Fingerprint::Ready(crc);
                    if self.size <= PARTIAL_SIZE {
                        self.crc_full = Fingerprint::Ready(crc);
                    }
                }
                Err(err) => {
                    log::warn!("failed to checksum {}: {}", self.path.display(), err);
                    self.crc_partial = Fingerprint::Failed;
                }
            }
        }
        self.crc_partial.value()
    }

    /// Checksum of the entire content, computed on first use. Returns
    /// `None` if the computation failed.
    pub fn full_crc(&mut self) -> Option<u32> {
        if self.crc_full == Fingerprint::Pending {
            match checksum::full_checksum(&self.path, self.size) {
                Ok(crc) => self.crc_full = Fingerprint::Ready(crc),
                Err(err) => {
                    log::warn!("failed to checksum {}: {}", self.path.display(), err);
                    self.crc_full = Fingerprint::Failed;
                }
            }
        }
        self.crc_full.value()
    }
}

/// A non-empty ordered set of records sharing one size; after
/// classification, also sharing identical content.
///
/// The head record is the representative used for all comparisons
/// within a classifier pass. Merging prepends, so head access and bulk
/// head-insertion are both O(1) amortized.
#[derive(Debug, Clone)]
pub struct Group {
    files: VecDeque<FileRecord>,
}

impl Group {
    /// Create a group holding a single record.
    #[must_use]
    pub fn singleton(record: FileRecord) -> Self {
        let mut files = VecDeque::with_capacity(1);
        files.push_back(record);
        Self { files }
    }

    /// The shared size of every member.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.files[0].size
    }

    /// The representative record.
    #[must_use]
    pub fn head(&self) -> &FileRecord {
        &self.files[0]
    }

    /// Mutable access to the representative, for fingerprint caching.
    pub fn head_mut(&mut self) -> &mut FileRecord {
        &mut self.files[0]
    }

    /// Number of member records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Groups are never empty; provided for completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate members in group order.
    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.iter()
    }

    /// Merge `other` into this group by prepending its members at the
    /// head, preserving their relative order.
    pub fn absorb(&mut self, other: Group) {
        for record in other.files.into_iter().rev() {
            self.files.push_front(record);
        }
    }
}

/// Size-indexed map of groups. Iteration for reporting is from the
/// largest size down.
#[derive(Debug, Default)]
pub struct FileStore {
    buckets: BTreeMap<u64, Vec<Group>>,
}

impl FileStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` as a new singleton group under its size.
    pub fn add(&mut self, record: FileRecord) {
        self.buckets
            .entry(record.size)
            .or_default()
            .push(Group::singleton(record));
    }

    /// Total number of records across all groups.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.buckets
            .values()
            .flat_map(|groups| groups.iter())
            .map(Group::len)
            .sum()
    }

    /// Total number of groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// Whether the store holds no groups at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Every distinct size present, largest first.
    #[must_use]
    pub fn sizes_desc(&self) -> Vec<u64> {
        self.buckets.keys().rev().copied().collect()
    }

    /// Take ownership of the groups under `size`, leaving the bucket
    /// empty. The classifier commits its refined partition back via
    /// [`FileStore::replace_bucket`].
    pub fn take_bucket(&mut self, size: u64) -> Vec<Group> {
        self.buckets.remove(&size).unwrap_or_default()
    }

    /// Replace the groups under `size`. An empty partition removes the
    /// bucket entirely. No stability is guaranteed across a
    /// replacement.
    pub fn replace_bucket(&mut self, size: u64, groups: Vec<Group>) {
        if groups.is_empty() {
            self.buckets.remove(&size);
        } else {
            self.buckets.insert(size, groups);
        }
    }

    /// Iterate buckets from the largest size down.
    pub fn buckets_desc(&self) -> impl Iterator<Item = (u64, &[Group])> {
        self.buckets
            .iter()
            .rev()
            .map(|(size, groups)| (*size, groups.as_slice()))
    }

    /// Iterate all groups, largest size first, in bucket order.
    pub fn groups_desc(&self) -> impl Iterator<Item = &Group> {
        self.buckets.iter().rev().flat_map(|(_, groups)| groups.iter())
    }
}
