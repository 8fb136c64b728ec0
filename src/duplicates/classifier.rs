//! The refinement engine: splits each size bucket into classes of
//! byte-identical files.
//!
//! Each bucket is processed as a queue of groups. The head group
//! anchors a pass: every remaining group whose representative matches
//! the anchor's representative is absorbed, the rest carry over to the
//! next pass. A class is kept only if it ends with at least two
//! members, so unique files silently drop out of the store.
//!
//! The match oracle is ordered by I/O cost: empty files match without
//! any read, then a 1 KiB partial checksum, then a full checksum, and
//! finally a byte-by-byte comparison; checksum equality alone is never
//! trusted. Any I/O failure makes the pair non-matching, so a read
//! error can only ever hide a duplicate, never invent one.

use std::collections::VecDeque;

use super::checksum::byte_match;
use super::store::{FileStore, Group};
use crate::progress::Progress;

/// Refine every bucket of `store` into content-equivalence classes of
/// two or more files, discarding everything else.
pub fn classify(store: &mut FileStore, progress: &Progress) {
    let total = store.file_count() as u64;
    let bar = progress.classify_bar(total);
    let mut settled: u64 = 0;

    for size in store.sizes_desc() {
        let groups = store.take_bucket(size);
        if groups.len() <= 1 {
            // A lone candidate at this size cannot have a duplicate
            settled += groups.iter().map(Group::len).sum::<usize>() as u64;
            bar.set_position(settled);
            continue;
        }

        bar.set_message(format!("size {size}"));
        log::debug!("refining {} group(s) of size {}", groups.len(), size);

        let mut kept: Vec<Group> = Vec::new();
        let mut queue: VecDeque<Group> = groups.into();
        while let Some(mut class) = queue.pop_front() {
            let mut carried = VecDeque::with_capacity(queue.len());
            while let Some(mut other) = queue.pop_front() {
                if groups_match(&mut class, &mut other) {
                    class.absorb(other);
                } else {
                    carried.push_back(other);
                }
            }
            settled += class.len() as u64;
            bar.set_position(settled);
            if class.len() >= 2 {
                kept.push(class);
            }
            queue = carried;
        }

        store.replace_bucket(size, kept);
    }

    bar.finish_and_clear();
}

/// Whether the representatives of two same-size groups have identical
/// content.
fn groups_match(a: &mut Group, b: &mut Group) -> bool {
    debug_assert_eq!(a.size(), b.size());
    let size = a.size();
    if size == 0 {
        // All empty files are content-equal; don't open them
        return true;
    }

    let (crc_a, crc_b) = (a.head_mut().partial_crc(), b.head_mut().partial_crc());
    let (Some(crc_a), Some(crc_b)) = (crc_a, crc_b) else {
        return false;
    };
    if crc_a != crc_b {
        return false;
    }

    let (crc_a, crc_b) = (a.head_mut().full_crc(), b.head_mut().full_crc());
    let (Some(crc_a), Some(crc_b)) = (crc_a, crc_b) else {
        return false;
    };
    if crc_a != crc_b {
        return false;
    }

    byte_match(&a.head().path, &b.head().path, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::store::FileRecord;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        File::create(&path).unwrap().write_all(content).unwrap();
        path
    }

    fn store_of(records: Vec<FileRecord>) -> FileStore {
        let mut store = FileStore::new();
        for record in records {
            store.add(record);
        }
        store
    }

    fn classify_quiet(store: &mut FileStore) {
        classify(store, &Progress::new(true));
    }

    fn group_paths(store: &FileStore) -> Vec<Vec<PathBuf>> {
        store
            .groups_desc()
            .map(|g| g.iter().map(|r| r.path.clone()).collect())
            .collect()
    }

    #[test]
    fn test_identical_pair_grouped() {
        let dir = tempdir().unwrap();
        let a = write_file(&dir, "a", b"same bytes");
        let b = write_file(&dir, "b", b"same bytes");

        let mut store = store_of(vec![
            FileRecord::new(a.clone(), 10, false),
            FileRecord::new(b.clone(), 10, false),
        ]);
        classify_quiet(&mut store);

        assert_eq!(store.group_count(), 1);
        let groups = group_paths(&store);
        assert_eq!(groups[0].len(), 2);
        assert!(groups[0].contains(&a) && groups[0].contains(&b));
    }

    #[test]
    fn test_same_size_different_content_not_grouped() {
        let dir = tempdir().unwrap();
        let a = write_file(&dir, "a", b"aaaaaaaaaa");
        let b = write_file(&dir, "b", b"bbbbbbbbbb");

        let mut store = store_of(vec![
            FileRecord::new(a, 10, false),
            FileRecord::new(b, 10, false),
        ]);
        classify_quiet(&mut store);

        assert!(store.is_empty());
    }

    #[test]
    fn test_singleton_buckets_pruned() {
        let dir = tempdir().unwrap();
        let a = write_file(&dir, "a", b"only one this size");

        let mut store = store_of(vec![FileRecord::new(a, 18, false)]);
        classify_quiet(&mut store);

        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_files_match_without_reads() {
        // Non-existent paths: size 0 must short-circuit before any open
        let mut store = store_of(vec![
            FileRecord::new(PathBuf::from("/no/such/e1"), 0, false),
            FileRecord::new(PathBuf::from("/no/such/e2"), 0, false),
        ]);
        classify_quiet(&mut store);

        assert_eq!(store.group_count(), 1);
        assert_eq!(store.file_count(), 2);
    }

    #[test]
    fn test_partial_match_full_mismatch_rejected() {
        let dir = tempdir().unwrap();
        let mut content = vec![0x42u8; 2048];
        let x = write_file(&dir, "x", &content);
        let y = write_file(&dir, "y", &content);
        content[1500] ^= 0xFF;
        let z = write_file(&dir, "z", &content);

        let mut store = store_of(vec![
            FileRecord::new(x.clone(), 2048, false),
            FileRecord::new(y.clone(), 2048, false),
            FileRecord::new(z.clone(), 2048, false),
        ]);
        classify_quiet(&mut store);

        let groups = group_paths(&store);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
        assert!(groups[0].contains(&x) && groups[0].contains(&y));
        assert!(!groups[0].contains(&z));
    }

    #[test]
    fn test_unreadable_file_becomes_pruned_singleton() {
        let dir = tempdir().unwrap();
        let a = write_file(&dir, "a", b"real data!");
        let b = write_file(&dir, "b", b"real data!");

        let mut store = store_of(vec![
            FileRecord::new(a, 10, false),
            FileRecord::new(b, 10, false),
            FileRecord::new(dir.path().join("vanished"), 10, false),
        ]);
        classify_quiet(&mut store);

        // The unreadable record never matches and drops out
        assert_eq!(store.group_count(), 1);
        assert_eq!(store.file_count(), 2);
    }

    #[test]
    fn test_three_way_partition() {
        let dir = tempdir().unwrap();
        let a1 = write_file(&dir, "a1", b"content A.");
        let a2 = write_file(&dir, "a2", b"content A.");
        let b1 = write_file(&dir, "b1", b"content B.");
        let b2 = write_file(&dir, "b2", b"content B.");
        let c = write_file(&dir, "c", b"content C.");

        let mut store = store_of(
            [&a1, &a2, &b1, &b2, &c]
                .iter()
                .map(|p| FileRecord::new((*p).clone(), 10, false))
                .collect(),
        );
        classify_quiet(&mut store);

        let groups = group_paths(&store);
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|g| g.len() == 2));
        assert!(!groups.iter().flatten().any(|p| *p == c));
    }

    #[test]
    fn test_merge_order_prepends_matches() {
        let dir = tempdir().unwrap();
        let a = write_file(&dir, "a", b"same again");
        let b = write_file(&dir, "b", b"same again");
        let c = write_file(&dir, "c", b"same again");

        let mut store = store_of(vec![
            FileRecord::new(a.clone(), 10, false),
            FileRecord::new(b.clone(), 10, false),
            FileRecord::new(c.clone(), 10, false),
        ]);
        classify_quiet(&mut store);

        // The anchor ends up last: each match is inserted at the head
        let groups = group_paths(&store);
        assert_eq!(groups, vec![vec![c, b, a]]);
    }
}
