//! Plain-text reporters for the refined store.
//!
//! Both reporters write to a caller-supplied sink and iterate the store
//! from the largest size down, so output order is deterministic for a
//! given scan order.

use std::io::{self, Write};

use bytesize::ByteSize;

use crate::config::Config;
use crate::duplicates::FileStore;

/// Print every duplicate group.
///
/// Each file is followed by a `(R)` or `(W)` marker for its read-only
/// status. Groups are separated by a blank line, or listed one per line
/// with `-1`. With `-S` each group is preceded by its member size, and
/// with `-f` the first file of each group is omitted.
pub fn print_matches<W: Write>(store: &FileStore, config: &Config, out: &mut W) -> io::Result<()> {
    for (size, groups) in store.buckets_desc() {
        for group in groups {
            if config.show_size {
                writeln!(out, "{} byte{} each:", size, plural(size))?;
            }
            let skip = usize::from(config.omit_first);
            for record in group.iter().skip(skip) {
                let marker = if record.read_only { 'R' } else { 'W' };
                if config.same_line {
                    write!(out, "{} ({}) ", record.path.display(), marker)?;
                } else {
                    writeln!(out, "{} ({})", record.path.display(), marker)?;
                }
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Print a one-line summary of the refined store.
pub fn summarize<W: Write>(store: &FileStore, out: &mut W) -> io::Result<()> {
    let sets = store.group_count();
    if sets == 0 {
        writeln!(out, "No duplicates found.")?;
        return Ok(());
    }

    let files = store.file_count();
    let bytes: u64 = store
        .buckets_desc()
        .map(|(size, groups)| {
            size * groups.iter().map(|g| g.len() as u64).sum::<u64>()
        })
        .sum();

    writeln!(
        out,
        "{} duplicate file(s) in {} set(s), occupying {}.",
        files,
        sets,
        ByteSize::b(bytes)
    )
}

fn plural(n: u64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
