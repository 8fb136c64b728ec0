//! Deletion of redundant copies, automatic or interactive.
//!
//! Only writable (non-read-only) members are ever candidates for
//! removal. In automatic mode the first writable member survives
//! exactly when the group has no read-only members; otherwise the
//! read-only copies are the survivors and every writable member is
//! removed. In interactive mode the user picks the survivors; the
//! prompt repeats until at least one file is preserved, and `quit`
//! aborts the whole phase.

use std::fs;
use std::io::{self, BufRead, Write};

use crate::config::Config;
use crate::duplicates::{FileRecord, FileStore};

/// Outcome of one prompt cycle.
enum Selection {
    /// Per-index preservation choices for the writable members
    Keep(Vec<bool>),
    /// Abort the entire deletion phase
    Quit,
}

/// Walk every group of the refined store and delete the members the
/// policy (or the user) does not preserve.
///
/// Prompts are read line by line from `input`; all reports, prompts and
/// per-file deletion records go to `out`. Removal failures are reported
/// and do not abort the phase.
///
/// # Errors
///
/// Returns an error only when reading `input` or writing `out` fails;
/// filesystem removal failures are policy-local.
pub fn delete_duplicates<R: BufRead, W: Write>(
    store: &FileStore,
    config: &Config,
    input: &mut R,
    out: &mut W,
) -> io::Result<()> {
    let total_sets = store.group_count();
    let mut current_set = 0usize;

    for group in store.groups_desc() {
        current_set += 1;

        let writable: Vec<&FileRecord> = group.iter().filter(|r| !r.read_only).collect();
        let read_only_count = group.len() - writable.len();
        if writable.is_empty() {
            continue;
        }

        let keep = if config.no_prompt {
            automatic_selection(writable.len(), read_only_count)
        } else {
            match prompt_selection(
                input,
                out,
                &writable,
                read_only_count,
                current_set,
                total_sets,
                group.size(),
                config.show_size,
            )? {
                Selection::Keep(keep) => keep,
                Selection::Quit => return Ok(()),
            }
        };

        writeln!(out)?;
        for (index, record) in writable.iter().enumerate() {
            if keep[index] {
                writeln!(out, "   [+] {}", record.path.display())?;
            } else {
                match fs::remove_file(&record.path) {
                    Ok(()) => writeln!(out, "   [-] {}", record.path.display())?,
                    Err(err) => {
                        log::warn!("failed to remove {}: {}", record.path.display(), err);
                        writeln!(out, "   [!] {} -- unable to delete file!", record.path.display())?;
                    }
                }
            }
        }
        writeln!(out)?;
    }

    Ok(())
}

/// Preserve the first writable member exactly when the group has no
/// read-only members; delete every other writable member.
fn automatic_selection(writable: usize, read_only: usize) -> Vec<bool> {
    let mut keep = vec![false; writable];
    keep[0] = read_only == 0;
    keep
}

/// Show the numbered writable members and read tokens until the user's
/// selection preserves at least one file.
///
/// Tokens are `1..k`, `all`, `none` and `quit`, split on spaces and
/// commas and applied left to right, so later tokens override earlier
/// ones. Each line stands alone. End of input counts as `quit`.
#[allow(clippy::too_many_arguments)]
fn prompt_selection<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    writable: &[&FileRecord],
    read_only_count: usize,
    current_set: usize,
    total_sets: usize,
    size: u64,
    show_size: bool,
) -> io::Result<Selection> {
    for (index, record) in writable.iter().enumerate() {
        writeln!(out, "[{}] {} (W)", index + 1, record.path.display())?;
    }
    writeln!(out, "    {} read only.", read_only_count)?;
    writeln!(out)?;

    loop {
        write!(
            out,
            "Set {} of {}, preserve files [1 - {}, all, none, quit]",
            current_set,
            total_sets,
            writable.len()
        )?;
        if show_size {
            write!(out, " ({} byte{} each)", size, if size == 1 { "" } else { "s" })?;
        }
        write!(out, ": ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Selection::Quit);
        }

        let mut keep = vec![false; writable.len()];
        for token in line
            .split([' ', ',', '\t', '\r', '\n'])
            .filter(|t| !t.is_empty())
        {
            if token.eq_ignore_ascii_case("quit") {
                return Ok(Selection::Quit);
            } else if token.eq_ignore_ascii_case("all") {
                keep.fill(true);
            } else if token.eq_ignore_ascii_case("none") {
                keep.fill(false);
            } else if let Ok(number) = token.parse::<usize>() {
                if (1..=keep.len()).contains(&number) {
                    keep[number - 1] = true;
                }
            }
        }

        if keep.iter().any(|&k| k) {
            return Ok(Selection::Keep(keep));
        }
        // Nothing preserved: ask again
    }
}
