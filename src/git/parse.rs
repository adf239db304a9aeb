//! Porcelain output parsing
//!
//! `git worktree list --porcelain` emits one block per worktree:
//!
//! ```text
//! worktree /path/to/main
//! HEAD 91aeb2c…
//! branch refs/heads/main
//! ```
//!
//! The parser is a pure text-to-data transform and never fails: unknown
//! attribute lines are ignored for forward compatibility, and callers that
//! saw the listing command itself fail must not hand its diagnostic output
//! here in the first place.

use super::Worktree;

/// Parse porcelain worktree output into records, preserving input order.
///
/// A `worktree <path>` line finalizes any record in progress and starts the
/// next one; attribute lines populate the current record. A trailing record
/// without a following `worktree` line is still emitted. Empty input yields
/// an empty vec — a record is only emitted once it has a path.
pub fn parse_porcelain_list(output: &str) -> Vec<Worktree> {
    let mut worktrees = Vec::new();
    let mut current: Option<Worktree> = None;

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (key, value) = match line.split_once(' ') {
            Some((k, v)) => (k, Some(v)),
            None => (line, None),
        };

        match (key, value) {
            ("worktree", Some(path)) => {
                if let Some(wt) = current.take() {
                    worktrees.push(wt);
                }
                current = Some(Worktree::new(path));
            }
            ("HEAD", Some(hash)) => {
                if let Some(wt) = current.as_mut() {
                    wt.head = Some(hash.to_string());
                }
            }
            ("branch", Some(reference)) => {
                if let Some(wt) = current.as_mut() {
                    wt.branch = Some(reference.to_string());
                }
            }
            ("detached", None) => {
                if let Some(wt) = current.as_mut() {
                    wt.detached = true;
                }
            }
            ("bare", None) => {
                if let Some(wt) = current.as_mut() {
                    wt.bare = true;
                }
            }
            // Unknown attributes (locked, prunable, future fields) and
            // attributes before the first worktree line are ignored.
            _ => {}
        }
    }

    if let Some(wt) = current {
        worktrees.push(wt);
    }

    worktrees
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn empty_input_yields_no_records() {
        assert!(parse_porcelain_list("").is_empty());
        assert!(parse_porcelain_list("\n\n").is_empty());
    }

    #[test]
    fn parses_attached_and_detached_records_in_order() {
        let output = "worktree /a\nHEAD h1\nbranch refs/heads/main\n\nworktree /b\ndetached\n";
        let worktrees = parse_porcelain_list(output);

        assert_eq!(worktrees.len(), 2);
        assert_eq!(worktrees[0].path, PathBuf::from("/a"));
        assert_eq!(worktrees[0].head.as_deref(), Some("h1"));
        assert_eq!(worktrees[0].branch.as_deref(), Some("refs/heads/main"));
        assert!(!worktrees[0].detached);

        assert_eq!(worktrees[1].path, PathBuf::from("/b"));
        assert!(worktrees[1].detached);
        assert!(worktrees[1].branch.is_none());
    }

    #[test]
    fn trailing_record_without_blank_line_is_emitted() {
        let output = "worktree /only\nHEAD abc";
        let worktrees = parse_porcelain_list(output);
        assert_eq!(worktrees.len(), 1);
        assert_eq!(worktrees[0].head.as_deref(), Some("abc"));
    }

    #[test]
    fn bare_token_sets_flag() {
        let output = "worktree /store\nbare\n\nworktree /main\nHEAD h\nbranch refs/heads/main\n";
        let worktrees = parse_porcelain_list(output);
        assert_eq!(worktrees.len(), 2);
        assert!(worktrees[0].bare);
        assert!(!worktrees[1].bare);
    }

    #[test]
    fn unknown_lines_are_ignored() {
        let output = "worktree /a\nHEAD h1\nlocked reason\nprunable gone\nfuture-field x\n";
        let worktrees = parse_porcelain_list(output);
        assert_eq!(worktrees.len(), 1);
        assert_eq!(worktrees[0].path, PathBuf::from("/a"));
    }

    #[test]
    fn record_count_matches_worktree_lines() {
        let output = "worktree /1\n\nworktree /2\n\nworktree /3\nHEAD x\n";
        assert_eq!(parse_porcelain_list(output).len(), 3);
    }

    #[test]
    fn surrounding_whitespace_is_stripped() {
        let output = "  worktree /a  \n  HEAD h1\n";
        let worktrees = parse_porcelain_list(output);
        assert_eq!(worktrees.len(), 1);
        assert_eq!(worktrees[0].head.as_deref(), Some("h1"));
    }
}
