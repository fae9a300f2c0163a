//! Revision numbering and character-level diff accounting.
//!
//! Every content item (wiki page, main post, reply) keeps an append-only log
//! of revisions numbered 1, 2, 3, ... per item. Wiki revisions additionally
//! carry `added_chars` / `deleted_chars` derived from a diff against the
//! preceding revision.

use serde::Serialize;

/// Number assigned to the first revision of any item.
pub const FIRST_REVISION: i32 = 1;

/// Next revision number given the latest existing one (`None` if the item has
/// no revisions yet).
pub fn next_revision_number(latest: Option<i32>) -> i32 {
    latest.map_or(FIRST_REVISION, |n| n + 1)
}

/// Number of the revision preceding `revision_number`, or `None` for the first.
pub fn previous_revision_number(revision_number: i32) -> Option<i32> {
    (revision_number > FIRST_REVISION).then(|| revision_number - 1)
}

// ---------------------------------------------------------------------------
// Diff fragments
// ---------------------------------------------------------------------------

/// Classification of a diff fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffOp {
    Insert,
    Delete,
    Equal,
}

impl DiffOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Equal => "equal",
        }
    }
}

impl std::fmt::Display for DiffOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run of characters sharing one [`DiffOp`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffFragment {
    pub op: DiffOp,
    pub text: String,
}

impl DiffFragment {
    /// Length in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Compute a minimal character-level diff turning `old` into `new`.
///
/// Common prefix and suffix are stripped first; the remainder is split with
/// Myers' middle-snake bisection, so memory stays linear in the input size.
/// Adjacent fragments of the same kind are merged.
pub fn diff_chars(old: &str, new: &str) -> Vec<DiffFragment> {
    let a: Vec<char> = old.chars().collect();
    let b: Vec<char> = new.chars().collect();
    let mut out = Vec::new();
    diff_main(&a, &b, &mut out);
    merge_fragments(out)
}

fn push(out: &mut Vec<DiffFragment>, op: DiffOp, chars: &[char]) {
    if !chars.is_empty() {
        out.push(DiffFragment {
            op,
            text: chars.iter().collect(),
        });
    }
}

fn diff_main(a: &[char], b: &[char], out: &mut Vec<DiffFragment>) {
    if a == b {
        push(out, DiffOp::Equal, a);
        return;
    }

    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let (a_rest, b_rest) = (&a[prefix..], &b[prefix..]);
    let suffix = a_rest
        .iter()
        .rev()
        .zip(b_rest.iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let a_mid = &a_rest[..a_rest.len() - suffix];
    let b_mid = &b_rest[..b_rest.len() - suffix];

    push(out, DiffOp::Equal, &a[..prefix]);
    diff_compute(a_mid, b_mid, out);
    push(out, DiffOp::Equal, &a_rest[a_rest.len() - suffix..]);
}

/// Diff two inputs that share no common prefix or suffix.
fn diff_compute(a: &[char], b: &[char], out: &mut Vec<DiffFragment>) {
    if a.is_empty() {
        push(out, DiffOp::Insert, b);
        return;
    }
    if b.is_empty() {
        push(out, DiffOp::Delete, a);
        return;
    }

    let (long, short, long_op) = if a.len() > b.len() {
        (a, b, DiffOp::Delete)
    } else {
        (b, a, DiffOp::Insert)
    };
    if let Some(pos) = find_subslice(long, short) {
        push(out, long_op, &long[..pos]);
        push(out, DiffOp::Equal, short);
        push(out, long_op, &long[pos + short.len()..]);
        return;
    }
    if short.len() == 1 {
        // Not contained in the other side, so nothing is shared.
        push(out, DiffOp::Delete, a);
        push(out, DiffOp::Insert, b);
        return;
    }

    bisect(a, b, out);
}

fn find_subslice(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Find the middle snake of the edit graph and recurse on both halves.
fn bisect(a: &[char], b: &[char], out: &mut Vec<DiffFragment>) {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max_d = (n + m + 1) / 2;
    let v_offset = max_d;
    let v_length = 2 * max_d;
    let mut v1 = vec![-1isize; v_length as usize];
    let mut v2 = vec![-1isize; v_length as usize];
    v1[(v_offset + 1) as usize] = 0;
    v2[(v_offset + 1) as usize] = 0;
    let delta = n - m;
    // With an odd delta the forward path detects the overlap, otherwise the reverse.
    let front = delta % 2 != 0;
    let (mut k1start, mut k1end, mut k2start, mut k2end) = (0isize, 0isize, 0isize, 0isize);

    for d in 0..max_d {
        let mut k1 = -d + k1start;
        while k1 <= d - k1end {
            let k1_offset = (v_offset + k1) as usize;
            let mut x1 = if k1 == -d || (k1 != d && v1[k1_offset - 1] < v1[k1_offset + 1]) {
                v1[k1_offset + 1]
            } else {
                v1[k1_offset - 1] + 1
            };
            let mut y1 = x1 - k1;
            while x1 < n && y1 < m && a[x1 as usize] == b[y1 as usize] {
                x1 += 1;
                y1 += 1;
            }
            v1[k1_offset] = x1;
            if x1 > n {
                k1end += 2;
            } else if y1 > m {
                k1start += 2;
            } else if front {
                let k2_offset = v_offset + delta - k1;
                if k2_offset >= 0 && k2_offset < v_length && v2[k2_offset as usize] != -1 {
                    let x2 = n - v2[k2_offset as usize];
                    if x1 >= x2 {
                        split(a, b, x1 as usize, y1 as usize, out);
                        return;
                    }
                }
            }
            k1 += 2;
        }

        let mut k2 = -d + k2start;
        while k2 <= d - k2end {
            let k2_offset = (v_offset + k2) as usize;
            let mut x2 = if k2 == -d || (k2 != d && v2[k2_offset - 1] < v2[k2_offset + 1]) {
                v2[k2_offset + 1]
            } else {
                v2[k2_offset - 1] + 1
            };
            let mut y2 = x2 - k2;
            while x2 < n && y2 < m && a[(n - x2 - 1) as usize] == b[(m - y2 - 1) as usize] {
                x2 += 1;
                y2 += 1;
            }
            v2[k2_offset] = x2;
            if x2 > n {
                k2end += 2;
            } else if y2 > m {
                k2start += 2;
            } else if !front {
                let k1_offset = v_offset + delta - k2;
                if k1_offset >= 0 && k1_offset < v_length && v1[k1_offset as usize] != -1 {
                    let x1 = v1[k1_offset as usize];
                    let y1 = v_offset + x1 - k1_offset;
                    if x1 >= n - x2 {
                        split(a, b, x1 as usize, y1 as usize, out);
                        return;
                    }
                }
            }
            k2 += 2;
        }
    }

    push(out, DiffOp::Delete, a);
    push(out, DiffOp::Insert, b);
}

fn split(a: &[char], b: &[char], x: usize, y: usize, out: &mut Vec<DiffFragment>) {
    diff_main(&a[..x], &b[..y], out);
    diff_main(&a[x..], &b[y..], out);
}

fn merge_fragments(fragments: Vec<DiffFragment>) -> Vec<DiffFragment> {
    let mut merged: Vec<DiffFragment> = Vec::with_capacity(fragments.len());
    for frag in fragments {
        match merged.last_mut() {
            Some(last) if last.op == frag.op => last.text.push_str(&frag.text),
            _ => merged.push(frag),
        }
    }
    merged
}

// ---------------------------------------------------------------------------
// Character accounting
// ---------------------------------------------------------------------------

/// Derived size metrics stored on every wiki revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharStats {
    pub total_chars: i32,
    pub added_chars: i32,
    pub deleted_chars: i32,
}

impl CharStats {
    /// Metrics for `current` relative to `previous` (`""` for a first revision).
    pub fn between(previous: &str, current: &str) -> Self {
        Self::from_fragments(&diff_chars(previous, current), current)
    }

    /// Sum fragment lengths by classification.
    pub fn from_fragments(fragments: &[DiffFragment], current: &str) -> Self {
        let mut added = 0usize;
        let mut deleted = 0usize;
        for frag in fragments {
            match frag.op {
                DiffOp::Insert => added += frag.char_len(),
                DiffOp::Delete => deleted += frag.char_len(),
                DiffOp::Equal => {}
            }
        }
        Self {
            total_chars: to_i32(current.chars().count()),
            added_chars: to_i32(added),
            deleted_chars: to_i32(deleted),
        }
    }
}

fn to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
