// Copyright 2026 The gitlit Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Myers shortest-edit-script diff plus hunk grouping with bounded context.
//!
//! Grounded on `app/diff/myers.go`'s `shortestEdit`/`backtrack`/`diff` and
//! `app/diff/diff.go`'s `hunkFilter`/`HunkBuild`. Two bugs present in that
//! source are fixed here rather than preserved:
//! - The hunk-builder's insert/delete branch only reset the trailing-context
//!   counter on `Delete` (a Go `switch` with an empty `case Insert:` falls
//!   through to nothing, not to the next case); both now reset it.
//! - The frontier vector indexing logic there falls apart when `k` is
//!   translated without a stable offset; this renders it as a `Vec`
//!   recentered at index `max`, indexed by `(max as isize + k) as usize`,
//!   instead of an ad hoc wraparound.

pub const CONTEXT: usize = 3;

/// One line of a diffed file: its 1-based position in its own source, and
/// its text with embedded NULs stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub text: String,
}

impl Line {
    pub fn new(number: usize, text: &str) -> Self {
        Self {
            number,
            text: text.chars().filter(|&c| c != '\0').collect(),
        }
    }
}

/// Splits byte content into 1-based [`Line`]s, NUL-stripped, preserving a
/// trailing line with no newline terminator.
pub fn lines_of(content: &[u8]) -> Vec<Line> {
    let text = String::from_utf8_lossy(content);
    let mut result: Vec<Line> = text
        .split('\n')
        .enumerate()
        .map(|(i, line)| Line::new(i + 1, line))
        .collect();
    // `split('\n')` yields a trailing empty string for content ending in a
    // newline; that's not a real line.
    if content.last() == Some(&b'\n') {
        result.pop();
    }
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Equal,
    Insert,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub kind: EditKind,
    pub a_line: Option<Line>,
    pub b_line: Option<Line>,
}

impl Edit {
    fn symbol(&self) -> char {
        match self.kind {
            EditKind::Equal => ' ',
            EditKind::Insert => '+',
            EditKind::Delete => '-',
        }
    }

    /// Renders `"<symbol><text>"` for the side the edit carries. Color is
    /// the formatter's job, not this one's.
    pub fn render(&self) -> String {
        let text = match self.kind {
            EditKind::Delete => self.a_line.as_ref(),
            _ => self.b_line.as_ref().or(self.a_line.as_ref()),
        }
        .map(|line| line.text.as_str())
        .unwrap_or_default();
        format!("{}{text}", self.symbol())
    }
}

/// Recentered frontier vector: `v[k]` for `k` in `-max..=max`, indexed by
/// `max as isize + k`.
struct Frontier {
    max: isize,
    values: Vec<isize>,
}

impl Frontier {
    fn new(max: usize) -> Self {
        Self {
            max: max as isize,
            values: vec![0; 2 * max + 1],
        }
    }

    fn get(&self, k: isize) -> isize {
        self.values[(self.max + k) as usize]
    }

    fn set(&mut self, k: isize, value: isize) {
        self.values[(self.max + k) as usize] = value;
    }
}

/// `shortestEdit`: the classic O((n+m)*D) edit-graph search. Returns the
/// frontier vector's snapshot at each `d` step.
fn shortest_edit(a: &[Line], b: &[Line]) -> Vec<Frontier> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max = (n + m) as usize;

    let mut v = Frontier::new(max);
    let mut trace = Vec::new();

    for d in 0..=max as isize {
        trace.push(Frontier {
            max: v.max,
            values: v.values.clone(),
        });
        let mut k = -d;
        while k <= d {
            let mut x = if k == -d || (k != d && v.get(k - 1) < v.get(k + 1)) {
                v.get(k + 1)
            } else {
                v.get(k - 1) + 1
            };
            let mut y = x - k;

            while x < n && y < m && a[x as usize].text == b[y as usize].text {
                x += 1;
                y += 1;
            }
            v.set(k, x);

            if x >= n && y >= m {
                return trace;
            }
            k += 2;
        }
    }
    trace
}

/// Walks the `shortest_edit` trace in reverse, emitting edits in forward
/// order.
fn backtrack(a: &[Line], b: &[Line]) -> Vec<Edit> {
    let trace = shortest_edit(a, b);
    let mut x = a.len() as isize;
    let mut y = b.len() as isize;
    let mut edits = Vec::new();

    for d in (1..trace.len() as isize).rev() {
        let v = &trace[d as usize];
        let k = x - y;

        let prev_k = if k == -d || (k != d && v.get(k - 1) < v.get(k + 1)) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = v.get(prev_k);
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            edits.push(Edit {
                kind: EditKind::Equal,
                a_line: Some(a[(x - 1) as usize].clone()),
                b_line: Some(b[(y - 1) as usize].clone()),
            });
            x -= 1;
            y -= 1;
        }

        if x == prev_x {
            edits.push(Edit {
                kind: EditKind::Insert,
                a_line: None,
                b_line: Some(b[(y - 1) as usize].clone()),
            });
        } else {
            edits.push(Edit {
                kind: EditKind::Delete,
                a_line: Some(a[(x - 1) as usize].clone()),
                b_line: None,
            });
        }
        x = prev_x;
        y = prev_y;
    }

    edits.reverse();
    edits
}

/// The full edit script turning `a` into `b`.
pub fn diff(a: &[Line], b: &[Line]) -> Vec<Edit> {
    backtrack(a, b)
}

#[derive(Debug, Clone)]
pub struct Hunk {
    pub a_start: usize,
    pub b_start: usize,
    pub edits: Vec<Edit>,
}

impl Hunk {
    /// `@@ -<a_off>,<a_len> +<b_off>,<b_len> @@`
    pub fn header(&self) -> String {
        let (a_offset, a_len) = self.offsets_for(Side::A);
        let (b_offset, b_len) = self.offsets_for(Side::B);
        format!("@@ -{a_offset},{a_len} +{b_offset},{b_len} @@")
    }

    fn offsets_for(&self, side: Side) -> (usize, usize) {
        let lines: Vec<&Line> = self
            .edits
            .iter()
            .filter_map(|edit| match side {
                Side::A => edit.a_line.as_ref(),
                Side::B => edit.b_line.as_ref(),
            })
            .collect();
        let default_start = match side {
            Side::A => self.a_start,
            Side::B => self.b_start,
        };
        let start = lines.first().map_or(default_start, |line| line.number);
        (start, lines.len())
    }
}

#[derive(Clone, Copy)]
enum Side {
    A,
    B,
}

/// Groups an edit script into hunks with [`CONTEXT`] lines of leading/
/// trailing equal-edit context, per `hunkFilter`'s grouping rule.
pub fn hunks(edits: &[Edit]) -> Vec<Hunk> {
    hunks_with_context(edits, CONTEXT)
}

/// As [`hunks`], but with a caller-chosen context width — the CLI's
/// `core.context` config override plugs in here instead of a hardcoded
/// constant.
pub fn hunks_with_context(edits: &[Edit], context: usize) -> Vec<Hunk> {
    let mut hunks = Vec::new();
    let mut offset: isize = 0;
    let len = edits.len() as isize;

    loop {
        while offset < len && matches!(edits[offset as usize].kind, EditKind::Equal) {
            offset += 1;
        }
        if offset >= len {
            return hunks;
        }

        offset -= context as isize + 1;
        let (a_start, b_start) = if offset > 0 {
            let edit = &edits[offset as usize];
            (
                edit.a_line.as_ref().map(|l| l.number).unwrap_or(0),
                edit.b_line.as_ref().map(|l| l.number).unwrap_or(0),
            )
        } else {
            (0, 0)
        };

        let mut hunk = Hunk {
            a_start,
            b_start,
            edits: Vec::new(),
        };
        offset = build_hunk(&mut hunk, edits, offset, context);
        hunks.push(hunk);
    }
}

/// Extends `hunk` from `offset_start`, resetting a trailing-context counter
/// to `2*context + 1` on every non-equal edit (both Insert and Delete — the
/// source only does this for Delete, a bug fixed here) and decrementing it
/// on Equal; stops once the counter reaches zero. Returns the offset to
/// resume scanning from.
fn build_hunk(hunk: &mut Hunk, edits: &[Edit], offset_start: isize, context: usize) -> isize {
    let mut counter: isize = -1;
    let mut offset = offset_start;

    while counter != 0 {
        if offset >= 0 && counter > 0 {
            hunk.edits.push(edits[offset as usize].clone());
        }

        offset += 1;
        if offset as usize >= edits.len() {
            break;
        }

        let lookahead = offset + context as isize;
        let kind = if (lookahead as usize) < edits.len() {
            Some(edits[lookahead as usize].kind)
        } else {
            None
        };

        match kind {
            None => counter -= 1,
            Some(EditKind::Insert) | Some(EditKind::Delete) => counter = 2 * context as isize + 1,
            Some(EditKind::Equal) => counter -= 1,
        }
    }

    offset
}

/// One side of a file diff: `None` mode means the file doesn't exist on
/// this side, rendered as `/dev/null`.
pub struct FileSide {
    pub oid: crate::oid::Oid,
    pub mode: Option<u32>,
    pub lines: Vec<Line>,
}

/// Renders a complete `git diff`-style file diff: the `diff --git` preamble,
/// mode-change lines, the `index a..b` line, `---`/`+++` markers, and hunks.
/// Returns `None` when both sides are byte-identical (oid and mode both
/// match), mirroring `printDiff`'s short-circuit.
pub fn render_file_diff(path: &str, a: &FileSide, b: &FileSide, context: usize) -> Option<String> {
    if a.oid == b.oid && a.mode == b.mode {
        return None;
    }

    let mut out = format!("diff --git a/{path} b/{path}\n");
    match (a.mode, b.mode) {
        (None, Some(mode)) => out.push_str(&format!("new file mode {mode:o}\n")),
        (Some(mode), None) => out.push_str(&format!("deleted file mode {mode:o}\n")),
        (Some(old), Some(new)) if old != new => {
            out.push_str(&format!("old mode {old:o}\n"));
            out.push_str(&format!("new mode {new:o}\n"));
        }
        _ => {}
    }

    if a.oid != b.oid {
        out.push_str(&format!("index {}..{}", a.oid.short(), b.oid.short()));
        if a.mode == b.mode {
            if let Some(mode) = a.mode {
                out.push_str(&format!(" {mode:o}"));
            }
        }
        out.push('\n');

        let a_disp = a.mode.map_or("/dev/null".to_owned(), |_| format!("a/{path}"));
        let b_disp = b.mode.map_or("/dev/null".to_owned(), |_| format!("b/{path}"));
        out.push_str(&format!("--- {a_disp}\n"));
        out.push_str(&format!("+++ {b_disp}\n"));

        let edits = diff(&a.lines, &b.lines);
        for hunk in hunks_with_context(&edits, context) {
            out.push_str(&hunk.header());
            out.push('\n');
            for edit in &hunk.edits {
                out.push_str(&edit.render());
                out.push('\n');
            }
        }
    }

    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(strs: &[&str]) -> Vec<Line> {
        strs.iter()
            .enumerate()
            .map(|(i, s)| Line::new(i + 1, s))
            .collect()
    }

    #[test]
    fn identical_inputs_are_all_equal() {
        let a = lines(&["one", "two", "three"]);
        let edits = diff(&a, &a);
        assert!(edits.iter().all(|e| matches!(e.kind, EditKind::Equal)));
        assert_eq!(edits.len(), a.len());
    }

    #[test]
    fn edit_script_reconstructs_b() {
        let a = lines(&["one", "two", "three"]);
        let b = lines(&["one", "three", "four"]);
        let edits = diff(&a, &b);
        let reconstructed: Vec<&str> = edits
            .iter()
            .filter(|e| !matches!(e.kind, EditKind::Delete))
            .map(|e| e.b_line.as_ref().or(e.a_line.as_ref()).unwrap().text.as_str())
            .collect();
        let expected: Vec<&str> = b.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(reconstructed, expected);
    }

    #[test]
    fn diff_is_antisymmetric() {
        let a = lines(&["one", "two", "three"]);
        let b = lines(&["one", "three", "four"]);
        let forward = diff(&a, &b);
        let backward = diff(&b, &a);
        assert_eq!(forward.len(), backward.len());
        for (f, r) in forward.iter().zip(backward.iter()) {
            match (f.kind, r.kind) {
                (EditKind::Insert, EditKind::Delete) | (EditKind::Delete, EditKind::Insert) => {}
                (EditKind::Equal, EditKind::Equal) => {}
                other => panic!("unexpected kind pairing: {other:?}"),
            }
        }
    }

    #[test]
    fn single_line_change_yields_one_hunk() {
        let a = lines(&["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]);
        let mut b_strs: Vec<&str> = a.iter().map(|l| l.text.as_str()).collect();
        b_strs[4] = "CHANGED";
        let b = lines(&b_strs);
        let edits = diff(&a, &b);
        let built = hunks(&edits);
        assert_eq!(built.len(), 1);
        assert!(built[0].header().starts_with("@@ -"));
    }

    #[test]
    fn nul_bytes_are_stripped_before_comparison() {
        let line = Line::new(1, "he\0llo");
        assert_eq!(line.text, "hello");
    }
}
