use std::str::FromStr;
use strum_macros::Display;

use crate::debug;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::transforms::{Transform, Transformed};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    #[strum(serialize = "same")]
    Same,
    #[strum(serialize = "added")]
    Added,
    #[strum(serialize = "removed")]
    Removed,
}

impl DiffKind {
    fn marker(&self) -> &'static str {
        match self {
            DiffKind::Same => "  ",
            DiffKind::Added => "+ ",
            DiffKind::Removed => "- ",
        }
    }
}

/// A classified line. `line_number` is 1-based; removed lines are numbered in
/// the original text, the others in the modified text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffKind,
    pub line: String,
    pub line_number: usize,
}

impl DiffLine {
    fn new(kind: DiffKind, line: &str, line_number: usize) -> Self {
        DiffLine {
            kind,
            line: line.to_string(),
            line_number,
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffAlgorithm {
    /// Compares line i of both texts, no realignment
    #[default]
    #[strum(serialize = "positional")]
    Positional,
    /// Realigns on the longest common subsequence of lines
    #[strum(serialize = "lcs")]
    Lcs,
}

impl FromStr for DiffAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "positional" => Ok(DiffAlgorithm::Positional),
            "lcs" => Ok(DiffAlgorithm::Lcs),
            other => Err(Error::option(
                "algorithm",
                format!("expected positional or lcs, got \"{}\"", other),
            )),
        }
    }
}

/// Classifies the lines of `original` against `modified`
///
/// # Examples
///
/// ```
/// use devutils::transforms::{diff_lines, DiffAlgorithm, DiffKind};
///
/// let diff = diff_lines("a\nb\nc", "a\nx\nc", DiffAlgorithm::Positional);
/// let kinds: Vec<DiffKind> = diff.iter().map(|d| d.kind).collect();
/// assert_eq!(
///     kinds,
///     [DiffKind::Same, DiffKind::Removed, DiffKind::Added, DiffKind::Same]
/// );
/// ```
pub fn diff_lines(original: &str, modified: &str, algorithm: DiffAlgorithm) -> Vec<DiffLine> {
    let a: Vec<&str> = original.split('\n').collect();
    let b: Vec<&str> = modified.split('\n').collect();
    match algorithm {
        DiffAlgorithm::Positional => positional(&a, &b),
        DiffAlgorithm::Lcs => lcs(&a, &b),
    }
}

fn positional(a: &[&str], b: &[&str]) -> Vec<DiffLine> {
    let mut diff = Vec::new();
    for i in 0..a.len().max(b.len()) {
        // a missing line compares as an empty one
        let left = a.get(i).copied().unwrap_or("");
        let right = b.get(i).copied().unwrap_or("");
        let number = i + 1;

        if left == right {
            diff.push(DiffLine::new(DiffKind::Same, right, number));
        } else if left.is_empty() {
            diff.push(DiffLine::new(DiffKind::Added, right, number));
        } else if right.is_empty() {
            diff.push(DiffLine::new(DiffKind::Removed, left, number));
        } else {
            diff.push(DiffLine::new(DiffKind::Removed, left, number));
            diff.push(DiffLine::new(DiffKind::Added, right, number));
        }
    }
    diff
}

/// Largest LCS table built; a differing region needing more cells is
/// compared positionally instead
pub const LCS_MAX_CELLS: usize = 4_000_000;

fn lcs(a: &[&str], b: &[&str]) -> Vec<DiffLine> {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();
    let (a_mid, b_mid) = (&a[prefix..a.len() - suffix], &b[prefix..b.len() - suffix]);

    let mut diff: Vec<DiffLine> = b[..prefix]
        .iter()
        .enumerate()
        .map(|(j, line)| DiffLine::new(DiffKind::Same, line, j + 1))
        .collect();

    let cells = (a_mid.len() + 1).saturating_mul(b_mid.len() + 1);
    if cells > LCS_MAX_CELLS {
        debug!(
            "text-diff: {}x{} lines differ, comparing positionally",
            a_mid.len(),
            b_mid.len()
        );
        diff.extend(positional(a_mid, b_mid).into_iter().map(|mut d| {
            d.line_number += prefix;
            d
        }));
    } else {
        diff.extend(align(a_mid, b_mid, prefix));
    }

    let tail = b.len() - suffix;
    diff.extend(
        b[tail..]
            .iter()
            .enumerate()
            .map(|(k, line)| DiffLine::new(DiffKind::Same, line, tail + k + 1)),
    );
    diff
}

/// LCS alignment of two regions that both start after `offset` lines
fn align(a: &[&str], b: &[&str], offset: usize) -> Vec<DiffLine> {
    // table[i][j] holds the LCS length of a[i..] and b[j..]
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in (0..a.len()).rev() {
        for j in (0..b.len()).rev() {
            table[i][j] = if a[i] == b[j] {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut diff = Vec::with_capacity(a.len().max(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            diff.push(DiffLine::new(DiffKind::Same, b[j], offset + j + 1));
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            diff.push(DiffLine::new(DiffKind::Removed, a[i], offset + i + 1));
            i += 1;
        } else {
            diff.push(DiffLine::new(DiffKind::Added, b[j], offset + j + 1));
            j += 1;
        }
    }
    diff.extend((i..a.len()).map(|i| DiffLine::new(DiffKind::Removed, a[i], offset + i + 1)));
    diff.extend((j..b.len()).map(|j| DiffLine::new(DiffKind::Added, b[j], offset + j + 1)));
    diff
}

/// Line diff between the input (original) and the `modified` option
pub struct TextDiff;

impl TextDiff {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for TextDiff {
    fn transform(&self, text: &str, options: &Options) -> Result<Transformed> {
        let modified = options.string_or("modified", "");
        let algorithm = match options.get("algorithm") {
            Some(name) => name.parse()?,
            None => DiffAlgorithm::default(),
        };

        let diff = diff_lines(text, &modified, algorithm);
        let count = |kind: DiffKind| diff.iter().filter(|d| d.kind == kind).count();
        let (added, removed, same) = (
            count(DiffKind::Added),
            count(DiffKind::Removed),
            count(DiffKind::Same),
        );

        let width = diff
            .iter()
            .map(|d| d.line_number.to_string().len())
            .max()
            .unwrap_or(1);
        let output = diff
            .iter()
            .map(|d| {
                format!(
                    "{}{:>width$} {}",
                    d.kind.marker(),
                    d.line_number,
                    d.line,
                    width = width
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Transformed::new(output)
            .count("added", added)
            .count("removed", removed)
            .count("same", same))
    }
}
