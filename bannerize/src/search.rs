//! Substring search for highlighting

use std::cmp::Ordering;
use std::ops::Range;

/// Start offsets of every non-overlapping occurrence of `needle` in `haystack`, left to right.
///
/// After a match the search resumes at the end of that match, so `"aa"` is found once in `"aaa"`.
/// An empty needle never matches.
///
/// ```
/// # use bannerize::search::locate;
/// assert_eq!(locate("a king kitten have kit", "kit"), [7, 19]);
/// assert_eq!(locate("aaa", "aa"), [0]);
/// assert_eq!(locate("anything", ""), [] as [usize; 0]);
/// ```
#[must_use]
pub fn locate(haystack: &str, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }
    haystack
        .match_indices(needle)
        .map(|(start, _)| start)
        .collect()
}

/// The byte ranges of one line that receive highlighting
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightRanges(Vec<Range<usize>>);

impl HighlightRanges {
    /// Ranges covering each occurrence of `needle` in `line`.
    #[must_use]
    pub fn of(line: &str, needle: &str) -> Self {
        Self(
            locate(line, needle)
                .into_iter()
                .map(|start| start..start + needle.len())
                .collect(),
        )
    }

    /// A single range covering the whole line.
    #[must_use]
    pub fn whole(line: &str) -> Self {
        if line.is_empty() {
            Self::default()
        } else {
            Self(vec![0..line.len()])
        }
    }

    /// Returns true if the character starting at byte `offset` is highlighted.
    #[must_use]
    pub fn contains(&self, offset: usize) -> bool {
        // Ranges are sorted and disjoint.
        self.0
            .binary_search_by(|range| {
                if range.end <= offset {
                    Ordering::Less
                } else if range.start > offset {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .is_ok()
    }

    /// Returns true if nothing is highlighted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The ranges, in order.
    #[must_use]
    pub fn as_slice(&self) -> &[Range<usize>] {
        &self.0
    }
}
