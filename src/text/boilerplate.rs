//! Running header/footer detection.
//!
//! Detection is two-pass. Pass one folds every cleaned line of every page of
//! one source into a [`LineFrequencyTable`]; pass two consults the finished
//! table read-only while each page is normalized. The table is never mutated
//! after [`LineFrequencyTable::from_pages`] returns, so it can be shared across
//! page workers by reference.

use std::collections::{HashMap, HashSet};

/// Lines longer than this are body text, never headers or footers.
pub const MAX_BOILERPLATE_CHARS: usize = 120;

/// Immutable per-document table of lines repeated across most pages.
#[derive(Debug, Clone, Default)]
pub struct LineFrequencyTable {
    page_count: usize,
    boilerplate: HashSet<String>,
}

impl LineFrequencyTable {
    /// A table that marks nothing as boilerplate.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the table from already-cleaned lines, one `Vec` per page.
    ///
    /// A line is boilerplate when its key occurs on more than `min_share` of the
    /// pages and the document has at least `min_pages` pages.
    pub fn from_pages<I, P, S>(pages: I, min_pages: usize, min_share: f64) -> Self
    where
        I: IntoIterator<Item = P>,
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut page_count = 0usize;

        for page in pages {
            page_count += 1;
            let keys: HashSet<String> = page
                .into_iter()
                .filter_map(|line| {
                    let line = line.as_ref();
                    if line.is_empty() || line.chars().count() > MAX_BOILERPLATE_CHARS {
                        None
                    } else {
                        Some(Self::key(line))
                    }
                })
                .collect();
            for key in keys {
                *counts.entry(key).or_insert(0) += 1;
            }
        }

        if page_count < min_pages.max(2) {
            return Self {
                page_count,
                boilerplate: HashSet::new(),
            };
        }

        let boilerplate = counts
            .into_iter()
            .filter(|(_, count)| *count >= 2 && *count as f64 / page_count as f64 > min_share)
            .map(|(key, _)| key)
            .collect::<HashSet<_>>();

        if !boilerplate.is_empty() {
            log::debug!(
                "Boilerplate: {} repeated lines across {} pages",
                boilerplate.len(),
                page_count
            );
        }

        Self {
            page_count,
            boilerplate,
        }
    }

    /// Matching key: case-folded, digit runs masked, whitespace collapsed.
    ///
    /// Masking digits makes "Page 3 of 10" and "Page 4 of 10" the same line.
    pub fn key(line: &str) -> String {
        let mut key = String::with_capacity(line.len());
        let mut in_digits = false;
        for word in line.split_whitespace() {
            if !key.is_empty() {
                key.push(' ');
            }
            for c in word.chars() {
                if c.is_ascii_digit() {
                    if !in_digits {
                        key.push('#');
                    }
                    in_digits = true;
                } else {
                    in_digits = false;
                    key.extend(c.to_lowercase());
                }
            }
            in_digits = false;
        }
        key
    }

    /// Whether a cleaned line is a running header or footer.
    pub fn contains(&self, line: &str) -> bool {
        !self.boilerplate.is_empty() && self.boilerplate.contains(&Self::key(line))
    }

    /// Number of pages the table was built from.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Number of distinct boilerplate lines.
    pub fn len(&self) -> usize {
        self.boilerplate.len()
    }

    /// Whether no line was detected as boilerplate.
    pub fn is_empty(&self) -> bool {
        self.boilerplate.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(lines: &[&[&str]]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|page| page.iter().map(|l| l.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_key_masks_digits_and_case() {
        assert_eq!(
            LineFrequencyTable::key("Page 3 of 10"),
            LineFrequencyTable::key("page 4  of 12")
        );
        assert_eq!(LineFrequencyTable::key("Chapter 12a"), "chapter #a");
    }

    #[test]
    fn test_repeated_header_detected() {
        let table = LineFrequencyTable::from_pages(
            pages(&[
                &["Analisi Matematica - Bologna", "First page body."],
                &["Analisi Matematica - Bologna", "Second page body."],
                &["Analisi Matematica - Bologna", "Third page body."],
                &["Fourth page body."],
            ]),
            3,
            0.5,
        );
        assert!(table.contains("Analisi Matematica - Bologna"));
        assert!(!table.contains("First page body."));
        assert_eq!(table.page_count(), 4);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_half_is_not_a_majority() {
        let table = LineFrequencyTable::from_pages(
            pages(&[&["Header", "a"], &["Header", "b"], &["c"], &["d"]]),
            3,
            0.5,
        );
        assert!(!table.contains("Header"));
    }

    #[test]
    fn test_short_documents_have_no_boilerplate() {
        let table =
            LineFrequencyTable::from_pages(pages(&[&["Header", "a"], &["Header", "b"]]), 3, 0.5);
        assert!(table.is_empty());
        assert!(!table.contains("Header"));
    }

    #[test]
    fn test_long_lines_are_never_boilerplate() {
        let long = "x".repeat(MAX_BOILERPLATE_CHARS + 1);
        let table = LineFrequencyTable::from_pages(
            pages(&[&[long.as_str()], &[long.as_str()], &[long.as_str()]]),
            3,
            0.5,
        );
        assert!(!table.contains(&long));
    }
}
