//! Text normalization for native and OCR page text.
//!
//! The pipeline runs in two stages. The line stage cleans each raw line
//! (ligatures, decorative symbols, NFC, noise runs, whitespace, punctuation
//! spacing, word stutter) and then drops page numbers, artifact lines and
//! running headers/footers. The surviving lines are joined with single spaces and the
//! joined text is run through the line stage again until it stops changing,
//! which makes `normalize` idempotent.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use super::boilerplate::LineFrequencyTable;
use super::symbols::{is_decorative, is_noise_symbol, is_signal, LIGATURES};

/// Upper bound on settle passes over the joined text.
const MAX_SETTLE_PASSES: usize = 8;

/// Page-number lines made of digits, `-` and `/` are shorter than this.
const MAX_PAGE_NUMBER_CHARS: usize = 15;

/// Options for text normalization.
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Fix ligatures (fi, fl, etc.)
    pub fix_ligatures: bool,

    /// Remove page-number and date lines
    pub remove_page_numbers: bool,

    /// Remove lines with no content (rules, pipes, symbol-only lines) and
    /// collapse a line of one repeated word to a single occurrence
    pub remove_artifact_lines: bool,

    /// Remove running headers and footers found by the frequency table
    pub remove_boilerplate: bool,

    /// Runs of this many consecutive noise symbols are stripped (0 = keep)
    pub noise_run_length: usize,

    /// Minimum number of pages before header/footer detection applies
    pub boilerplate_min_pages: usize,

    /// A line is a header/footer when it appears on more than this share of pages
    pub boilerplate_min_share: f64,
}

impl NormalizeOptions {
    /// Create new normalize options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable header/footer removal.
    pub fn with_boilerplate_removal(mut self, remove: bool) -> Self {
        self.remove_boilerplate = remove;
        self
    }

    /// Set header/footer detection thresholds.
    pub fn with_boilerplate_thresholds(mut self, min_pages: usize, min_share: f64) -> Self {
        self.boilerplate_min_pages = min_pages;
        self.boilerplate_min_share = min_share;
        self
    }

    /// Set the noise run length (0 disables noise-run stripping).
    pub fn with_noise_run_length(mut self, length: usize) -> Self {
        self.noise_run_length = length;
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: true,
            remove_page_numbers: true,
            remove_artifact_lines: true,
            remove_boilerplate: true,
            noise_run_length: 5,
            boilerplate_min_pages: 3,
            boilerplate_min_share: 0.5,
        }
    }
}

/// Text normalizer shared by every page of a run.
pub struct Normalizer {
    options: NormalizeOptions,
    page_number_regex: Regex,
    dashed_page_regex: Regex,
    page_label_regex: Regex,
    space_before_punct_regex: Regex,
    space_after_comma_regex: Regex,
    space_after_period_regex: Regex,
    open_paren_regex: Regex,
    close_paren_regex: Regex,
}

impl Normalizer {
    /// Create a new normalizer with the given options.
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            options,
            page_number_regex: Regex::new(r"^[\d\s\-/]+$").unwrap(),
            dashed_page_regex: Regex::new(r"^[-–—]\s*\d+\s*[-–—]$").unwrap(),
            page_label_regex: Regex::new(
                r"(?i)^(page|pag\.?|pagina|p\.)\s*\d+(\s*(of|di|/)\s*\d+)?$",
            )
            .unwrap(),
            space_before_punct_regex: Regex::new(r"\s+([.,;:!?])(\D|$)").unwrap(),
            space_after_comma_regex: Regex::new(r"([,;:!?])(\p{L})").unwrap(),
            space_after_period_regex: Regex::new(r"(\p{Ll}{2,})\.(\p{Lu})").unwrap(),
            open_paren_regex: Regex::new(r"\(\s+").unwrap(),
            close_paren_regex: Regex::new(r"\s+\)").unwrap(),
        }
    }

    /// The options this normalizer was built with.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize text that has no document context.
    pub fn normalize(&self, raw: &str) -> String {
        self.normalize_page(raw, &LineFrequencyTable::empty())
    }

    /// Normalize raw bytes, dropping sequences that are not valid UTF-8.
    pub fn normalize_bytes(&self, raw: &[u8]) -> String {
        let text = String::from_utf8_lossy(raw);
        if matches!(text, Cow::Owned(_)) {
            log::debug!("Dropped invalid UTF-8 sequences from {} input bytes", raw.len());
        }
        // U+FFFD substitutes are decorative and removed by the line stage.
        self.normalize(&text)
    }

    /// Normalize one page, removing lines the table marks as boilerplate.
    pub fn normalize_page(&self, raw: &str, table: &LineFrequencyTable) -> String {
        let kept: Vec<String> = raw
            .lines()
            .map(|line| self.clean_line(line))
            .filter(|line| !self.is_droppable(line))
            .filter(|line| !(self.options.remove_boilerplate && table.contains(line)))
            .collect();

        self.settle(kept.join(" "))
    }

    /// Pass one of header/footer detection for one source of one document.
    ///
    /// Pages that are `None` (acquisition failed) are not counted.
    pub fn frequency_table<'a, I>(&self, pages: I) -> LineFrequencyTable
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        if !self.options.remove_boilerplate {
            return LineFrequencyTable::empty();
        }
        let cleaned = pages.into_iter().flatten().map(|raw| {
            raw.lines()
                .map(|line| self.clean_line(line))
                .filter(|line| !self.is_droppable(line))
                .collect::<Vec<_>>()
        });
        LineFrequencyTable::from_pages(
            cleaned,
            self.options.boilerplate_min_pages,
            self.options.boilerplate_min_share,
        )
    }

    fn settle(&self, mut text: String) -> String {
        for _ in 0..MAX_SETTLE_PASSES {
            let mut next = self.clean_line(&text);
            if self.is_droppable(&next) {
                next.clear();
            }
            if next == text {
                break;
            }
            text = next;
        }
        text
    }

    /// Symbol, whitespace and punctuation cleanup of a single line.
    fn clean_line(&self, line: &str) -> String {
        let mut result = line.to_string();

        if self.options.fix_ligatures {
            for (ligature, replacement) in LIGATURES {
                result = result.replace(ligature, replacement);
            }
        }

        result.retain(|c| !is_decorative(c));

        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }

        if self.options.noise_run_length > 0 {
            result = self.strip_noise_runs(&result);
        }

        let collapsed = result.split_whitespace().collect::<Vec<_>>().join(" ");
        let fixed = self.fix_punctuation_spacing(&collapsed);

        if self.options.remove_artifact_lines {
            if let Some(word) = stutter(&fixed) {
                return word.to_string();
            }
        }
        fixed
    }

    /// Replace runs of `noise_run_length` or more noise symbols with a space.
    fn strip_noise_runs(&self, text: &str) -> String {
        let min_run = self.options.noise_run_length;
        let mut result = String::with_capacity(text.len());
        let mut run = String::new();

        let flush = |run: &mut String, result: &mut String| {
            if run.chars().count() >= min_run {
                result.push(' ');
            } else {
                result.push_str(run);
            }
            run.clear();
        };

        for c in text.chars() {
            if is_noise_symbol(c) {
                run.push(c);
            } else {
                flush(&mut run, &mut result);
                result.push(c);
            }
        }
        flush(&mut run, &mut result);
        result
    }

    fn fix_punctuation_spacing(&self, text: &str) -> String {
        let result = self.space_before_punct_regex.replace_all(text, "$1$2");
        let result = self.space_after_comma_regex.replace_all(&result, "$1 $2");
        let result = self.space_after_period_regex.replace_all(&result, "$1. $2");
        let result = self.open_paren_regex.replace_all(&result, "(");
        let result = self.close_paren_regex.replace_all(&result, ")");
        result.trim().to_string()
    }

    /// Whether a cleaned line is a page number, a date, or an artifact.
    fn is_droppable(&self, line: &str) -> bool {
        if line.is_empty() {
            return true;
        }

        if self.options.remove_page_numbers
            && ((self.page_number_regex.is_match(line)
                && line.chars().count() < MAX_PAGE_NUMBER_CHARS)
                || self.dashed_page_regex.is_match(line)
                || self.page_label_regex.is_match(line))
        {
            return true;
        }

        if self.options.remove_artifact_lines {
            if !line.chars().any(is_signal) {
                return true;
            }
        }

        false
    }
}

/// The word of a line made of one word repeated more than twice.
fn stutter(line: &str) -> Option<&str> {
    let mut words = line.split_whitespace();
    let first = words.next()?;
    let mut count = 1;
    for word in words {
        if word != first {
            return None;
        }
        count += 1;
    }
    (count > 2).then_some(first)
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

static SHARED: Lazy<Normalizer> = Lazy::new(Normalizer::default);

impl Normalizer {
    /// Process-wide normalizer with default options, compiled once.
    pub fn shared() -> &'static Normalizer {
        &SHARED
    }
}

/// Normalize text with default options and no document context.
pub fn normalize(raw: &str) -> String {
    Normalizer::shared().normalize(raw)
}
