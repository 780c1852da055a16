//! Sentence segmentation for cleaned text.
//!
//! Boundaries are conservative: a sentence ends at `.`, `!` or `?` only when
//! the next non-space character is an uppercase letter (or the text ends), and
//! never after a protected abbreviation or initial (`Fig.`, `A.`, `U.S.`).
//! Decimal points never qualify because they are not followed by whitespace.

use super::symbols::is_signal;

/// Abbreviations (lowercase, without the final period) that never end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "al", "approx", "cap", "cf", "ch", "cor", "def", "dr", "e.g", "ecc", "eq", "eqs", "es", "etc",
    "fig", "figs", "i.e", "jr", "lem", "mr", "mrs", "ms", "no", "nr", "p", "pag", "pagg", "pp",
    "prof", "prop", "ref", "resp", "sec", "st", "tab", "thm", "vol", "vs",
];

/// A sentence borrowed from the text it was segmented from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    /// Sentence text, trimmed
    pub text: &'a str,

    /// Byte offset of `text` in the segmented string
    pub offset: usize,
}

impl<'a> Sentence<'a> {
    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Whether the sentence ends with terminal punctuation.
    ///
    /// Only the trailing fragment of a text can be unterminated.
    pub fn is_terminated(&self) -> bool {
        self.text
            .trim_end_matches(is_closer)
            .ends_with(['.', '!', '?'])
    }

    /// Byte offset one past the end of the sentence.
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closer(c: char) -> bool {
    matches!(c, ')' | ']' | '}' | '"' | '\'' | '»' | '”' | '’')
}

fn is_opener(c: char) -> bool {
    matches!(c, '(' | '[' | '"' | '\'' | '«' | '“' | '‘')
}

/// Split cleaned text into sentences. Nothing is dropped: a trailing fragment
/// without terminal punctuation becomes the last sentence.
pub fn segment(text: &str) -> Vec<Sentence<'_>> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        if !is_terminal(chars[i].1) {
            i += 1;
            continue;
        }

        let mut j = i + 1;
        while j < chars.len() && (is_terminal(chars[j].1) || is_closer(chars[j].1)) {
            j += 1;
        }

        if is_boundary(text, &chars, i, j) {
            let end = chars.get(j).map(|(pos, _)| *pos).unwrap_or(text.len());
            push_sentence(text, start, end, &mut sentences);
            start = end;
        }
        i = j;
    }

    push_sentence(text, start, text.len(), &mut sentences);
    sentences
}

/// Segment and keep only plausible sentences (see [`is_plausible`]).
pub fn segment_plausible(text: &str) -> Vec<Sentence<'_>> {
    segment(text)
        .into_iter()
        .filter(|s| is_plausible(s.text))
        .collect()
}

/// Whether a unit is text rather than OCR noise.
///
/// Short units are fine (`x = 1.`); a unit with no alphanumeric character and
/// no whitelisted symbol (`|`, `..`, `-- --`) is noise.
pub fn is_plausible(text: &str) -> bool {
    text.chars().any(is_signal)
}

fn push_sentence<'a>(text: &'a str, start: usize, end: usize, out: &mut Vec<Sentence<'a>>) {
    let slice = &text[start..end];
    let trimmed = slice.trim_start();
    let offset = start + (slice.len() - trimmed.len());
    let trimmed = trimmed.trim_end();
    if !trimmed.is_empty() {
        out.push(Sentence {
            text: trimmed,
            offset,
        });
    }
}

/// `first` is the index of the first terminal character, `after` the index
/// past the terminal run and any closing brackets or quotes.
fn is_boundary(text: &str, chars: &[(usize, char)], first: usize, after: usize) -> bool {
    let Some((_, next)) = chars.get(after) else {
        return true;
    };
    if !next.is_whitespace() {
        return false;
    }

    let mut k = after;
    while k < chars.len() && chars[k].1.is_whitespace() {
        k += 1;
    }
    let Some((_, mut upcoming)) = chars.get(k).copied() else {
        return true;
    };
    if is_opener(upcoming) {
        match chars.get(k + 1) {
            Some((_, c)) => upcoming = *c,
            None => return true,
        }
    }
    if !upcoming.is_uppercase() {
        return false;
    }

    let single_period =
        chars[first].1 == '.' && !chars[first + 1..after].iter().any(|(_, c)| is_terminal(*c));
    if single_period {
        let word = word_before(text, chars, first);
        if is_protected(word) {
            return false;
        }
    }
    true
}

/// The run of alphanumerics and periods immediately before `index`.
fn word_before<'a>(text: &'a str, chars: &[(usize, char)], index: usize) -> &'a str {
    let end = chars[index].0;
    let mut begin = index;
    while begin > 0 {
        let c = chars[begin - 1].1;
        if c.is_alphanumeric() || c == '.' {
            begin -= 1;
        } else {
            break;
        }
    }
    &text[chars.get(begin).map(|(pos, _)| *pos).unwrap_or(end)..end]
}

fn is_protected(word: &str) -> bool {
    let mut letters = word.chars();
    if let (Some(c), None) = (letters.next(), letters.next()) {
        // Single uppercase initial: "A. Turing"
        if c.is_uppercase() {
            return true;
        }
    }
    let word = word.trim_start_matches('.');
    if is_dotted_acronym(word) {
        return true;
    }
    let lower = word.to_lowercase();
    ABBREVIATIONS.contains(&lower.as_str())
}

/// Single letters joined by periods: "U.S", "U.K", "a.C".
fn is_dotted_acronym(word: &str) -> bool {
    let mut parts = 0;
    for part in word.split('.') {
        let mut chars = part.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_alphabetic() => parts += 1,
            _ => return false,
        }
    }
    parts >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(text: &str) -> Vec<&str> {
        segment(text).iter().map(|s| s.text).collect()
    }

    #[test]
    fn test_basic_split() {
        assert_eq!(
            texts("The limit exists. It is unique! Is it finite? Yes."),
            vec!["The limit exists.", "It is unique!", "Is it finite?", "Yes."]
        );
    }

    #[test]
    fn test_decimals_are_not_boundaries() {
        assert_eq!(
            texts("Pi is about 3.14 here. Next one."),
            vec!["Pi is about 3.14 here.", "Next one."]
        );
    }

    #[test]
    fn test_abbreviations_are_protected() {
        assert_eq!(
            texts("See Fig. 2 and Eq. A for details. Also cf. Theorem 3, e.g. Lemma 1."),
            vec![
                "See Fig. 2 and Eq. A for details.",
                "Also cf. Theorem 3, e.g. Lemma 1."
            ]
        );
    }

    #[test]
    fn test_initials_are_protected() {
        assert_eq!(
            texts("Proved by A. Turing in 1936. Then more."),
            vec!["Proved by A. Turing in 1936.", "Then more."]
        );
    }

    #[test]
    fn test_dotted_acronyms_are_protected() {
        assert_eq!(
            texts("The U.S. Army won. Then."),
            vec!["The U.S. Army won.", "Then."]
        );
        assert!(is_dotted_acronym("U.K"));
        assert!(!is_dotted_acronym("U"));
        assert!(!is_dotted_acronym("No.5"));
        assert!(!is_dotted_acronym("3.2"));
    }

    #[test]
    fn test_lowercase_continuation_does_not_split() {
        assert_eq!(texts("Let x. y be given."), vec!["Let x. y be given."]);
    }

    #[test]
    fn test_trailing_fragment_kept() {
        let sentences = segment("First sentence. OCR cut off mid");
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[1].text, "OCR cut off mid");
        assert!(sentences[0].is_terminated());
        assert!(!sentences[1].is_terminated());
    }

    #[test]
    fn test_closers_stay_with_sentence() {
        assert_eq!(
            texts("He said \"stop.\" Then (as noted.) We left."),
            vec!["He said \"stop.\"", "Then (as noted.)", "We left."]
        );
    }

    #[test]
    fn test_offsets_point_into_source() {
        let text = "One two. Three four.";
        for sentence in segment(text) {
            assert_eq!(&text[sentence.offset..sentence.end()], sentence.text);
        }
    }

    #[test]
    fn test_equations_are_plausible() {
        assert!(is_plausible("α + β = γ."));
        assert!(is_plausible("x = 1."));
        assert!(!is_plausible("..."));
        assert!(!is_plausible("| | -"));
    }

    #[test]
    fn test_segment_plausible_filters_noise() {
        let sentences = segment_plausible("... Real text. Another one.");
        let texts: Vec<_> = sentences.iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["Real text.", "Another one."]);
        assert_eq!(segment("... Real text. Another one.").len(), 3);
    }

    #[test]
    fn test_empty_text() {
        assert!(segment("").is_empty());
        assert!(segment("   ").is_empty());
    }
}
