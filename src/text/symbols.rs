//! Character classes shared by the normalizer and the segmenter.

/// Mathematical and scientific symbols that must survive cleanup.
const MATH_SYMBOLS: &str = "±×÷≈≠≤≥∞∂∇∫√∑∏∈∉∀∃∅∩∪⊂⊃⊆⊇→←↔⇒⇐⇔°′″‰∝∠⊥∥∧∨¬≡≅∼·";

/// Ligatures expanded before any other cleanup.
pub(crate) const LIGATURES: [(&str, &str); 7] = [
    ("\u{FB00}", "ff"),
    ("\u{FB01}", "fi"),
    ("\u{FB02}", "fl"),
    ("\u{FB03}", "ffi"),
    ("\u{FB04}", "ffl"),
    ("\u{FB05}", "st"),
    ("\u{FB06}", "st"),
];

/// Whether `c` is a whitelisted mathematical or scientific symbol.
///
/// Greek letters are letters and are accepted by [`is_signal`] anyway; they
/// are listed here too so callers asking "is this notation" get a yes.
pub fn is_math_symbol(c: char) -> bool {
    let code = c as u32;
    MATH_SYMBOLS.contains(c)
        // Greek and Coptic
        || (0x0370..=0x03FF).contains(&code)
        // Mathematical Operators
        || (0x2200..=0x22FF).contains(&code)
        // Supplemental Mathematical Operators
        || (0x2A00..=0x2AFF).contains(&code)
        // Superscripts and subscripts
        || matches!(c, '¹' | '²' | '³')
        || (0x2070..=0x209F).contains(&code)
        // Mathematical Alphanumeric Symbols
        || (0x1D400..=0x1D7FF).contains(&code)
}

/// Whether `c` carries content: alphanumeric or a whitelisted symbol.
pub fn is_signal(c: char) -> bool {
    c.is_alphanumeric() || is_math_symbol(c)
}

/// Characters that are noise in a token: neither content, whitespace nor math.
pub fn is_noise_symbol(c: char) -> bool {
    !c.is_whitespace() && !is_signal(c)
}

/// Decorative or non-printable characters removed by the normalizer.
pub fn is_decorative(c: char) -> bool {
    if is_math_symbol(c) {
        return false;
    }
    let code = c as u32;
    match c {
        '\n' | '\t' => false,
        '•' | '◦' | '‣' | '⁃' | '\u{FFFD}' | '\u{00AD}' => true,
        _ if c.is_control() => true,
        _ => {
            // Zero-width and bidi formatting characters
            (0x200B..=0x200F).contains(&code)
                || (0x202A..=0x202E).contains(&code)
                || (0x2060..=0x2064).contains(&code)
                || code == 0xFEFF
                // Box Drawing, Block Elements, Geometric Shapes
                || (0x2500..=0x25FF).contains(&code)
                // Miscellaneous Symbols, Dingbats
                || (0x2600..=0x27BF).contains(&code)
                // Miscellaneous Symbols and Arrows
                || (0x2B00..=0x2BFF).contains(&code)
                // Private Use Areas
                || (0xE000..=0xF8FF).contains(&code)
                || (0xF0000..=0xFFFFD).contains(&code)
                || (0x100000..=0x10FFFD).contains(&code)
                // Emoji and pictographs
                || (0x1F300..=0x1FAFF).contains(&code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math_symbols_are_not_decorative() {
        for c in "αβγδεθλμπστφωΣΔΦΩ±×÷≈≠≤≥∞∂∇∫√".chars() {
            assert!(!is_decorative(c), "{c} should be preserved");
            assert!(is_signal(c), "{c} should count as signal");
        }
    }

    #[test]
    fn test_decorative_symbols() {
        for c in "•◦▪▫●○■□★☆♦♣♠♥─│┌".chars() {
            assert!(is_decorative(c), "{c} should be removed");
        }
        assert!(is_decorative('\u{E000}'));
        assert!(is_decorative('\u{0007}'));
        assert!(!is_decorative('\n'));
        assert!(!is_decorative('é'));
    }

    #[test]
    fn test_noise_symbol() {
        assert!(is_noise_symbol('#'));
        assert!(is_noise_symbol('.'));
        assert!(!is_noise_symbol('≤'));
        assert!(!is_noise_symbol('x'));
    }
}
