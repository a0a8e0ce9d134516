//! Script-family classification for mixed-direction text.
//!
//! This is a deliberately coarse heuristic, not language identification:
//! it counts characters from the Arabic-script Unicode blocks against
//! Latin letters and decides which family dominates. Predominantly-RTL
//! prose routinely embeds Latin runs (numbers, brand names, identifiers),
//! so the decision is asymmetric: RTL wins as soon as its character count
//! exceeds one fifth of the Latin count.

/// Script family detected in a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    /// Right-to-left script (Arabic-derived blocks).
    Rtl,
    /// Left-to-right script (Latin letters).
    Ltr,
    /// Neither family present (digits, punctuation, other scripts).
    Unknown,
}

impl Script {
    /// Attribute-value form of the classification.
    pub fn as_str(self) -> &'static str {
        match self {
            Script::Rtl => "rtl",
            Script::Ltr => "ltr",
            Script::Unknown => "unknown",
        }
    }

    /// Parse an attribute value written by [`Script::as_str`].
    pub fn from_attr(value: &str) -> Option<Script> {
        match value {
            "rtl" => Some(Script::Rtl),
            "ltr" => Some(Script::Ltr),
            "unknown" => Some(Script::Unknown),
            _ => None,
        }
    }
}

/// True for characters in the Arabic, Arabic Supplement and Arabic
/// Extended-A blocks.
fn is_rtl_char(ch: char) -> bool {
    matches!(ch,
        '\u{0600}'..='\u{06FF}'
        | '\u{0750}'..='\u{077F}'
        | '\u{08A0}'..='\u{08FF}')
}

/// Classify `text` by script family.
///
/// Pure and deterministic: the result depends only on the input string.
/// Text containing neither Arabic-block nor Latin characters classifies
/// as [`Script::Unknown`].
pub fn classify(text: &str) -> Script {
    let mut rtl_count: usize = 0;
    let mut latin_count: usize = 0;
    for ch in text.chars() {
        if is_rtl_char(ch) {
            rtl_count += 1;
        } else if ch.is_ascii_alphabetic() {
            latin_count += 1;
        }
    }

    if rtl_count + latin_count == 0 {
        return Script::Unknown;
    }
    // RTL tolerance band: rtl_count > latin_count * 0.2, kept in integers.
    if rtl_count * 5 > latin_count {
        Script::Rtl
    } else {
        Script::Ltr
    }
}

/// True when `text` contains at least one Latin letter. Mixed RTL/Latin
/// text needs explicit bidi embedding so the Latin runs keep their order.
pub fn contains_latin(text: &str) -> bool {
    text.chars().any(|ch| ch.is_ascii_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_strong_characters_is_unknown() {
        assert_eq!(classify(""), Script::Unknown);
        assert_eq!(classify("1234 5678"), Script::Unknown);
        assert_eq!(classify("!?.,;:"), Script::Unknown);
        // Cyrillic is neither Arabic-block nor Latin.
        assert_eq!(classify("Привет мир"), Script::Unknown);
    }

    #[test]
    fn pure_latin_is_ltr() {
        assert_eq!(classify("hello world"), Script::Ltr);
    }

    #[test]
    fn pure_arabic_is_rtl() {
        assert_eq!(classify("سلام دنیا"), Script::Rtl);
    }

    #[test]
    fn mixed_text_with_latin_majority_still_rtl() {
        // 5 Latin letters, 4 Arabic-block letters: 4 > 5 * 0.2.
        assert_eq!(classify("Hello سلام"), Script::Rtl);
    }

    #[test]
    fn threshold_boundary_is_strict() {
        let latin: String = "a".repeat(100);
        let over = format!("{latin}{}", "م".repeat(21));
        let at = format!("{latin}{}", "م".repeat(20));
        assert_eq!(classify(&over), Script::Rtl);
        // Exactly at the 0.2 boundary resolves to LTR.
        assert_eq!(classify(&at), Script::Ltr);
    }

    #[test]
    fn classification_is_pure() {
        let text = "abc سلام 123";
        let first = classify(text);
        for _ in 0..10 {
            assert_eq!(classify(text), first);
        }
    }

    #[test]
    fn supplement_and_extended_blocks_count_as_rtl() {
        // U+0750 (Arabic Supplement) and U+08A0 (Arabic Extended-A).
        assert_eq!(classify("\u{0750}\u{08A0}"), Script::Rtl);
    }

    #[test]
    fn latin_detection() {
        assert!(contains_latin("سلام abc"));
        assert!(!contains_latin("سلام 123"));
    }

    #[test]
    fn attr_round_trip() {
        for script in [Script::Rtl, Script::Ltr, Script::Unknown] {
            assert_eq!(Script::from_attr(script.as_str()), Some(script));
        }
        assert_eq!(Script::from_attr("bogus"), None);
    }
}
