//! Vietnamese-aware title collation
//!
//! Titles are compared in three passes. The primary pass looks at letters
//! only, with tone marks removed and case folded; ă, â, đ, ê, ô, ơ and ư are
//! letters of their own that sort right after their base letter. Ties are
//! broken by tone marks, then by case (lowercase first), then by raw text.
//! Spaces sort before punctuation and symbols, those before digits, and
//! digits before letters. Both titles are composed (NFC) first, so a title
//! saved with combining accents collates like its precomposed spelling.

use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;

/// Vowel families, each listed as: bare, grave, hook, tilde, acute, dot below
const TONE_FAMILIES: &[(char, u8, [char; 6])] = &[
    ('a', 0, ['a', 'à', 'ả', 'ã', 'á', 'ạ']),
    ('a', 1, ['ă', 'ằ', 'ẳ', 'ẵ', 'ắ', 'ặ']),
    ('a', 2, ['â', 'ầ', 'ẩ', 'ẫ', 'ấ', 'ậ']),
    ('e', 0, ['e', 'è', 'ẻ', 'ẽ', 'é', 'ẹ']),
    ('e', 1, ['ê', 'ề', 'ể', 'ễ', 'ế', 'ệ']),
    ('i', 0, ['i', 'ì', 'ỉ', 'ĩ', 'í', 'ị']),
    ('o', 0, ['o', 'ò', 'ỏ', 'õ', 'ó', 'ọ']),
    ('o', 1, ['ô', 'ồ', 'ổ', 'ỗ', 'ố', 'ộ']),
    ('o', 2, ['ơ', 'ờ', 'ở', 'ỡ', 'ớ', 'ợ']),
    ('u', 0, ['u', 'ù', 'ủ', 'ũ', 'ú', 'ụ']),
    ('u', 1, ['ư', 'ừ', 'ử', 'ữ', 'ứ', 'ự']),
    ('y', 0, ['y', 'ỳ', 'ỷ', 'ỹ', 'ý', 'ỵ']),
];

/// Character classes in primary order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Class {
    Space,
    Punctuation,
    Digit,
    Letter,
}

impl Class {
    fn of(c: char) -> Self {
        if c.is_whitespace() {
            Class::Space
        } else if c.is_numeric() {
            Class::Digit
        } else if c.is_alphabetic() {
            Class::Letter
        } else {
            Class::Punctuation
        }
    }
}

/// Collation weights of one character
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Weight {
    class: Class,
    letter: char,
    variant: u8,
    tone: u8,
    upper: bool,
}

fn weigh(c: char) -> Weight {
    let class = Class::of(c);
    let upper = c.is_uppercase();
    let lower = c.to_lowercase().next().unwrap_or(c);

    if lower == 'đ' {
        return Weight {
            class,
            letter: 'd',
            variant: 1,
            tone: 0,
            upper,
        };
    }

    for (letter, variant, tones) in TONE_FAMILIES {
        if let Some(tone) = tones.iter().position(|t| *t == lower) {
            return Weight {
                class,
                letter: *letter,
                variant: *variant,
                tone: tone as u8,
                upper,
            };
        }
    }

    Weight {
        class,
        letter: lower,
        variant: 0,
        tone: 0,
        upper,
    }
}

/// Compare two titles using Vietnamese collation rules
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    let a: String = a.nfc().collect();
    let b: String = b.nfc().collect();
    let wa: Vec<Weight> = a.chars().map(weigh).collect();
    let wb: Vec<Weight> = b.chars().map(weigh).collect();

    let primary = |w: &Weight| (w.class, w.letter, w.variant);
    let secondary = |w: &Weight| w.tone;
    let tertiary = |w: &Weight| w.upper;

    wa.iter()
        .map(primary)
        .cmp(wb.iter().map(primary))
        .then_with(|| wa.iter().map(secondary).cmp(wb.iter().map(secondary)))
        .then_with(|| wa.iter().map(tertiary).cmp(wb.iter().map(tertiary)))
        .then_with(|| a.cmp(&b))
}
