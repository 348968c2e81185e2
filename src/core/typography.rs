//! Character-level scanner for typographic idioms in literal text.
//!
//! Offsets are decoded character indices into the literal value, not bytes.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TypographyKind {
    /// `...` that should be `…`.
    Ellipsis,
    /// `x` between numbers that should be `×`.
    Multiplication,
    /// `-` between words that should be `–`.
    EnDash,
}

impl TypographyKind {
    pub fn replacement(self) -> char {
        match self {
            TypographyKind::Ellipsis => '\u{2026}',
            TypographyKind::Multiplication => '\u{00D7}',
            TypographyKind::EnDash => '\u{2013}',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypographyMatch {
    pub kind: TypographyKind,
    pub start: usize,
    pub len: usize,
}

/// Which idioms a scan looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub ellipsis: bool,
    pub multiplication: bool,
    pub en_dash: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            ellipsis: true,
            multiplication: true,
            en_dash: false,
        }
    }
}

impl ScanOptions {
    pub fn all() -> Self {
        Self {
            en_dash: true,
            ..Self::default()
        }
    }

    pub fn any(&self) -> bool {
        self.ellipsis || self.multiplication || self.en_dash
    }
}

/// Lazy scan over one literal value.
///
/// Triggers are `.`, `x`/`X` and `-`. Three consecutive dots are an ellipsis
/// and the cursor moves past them. A multiplication sign needs a digit on
/// both sides and an en-dash a letter on both sides, skipping whitespace
/// only; the cursor always advances by one for those.
#[derive(Debug, Clone)]
pub struct TypographyScanner {
    chars: Vec<char>,
    cursor: usize,
    options: ScanOptions,
}

impl TypographyScanner {
    pub fn new(text: &str, options: ScanOptions) -> Self {
        Self {
            chars: text.chars().collect(),
            cursor: 0,
            options,
        }
    }

    fn is_ellipsis(&self, at: usize) -> bool {
        self.chars.get(at + 1) == Some(&'.') && self.chars.get(at + 2) == Some(&'.')
    }

    fn surrounded_by(&self, at: usize, pred: impl Fn(char) -> bool) -> bool {
        let left = self.chars[..at].iter().rev().find(|c| !c.is_whitespace());
        let right = self.chars[at + 1..].iter().find(|c| !c.is_whitespace());
        left.is_some_and(|&c| pred(c)) && right.is_some_and(|&c| pred(c))
    }
}

impl Iterator for TypographyScanner {
    type Item = TypographyMatch;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&c) = self.chars.get(self.cursor) {
            let at = self.cursor;
            let found = match c {
                '.' if self.options.ellipsis && self.is_ellipsis(at) => {
                    self.cursor += 3;
                    return Some(TypographyMatch {
                        kind: TypographyKind::Ellipsis,
                        start: at,
                        len: 3,
                    });
                }
                'x' | 'X' if self.options.multiplication => self
                    .surrounded_by(at, |c| c.is_ascii_digit())
                    .then_some(TypographyKind::Multiplication),
                '-' if self.options.en_dash => self
                    .surrounded_by(at, char::is_alphabetic)
                    .then_some(TypographyKind::EnDash),
                _ => None,
            };
            self.cursor += 1;
            if let Some(kind) = found {
                return Some(TypographyMatch {
                    kind,
                    start: at,
                    len: 1,
                });
            }
        }
        None
    }
}

/// Scans `text` with the default options (en-dash off).
pub fn scan(text: &str) -> TypographyScanner {
    TypographyScanner::new(text, ScanOptions::default())
}

pub fn scan_with(text: &str, options: ScanOptions) -> TypographyScanner {
    TypographyScanner::new(text, options)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn matches(text: &str, options: ScanOptions) -> Vec<(TypographyKind, usize, usize)> {
        scan_with(text, options)
            .map(|m| (m.kind, m.start, m.len))
            .collect()
    }

    #[test]
    fn test_ellipsis() {
        use TypographyKind::Ellipsis;
        let opts = ScanOptions::default();
        assert_eq!(matches("Test...", opts), vec![(Ellipsis, 4, 3)]);
        assert!(matches("Test\u{2026}", opts).is_empty());
        assert_eq!(matches("...Test", opts), vec![(Ellipsis, 0, 3)]);
        assert!(matches("Wait.. what", opts).is_empty());
        assert_eq!(matches("a...b...", opts), vec![(Ellipsis, 1, 3), (Ellipsis, 5, 3)]);
        assert_eq!(matches("Test....", opts), vec![(Ellipsis, 4, 3)]);
    }

    #[test]
    fn test_multiplication() {
        use TypographyKind::Multiplication;
        let opts = ScanOptions::default();
        assert_eq!(matches("1x2", opts), vec![(Multiplication, 1, 1)]);
        assert_eq!(matches("1 x2", opts), vec![(Multiplication, 2, 1)]);
        assert!(matches("1ax2", opts).is_empty());
        assert_eq!(matches("800 X 600", opts), vec![(Multiplication, 4, 1)]);
        assert!(matches("x2", opts).is_empty());
        assert!(matches("2x", opts).is_empty());
        assert!(matches("box", opts).is_empty());
    }

    #[test]
    fn test_en_dash_disabled_by_default() {
        assert!(matches("June-July", ScanOptions::default()).is_empty());
    }

    #[test]
    fn test_en_dash() {
        use TypographyKind::EnDash;
        let opts = ScanOptions::all();
        assert_eq!(matches("June-July", opts), vec![(EnDash, 4, 1)]);
        assert_eq!(matches("June - July", opts), vec![(EnDash, 5, 1)]);
        assert!(matches("1-2", opts).is_empty());
        assert!(matches("-July", opts).is_empty());
    }

    #[test]
    fn test_offsets_are_char_indices() {
        let opts = ScanOptions::default();
        assert_eq!(
            matches("日本語...", opts),
            vec![(TypographyKind::Ellipsis, 3, 3)]
        );
    }

    #[test]
    fn test_scan_is_restartable() {
        let first: Vec<_> = scan("1x2 and 3x4").collect();
        let second: Vec<_> = scan("1x2 and 3x4").collect();
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_replaced_text_scans_clean() {
        let opts = ScanOptions::all();
        assert_eq!(matches("Loading... 2x3 June-July", opts).len(), 3);
        assert!(matches("Loading\u{2026} 2\u{00D7}3 June\u{2013}July", opts).is_empty());
    }

    #[test]
    fn test_replacements() {
        assert_eq!(TypographyKind::Ellipsis.replacement(), '…');
        assert_eq!(TypographyKind::Multiplication.replacement(), '×');
        assert_eq!(TypographyKind::EnDash.replacement(), '–');
    }
}
