//! Literal classification: does a string constant carry user-facing text?

use std::collections::HashSet;

/// Prefix of stock icon identifiers, which are never shown as text.
pub const STOCK_ICON_PREFIX: &str = "gtk-";

/// Product name that is deliberately left untranslated.
pub const APPLICATION_NAME: &str = "MonoDevelop";

/// Decides whether `text` is meaningful text worth localizing.
///
/// Rejects empty or whitespace-only text, stock icon ids and the application
/// name, then accepts only if a letter remains outside of `<...>` markup.
///
/// ```
/// use catalint::core::classify::is_translatable;
///
/// assert!(is_translatable("<b>Hi</b>"));
/// assert!(!is_translatable("<b></b>"));
/// assert!(!is_translatable("gtk-ok"));
/// ```
pub fn is_translatable(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    if text.starts_with(STOCK_ICON_PREFIX) || text == APPLICATION_NAME {
        return false;
    }
    has_text_outside_markup(text)
}

/// True if an alphabetic character occurs at markup depth 0.
///
/// Depth is a plain counter and may go negative on unbalanced `>`, in which
/// case the remaining letters are not counted.
pub fn has_text_outside_markup(text: &str) -> bool {
    let mut depth: i32 = 0;
    for c in text.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth -= 1,
            c if depth == 0 && c.is_alphabetic() => return true,
            _ => {}
        }
    }
    false
}

/// Literal classifier with project-specific exclusions.
#[derive(Debug, Clone, Default)]
pub struct LiteralClassifier {
    ignore_texts: HashSet<String>,
}

impl LiteralClassifier {
    pub fn new(ignore_texts: impl IntoIterator<Item = String>) -> Self {
        Self {
            ignore_texts: ignore_texts.into_iter().collect(),
        }
    }

    pub fn is_translatable(&self, text: &str) -> bool {
        !self.ignore_texts.contains(text) && is_translatable(text)
    }
}
