//! Source text helpers: byte offsets to line/column, and the string literal
//! syntax codec used for sub-span addressing and fix generation.

use std::ops::Range;

/// Converts a byte offset into a 1-based `(line, column)`. Columns count
/// characters, not bytes. Offsets past the end clamp to the end of the text.
pub fn offset_to_position(text: &str, offset: usize) -> (usize, usize) {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let col = before[line_start..].chars().count() + 1;
    (line, col)
}

/// Returns the 1-based `line` without its line terminator.
pub fn line_at(text: &str, line: usize) -> Option<&str> {
    let raw = text.split('\n').nth(line.checked_sub(1)?)?;
    Some(raw.strip_suffix('\r').unwrap_or(raw))
}

/// A decoded string literal and, for every decoded character, the byte range
/// of the raw syntax that produced it (relative to the literal's start).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLiteral {
    pub value: String,
    pub chars: Vec<Range<usize>>,
}

impl DecodedLiteral {
    /// Raw byte range covering decoded characters `char_start..char_start + char_len`.
    pub fn raw_range(&self, char_start: usize, char_len: usize) -> Option<Range<usize>> {
        let last = char_start.checked_add(char_len)?.checked_sub(1)?;
        let first = self.chars.get(char_start)?;
        let last = self.chars.get(last)?;
        Some(first.start..last.end)
    }
}

/// Decodes the raw source text of a string literal.
///
/// Supports regular literals (`"a\tb"`) with the usual backslash escapes and
/// verbatim literals (`@"C:\dir"`) with doubled quotes. Returns `None` for
/// anything else, including malformed escapes.
pub fn decode_literal(raw: &str) -> Option<DecodedLiteral> {
    if let Some(body) = raw.strip_prefix("@\"") {
        let body = body.strip_suffix('"')?;
        decode_verbatim(body, 2)
    } else {
        let body = raw.strip_prefix('"')?.strip_suffix('"')?;
        decode_regular(body, 1)
    }
}

fn decode_verbatim(body: &str, base: usize) -> Option<DecodedLiteral> {
    let mut decoded = DecodedLiteral {
        value: String::with_capacity(body.len()),
        chars: Vec::with_capacity(body.len()),
    };
    let mut iter = body.char_indices();
    while let Some((i, c)) = iter.next() {
        let mut end = i + c.len_utf8();
        if c == '"' {
            let (_, next) = iter.next()?;
            if next != '"' {
                return None;
            }
            end += 1;
        }
        decoded.value.push(c);
        decoded.chars.push(base + i..base + end);
    }
    Some(decoded)
}

fn decode_regular(body: &str, base: usize) -> Option<DecodedLiteral> {
    let mut decoded = DecodedLiteral {
        value: String::with_capacity(body.len()),
        chars: Vec::with_capacity(body.len()),
    };
    let mut i = 0;
    while i < body.len() {
        let c = body[i..].chars().next()?;
        let (ch, len) = match c {
            '"' | '\n' => return None,
            '\\' => decode_escape(body, i)?,
            _ => (c, c.len_utf8()),
        };
        decoded.value.push(ch);
        decoded.chars.push(base + i..base + i + len);
        i += len;
    }
    Some(decoded)
}

/// Decodes the escape sequence starting at the backslash at `at`. Returns the
/// character and the number of raw bytes consumed.
fn decode_escape(body: &str, at: usize) -> Option<(char, usize)> {
    let rest = &body[at + 1..];
    let simple = match rest.chars().next()? {
        '\'' => Some('\''),
        '"' => Some('"'),
        '\\' => Some('\\'),
        '0' => Some('\0'),
        'a' => Some('\u{7}'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\u{b}'),
        _ => None,
    };
    if let Some(ch) = simple {
        return Some((ch, 2));
    }

    match rest.as_bytes()[0] {
        b'u' => {
            let unit = hex_value(rest.get(1..5)?)?;
            if (0xD800..0xDC00).contains(&unit) {
                // High surrogate: must be followed by an escaped low surrogate.
                let low = rest.get(5..11)?.strip_prefix("\\u")?;
                let low = hex_value(low)?;
                if !(0xDC00..0xE000).contains(&low) {
                    return None;
                }
                let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                Some((char::from_u32(code)?, 12))
            } else {
                Some((char::from_u32(unit)?, 6))
            }
        }
        b'U' => Some((char::from_u32(hex_value(rest.get(1..9)?)?)?, 10)),
        b'x' => {
            let digits = rest[1..]
                .bytes()
                .take(4)
                .take_while(u8::is_ascii_hexdigit)
                .count();
            if digits == 0 {
                return None;
            }
            Some((char::from_u32(hex_value(&rest[1..1 + digits])?)?, 2 + digits))
        }
        _ => None,
    }
}

fn hex_value(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Encodes `value` as a regular string literal.
pub fn encode_regular_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
