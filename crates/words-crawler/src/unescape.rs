use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref CHAR_REF: Regex =
        Regex::new(r"&(#[0-9]+;?|#[xX][0-9a-fA-F]+;?|[^\t\n\f <&#;]{1,32};?)").unwrap();
}

/// Named references that browsers also decode without a trailing `;`.
const LEGACY_NAMES: [&str; 106] = [
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg",
    "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt",
    "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Decodes every character reference in `text` the way an HTML5 parser does
/// in text content.
///
/// On top of the `&name;` and `&#N;` forms this handles legacy names written
/// without `;` (`&amp`, `&nbsp`), the windows-1252 meaning of references in
/// the C1 range (`&#x80;` is `€`) and out of range code points, which become
/// U+FFFD.
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    CHAR_REF.replace_all(text, |caps: &Captures| decode(&caps[1]))
}

fn decode(reference: &str) -> String {
    match reference.strip_prefix('#') {
        Some(number) => decode_numeric(number),
        None => decode_named(reference),
    }
}

fn decode_numeric(number: &str) -> String {
    let number = number.trim_end_matches(';');
    let code = match number.strip_prefix(|c: char| c == 'x' || c == 'X') {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => number.parse::<u32>(),
    };
    // Overflowing digits are out of range as well
    let code = code.unwrap_or(u32::MAX);

    if let Some(c) = windows_1252(code) {
        return c.to_string();
    }
    if is_dropped(code) {
        return String::new();
    }
    char::from_u32(code).unwrap_or('\u{fffd}').to_string()
}

fn decode_named(reference: &str) -> String {
    if reference.ends_with(';') {
        let entity = format!("&{reference}");
        let decoded = html_escape::decode_html_entities(&entity);
        if decoded != entity {
            return decoded.into_owned();
        }
    } else if LEGACY_NAMES.contains(&reference) {
        return legacy(reference);
    }

    // Longest legacy name the reference starts with, the rest stays as text
    let prefix = reference
        .char_indices()
        .map(|(i, _)| i)
        .filter(|&i| i >= 2)
        .rev()
        .find(|&i| LEGACY_NAMES.contains(&&reference[..i]));
    match prefix {
        Some(i) => format!("{}{}", legacy(&reference[..i]), &reference[i..]),
        None => format!("&{reference}"),
    }
}

fn legacy(name: &str) -> String {
    html_escape::decode_html_entities(&format!("&{name};")).into_owned()
}

/// References in 0x80..=0x9F name the windows-1252 character, a few others
/// are replaced outright.
fn windows_1252(code: u32) -> Option<char> {
    let c = match code {
        0x00 => '\u{fffd}',
        0x0d => '\r',
        0x80 => '\u{20ac}',
        0x81 => '\u{81}',
        0x82 => '\u{201a}',
        0x83 => '\u{0192}',
        0x84 => '\u{201e}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02c6}',
        0x89 => '\u{2030}',
        0x8a => '\u{0160}',
        0x8b => '\u{2039}',
        0x8c => '\u{0152}',
        0x8d => '\u{8d}',
        0x8e => '\u{017d}',
        0x8f => '\u{8f}',
        0x90 => '\u{90}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201c}',
        0x94 => '\u{201d}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02dc}',
        0x99 => '\u{2122}',
        0x9a => '\u{0161}',
        0x9b => '\u{203a}',
        0x9c => '\u{0153}',
        0x9d => '\u{9d}',
        0x9e => '\u{017e}',
        0x9f => '\u{0178}',
        _ => return None,
    };
    Some(c)
}

/// Control characters and noncharacters, which decode to nothing.
fn is_dropped(code: u32) -> bool {
    matches!(code, 0x01..=0x08 | 0x0b | 0x0e..=0x1f | 0x7f..=0x9f | 0xfdd0..=0xfdef)
        || (code <= 0x10ffff && code & 0xfffe == 0xfffe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(unescape("no references"), Cow::Borrowed(_)));
    }

    #[test]
    fn named_references() {
        assert_eq!("café <b>", unescape("caf&eacute; &lt;b&gt;"));
        assert_eq!("&unknown;", unescape("&unknown;"));
        assert_eq!("& alone", unescape("& alone"));
    }

    #[test]
    fn legacy_names_without_semicolon() {
        assert_eq!("a&b", unescape("a&ampb"));
        assert_eq!("\u{a0}\u{a0}", unescape("&nbsp&nbsp;"));
        assert_eq!("©2024", unescape("&copy2024"));
        assert_eq!("¬in", unescape("&notin"));
        assert_eq!("∉", unescape("&notin;"));
        assert_eq!("&zzz", unescape("&zzz"));
    }

    #[test]
    fn numeric_references() {
        assert_eq!("AB", unescape("&#65;&#x42;"));
        assert_eq!("A", unescape("&#65"));
        assert_eq!("€euro", unescape("&#x80;euro"));
        assert_eq!("\u{2019}", unescape("&#146;"));
        assert_eq!("\u{fffd}", unescape("&#0;"));
        assert_eq!("\u{fffd}", unescape("&#xD800;"));
        assert_eq!("\u{fffd}", unescape("&#99999999999999;"));
        assert_eq!("ab", unescape("a&#1;b"));
        assert_eq!("", unescape("&#xFFFF;"));
    }
}
