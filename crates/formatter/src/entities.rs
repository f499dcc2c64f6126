use crate::content_type::compile;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::collections::HashMap;

static ENTITY_REF: Lazy<Regex> =
    Lazy::new(|| compile(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z][a-zA-Z0-9]{1,31});"));

static NAMED_ENTITIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("amp", "&"),
        ("lt", "<"),
        ("gt", ">"),
        ("quot", "\""),
        ("apos", "'"),
        ("nbsp", "\u{00A0}"),
        ("ensp", "\u{2002}"),
        ("emsp", "\u{2003}"),
        ("thinsp", "\u{2009}"),
        ("copy", "\u{00A9}"),
        ("reg", "\u{00AE}"),
        ("trade", "\u{2122}"),
        ("hellip", "\u{2026}"),
        ("mdash", "\u{2014}"),
        ("ndash", "\u{2013}"),
        ("lsquo", "\u{2018}"),
        ("rsquo", "\u{2019}"),
        ("ldquo", "\u{201C}"),
        ("rdquo", "\u{201D}"),
        ("laquo", "\u{00AB}"),
        ("raquo", "\u{00BB}"),
        ("bull", "\u{2022}"),
        ("middot", "\u{00B7}"),
        ("deg", "\u{00B0}"),
        ("times", "\u{00D7}"),
        ("divide", "\u{00F7}"),
        ("euro", "\u{20AC}"),
        ("pound", "\u{00A3}"),
        ("yen", "\u{00A5}"),
        ("cent", "\u{00A2}"),
        ("sect", "\u{00A7}"),
        ("para", "\u{00B6}"),
    ])
});

/// Turns HTML character references into the characters they stand for.
///
/// This is the only environment-specific step of sanitization; swap the implementation
/// to change how references are resolved.
pub trait EntityDecoder {
    fn decode<'a>(&self, input: &'a str) -> Cow<'a, str>;
}

/// Table-driven decoder: common named entities plus decimal and hex numeric references.
///
/// Unknown named references are left untouched. Numeric references to NUL, surrogates or
/// values past U+10FFFF decode to U+FFFD.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEntityTable;

impl EntityDecoder for HtmlEntityTable {
    fn decode<'a>(&self, input: &'a str) -> Cow<'a, str> {
        if !input.contains('&') {
            return Cow::Borrowed(input);
        }
        ENTITY_REF.replace_all(input, |caps: &Captures| {
            let body = &caps[1];
            match resolve(body) {
                Some(text) => text,
                None => caps[0].to_string(),
            }
        })
    }
}

fn resolve(body: &str) -> Option<String> {
    if let Some(numeric) = body.strip_prefix('#') {
        let code = match numeric.strip_prefix(|c: char| c == 'x' || c == 'X') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        let ch = match code {
            0 => '\u{FFFD}',
            _ => char::from_u32(code).unwrap_or('\u{FFFD}'),
        };
        return Some(ch.to_string());
    }
    NAMED_ENTITIES.get(body).map(|s| (*s).to_string())
}

/// Decode with the built-in table.
#[must_use]
pub fn decode_html_entities(input: &str) -> String {
    HtmlEntityTable.decode(input).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_common_named_entities() {
        assert_eq!(
            decode_html_entities("Fish &amp; Chips &lt;b&gt; &quot;hi&quot; &apos;x&apos;"),
            "Fish & Chips <b> \"hi\" 'x'"
        );
        assert_eq!(decode_html_entities("a&nbsp;b"), "a\u{00A0}b");
        assert_eq!(decode_html_entities("&hellip;&mdash;&copy;"), "\u{2026}\u{2014}\u{00A9}");
    }

    #[test]
    fn decodes_numeric_references() {
        assert_eq!(decode_html_entities("&#65;&#x42;&#X43;"), "ABC");
        assert_eq!(decode_html_entities("&#128512;"), "\u{1F600}");
        assert_eq!(decode_html_entities("&#0;"), "\u{FFFD}");
        assert_eq!(decode_html_entities("&#xD800;"), "\u{FFFD}");
    }

    #[test]
    fn leaves_unknown_and_bare_ampersands() {
        assert_eq!(decode_html_entities("&bogus; & AT&T"), "&bogus; & AT&T");
    }

    #[test]
    fn decodes_a_single_level_only() {
        assert_eq!(decode_html_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn borrowed_when_nothing_to_decode() {
        assert!(matches!(HtmlEntityTable.decode("plain"), Cow::Borrowed(_)));
    }
}
