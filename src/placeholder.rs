//! Tokenizer for `${name}` workflow parameter placeholders.

use std::collections::HashMap;
use std::ops::Range;

/// One `${name}` occurrence. `span` covers the whole token, braces included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub name: &'a str,
    pub span: Range<usize>,
}

/// Find every placeholder in `input`, left to right, without overlaps.
///
/// A name is at least one character long, ends at the first `}` after that
/// character and never spans a line break. An unterminated `${` ends the scan.
pub fn scan(input: &str) -> Vec<Placeholder<'_>> {
    let mut found = Vec::new();
    let mut offset = 0;

    while let Some(rel) = input[offset..].find("${") {
        let start = offset + rel;
        let name_start = start + 2;
        let rest = &input[name_start..];

        let Some(first) = rest.chars().next() else {
            break;
        };
        let skip = first.len_utf8();
        let Some(rel_end) = rest[skip..].find('}') else {
            break;
        };

        let name_end = name_start + skip + rel_end;
        let name = &input[name_start..name_end];
        if name.contains(is_line_terminator) {
            // Retry just past the `$`
            offset = start + 1;
            continue;
        }

        found.push(Placeholder {
            name,
            span: start..name_end + 1,
        });
        offset = name_end + 1;
    }

    found
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Replace every placeholder that has a non-empty value in `values`.
///
/// Replacement works on the spans of the original string, so a substituted
/// value that itself looks like a placeholder is never expanded again.
pub fn substitute(input: &str, values: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut cursor = 0;

    for placeholder in scan(input) {
        let Some(value) = values.get(placeholder.name).filter(|v| !v.is_empty()) else {
            continue;
        };
        out.push_str(&input[cursor..placeholder.span.start]);
        out.push_str(value);
        cursor = placeholder.span.end;
    }

    out.push_str(&input[cursor..]);
    out
}
