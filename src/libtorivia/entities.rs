use log::debug;
use std::borrow::Cow;

/// Longest named reference in the HTML5 table is `&CounterClockwiseContourIntegral;`.
const MAX_REFERENCE_LEN: usize = 34;
const REPLACEMENT: char = '\u{fffd}';

/// Numeric references in 0x80..=0x9F name Windows-1252 bytes, not C1 controls.
const WINDOWS_1252: [(u32, char); 27] = [
    (0x80, '€'),
    (0x82, '‚'),
    (0x83, 'ƒ'),
    (0x84, '„'),
    (0x85, '…'),
    (0x86, '†'),
    (0x87, '‡'),
    (0x88, 'ˆ'),
    (0x89, '‰'),
    (0x8A, 'Š'),
    (0x8B, '‹'),
    (0x8C, 'Œ'),
    (0x8E, 'Ž'),
    (0x91, '‘'),
    (0x92, '’'),
    (0x93, '“'),
    (0x94, '”'),
    (0x95, '•'),
    (0x96, '–'),
    (0x97, '—'),
    (0x98, '˜'),
    (0x99, '™'),
    (0x9A, 'š'),
    (0x9B, '›'),
    (0x9C, 'œ'),
    (0x9E, 'ž'),
    (0x9F, 'Ÿ'),
];

/// Decodes HTML character references the way a browser does for text
/// content: every HTML5 named reference, `&#NN;` and `&#xNN;`. Anything that
/// doesn't parse as a reference stays exactly as written.
pub(crate) fn decode_html(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_reference(rest) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// `text` starts with `&`. Returns the decoded text and how many bytes the
/// reference spanned.
fn decode_reference(text: &str) -> Option<(Cow<'_, str>, usize)> {
    let semi = text[1..]
        .char_indices()
        .take(MAX_REFERENCE_LEN)
        .find(|(_, c)| *c == ';')
        .map(|(i, _)| i + 1)?;
    let body = &text[1..semi];

    let decoded = match body.strip_prefix('#') {
        Some(numeric) => Cow::Owned(decode_numeric(numeric)?.to_string()),
        None => {
            let reference = &text[..=semi];
            let decoded = html_escape::decode_html_entities(reference);
            if decoded == reference {
                debug!("[Entities] Unknown entity {}", reference);
                return None;
            }
            decoded
        }
    };
    Some((decoded, semi + 1))
}

/// The part of `&#...;` after the `#`.
fn decode_numeric(numeric: &str) -> Option<char> {
    let (digits, radix) = match numeric.strip_prefix(|c: char| c == 'x' || c == 'X') {
        Some(hex) => (hex, 16),
        None => (numeric, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }

    // Saturate so absurdly long references still land on U+FFFD.
    let code = digits.chars().fold(0u32, |acc, c| {
        acc.saturating_mul(radix)
            .saturating_add(c.to_digit(radix).unwrap_or(0))
            .min(0x11_0000)
    });
    if let Some((_, ch)) = WINDOWS_1252.iter().find(|(byte, _)| *byte == code) {
        return Some(*ch);
    }
    match code {
        0 => Some(REPLACEMENT),
        code => Some(char::from_u32(code).unwrap_or(REPLACEMENT)),
    }
}
