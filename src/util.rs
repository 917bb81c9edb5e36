//! Byte-level helpers for loading pages.

use std::borrow::Cow;

use memchr::memmem;

/// How far into a document to look for a charset declaration.
const SNIFF_LEN: usize = 1024;

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<meta charset>` or `<?xml encoding?>`)
/// 3. Falls back to Windows-1252 (common on older sites)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Find a declared charset near the start of a document.
///
/// Recognizes `<meta charset="...">`, the `charset=` parameter of a
/// `http-equiv` content type, and `<?xml encoding="..."?>`.
pub fn extract_charset_hint(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(SNIFF_LEN)];
    let lowered = prefix.to_ascii_lowercase();

    let value_start = [&b"charset="[..], &b"encoding="[..]]
        .iter()
        .find_map(|needle| memmem::find(&lowered, needle).map(|pos| pos + needle.len()))?;

    let rest = &prefix[value_start..];
    let (rest, quote) = match rest.first() {
        Some(&q) if q == b'"' || q == b'\'' => (&rest[1..], Some(q)),
        _ => (rest, None),
    };

    let end = rest
        .iter()
        .position(|&b| match quote {
            Some(q) => b == q,
            None => b.is_ascii_whitespace() || matches!(b, b'"' | b'\'' | b';' | b'>' | b'/'),
        })
        .unwrap_or(rest.len());

    std::str::from_utf8(&rest[..end]).ok().filter(|s| !s.is_empty())
}
