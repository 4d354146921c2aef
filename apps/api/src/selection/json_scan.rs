//! Locates the first complete JSON object inside free-form model output.
//!
//! Model replies are expected to be a bare JSON object but routinely arrive
//! wrapped in code fences or followed by commentary. The scanner walks the
//! text, tracks brace depth outside of string literals, and returns the first
//! balanced `{...}` span that parses as a JSON object. Everything before and
//! after that span is ignored.
//!
//! Only top-level spans are candidates. A balanced span that is not valid JSON
//! is skipped as a whole, so an object nested inside a malformed reply is
//! never mistaken for the reply itself.

/// Returns the first top-level balanced `{...}` span of `text` that is a valid
/// JSON object.
pub fn extract_first_json_object(text: &str) -> Option<&str> {
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        // An unclosed brace swallows everything after it.
        let len = balanced_object_len(&text.as_bytes()[start..])?;
        let candidate = &text[start..start + len];
        let is_object = serde_json::from_str::<serde_json::Value>(candidate)
            .map(|v| v.is_object())
            .unwrap_or(false);
        if is_object {
            return Some(candidate);
        }
        search_from = start + len;
    }

    None
}

/// Length of the balanced object starting at `bytes[0] == b'{'`, if it closes.
///
/// Braces inside string literals (including escaped quotes) do not count.
/// Only ASCII bytes are inspected, so the returned length always falls on a
/// UTF-8 boundary.
fn balanced_object_len(bytes: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &byte) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}
