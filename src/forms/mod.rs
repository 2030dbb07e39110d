//! Form payloads submitted by the admin pages and their sanitization helpers.

pub mod categories;
pub mod products;

/// Parse an optional positive identifier submitted as text.
///
/// Blank and non-positive values mean "no selection"; the raw text is
/// returned as the error when it is not a number.
pub(crate) fn parse_optional_id(value: Option<String>) -> Result<Option<i32>, String> {
    let Some(raw) = value else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<i32>() {
        Ok(parsed) if parsed > 0 => Ok(Some(parsed)),
        Ok(_) => Ok(None),
        Err(_) => Err(trimmed.to_string()),
    }
}

/// Collapse whitespace runs into single spaces and drop control characters.
pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

/// Sanitize each line and squeeze blank line runs into one.
pub(crate) fn sanitize_multiline_text(input: &str) -> String {
    let mut result: Vec<String> = Vec::new();
    let mut previous_empty = false;

    for line in input.lines().map(sanitize_inline_text) {
        if line.is_empty() {
            if previous_empty || result.is_empty() {
                continue;
            }
            previous_empty = true;
        } else {
            previous_empty = false;
        }
        result.push(line);
    }

    while matches!(result.last(), Some(line) if line.is_empty()) {
        result.pop();
    }

    result.join("\n")
}
