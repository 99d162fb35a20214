use crate::llm::error::ExtractError;
use serde_json::Value;

/// The top-level JSON shape a pipeline expects from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// `{...}`
    Object,
    /// `[{...}, ...]`
    ArrayOfObjects,
}

impl PayloadKind {
    fn label(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::ArrayOfObjects => "array of objects",
        }
    }

    fn opener(self) -> char {
        match self {
            Self::Object => '{',
            Self::ArrayOfObjects => '[',
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::Object => value.is_object(),
            Self::ArrayOfObjects => value
                .as_array()
                .and_then(|items| items.first())
                .is_some_and(Value::is_object),
        }
    }
}

/// Pulls the structured payload out of a free-form completion.
///
/// Tried in order: the whole trimmed text, the body of a Markdown code fence,
/// then the top-level bracket-balanced spans opening with the expected
/// bracket, in document order. The first candidate that parses and has the
/// expected shape wins, so an example emitted before the real answer will be
/// taken if it is itself valid JSON. A span that fails is skipped whole; its
/// inner fragments are never candidates.
pub fn extract_payload(text: &str, kind: PayloadKind) -> Result<Value, ExtractError> {
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if kind.accepts(&value) {
            return Ok(value);
        }
    }

    if let Some(inner) = fenced_block(trimmed) {
        if let Ok(value) = serde_json::from_str::<Value>(inner) {
            if kind.accepts(&value) {
                return Ok(value);
            }
        }
    }

    let mut candidates = 0usize;
    let mut last_error = String::new();
    let mut from = 0usize;
    while let Some((start, end)) = next_span(trimmed, kind, from) {
        candidates += 1;
        match serde_json::from_str::<Value>(&trimmed[start..end]) {
            Ok(value) if kind.accepts(&value) => return Ok(value),
            Ok(_) => last_error = format!("span is not a JSON {}", kind.label()),
            Err(err) => last_error = err.to_string(),
        }
        from = end;
    }

    if candidates == 0 {
        Err(ExtractError::NotFound {
            expected: kind.label(),
        })
    } else {
        Err(ExtractError::Parse {
            expected: kind.label(),
            candidates,
            last_error,
        })
    }
}

/// Body of the first ```` ``` ```` fence (language tag line skipped).
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_open = &text[open + 3..];
    let body_start = after_open.find('\n')? + 1;
    let body = &after_open[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}

/// First balanced span at or after `from` that opens with the bracket of
/// `kind`, as `(start, end)` byte offsets. Openers that never close are
/// passed over.
fn next_span(text: &str, kind: PayloadKind, from: usize) -> Option<(usize, usize)> {
    let opener = kind.opener();
    text[from..]
        .char_indices()
        .map(|(i, c)| (from + i, c))
        .filter(|&(_, c)| c == opener)
        .filter(|&(start, _)| {
            kind != PayloadKind::ArrayOfObjects
                || text[start + 1..].trim_start().starts_with('{')
        })
        .find_map(|(start, _)| balanced_end(text, start).map(|end| (start, end)))
}

/// Byte offset just past the bracket closing the one at `start`.
/// String literals and escapes are skipped; `None` if the span never closes.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}
