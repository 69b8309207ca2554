//! Parse LLM output into triples

use crate::error::ExtractorError;
use kgraph_domain::Triple;
use serde_json::Value;
use tracing::{debug, warn};

/// Parse an LLM response into triples tagged with `chunk`
///
/// The response may be bare JSON, wrapped in a markdown code fence, or
/// surrounded by prose; the first `[...]` that is empty or holds an object is
/// used, so bracketed references in the prose are skipped. A truncated array
/// is salvaged by keeping its complete objects. Items without a non-blank
/// string `subject`, `predicate` and `object` are dropped with a warning.
///
/// # Errors
///
/// Returns `ExtractorError::InvalidFormat` when no JSON array can be recovered.
pub fn parse_llm_response(response: &str, chunk: usize) -> Result<Vec<Triple>, ExtractorError> {
    let invalid = |reason: &str| ExtractorError::InvalidFormat {
        chunk,
        reason: reason.to_string(),
    };

    let text = strip_code_fence(response);
    let items = match serde_json::from_str::<Value>(text.trim()) {
        Ok(Value::Array(items)) => items,
        _ => recover_array(text).ok_or_else(|| invalid("no JSON array found in response"))?,
    };

    let mut triples = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match parse_item(item) {
            Ok(triple) => triples.push(triple.with_chunk(chunk)),
            Err(reason) => warn!(chunk, item = idx, "Dropping extracted item: {}", reason),
        }
    }

    debug!(chunk, parsed = triples.len(), total = items.len(), "Parsed LLM response");
    Ok(triples)
}

/// Return the body of the first ``` fenced block, or the whole text
fn strip_code_fence(text: &str) -> &str {
    let Some(open) = text.find("```") else {
        return text;
    };
    let after_ticks = &text[open + 3..];
    // Skip an optional language tag on the opening line
    let body_start = match after_ticks.find('\n') {
        Some(newline) if !after_ticks[..newline].contains('[') => newline + 1,
        _ => 0,
    };
    let body = &after_ticks[body_start..];
    match body.find("```") {
        Some(close) => &body[..close],
        None => body,
    }
}

/// Find the triple array in `text`, salvaging complete objects if it was truncated
///
/// Every `[` is tried in turn so bracketed prose such as `see [1]` is skipped.
/// A complete array counts only when it is empty or holds an object.
fn recover_array(text: &str) -> Option<Vec<Value>> {
    let mut offset = 0;
    while let Some(pos) = text[offset..].find('[') {
        let candidate = &text[offset + pos..];
        offset += pos + 1;

        let items = match matching_close(candidate, b'[', b']') {
            Some(end) => parse_array(&candidate[..=end]),
            None => salvage_truncated(candidate),
        };
        if let Some(items) = items {
            return Some(items);
        }
    }
    None
}

fn parse_array(slice: &str) -> Option<Vec<Value>> {
    let items = match serde_json::from_str::<Value>(slice) {
        Ok(Value::Array(items)) => items,
        _ => match serde_json::from_str::<Value>(&strip_trailing_commas(slice)) {
            Ok(Value::Array(items)) => items,
            _ => return None,
        },
    };
    (items.is_empty() || items.iter().any(Value::is_object)).then_some(items)
}

/// Keep every complete top-level object of an array missing its close
fn salvage_truncated(candidate: &str) -> Option<Vec<Value>> {
    let mut items = Vec::new();
    let mut rest = &candidate[1..];
    while let Some(open) = rest.find('{') {
        let obj = &rest[open..];
        let Some(end) = matching_close(obj, b'{', b'}') else {
            break;
        };
        if let Ok(value) = serde_json::from_str::<Value>(&obj[..=end]) {
            items.push(value);
        }
        rest = &obj[end + 1..];
    }

    if items.is_empty() {
        None
    } else {
        warn!(recovered = items.len(), "LLM response was truncated; kept complete items");
        Some(items)
    }
}

/// Byte index of the delimiter closing the one at position 0, ignoring string contents
fn matching_close(text: &str, open: u8, close: u8) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in text.as_bytes().iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            _ if b == open => depth += 1,
            _ if b == close => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Drop commas that directly precede a closing bracket or brace
fn strip_trailing_commas(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let chars: Vec<char> = json.chars().collect();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }
        if c == '"' {
            in_string = true;
        }
        if c == ',' {
            let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
            if matches!(next, Some(']') | Some('}')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

fn parse_item(item: &Value) -> Result<Triple, String> {
    let obj = item
        .as_object()
        .ok_or_else(|| "item is not a JSON object".to_string())?;

    let field = |name: &str| -> Result<String, String> {
        obj.get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| format!("missing or blank '{}'", name))
    };

    let mut triple = Triple::new(field("subject")?, field("predicate")?, field("object")?);

    if let Some(confidence) = obj.get("confidence").and_then(Value::as_f64) {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(format!("confidence {} out of range", confidence));
        }
        triple = triple.with_confidence(confidence);
    }

    Ok(triple)
}
