use super::Value;

/// Replaces block markers on top-level allow-listed keys with their text.
///
/// The block parser leaves `>` or `|` in place of a multi-line value. This
/// pass scans the original source (blank lines intact) for the `key: >` or
/// `key: |` header and collects the lines that follow it. Keys outside
/// `fields` keep the marker.
#[must_use]
pub fn recover_folded_text<S: AsRef<str>>(source: &str, mut value: Value, fields: &[S]) -> Value {
    if let Value::Mapping(map) = &mut value {
        for field in fields.iter().map(AsRef::as_ref) {
            if !map.get(field).is_some_and(Value::is_block_marker) {
                continue;
            }
            if let Some(text) = extract_block(source, field) {
                map.insert(field.to_string(), Value::String(text));
            }
        }
    }
    value
}

/// Collects the block under the first top-level `key: >` or `key: |` line.
///
/// Following lines belong to the block while they are blank or indented by
/// at least two spaces; exactly two spaces are stripped from each. Trailing
/// whitespace is trimmed from the result.
fn extract_block(source: &str, key: &str) -> Option<String> {
    let mut lines = source.lines();
    lines.by_ref().find(|line| is_header(line, key))?;

    let body: Vec<&str> = lines
        .map_while(|line| {
            if line.trim().is_empty() {
                Some("")
            } else {
                line.strip_prefix("  ")
            }
        })
        .collect();

    Some(body.join("\n").trim_end().to_string())
}

fn is_header(line: &str, key: &str) -> bool {
    line.strip_prefix(key)
        .and_then(|rest| rest.strip_prefix(':'))
        .map(str::trim)
        .is_some_and(|marker| marker == Value::FOLDED || marker == Value::LITERAL)
}
