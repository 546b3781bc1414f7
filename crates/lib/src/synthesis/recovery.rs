//! Recovery of a JSON object from free-form model output.
//!
//! Models regularly wrap the JSON block in prose or markdown fences, emit
//! back-tick-delimited multi-line values, or leave trailing commas. The
//! extraction below balances braces with an explicit string/escape state
//! machine, so braces inside quoted values never corrupt the count, then
//! applies the repair passes.

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ScanState {
    OutsideString,
    InsideString,
    Escaped,
}

/// Extracts the first balanced JSON object from `raw` and repairs the
/// common failure modes. Returns a string expected to parse as JSON, or a
/// reason when no balanced object exists.
pub fn extract_json_block(raw: &str) -> Result<String, String> {
    let start = raw
        .find('{')
        .ok_or_else(|| "no opening brace in model output".to_string())?;

    let mut state = ScanState::OutsideString;
    let mut depth = 0usize;

    for (offset, c) in raw[start..].char_indices() {
        match state {
            ScanState::OutsideString => match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let block = &raw[start..start + offset + c.len_utf8()];
                        return Ok(repair(block));
                    }
                }
                '"' => state = ScanState::InsideString,
                _ => {}
            },
            ScanState::InsideString => match c {
                '\\' => state = ScanState::Escaped,
                '"' => state = ScanState::OutsideString,
                _ => {}
            },
            ScanState::Escaped => state = ScanState::InsideString,
        }
    }

    Err("unbalanced braces in model output".to_string())
}

/// Repair passes applied to the extracted block, in order.
fn repair(block: &str) -> String {
    let repaired = repair_backtick_values(block);
    strip_trailing_commas(&repaired)
}

/// Converts back-tick-delimited values (`key`: `multi
/// line text`) into properly escaped JSON strings.
fn repair_backtick_values(block: &str) -> String {
    // Compile failure is impossible for this literal pattern.
    let re = match Regex::new(r"(?s):\s*`([^`]*)`") {
        Ok(re) => re,
        Err(_) => return block.to_string(),
    };
    re.replace_all(block, |caps: &regex::Captures| {
        let escaped = serde_json::to_string(&caps[1]).unwrap_or_else(|_| "\"\"".to_string());
        format!(": {escaped}")
    })
    .into_owned()
}

/// Strips trailing commas before a closing `}` or `]`.
fn strip_trailing_commas(block: &str) -> String {
    let re = match Regex::new(r",\s*([}\]])") {
        Ok(re) => re,
        Err(_) => return block.to_string(),
    };
    re.replace_all(block, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_object() {
        let raw = r#"{"title": "T", "summary": "S"}"#;
        let block = extract_json_block(raw).unwrap();
        let value: serde_json::Value = serde_json::from_str(&block).unwrap();
        assert_eq!(value["title"], "T");
    }

    #[test]
    fn ignores_prose_and_markdown_fences() {
        let raw = "Here is your article:\n```json\n{\"title\": \"T\"}\n```\nHope it helps!";
        let block = extract_json_block(raw).unwrap();
        let value: serde_json::Value = serde_json::from_str(&block).unwrap();
        assert_eq!(value["title"], "T");
    }

    #[test]
    fn braces_inside_strings_do_not_corrupt_balancing() {
        let raw = r#"{"content": "code sample: fn main() { println!(\"{}\", 1); }"}"#;
        let block = extract_json_block(raw).unwrap();
        let value: serde_json::Value = serde_json::from_str(&block).unwrap();
        assert!(value["content"].as_str().unwrap().contains("println!"));
    }

    #[test]
    fn escaped_quotes_keep_string_state() {
        let raw = r#"prefix {"a": "she said \"hi\" {not a brace}"} suffix"#;
        let block = extract_json_block(raw).unwrap();
        let value: serde_json::Value = serde_json::from_str(&block).unwrap();
        assert_eq!(value["a"], r#"she said "hi" {not a brace}"#);
    }

    #[test]
    fn repairs_trailing_comma_in_fenced_block() {
        let raw = "```json\n{\"title\": \"T\", \"summary\": \"S\",}\n```";
        let block = extract_json_block(raw).unwrap();
        let value: serde_json::Value = serde_json::from_str(&block).unwrap();
        assert_eq!(value["title"], "T");
        assert_eq!(value["summary"], "S");
    }

    #[test]
    fn repairs_backtick_values() {
        let raw = "{\"content\": `## Heading\nline \"two\"`}";
        let block = extract_json_block(raw).unwrap();
        let value: serde_json::Value = serde_json::from_str(&block).unwrap();
        assert_eq!(value["content"], "## Heading\nline \"two\"");
    }

    #[test]
    fn rejects_output_without_object() {
        assert!(extract_json_block("sorry, I cannot help with that").is_err());
        assert!(extract_json_block("{\"truncated\": \"resp").is_err());
    }
}
