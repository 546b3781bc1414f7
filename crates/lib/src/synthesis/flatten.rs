//! The model's `content` fields are contractually strings, yet nested
//! objects still show up in practice. The ambiguity is modeled as an
//! explicit variant at the parse boundary and flattened to markdown here,
//! so it never leaks into the rest of the pipeline.

use serde::Deserialize;
use serde_json::Value;

/// A content field as the model actually returns it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ContentField {
    Text(String),
    Structured(serde_json::Map<String, Value>),
}

impl Default for ContentField {
    fn default() -> Self {
        ContentField::Text(String::new())
    }
}

/// Converts a content field to a flat markdown string.
///
/// Top-level keys become `## Title Case` headings, nested object keys
/// become `### ` sub-headings, and remaining scalars are stringified.
pub fn flatten_content(field: ContentField) -> String {
    match field {
        ContentField::Text(text) => text,
        ContentField::Structured(map) => {
            let mut sections = Vec::new();
            for (key, value) in map {
                sections.push(format!("## {}", title_case(&key)));
                match value {
                    Value::Object(nested) => {
                        for (sub_key, sub_value) in nested {
                            sections.push(format!("### {}", title_case(&sub_key)));
                            sections.push(stringify(&sub_value));
                        }
                    }
                    other => sections.push(stringify(&other)),
                }
            }
            sections.join("\n\n")
        }
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn title_case(key: &str) -> String {
    key.split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
