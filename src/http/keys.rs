//! Decode-time key translation.
//!
//! Echo services answer with `snake_case` keys while the response types in
//! this crate are declared with `#[serde(rename_all = "camelCase")]`. Rather
//! than renaming every field by hand, the decoded JSON tree is rewritten once
//! before it is handed to serde.

use std::borrow::Cow;

use serde_json::{Map, Value};

/// How object keys are rewritten before a response is deserialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyDecodingStrategy {
    /// Keys are matched exactly as they appear on the wire.
    UseDefaultKeys,
    /// `snake_case` keys are converted to `camelCase`.
    #[default]
    ConvertFromSnakeCase,
}

impl KeyDecodingStrategy {
    /// Rewrites every object key in `value`, at any depth.
    pub fn apply(self, value: Value) -> Value {
        match self {
            KeyDecodingStrategy::UseDefaultKeys => value,
            KeyDecodingStrategy::ConvertFromSnakeCase => convert_keys(value),
        }
    }
}

fn convert_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut converted = Map::with_capacity(map.len());
            for (key, inner) in map {
                // on collision the key that iterates last wins
                converted.insert(convert_from_snake_case(&key).into_owned(), convert_keys(inner));
            }
            Value::Object(converted)
        },
        Value::Array(items) => Value::Array(items.into_iter().map(convert_keys).collect()),
        other => other,
    }
}

/// Converts a single `snake_case` key to `camelCase`.
///
/// Leading and trailing underscores are preserved and runs of underscores in
/// the middle collapse. A key with a single word between its underscores is
/// returned untouched, case included.
///
/// ```rust
/// use echofetch::http::convert_from_snake_case;
///
/// assert_eq!(convert_from_snake_case("param_a"), "paramA");
/// assert_eq!(convert_from_snake_case("_private_key_"), "_privateKey_");
/// assert_eq!(convert_from_snake_case("alreadyCamel"), "alreadyCamel");
/// ```
pub fn convert_from_snake_case(key: &str) -> Cow<'_, str> {
    if !key.contains('_') {
        return Cow::Borrowed(key);
    }

    let start = key.find(|c: char| c != '_');
    let Some(start) = start else {
        return Cow::Borrowed(key);
    };
    // `start` found a non-underscore, so `rfind` does too
    let end = key.rfind(|c: char| c != '_').map_or(key.len(), |i| i + 1);

    let (leading, rest) = key.split_at(start);
    let (body, trailing) = rest.split_at(end - start);

    let parts: Vec<&str> = body.split('_').filter(|p| !p.is_empty()).collect();
    if parts.len() == 1 {
        return Cow::Borrowed(key);
    }

    let mut out = String::with_capacity(key.len());
    out.push_str(leading);
    out.push_str(&parts[0].to_lowercase());
    for part in &parts[1..] {
        capitalize_into(part, &mut out);
    }
    out.push_str(trailing);
    Cow::Owned(out)
}

fn capitalize_into(word: &str, out: &mut String) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(&chars.as_str().to_lowercase());
    }
}
