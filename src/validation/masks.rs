//! Value masks applied to fields that passed validation.

use base64::{engine::general_purpose::STANDARD, Engine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mask {
    Lower,
    Upper,
    /// Capitalizes each space-separated word and lowercases the rest of it.
    Pascal,
    Base64Decode,
}

impl Mask {
    pub fn apply(self, value: &str) -> String {
        match self {
            Mask::Lower => value.to_lowercase(),
            Mask::Upper => value.to_uppercase(),
            Mask::Pascal => to_pascal(value),
            // Undecodable input is left as is; the password format rejects it first.
            Mask::Base64Decode => decode_base64(value).unwrap_or_else(|| value.to_string()),
        }
    }
}

fn to_pascal(value: &str) -> String {
    value
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.as_str().to_lowercase().chars())
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decodes standard base64 into UTF-8 text. Empty or invalid input yields `None`.
pub fn decode_base64(encoded: &str) -> Option<String> {
    if encoded.is_empty() {
        return None;
    }
    let bytes = STANDARD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

pub fn encode_base64(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    Some(STANDARD.encode(text))
}
