use crate::domain::DomainError;

pub const MIN_MESSAGE_CHARS: usize = 2;
pub const MAX_MESSAGE_CHARS: usize = 10_000;

/// A user message that passed length validation.
///
/// Length is counted in UTF-16 code units, the same measure a JavaScript
/// string's `length` reports. Characters outside the Basic Multilingual Plane,
/// such as most emoji, count as two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageInput(String);

impl MessageInput {
    pub fn parse(text: impl Into<String>) -> Result<Self, DomainError> {
        let text = text.into();
        let len = utf16_len(&text);

        if len < MIN_MESSAGE_CHARS {
            return Err(DomainError::invalid_input(format!(
                "message must be at least {MIN_MESSAGE_CHARS} characters (got {len})"
            )));
        }
        if len > MAX_MESSAGE_CHARS {
            return Err(DomainError::invalid_input(format!(
                "message must be at most {MAX_MESSAGE_CHARS} characters (got {len})"
            )));
        }

        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for MessageInput {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}
