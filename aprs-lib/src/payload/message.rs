use std::fmt::Display;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Directed message, `:ADDRESSEE:text`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Message {
    /// Addressee with the fixed-width space padding trimmed
    pub addressee: String,
    /// Message text exactly as sent, including any `{id` suffix
    pub text: String,
    /// Addressee field as received, padding included
    #[cfg_attr(feature = "serde", serde(skip))]
    addressee_raw: Option<String>,
}

impl Message {
    /// Width of the addressee field on the wire
    pub const ADDRESSEE_LEN: usize = 9;

    /// Message to `addressee`, padded to [`Self::ADDRESSEE_LEN`] on display.
    #[must_use]
    pub fn new(addressee: &str, text: &str) -> Self {
        Message {
            addressee: addressee.to_string(),
            text: text.to_string(),
            addressee_raw: None,
        }
    }

    /// Parse the message body following the `:` type indicator.
    ///
    /// The addressee field is kept as received for display.
    #[must_use]
    pub fn parse(body: &str) -> Option<Self> {
        let (addressee, text) = body.split_once(':')?;
        Some(Message {
            addressee: addressee.trim().to_string(),
            text: text.to_string(),
            addressee_raw: Some(addressee.to_string()),
        })
    }

    /// Bulletins and announcements are addressed to `BLNn`.
    #[must_use]
    pub fn is_bulletin(&self) -> bool {
        self.addressee.starts_with("BLN")
    }

    /// Message number following a trailing `{`, if any.
    #[must_use]
    pub fn ack_id(&self) -> Option<&str> {
        let (_, id) = self.text.rsplit_once('{')?;
        let id = id.trim_end();
        if id.is_empty() || id.len() > 5 || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(id)
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref raw) = self.addressee_raw {
            return write!(f, "{raw}:{}", self.text);
        }
        write!(
            f,
            "{:<width$}:{}",
            self.addressee,
            self.text,
            width = Self::ADDRESSEE_LEN
        )
    }
}
