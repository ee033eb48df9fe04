//! Widget identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Process-wide unique, opaque identity of a widget.
///
/// Generated once when a widget is created and never reused. Rendered and
/// persisted as 32 lowercase hex digits.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WidgetId(u128);

impl WidgetId {
    /// Generate a fresh random identity.
    pub fn generate() -> Self {
        Self(rand::random())
    }

    /// Build an identity from a raw value.
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// The raw 128-bit value.
    pub const fn as_raw(self) -> u128 {
        self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl fmt::Debug for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WidgetId({self})")
    }
}

/// Error returned when parsing a malformed [`WidgetId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid widget id '{0}'")]
pub struct ParseWidgetIdError(String);

impl FromStr for WidgetId {
    type Err = ParseWidgetIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 32 {
            return Err(ParseWidgetIdError(s.to_owned()));
        }
        u128::from_str_radix(s, 16)
            .map(Self)
            .map_err(|_| ParseWidgetIdError(s.to_owned()))
    }
}

impl TryFrom<String> for WidgetId {
    type Error = ParseWidgetIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WidgetId> for String {
    fn from(id: WidgetId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_fixed_width_hex() {
        let id = WidgetId::from_raw(0xab);
        assert_eq!(id.to_string(), "000000000000000000000000000000ab");
        assert_eq!(id.to_string().parse::<WidgetId>().unwrap(), id);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!("xyz".parse::<WidgetId>().is_err());
        assert!("g0000000000000000000000000000000".parse::<WidgetId>().is_err());
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(WidgetId::generate(), WidgetId::generate());
    }

    #[test]
    fn test_serializes_as_string() {
        let id = WidgetId::from_raw(1);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000000000000000000000000001\"");
        let back: WidgetId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
