use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of a queued item.
///
/// Backed by a random v4 UUID, so two uploads of the same file in the same
/// batch still get distinct ids, and ids are never reused after a clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Coarse status of an item, without payload. Used for counting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Success,
    Error,
}

impl ProcessingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Lifecycle state of an item.
///
/// The result text only exists on `Success` and the error message only on
/// `Error`, so the two can never be set at the same time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Processing,
    Success(String),
    Error(String),
}

impl ItemStatus {
    pub fn kind(&self) -> ProcessingStatus {
        match self {
            Self::Pending => ProcessingStatus::Pending,
            Self::Processing => ProcessingStatus::Processing,
            Self::Success(_) => ProcessingStatus::Success,
            Self::Error(_) => ProcessingStatus::Error,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind().is_terminal()
    }

    pub fn result_text(&self) -> Option<&str> {
        match self {
            Self::Success(text) => Some(text),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Whether `self -> next` is an edge of the item state machine:
    /// `Pending -> Processing -> {Success | Error}`.
    pub fn can_transition_to(&self, next: &ItemStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Processing, Self::Success(_))
                | (Self::Processing, Self::Error(_))
        )
    }
}

impl Default for ItemStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// An image in transport form: base64 payload plus its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Standard base64, no line breaks, no `data:` prefix.
    pub payload: String,
    pub mime_type: String,
}

impl EncodedImage {
    pub fn new(payload: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            mime_type: mime_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_ids_are_unique() {
        let a = ItemId::new();
        let b = ItemId::new();
        assert_ne!(a, b);
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_status_payload_accessors() {
        let ok = ItemStatus::Success("ஸ்ரீ".into());
        assert_eq!(ok.result_text(), Some("ஸ்ரீ"));
        assert_eq!(ok.error_message(), None);

        let failed = ItemStatus::Error("API Error: boom".into());
        assert_eq!(failed.result_text(), None);
        assert_eq!(failed.error_message(), Some("API Error: boom"));

        assert_eq!(ItemStatus::Pending.result_text(), None);
        assert_eq!(ItemStatus::Processing.error_message(), None);
    }

    #[test]
    fn test_state_machine_edges() {
        let done = ItemStatus::Success("x".into());
        assert!(ItemStatus::Pending.can_transition_to(&ItemStatus::Processing));
        assert!(ItemStatus::Processing.can_transition_to(&done));
        assert!(ItemStatus::Processing.can_transition_to(&ItemStatus::Error("e".into())));

        assert!(!ItemStatus::Pending.can_transition_to(&done));
        assert!(!ItemStatus::Processing.can_transition_to(&ItemStatus::Pending));
        assert!(!done.can_transition_to(&ItemStatus::Processing));
        assert!(!done.can_transition_to(&ItemStatus::Error("late".into())));
    }

    #[test]
    fn test_terminal_kinds() {
        assert!(!ProcessingStatus::Pending.is_terminal());
        assert!(!ProcessingStatus::Processing.is_terminal());
        assert!(ProcessingStatus::Success.is_terminal());
        assert!(ProcessingStatus::Error.is_terminal());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_value(ItemStatus::Success("abc".into())).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["detail"], "abc");
        assert_eq!(
            serde_json::to_value(ProcessingStatus::Processing).unwrap(),
            "PROCESSING"
        );
    }
}
