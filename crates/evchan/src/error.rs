#![forbid(unsafe_code)]

//! Errors reported by subscription handles.
//!
//! Most misuse is ruled out by ownership: a handle cannot be copied, and
//! removing an unknown id is a silent no-op. The one condition left to report
//! is a handle that outlived its channel.

use crate::channel::SubscriberId;

/// Errors from event channel operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The channel was dropped while a handle still referred to it.
    ChannelClosed { id: SubscriberId, label: String },
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ChannelClosed { id, label } => {
                write!(f, "channel closed before subscription '{label}' ({id}) was released")
            }
        }
    }
}

impl std::error::Error for EventError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_label_and_id() {
        let channel = crate::Channel::<u8>::new();
        let sub = channel.subscribe(|_| {}, "door");
        let id = sub.id();
        drop(channel);

        let err = EventError::ChannelClosed {
            id,
            label: "door".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "channel closed before subscription 'door' (#0) was released"
        );
        let _: &dyn std::error::Error = &err;
        drop(sub);
    }
}
