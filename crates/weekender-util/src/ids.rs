//! Strongly-typed identifiers for weekender
//!
//! Every identifier here is assigned by a remote service (Nextcloud or
//! Telegram), so they wrap the integer the service hands out rather than
//! generating anything locally.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! remote_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }
    };
}

remote_id!(
    /// Identifier of a poll on the Nextcloud Polls instance
    PollId
);

remote_id!(
    /// Identifier of a single option (candidate date) within a poll
    OptionId
);

remote_id!(
    /// Telegram chat identifier. Group chats are negative.
    ChatId
);

remote_id!(
    /// Telegram message identifier, unique within a chat
    MessageId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_compare_by_value() {
        assert_eq!(PollId::new(42), PollId::from(42));
        assert_ne!(OptionId::new(1), OptionId::new(2));
        assert!(MessageId::new(3) < MessageId::new(4));
    }

    #[test]
    fn chat_id_keeps_sign() {
        let chat = ChatId::new(-1001234567890);
        assert_eq!(chat.get(), -1001234567890);
        assert_eq!(chat.to_string(), "-1001234567890");
    }

    #[test]
    fn ids_serialize_as_bare_integers() {
        let json = serde_json::to_string(&OptionId::new(17)).unwrap();
        assert_eq!(json, "17");

        let parsed: ChatId = serde_json::from_str("-5").unwrap();
        assert_eq!(parsed, ChatId::new(-5));
    }
}
