// SPDX-FileCopyrightText: 2026 Taskmate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Taskmate assistant bot.
//!
//! Holds the shared error type, the persisted record entities, the
//! fixed-offset timezone adapter, and the traits implemented by the
//! messenger and secret cipher adapters.

pub mod calendar;
pub mod clock;
pub mod error;
pub mod records;
pub mod traits;
pub mod types;

pub use clock::{Clock, LocalZone, SystemClock};
pub use error::TaskmateError;
pub use records::{Collection, Record};
pub use traits::{Messenger, SecretCipher};
pub use types::{HealthStatus, MessageId, UserId};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taskmate_error_variants_render() {
        let storage = TaskmateError::Storage {
            source: Box::new(std::io::Error::other("disk gone")),
        };
        assert_eq!(storage.to_string(), "storage error: disk gone");

        let channel = TaskmateError::Channel {
            message: "blocked by user".into(),
            source: None,
        };
        assert_eq!(channel.to_string(), "channel error: blocked by user");

        let not_found = TaskmateError::NotFound {
            collection: Collection::Tasks,
            detail: "index 4".into(),
        };
        assert_eq!(not_found.to_string(), "tasks record not found: index 4");
    }

    #[test]
    fn collection_names_round_trip() {
        use std::str::FromStr;

        for collection in Collection::ALL {
            let name = collection.to_string();
            assert_eq!(Collection::from_str(&name).unwrap(), collection);
        }
        assert_eq!(Collection::AutoMessages.to_string(), "auto_messages");
    }

    #[test]
    fn user_id_serializes_as_bare_integer() {
        let json = serde_json::to_string(&UserId(42)).unwrap();
        assert_eq!(json, "42");
        assert_eq!(UserId(-1001).to_string(), "-1001");
    }
}
