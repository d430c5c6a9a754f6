//! # Message
//!
//! Module dedicated to voicemail messages. The main structure of this
//! module is the [`Message`], which represents the
//! synchronization-relevant attributes of a single voicemail.

use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};

/// The voicemail message.
///
/// An immutable snapshot of a voicemail's metadata, constructed fresh
/// on every fetch. Two snapshots refer to the same logical message
/// when their [`id`](Message::id) match: all other attributes may
/// legitimately differ between stores (the read status, typically).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct Message {
    /// The provider-assigned message identifier.
    ///
    /// Non-empty and unique within a single fetch result set from one
    /// store.
    pub id: String,

    /// The date the message was deposited.
    pub date: DateTime<Utc>,

    /// The duration of the audio payload, in seconds.
    pub duration_secs: u64,

    /// The sender's phone number.
    pub sender: String,

    /// The read status of the message.
    ///
    /// An unknown read status collapses to `false`.
    pub is_read: bool,

    /// Whether the audio payload is already present in the store the
    /// message was fetched from.
    pub has_content: bool,

    /// Opaque reference to the stored message (a storage URI,
    /// usually), used by stores when applying actions.
    pub uri: Option<String>,
}

impl Message {
    /// Creates a new message with the given identifier, every other
    /// attribute left to its default.
    pub fn new(id: impl ToString) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }
}

/// Wrapper around the list of messages.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Messages(Vec<Message>);

impl Deref for Messages {
    type Target = Vec<Message>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Messages {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromIterator<Message> for Messages {
    fn from_iter<T: IntoIterator<Item = Message>>(iter: T) -> Self {
        Messages(iter.into_iter().collect())
    }
}

impl IntoIterator for Messages {
    type Item = Message;
    type IntoIter = std::vec::IntoIter<Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
