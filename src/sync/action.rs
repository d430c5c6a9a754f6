//! Module dedicated to synchronization actions.
//!
//! The core structure of the module is the [`Action`], which
//! represents one corrective operation bound to a specific message.

use std::fmt;

use crate::message::Message;

/// The synchronization operation.
///
/// Closed set of corrective operations a store can be asked to
/// perform. Each store kind supports a subset: asking a store for an
/// operation it does not support fails with a capability error.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Operation {
    /// The message needs to be added to the store.
    Insert,

    /// The message needs to be removed from the store.
    Delete,

    /// The message needs its read status set.
    MarkAsRead,

    /// The audio payload of the message needs to be fetched.
    FetchContent,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "insert"),
            Self::Delete => write!(f, "delete"),
            Self::MarkAsRead => write!(f, "mark as read"),
            Self::FetchContent => write!(f, "fetch content"),
        }
    }
}

/// The synchronization action.
///
/// Pairs a message with the operation a store needs to perform on
/// it. Actions are grouped into two lists per pass, one destined for
/// the local store and one for the remote store; order within a list
/// follows discovery order.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    /// The message the operation applies to.
    pub message: Message,

    /// The operation to perform.
    pub operation: Operation,
}

impl Action {
    pub fn new(message: Message, operation: Operation) -> Self {
        Self { message, operation }
    }

    pub fn insert(message: Message) -> Self {
        Self::new(message, Operation::Insert)
    }

    pub fn delete(message: Message) -> Self {
        Self::new(message, Operation::Delete)
    }

    pub fn mark_as_read(message: Message) -> Self {
        Self::new(message, Operation::MarkAsRead)
    }

    pub fn fetch_content(message: Message) -> Self {
        Self::new(message, Operation::FetchContent)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = &self.message.id;
        match self.operation {
            Operation::Insert => write!(f, "Inserting message {id}"),
            Operation::Delete => write!(f, "Deleting message {id}"),
            Operation::MarkAsRead => write!(f, "Marking message {id} as read"),
            Operation::FetchContent => write!(f, "Fetching content of message {id}"),
        }
    }
}
