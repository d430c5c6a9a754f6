//! # Memory store
//!
//! Module dedicated to the in-memory voicemail store. The main
//! structure of this module is the [`MemoryStore`], mostly useful for
//! tests and for applications that mirror a store they cannot query
//! directly.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::lock::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    message::{Message, Messages},
    sync::{Action, Operation, SyncDestination},
    AnyResult, Store,
};

use super::Error;

/// The in-memory voicemail store.
///
/// The store is bound to a [`SyncDestination`], which decides the set
/// of operations it supports: a local store takes inserts, deletions
/// and read marks but cannot fetch content, while a remote store
/// takes deletions, read marks and content fetches but cannot be
/// inserted into.
///
/// Inserting a message, as well as requesting its content from the
/// remote side, emits the message on the optional fetch notification
/// channel so that an outer component can download the audio payload.
pub struct MemoryStore {
    destination: SyncDestination,
    messages: Mutex<HashMap<String, Message>>,
    fetch_notifier: Option<mpsc::UnboundedSender<Message>>,
}

impl MemoryStore {
    /// Creates a new empty store bound to the given destination.
    pub fn new(destination: SyncDestination) -> Self {
        Self {
            destination,
            messages: Mutex::new(HashMap::new()),
            fetch_notifier: None,
        }
    }

    /// Creates a new empty local store.
    pub fn local() -> Self {
        Self::new(SyncDestination::Local)
    }

    /// Creates a new empty remote store.
    pub fn remote() -> Self {
        Self::new(SyncDestination::Remote)
    }

    pub fn with_messages(self, messages: impl IntoIterator<Item = Message>) -> Self {
        Self {
            messages: Mutex::new(
                messages
                    .into_iter()
                    .map(|message| (message.id.clone(), message))
                    .collect(),
            ),
            ..self
        }
    }

    pub fn with_fetch_notifier(mut self, notifier: mpsc::UnboundedSender<Message>) -> Self {
        self.fetch_notifier = Some(notifier);
        self
    }

    /// Returns a snapshot of the messages currently held by the
    /// store, sorted by identifier.
    pub async fn messages(&self) -> Messages {
        let mut messages: Vec<Message> = self.messages.lock().await.values().cloned().collect();
        messages.sort_by(|a, b| a.id.cmp(&b.id));
        Messages::from_iter(messages)
    }

    pub async fn contains(&self, id: impl AsRef<str>) -> bool {
        self.messages.lock().await.contains_key(id.as_ref())
    }

    fn notify_fetch(&self, message: &Message) {
        if let Some(notifier) = &self.fetch_notifier {
            // the receiver may be gone, in which case the
            // notification is simply dropped
            if notifier.send(message.clone()).is_err() {
                debug!("no listener for content fetch of message {}", message.id);
            }
        }
    }

    async fn apply_one(&self, operation: Operation, message: Message) -> AnyResult<()> {
        match (self.destination, operation) {
            (SyncDestination::Remote, Operation::Insert) => {
                Err(Error::UnsupportedOperationError(self.destination, operation).into())
            }
            (SyncDestination::Local, Operation::FetchContent) => {
                Err(Error::UnsupportedOperationError(self.destination, operation).into())
            }
            (SyncDestination::Local, Operation::Insert) => {
                self.notify_fetch(&message);
                self.messages
                    .lock()
                    .await
                    .insert(message.id.clone(), message);
                Ok(())
            }
            (_, Operation::Delete) => {
                self.messages.lock().await.remove(&message.id);
                Ok(())
            }
            (_, Operation::MarkAsRead) => {
                let mut messages = self.messages.lock().await;
                match messages.get_mut(&message.id) {
                    Some(message) => {
                        message.is_read = true;
                        Ok(())
                    }
                    None => Err(Error::FindMessageError(message.id).into()),
                }
            }
            (SyncDestination::Remote, Operation::FetchContent) => {
                // the payload itself travels outside of the store
                self.notify_fetch(&message);
                Ok(())
            }
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn fetch_all(&self) -> AnyResult<Messages> {
        let messages = self.messages.lock().await;
        Ok(Messages::from_iter(messages.values().cloned()))
    }

    async fn apply(&self, actions: Vec<Action>) -> AnyResult<()> {
        debug!(
            "applying {} actions to {} store",
            actions.len(),
            self.destination
        );

        for action in actions {
            self.apply_one(action.operation, action.message).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use crate::{
        message::Message,
        store::Error,
        sync::{Action, Operation, SyncDestination},
        AnyError, Store,
    };

    use super::MemoryStore;

    fn message(id: &str) -> Message {
        Message::new(id)
    }

    #[tokio::test]
    async fn local_store_rejects_content_fetches() {
        let store = MemoryStore::local().with_messages([message("a")]);

        let err = store
            .apply(vec![Action::fetch_content(message("a"))])
            .await
            .unwrap_err();

        let err = err.as_any().downcast_ref::<Error>();
        assert!(matches!(
            err,
            Some(Error::UnsupportedOperationError(
                SyncDestination::Local,
                Operation::FetchContent,
            ))
        ));
    }

    #[tokio::test]
    async fn remote_store_rejects_inserts() {
        let store = MemoryStore::remote();

        let err = store
            .apply(vec![Action::insert(message("a"))])
            .await
            .unwrap_err();

        let err = err.as_any().downcast_ref::<Error>();
        assert!(matches!(
            err,
            Some(Error::UnsupportedOperationError(
                SyncDestination::Remote,
                Operation::Insert,
            ))
        ));
    }

    #[tokio::test]
    async fn inserting_notifies_content_fetcher() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let store = MemoryStore::local().with_fetch_notifier(tx);

        store.apply(vec![Action::insert(message("a"))]).await.unwrap();

        assert_eq!(rx.recv().await.unwrap().id, "a");
        assert!(store.contains("a").await);
    }

    #[tokio::test]
    async fn marking_an_unknown_message_as_read_fails() {
        let store = MemoryStore::remote();

        let err = store
            .apply(vec![Action::mark_as_read(message("a"))])
            .await
            .unwrap_err();

        let err = err.as_any().downcast_ref::<Error>();
        assert!(matches!(err, Some(Error::FindMessageError(id)) if id == "a"));
    }

    #[tokio::test]
    async fn deleting_an_unknown_message_is_a_noop() {
        let store = MemoryStore::local().with_messages([message("a")]);

        store.apply(vec![Action::delete(message("b"))]).await.unwrap();

        assert_eq!(store.messages().await.len(), 1);
    }
}
