//! # Store
//!
//! Module dedicated to voicemail stores. A store is one side (local
//! or remote) of the pair of message sets being synchronized: the
//! synchronization engine only ever talks to stores through the
//! [`Store`] trait defined here.

pub mod error;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{message::Messages, sync::Action, AnyResult};

#[doc(inline)]
pub use self::error::{Error, Result};

/// The store capability consumed by the synchronization engine.
///
/// Implementations are expected to be thread-safe: both functions may
/// be called from arbitrary tasks.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetches all messages known to this store.
    async fn fetch_all(&self) -> AnyResult<Messages>;

    /// Performs the given actions on this store.
    ///
    /// An empty list of actions is a valid, trivially-successful
    /// no-op. A store asked to perform an operation it does not
    /// support must fail with
    /// [`Error::UnsupportedOperationError`](crate::store::Error)
    /// rather than silently ignoring it.
    async fn apply(&self, actions: Vec<Action>) -> AnyResult<()>;
}

#[async_trait]
impl<T: Store + ?Sized> Store for Arc<T> {
    async fn fetch_all(&self) -> AnyResult<Messages> {
        (**self).fetch_all().await
    }

    async fn apply(&self, actions: Vec<Action>) -> AnyResult<()> {
        (**self).apply(actions).await
    }
}
