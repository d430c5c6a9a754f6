//! # Synchronization
//!
//! Module dedicated to synchronization of voicemail messages between
//! two stores. The main structure of this module is the
//! [`SyncBuilder`].

pub mod action;
pub mod error;
pub mod patch;
pub mod policy;
pub mod report;
pub mod resolver;

use std::{fmt, future::Future, pin::Pin, sync::Arc};

use tracing::{debug, trace};

use crate::store::Store;

#[doc(inline)]
pub use self::{
    action::{Action, Operation},
    error::{Error, Result},
    patch::SyncPatch,
    policy::{DefaultResolvePolicy, ResolvePolicy},
    report::SyncReport,
    resolver::SyncResolver,
};

/// The synchronization builder.
///
/// Binds a fixed pair of stores and a fixed resolve policy, and runs
/// one-shot synchronization passes over them. A fresh
/// [`SyncResolver`] is constructed for every pass: resolvers are
/// never reused.
pub struct SyncBuilder<L: Store, R: Store> {
    local: Arc<L>,
    remote: Arc<R>,
    policy: Arc<dyn ResolvePolicy>,
    handler: Option<Arc<SyncEventHandler>>,
}

impl<L: Store + 'static, R: Store + 'static> SyncBuilder<L, R> {
    /// Creates a new synchronization builder using the two given
    /// stores and the default resolve policy.
    pub fn new(local: L, remote: R) -> Self {
        Self {
            local: Arc::new(local),
            remote: Arc::new(remote),
            policy: Arc::new(DefaultResolvePolicy),
            handler: None,
        }
    }

    pub fn set_policy(&mut self, policy: impl ResolvePolicy + 'static) {
        self.policy = Arc::new(policy);
    }

    pub fn with_policy(mut self, policy: impl ResolvePolicy + 'static) -> Self {
        self.set_policy(policy);
        self
    }

    pub fn set_some_handler<F: Future<Output = Result<()>> + Send + 'static>(
        &mut self,
        handler: Option<impl Fn(SyncEvent) -> F + Send + Sync + 'static>,
    ) {
        self.handler = match handler {
            Some(handler) => Some(Arc::new(move |evt| Box::pin(handler(evt)))),
            None => None,
        };
    }

    pub fn set_handler<F: Future<Output = Result<()>> + Send + 'static>(
        &mut self,
        handler: impl Fn(SyncEvent) -> F + Send + Sync + 'static,
    ) {
        self.set_some_handler(Some(handler));
    }

    pub fn with_some_handler<F: Future<Output = Result<()>> + Send + 'static>(
        mut self,
        handler: Option<impl Fn(SyncEvent) -> F + Send + Sync + 'static>,
    ) -> Self {
        self.set_some_handler(handler);
        self
    }

    pub fn with_handler<F: Future<Output = Result<()>> + Send + 'static>(
        mut self,
        handler: impl Fn(SyncEvent) -> F + Send + Sync + 'static,
    ) -> Self {
        self.set_handler(handler);
        self
    }

    /// Synchronizes all messages on both sides.
    pub async fn sync(&self) -> Result<SyncReport> {
        debug!("performing full sync");

        let resolver = SyncResolver::new(
            self.local.clone(),
            self.remote.clone(),
            self.policy.clone(),
            self.handler.clone(),
        );

        let outcome = resolver.start()?;
        outcome.await.map_err(Error::ReceiveOutcomeError)?
    }

    /// Synchronizes only the given messages, identified by their ids.
    pub async fn sync_messages(
        &self,
        ids: impl IntoIterator<Item = impl ToString>,
    ) -> Result<SyncReport> {
        let ids: Vec<String> = ids.into_iter().map(|id| id.to_string()).collect();

        debug!("performing sync for {} messages", ids.len());

        if ids.is_empty() {
            // nothing to resolve
            return Ok(SyncReport::default());
        }

        // TODO: resolve only the target messages once the resolver
        // supports partial passes. For now a request to sync specific
        // messages results in a full sync.
        self.sync().await
    }
}

/// The synchronization async event handler.
pub type SyncEventHandler =
    dyn Fn(SyncEvent) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> + Send + Sync;

/// The synchronization event.
///
/// Represents all the events that can be triggered during a
/// synchronization pass.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SyncEvent {
    ListedLocalMessages(usize),
    ListedRemoteMessages(usize),
    ListedAllMessages,
    GeneratedSyncPatch(SyncPatch),
    AppliedLocalActions(usize),
    AppliedRemoteActions(usize),
}

impl SyncEvent {
    pub async fn emit(&self, handler: &Option<Arc<SyncEventHandler>>) {
        if let Some(handler) = handler.as_ref() {
            if let Err(err) = handler(self.clone()).await {
                debug!("error while emitting sync event: {err}");
                trace!("{err:?}");
            } else {
                debug!("emitted sync event {self:?}");
            }
        }
    }
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncEvent::ListedLocalMessages(n) => {
                write!(f, "Listed {n} local messages")
            }
            SyncEvent::ListedRemoteMessages(n) => {
                write!(f, "Listed {n} remote messages")
            }
            SyncEvent::ListedAllMessages => {
                write!(f, "Listed all messages from both stores")
            }
            SyncEvent::GeneratedSyncPatch(patch) => {
                write!(f, "Generated sync patch of {} actions", patch.len())
            }
            SyncEvent::AppliedLocalActions(n) => {
                write!(f, "Applied {n} actions to local store")
            }
            SyncEvent::AppliedRemoteActions(n) => {
                write!(f, "Applied {n} actions to remote store")
            }
        }
    }
}

/// The synchronization destination.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum SyncDestination {
    Local,
    Remote,
}

impl fmt::Display for SyncDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}
