use std::result;

use thiserror::Error;
use tokio::sync::oneshot;

use crate::AnyBoxedError;

use super::SyncDestination;

/// The global `Result` alias of the module.
pub type Result<T> = result::Result<T, Error>;

/// The global `Error` enum of the module.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot fetch messages from {1} store")]
    FetchMessagesError(#[source] AnyBoxedError, SyncDestination),
    #[error("cannot apply actions to {1} store")]
    ApplyActionsError(#[source] AnyBoxedError, SyncDestination),
    #[error("cannot start sync pass: pass already started")]
    SyncPassReusedError,
    #[error("cannot receive sync pass outcome")]
    ReceiveOutcomeError(#[source] oneshot::error::RecvError),
}
