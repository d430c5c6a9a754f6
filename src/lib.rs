#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Rust library to synchronize voicemails.
//!
//! The main purpose of this library is to keep two stores of the same
//! voicemail inbox consistent with each other: a local store (usually
//! a database on the device) and a remote store (usually the
//! voicemail server of a telephony provider).
//!
//! This goal is achieved by exposing a
//! [`SyncBuilder`](crate::sync::SyncBuilder) which binds a pair of
//! [`Store`](crate::store::Store) implementations together with a
//! [`ResolvePolicy`](crate::sync::ResolvePolicy) and runs one-shot
//! synchronization passes over them. A pass fetches both stores
//! concurrently, diffs the two message sets by identifier, turns the
//! differences into a [`SyncPatch`](crate::sync::SyncPatch) and
//! applies it back to both stores concurrently.
//!
//! The library ships an in-memory store implementation,
//! [`MemoryStore`](crate::store::memory::MemoryStore). Stores backed
//! by real transports are expected to be provided by the application.
//!
//! See examples in the /tests folder.

pub mod message;
pub mod store;
pub mod sync;

mod error;

#[doc(inline)]
pub use self::{
    error::{AnyBoxedError, AnyError, AnyResult},
    message::{Message, Messages},
    store::Store,
    sync::{SyncBuilder, SyncDestination, SyncEvent},
};
