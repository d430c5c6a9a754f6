//! Module dedicated to synchronization resolve policies.
//!
//! A resolve policy decides, for every message classified by the
//! diff, which actions each store needs to perform. The default
//! behaviour lives in [`DefaultResolvePolicy`]; alternate strategies
//! can be substituted through
//! [`SyncBuilder::with_policy`](super::SyncBuilder::with_policy)
//! without touching the engine.

use crate::message::Message;

use super::{Action, SyncPatch};

/// The synchronization resolve policy.
///
/// Pure decision functions: implementations must perform no I/O and
/// retain no state across calls within one pass, so that a single
/// policy value can be shared across passes.
pub trait ResolvePolicy: Send + Sync {
    /// Decides actions for a message that exists locally but not
    /// remotely.
    fn resolve_local_only(&self, local: &Message, patch: &mut SyncPatch);

    /// Decides actions for a message that exists remotely but not
    /// locally.
    fn resolve_remote_only(&self, remote: &Message, patch: &mut SyncPatch);

    /// Decides actions for a message that exists on both sides,
    /// possibly with differing attributes.
    fn resolve_both(&self, local: &Message, remote: &Message, patch: &mut SyncPatch);
}

/// The default resolve policy.
///
/// Treats the remote store as authoritative for existence: messages
/// gone from the server leave the local inbox, messages missing
/// locally get inserted.
#[derive(Clone, Debug, Default)]
pub struct DefaultResolvePolicy;

impl ResolvePolicy for DefaultResolvePolicy {
    fn resolve_local_only(&self, local: &Message, patch: &mut SyncPatch) {
        // A message no longer on the server has been removed
        // upstream, so it should be moved out of the local inbox.
        patch.push_local(Action::delete(local.clone()));
    }

    fn resolve_remote_only(&self, remote: &Message, patch: &mut SyncPatch) {
        // A message available remotely but missing locally needs to
        // be inserted.
        patch.push_local(Action::insert(remote.clone()));
    }

    fn resolve_both(&self, local: &Message, remote: &Message, patch: &mut SyncPatch) {
        // Content is pulled from the remote store, never pushed.
        if !local.has_content {
            patch.push_remote(Action::fetch_content(remote.clone()));
        }

        // A message marked read on one side should be marked so on
        // the other. Read status propagates one way per message per
        // pass; an unknown read status collapses to unread.
        if local.is_read && !remote.is_read {
            patch.push_remote(Action::mark_as_read(remote.clone()));
        } else if remote.is_read && !local.is_read {
            patch.push_local(Action::mark_as_read(local.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        message::Message,
        sync::{Action, SyncPatch},
    };

    use super::{DefaultResolvePolicy, ResolvePolicy};

    fn message(id: &str, is_read: bool, has_content: bool) -> Message {
        Message {
            is_read,
            has_content,
            ..Message::new(id)
        }
    }

    #[test]
    fn read_status_propagates_from_local_to_remote() {
        let local = message("a", true, true);
        let remote = message("a", false, true);
        let mut patch = SyncPatch::default();

        DefaultResolvePolicy.resolve_both(&local, &remote, &mut patch);

        assert_eq!(patch.local, vec![]);
        assert_eq!(patch.remote, vec![Action::mark_as_read(remote)]);
    }

    #[test]
    fn read_status_propagates_from_remote_to_local() {
        let local = message("a", false, true);
        let remote = message("a", true, true);
        let mut patch = SyncPatch::default();

        DefaultResolvePolicy.resolve_both(&local, &remote, &mut patch);

        assert_eq!(patch.local, vec![Action::mark_as_read(local)]);
        assert_eq!(patch.remote, vec![]);
    }

    #[test]
    fn converged_messages_produce_no_action() {
        let local = message("a", true, true);
        let remote = message("a", true, false);
        let mut patch = SyncPatch::default();

        DefaultResolvePolicy.resolve_both(&local, &remote, &mut patch);

        assert!(patch.is_empty());
    }

    #[test]
    fn missing_content_is_pulled_from_the_remote_store() {
        let local = message("a", false, false);
        let remote = message("a", false, false);
        let mut patch = SyncPatch::default();

        DefaultResolvePolicy.resolve_both(&local, &remote, &mut patch);

        assert_eq!(patch.local, vec![]);
        assert_eq!(patch.remote, vec![Action::fetch_content(remote)]);
    }
}
