//! Module dedicated to the voicemail synchronization patch.
//!
//! The core structure of the module is the [`SyncPatch`], which
//! represents the two lists of actions a pass needs to apply, and the
//! [`build`] function which diffs the two fetched message sets into
//! such a patch.

use std::collections::HashMap;

use crate::message::{Message, Messages};

use super::{Action, ResolvePolicy};

/// The synchronization patch.
///
/// Holds the corrective actions each store needs to perform for one
/// pass. Order within a list is insignificant to correctness; the
/// discovery order is preserved to ease debugging.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "derive", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncPatch {
    /// The actions destined for the local store.
    pub local: Vec<Action>,

    /// The actions destined for the remote store.
    pub remote: Vec<Action>,
}

impl SyncPatch {
    pub fn push_local(&mut self, action: Action) {
        self.local.push(action);
    }

    pub fn push_remote(&mut self, action: Action) {
        self.remote.push(action);
    }

    pub fn is_empty(&self) -> bool {
        self.local.is_empty() && self.remote.is_empty()
    }

    pub fn len(&self) -> usize {
        self.local.len() + self.remote.len()
    }
}

/// Synchronization patch builder.
///
/// Contains the core diff algorithm of the voicemail
/// synchronization. It has been exported in a dedicated function so
/// that it can be easily tested.
///
/// Every message of the two sets is classified exactly once: present
/// on both sides, local-only or remote-only. The remote lookup map is
/// consumed destructively during the local walk as a de-duplication
/// device; remote-only messages are then resolved following the
/// remote fetch order.
pub fn build(policy: &dyn ResolvePolicy, local: Messages, remote: Messages) -> SyncPatch {
    let mut patch = SyncPatch::default();

    let mut remote_ids = Vec::with_capacity(remote.len());
    let mut remote_map: HashMap<String, Message> = HashMap::with_capacity(remote.len());
    for message in remote {
        remote_ids.push(message.id.clone());
        remote_map.insert(message.id.clone(), message);
    }

    for local_message in local {
        match remote_map.remove(&local_message.id) {
            Some(remote_message) => {
                policy.resolve_both(&local_message, &remote_message, &mut patch)
            }
            None => policy.resolve_local_only(&local_message, &mut patch),
        }
    }

    // Ids consumed during the local walk leave only the messages
    // missing locally.
    for id in remote_ids {
        if let Some(remote_message) = remote_map.remove(&id) {
            policy.resolve_remote_only(&remote_message, &mut patch);
        }
    }

    patch
}

#[cfg(test)]
mod tests {
    use crate::{
        message::{Message, Messages},
        sync::{Action, DefaultResolvePolicy, SyncPatch},
    };

    fn message(id: &str, is_read: bool, has_content: bool) -> Message {
        Message {
            is_read,
            has_content,
            ..Message::new(id)
        }
    }

    fn build(local: impl IntoIterator<Item = Message>, remote: impl IntoIterator<Item = Message>) -> SyncPatch {
        super::build(
            &DefaultResolvePolicy,
            Messages::from_iter(local),
            Messages::from_iter(remote),
        )
    }

    #[test]
    fn empty_sets_produce_an_empty_patch() {
        assert_eq!(build([], []), SyncPatch::default());
    }

    #[test]
    fn local_only_messages_are_deleted_locally() {
        let b = message("b", false, true);

        assert_eq!(
            build([b.clone()], []),
            SyncPatch {
                local: vec![Action::delete(b)],
                remote: vec![],
            },
        );
    }

    #[test]
    fn remote_only_messages_are_inserted_locally() {
        let c = message("c", false, false);

        assert_eq!(
            build([], [c.clone()]),
            SyncPatch {
                local: vec![Action::insert(c)],
                remote: vec![],
            },
        );
    }

    #[test]
    fn messages_read_remotely_are_marked_read_locally() {
        let local = message("a", false, true);
        let remote = message("a", true, false);

        // content is already there, so no fetch is requested
        assert_eq!(
            build([local.clone()], [remote]),
            SyncPatch {
                local: vec![Action::mark_as_read(local)],
                remote: vec![],
            },
        );
    }

    #[test]
    fn every_message_is_classified_exactly_once() {
        let a_local = message("a", false, true);
        let a_remote = message("a", false, false);
        let b = message("b", false, true);
        let c = message("c", true, false);
        let d = message("d", false, false);

        let patch = build(
            [a_local, b.clone()],
            [a_remote, c.clone(), d.clone()],
        );

        // a is converged, b is local-only, c and d are remote-only
        // and follow the remote fetch order
        assert_eq!(
            patch,
            SyncPatch {
                local: vec![
                    Action::delete(b),
                    Action::insert(c),
                    Action::insert(d),
                ],
                remote: vec![],
            },
        );
    }

    #[test]
    fn divergent_messages_converge_in_one_patch() {
        let a_local = message("a", true, false);
        let a_remote = message("a", false, false);

        assert_eq!(
            build([a_local], [a_remote.clone()]),
            SyncPatch {
                local: vec![],
                remote: vec![
                    Action::fetch_content(a_remote.clone()),
                    Action::mark_as_read(a_remote),
                ],
            },
        );
    }
}
