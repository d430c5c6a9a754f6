//! Module dedicated to the synchronization resolver.
//!
//! The core structure of this module is the [`SyncResolver`], which
//! drives one full synchronization pass between two stores.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use futures::lock::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, trace};

use crate::{message::Messages, store::Store};

use super::{
    patch, Action, Error, Result, ResolvePolicy, SyncDestination, SyncEvent, SyncEventHandler,
    SyncPatch, SyncReport,
};

/// The one-shot synchronization resolver.
///
/// Constructed for a single pass and thrown away afterwards. The pass
/// is in one of the following conceptual states:
///
/// - constructed, but not yet started;
/// - started, waiting for at least one store to return its messages;
/// - resolving the two message sets into a patch;
/// - waiting for the patch to be applied by at least one store;
/// - done.
///
/// The outcome is delivered through the receiver returned by
/// [`start`](Self::start), exactly once: success only after both
/// fetches complete, the diff resolves and both action lists apply
/// successfully; failure as soon as the first failure is detected.
/// Store requests already in flight when the pass terminates run to
/// completion and their results are discarded.
pub struct SyncResolver<L: Store, R: Store> {
    ctx: Arc<PassContext<L, R>>,
    started: AtomicBool,
}

impl<L: Store + 'static, R: Store + 'static> SyncResolver<L, R> {
    pub fn new(
        local: Arc<L>,
        remote: Arc<R>,
        policy: Arc<dyn ResolvePolicy>,
        handler: Option<Arc<SyncEventHandler>>,
    ) -> Self {
        Self {
            ctx: Arc::new(PassContext {
                local,
                remote,
                policy,
                handler,
            }),
            started: AtomicBool::new(false),
        }
    }

    /// Starts the pass and returns the channel carrying its single
    /// outcome.
    ///
    /// Returns immediately after issuing the two concurrent fetch
    /// requests. Starting the same resolver a second time fails with
    /// [`Error::SyncPassReusedError`] without re-triggering any store
    /// request.
    pub fn start(&self) -> Result<oneshot::Receiver<Result<SyncReport>>> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(Error::SyncPassReusedError);
        }

        debug!("starting sync pass");

        let (tx, rx) = oneshot::channel();
        let completion = Arc::new(Completion::new(tx));
        let countdown = Arc::new(Countdown::new());
        let slots = Arc::new(FetchSlots::default());

        for destination in [SyncDestination::Local, SyncDestination::Remote] {
            let ctx = self.ctx.clone();
            let slots = slots.clone();
            let countdown = countdown.clone();
            let completion = completion.clone();
            tokio::spawn(async move { ctx.fetch(destination, slots, countdown, completion).await });
        }

        Ok(rx)
    }
}

/// Context shared by every task of one pass.
struct PassContext<L: Store, R: Store> {
    local: Arc<L>,
    remote: Arc<R>,
    policy: Arc<dyn ResolvePolicy>,
    handler: Option<Arc<SyncEventHandler>>,
}

impl<L: Store + 'static, R: Store + 'static> PassContext<L, R> {
    async fn fetch(
        self: Arc<Self>,
        destination: SyncDestination,
        slots: Arc<FetchSlots>,
        countdown: Arc<Countdown>,
        completion: Arc<Completion>,
    ) {
        let messages = match destination {
            SyncDestination::Local => self.local.fetch_all().await,
            SyncDestination::Remote => self.remote.fetch_all().await,
        };

        match messages {
            Ok(messages) => {
                let event = match destination {
                    SyncDestination::Local => SyncEvent::ListedLocalMessages(messages.len()),
                    SyncDestination::Remote => SyncEvent::ListedRemoteMessages(messages.len()),
                };
                event.emit(&self.handler).await;

                match destination {
                    SyncDestination::Local => *slots.local.lock().await = Some(messages),
                    SyncDestination::Remote => *slots.remote.lock().await = Some(messages),
                }

                if countdown.complete() {
                    self.resolve(slots, completion).await;
                }
            }
            Err(err) => {
                debug!("cannot fetch messages from {destination} store: {err}");
                trace!("{err:?}");

                if countdown.fail() {
                    completion
                        .deliver(Err(Error::FetchMessagesError(err, destination)))
                        .await;
                }
            }
        }
    }

    async fn resolve(self: Arc<Self>, slots: Arc<FetchSlots>, completion: Arc<Completion>) {
        SyncEvent::ListedAllMessages.emit(&self.handler).await;

        let local = slots.local.lock().await.take();
        let remote = slots.remote.lock().await.take();

        // both slots are filled once the fetch countdown reaches zero
        if let (Some(local), Some(remote)) = (local, remote) {
            let patch = patch::build(self.policy.as_ref(), local, remote);

            SyncEvent::GeneratedSyncPatch(patch.clone())
                .emit(&self.handler)
                .await;

            self.apply(patch, completion).await;
        }
    }

    async fn apply(self: Arc<Self>, patch: SyncPatch, completion: Arc<Completion>) {
        debug!("local actions: {:?}", patch.local);
        debug!("remote actions: {:?}", patch.remote);

        let countdown = Arc::new(Countdown::new());
        let report = Arc::new(SyncReport {
            patch: patch.clone(),
        });

        let actions = [
            (SyncDestination::Local, patch.local),
            (SyncDestination::Remote, patch.remote),
        ];

        // An empty action list is still sent to its store: applying
        // it is a valid, trivially-successful no-op, and the join
        // bookkeeping stays symmetric this way.
        for (destination, actions) in actions {
            let ctx = self.clone();
            let report = report.clone();
            let countdown = countdown.clone();
            let completion = completion.clone();
            tokio::spawn(async move {
                ctx.perform(destination, actions, report, countdown, completion)
                    .await
            });
        }
    }

    async fn perform(
        self: Arc<Self>,
        destination: SyncDestination,
        actions: Vec<Action>,
        report: Arc<SyncReport>,
        countdown: Arc<Countdown>,
        completion: Arc<Completion>,
    ) {
        let count = actions.len();

        let outcome = match destination {
            SyncDestination::Local => self.local.apply(actions).await,
            SyncDestination::Remote => self.remote.apply(actions).await,
        };

        match outcome {
            Ok(()) => {
                let event = match destination {
                    SyncDestination::Local => SyncEvent::AppliedLocalActions(count),
                    SyncDestination::Remote => SyncEvent::AppliedRemoteActions(count),
                };
                event.emit(&self.handler).await;

                if countdown.complete() {
                    completion.deliver(Ok(report.as_ref().clone())).await;
                }
            }
            Err(err) => {
                debug!("cannot apply actions to {destination} store: {err}");
                trace!("{err:?}");

                if countdown.fail() {
                    completion
                        .deliver(Err(Error::ApplyActionsError(err, destination)))
                        .await;
                }
            }
        }
    }
}

/// Landing zone for the results of the two concurrent fetches.
#[derive(Default)]
struct FetchSlots {
    local: Mutex<Option<Messages>>,
    remote: Mutex<Option<Messages>>,
}

/// Countdown shared by one pair of concurrent store requests.
///
/// Tracks the number of pending requests of the pair, and whether a
/// failure has already been reported for it. A failed request never
/// decrements the countdown, so a pair with a failure can never
/// proceed to its next step.
struct Countdown {
    remaining: AtomicUsize,
    failed: AtomicBool,
}

impl Countdown {
    fn new() -> Self {
        Self {
            remaining: AtomicUsize::new(2),
            failed: AtomicBool::new(false),
        }
    }

    /// Returns `true` if the caller is the last request of the pair
    /// to complete successfully.
    fn complete(&self) -> bool {
        self.remaining.fetch_sub(1, Ordering::SeqCst) == 1
    }

    /// Returns `true` if the caller is the first request of the pair
    /// to fail.
    fn fail(&self) -> bool {
        !self.failed.swap(true, Ordering::SeqCst)
    }
}

/// Single-use slot carrying the outcome of a pass.
///
/// The sender can be taken only once, which guarantees the outcome is
/// delivered at most once regardless of how many store requests fail,
/// or how concurrently they do so.
struct Completion {
    tx: Mutex<Option<oneshot::Sender<Result<SyncReport>>>>,
}

impl Completion {
    fn new(tx: oneshot::Sender<Result<SyncReport>>) -> Self {
        Self {
            tx: Mutex::new(Some(tx)),
        }
    }

    async fn deliver(&self, outcome: Result<SyncReport>) {
        if let Some(tx) = self.tx.lock().await.take() {
            // the receiver may have been dropped by the caller, in
            // which case the outcome is discarded
            if tx.send(outcome).is_err() {
                debug!("sync pass outcome discarded: receiver dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::oneshot;

    use crate::sync::{Error, SyncReport};

    use super::{Completion, Countdown};

    #[test]
    fn countdown_completes_on_the_last_request_only() {
        let countdown = Countdown::new();

        assert!(!countdown.complete());
        assert!(countdown.complete());
    }

    #[test]
    fn countdown_reports_the_first_failure_only() {
        let countdown = Countdown::new();

        assert!(countdown.fail());
        assert!(!countdown.fail());
    }

    #[tokio::test]
    async fn completion_delivers_at_most_once() {
        let (tx, rx) = oneshot::channel();
        let completion = Completion::new(tx);

        completion.deliver(Err(Error::SyncPassReusedError)).await;
        completion.deliver(Ok(SyncReport::default())).await;

        assert!(matches!(rx.await, Ok(Err(Error::SyncPassReusedError))));
    }
}
