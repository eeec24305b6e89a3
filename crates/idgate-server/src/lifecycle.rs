//! Lifecycle event hand-off.
//!
//! Once a webhook passes the signature gate, each recognized event is
//! handed to the external lifecycle collaborator. Hand-offs are
//! fire-and-forget: they run on a semaphore-bounded set of spawned tasks
//! detached from the request, their failures are logged and never
//! retried, and they never delay the webhook acknowledgement.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

/// Lifecycle event types pushed by the directory.
const EVENT_ACCOUNT_REGISTERED: &str = "accountRegistered";
const EVENT_ACCOUNT_MERGED: &str = "accountMerged";
const EVENT_ACCOUNT_UPDATED: &str = "accountUpdated";

/// A recognized lifecycle event with the account id it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    Registered { uid: String },
    Merged { uid: String },
    Updated { uid: String },
}

impl LifecycleEvent {
    /// Map a webhook event onto a lifecycle event. Returns `None` for
    /// unrecognized types, which the caller logs and skips. Merge events
    /// concern the surviving account, so `newUid` wins over `uid`.
    pub fn from_webhook(
        event_type: &str,
        uid: Option<String>,
        new_uid: Option<String>,
    ) -> Option<Self> {
        match event_type {
            EVENT_ACCOUNT_REGISTERED => uid.map(|uid| LifecycleEvent::Registered { uid }),
            EVENT_ACCOUNT_MERGED => new_uid.or(uid).map(|uid| LifecycleEvent::Merged { uid }),
            EVENT_ACCOUNT_UPDATED => uid.map(|uid| LifecycleEvent::Updated { uid }),
            _ => None,
        }
    }

    pub fn uid(&self) -> &str {
        match self {
            LifecycleEvent::Registered { uid }
            | LifecycleEvent::Merged { uid }
            | LifecycleEvent::Updated { uid } => uid,
        }
    }
}

/// External collaborator receiving verified lifecycle events. The real
/// side effects (downstream notifications, profile post-processing) are
/// outside the gateway core.
#[async_trait]
pub trait LifecycleHooks: Send + Sync {
    async fn handle(&self, event: LifecycleEvent) -> anyhow::Result<()>;
}

/// Default collaborator: records the event and does nothing else.
pub struct LogOnlyLifecycleHooks;

#[async_trait]
impl LifecycleHooks for LogOnlyLifecycleHooks {
    async fn handle(&self, event: LifecycleEvent) -> anyhow::Result<()> {
        tracing::info!("Lifecycle event received. UID: {}. Event: {event:?}", event.uid());
        Ok(())
    }
}

/// Bounded fire-and-forget dispatcher for lifecycle hand-offs.
pub struct LifecycleFanout {
    hooks: Arc<dyn LifecycleHooks>,
    permits: Arc<Semaphore>,
}

impl LifecycleFanout {
    pub fn new(hooks: Arc<dyn LifecycleHooks>, workers: usize) -> Self {
        Self {
            hooks,
            permits: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Spawn the hand-off and return immediately. At most `workers`
    /// hooks run concurrently; excess dispatches wait on the semaphore
    /// inside their own task, not on the request.
    pub fn dispatch(&self, event: LifecycleEvent) {
        let hooks = self.hooks.clone();
        let permits = self.permits.clone();

        tokio::spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            let uid = event.uid().to_string();
            if let Err(err) = hooks.handle(event).await {
                tracing::error!("Lifecycle hook failed. UID: {uid}. Error: {err:?}");
            }
        });
    }
}
