//! Instances service.
//!
//! Lifecycle actions are gated client-side by the status table before the
//! request goes out, then reconciled by refetching the instance; the server
//! stays authoritative over the actual transition.

use std::{ops::ControlFlow, sync::Arc, time::Duration};

use async_trait::async_trait;
use mockall::automock;
use serde_json::json;
use stratus::instance::{Instance, InstanceAction};
use tracing::debug;

use crate::{
    api::{Transport, envelope},
    domain::instances::{
        errors::InstancesServiceError,
        models::{ConsoleSession, Hardware, LiveRates, LiveStats, MetricPoint, SshKeyPair},
    },
    poll::spawn_poller,
};

/// How often a settling instance is refetched.
pub const READINESS_POLL_PERIOD: Duration = Duration::from_secs(3);

/// How often live stats are sampled.
pub const LIVE_STATS_POLL_PERIOD: Duration = Duration::from_secs(2);

/// How often the historical metrics range is refreshed.
pub const METRICS_REFRESH_PERIOD: Duration = Duration::from_secs(30);

#[automock]
#[async_trait]
pub trait InstancesService: Send + Sync {
    /// Retrieve the customer's instances.
    async fn list(&self) -> Result<Vec<Instance>, InstancesServiceError>;

    /// Retrieve a single instance.
    async fn get(&self, instance_id: i64) -> Result<Instance, InstancesServiceError>;

    /// Request a lifecycle action and return the refetched instance.
    async fn perform(
        &self,
        instance_id: i64,
        action: InstanceAction,
    ) -> Result<Instance, InstancesServiceError>;

    /// Open a remote console session.
    async fn console(&self, instance_id: i64) -> Result<ConsoleSession, InstancesServiceError>;

    /// Generate a fresh SSH key pair.
    async fn generate_ssh_key(&self) -> Result<SshKeyPair, InstancesServiceError>;

    /// Install a public key on the instance.
    async fn configure_ssh(
        &self,
        instance_id: i64,
        public_key: &str,
    ) -> Result<(), InstancesServiceError>;

    /// Retrieve the provisioned hardware.
    async fn hardware(&self, instance_id: i64) -> Result<Hardware, InstancesServiceError>;

    /// Retrieve the historical metrics range.
    async fn metrics(&self, instance_id: i64) -> Result<Vec<MetricPoint>, InstancesServiceError>;

    /// Retrieve one live sample.
    async fn live_stats(&self, instance_id: i64) -> Result<LiveStats, InstancesServiceError>;
}

#[derive(Clone)]
pub struct RemoteInstancesService {
    transport: Arc<dyn Transport>,
}

impl RemoteInstancesService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn fetch(&self, instance_id: i64) -> Result<Instance, InstancesServiceError> {
        let payload = self
            .transport
            .get(&format!("/user/instances/{instance_id}"))
            .await
            .map_err(|error| {
                if error.is_not_found() {
                    InstancesServiceError::InstanceNotFound(instance_id)
                } else {
                    error.into()
                }
            })?;

        Ok(envelope::decode(payload)?)
    }
}

#[async_trait]
impl InstancesService for RemoteInstancesService {
    async fn list(&self) -> Result<Vec<Instance>, InstancesServiceError> {
        let payload = self.transport.get("/user/instances").await?;

        Ok(envelope::decode(payload)?)
    }

    async fn get(&self, instance_id: i64) -> Result<Instance, InstancesServiceError> {
        self.fetch(instance_id).await
    }

    async fn perform(
        &self,
        instance_id: i64,
        action: InstanceAction,
    ) -> Result<Instance, InstancesServiceError> {
        let instance = self.fetch(instance_id).await?;

        if !instance.status.permits(action) {
            return Err(InstancesServiceError::ActionNotAvailable {
                action,
                status: instance.status,
            });
        }

        self.transport
            .post(
                &format!("/user/instances/{instance_id}/{}", action.as_str()),
                json!({}),
            )
            .await?;

        // The action only requests a transition; refetch for the real state.
        self.fetch(instance_id).await
    }

    async fn console(&self, instance_id: i64) -> Result<ConsoleSession, InstancesServiceError> {
        let instance = self.fetch(instance_id).await?;

        if !instance.status.permits(InstanceAction::Console) {
            return Err(InstancesServiceError::ActionNotAvailable {
                action: InstanceAction::Console,
                status: instance.status,
            });
        }

        let payload = self
            .transport
            .post(&format!("/user/vm/{instance_id}/console"), json!({}))
            .await?;

        Ok(envelope::decode(payload)?)
    }

    async fn generate_ssh_key(&self) -> Result<SshKeyPair, InstancesServiceError> {
        let payload = self
            .transport
            .post("/user/ssh-keys/generate", json!({}))
            .await?;

        Ok(envelope::decode(payload)?)
    }

    async fn configure_ssh(
        &self,
        instance_id: i64,
        public_key: &str,
    ) -> Result<(), InstancesServiceError> {
        self.transport
            .post(
                &format!("/user/instances/{instance_id}/configure-ssh"),
                json!({ "public_key": public_key }),
            )
            .await?;

        Ok(())
    }

    async fn hardware(&self, instance_id: i64) -> Result<Hardware, InstancesServiceError> {
        let payload = self
            .transport
            .get(&format!("/user/instances/{instance_id}/hardware"))
            .await?;

        Ok(envelope::decode(payload)?)
    }

    async fn metrics(&self, instance_id: i64) -> Result<Vec<MetricPoint>, InstancesServiceError> {
        let payload = self
            .transport
            .get(&format!("/user/instances/{instance_id}/metrics"))
            .await?;

        Ok(envelope::decode(payload)?)
    }

    async fn live_stats(&self, instance_id: i64) -> Result<LiveStats, InstancesServiceError> {
        let payload = self
            .transport
            .get(&format!("/user/instances/{instance_id}/live-stats"))
            .await?;

        Ok(envelope::decode(payload)?)
    }
}

/// Poll an instance until it leaves every transitional status.
///
/// Fetch failures do not end the watch; the next tick retries.
///
/// # Errors
///
/// Returns [`InstancesServiceError::WatchInterrupted`] when the poll task is
/// stopped early, or [`InstancesServiceError::InstanceNotFound`] when the
/// instance disappears server-side.
pub async fn watch_until_settled(
    instances: Arc<dyn InstancesService>,
    instance_id: i64,
    period: Duration,
) -> Result<Instance, InstancesServiceError> {
    let handle = spawn_poller(period, move || {
        let instances = Arc::clone(&instances);

        async move {
            match instances.get(instance_id).await {
                Ok(instance) if instance.status.is_transitional() => {
                    debug!(instance_id, status = ?instance.status, "instance still settling");

                    ControlFlow::Continue(())
                }
                Ok(instance) => ControlFlow::Break(Ok(instance)),
                Err(InstancesServiceError::InstanceNotFound(id)) => {
                    ControlFlow::Break(Err(InstancesServiceError::InstanceNotFound(id)))
                }
                Err(error) => {
                    debug!(instance_id, "instance poll failed, retrying: {error}");

                    ControlFlow::Continue(())
                }
            }
        }
    });

    handle
        .join()
        .await
        .ok_or(InstancesServiceError::WatchInterrupted)?
}

struct LiveWatchState<F> {
    previous: Option<LiveStats>,
    emitted: usize,
    on_rates: F,
}

/// Sample live stats on a fixed period and hand derived rates to `on_rates`
/// until `samples` rate points have been emitted.
///
/// The first tick only seeds the previous sample; rates flow from the second
/// tick on. Sample failures are retried on the next tick.
///
/// # Errors
///
/// Returns [`InstancesServiceError::WatchInterrupted`] when the poll task is
/// stopped early.
pub async fn watch_live_stats<F>(
    instances: Arc<dyn InstancesService>,
    instance_id: i64,
    period: Duration,
    samples: usize,
    on_rates: F,
) -> Result<(), InstancesServiceError>
where
    F: FnMut(LiveRates) + Send + 'static,
{
    use std::sync::{Mutex, PoisonError};

    if samples == 0 {
        return Ok(());
    }

    let state = Arc::new(Mutex::new(LiveWatchState {
        previous: None,
        emitted: 0,
        on_rates,
    }));

    let handle = spawn_poller(period, move || {
        let instances = Arc::clone(&instances);
        let state = Arc::clone(&state);

        async move {
            let sample = match instances.live_stats(instance_id).await {
                Ok(sample) => sample,
                Err(error) => {
                    debug!(instance_id, "live stats poll failed, retrying: {error}");

                    return ControlFlow::Continue(());
                }
            };

            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);

            if let Some(prev) = state.previous.replace(sample.clone()) {
                let rates = LiveRates::between(&prev, &sample);

                (state.on_rates)(rates);
                state.emitted += 1;

                if state.emitted >= samples {
                    return ControlFlow::Break(());
                }
            }

            ControlFlow::Continue(())
        }
    });

    handle
        .join()
        .await
        .ok_or(InstancesServiceError::WatchInterrupted)
}
