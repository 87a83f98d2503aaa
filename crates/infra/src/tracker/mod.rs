//! Background tracking of in-flight flight plans.
//!
//! Every flight plan created through the client is registered here together
//! with the session that created it. A single background task wakes up every
//! poll interval, picks the plans whose arrival time has passed, fetches
//! their final state and emits a [`FlightPlanEventKind::Ended`] event for
//! each one.
//!
//! Failed fetches are logged and the plan stays tracked for the next pass;
//! one failure never stops the others from completing.
//!
//! The tracked map lock is only held to snapshot or mutate the map, never
//! across a network call.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use spacetraders_domain::{
    Event, FlightPlan, FlightPlanEventKind, Result, Session, SpaceTradersError, TrackerConfig,
};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::api::responses::FlightPlanEnvelope;
use crate::api::ApiClient;
use crate::events::EventBus;
use crate::http::RequestSpec;

/// Where the tracker gets the authoritative state of a flight plan.
#[async_trait]
pub trait FlightPlanSource: Send + Sync {
    async fn fetch_flight_plan(&self, session: &Session, id: &str) -> Result<FlightPlan>;
}

#[async_trait]
impl FlightPlanSource for ApiClient {
    async fn fetch_flight_plan(&self, session: &Session, id: &str) -> Result<FlightPlan> {
        let spec = RequestSpec::get(["users", session.username(), "flight-plans", id]);
        let envelope: FlightPlanEnvelope = self.send(spec, Some(session)).await?;
        Ok(envelope.flight_plan)
    }
}

/// A flight plan that has not been confirmed complete yet.
#[derive(Debug, Clone)]
pub struct TrackedOperation {
    pub id: String,
    pub session: Session,
    pub arrives_at: DateTime<Utc>,
    pub last_known: FlightPlan,
}

struct TrackerState {
    source: Arc<dyn FlightPlanSource>,
    events: EventBus,
    tracked: Mutex<HashMap<String, TrackedOperation>>,
}

impl TrackerState {
    async fn poll_once(&self, now: DateTime<Utc>) -> usize {
        let matured: Vec<TrackedOperation> = {
            let tracked = self.tracked.lock();
            tracked.values().filter(|op| now >= op.arrives_at).cloned().collect()
        };
        if matured.is_empty() {
            return 0;
        }

        let mut completed = 0;
        for op in matured {
            match self.source.fetch_flight_plan(&op.session, &op.id).await {
                Ok(plan) => {
                    if self.tracked.lock().remove(&op.id).is_some() {
                        info!(id = %op.id, destination = %plan.destination, "flight plan ended");
                        self.events.emit(Event::flight_plan(FlightPlanEventKind::Ended, plan));
                        completed += 1;
                    }
                }
                Err(err) => {
                    warn!(id = %op.id, error = %err, "failed to fetch flight plan, will retry");
                }
            }
        }
        completed
    }
}

/// Owner of the tracked-operations map and its background polling task.
pub struct FlightPlanTracker {
    state: Arc<TrackerState>,
    config: TrackerConfig,
    cancellation: CancellationToken,
    task_handle: Mutex<Option<JoinHandle<()>>>,
}

impl FlightPlanTracker {
    pub fn new(source: Arc<dyn FlightPlanSource>, events: EventBus, config: TrackerConfig) -> Self {
        Self {
            state: Arc::new(TrackerState { source, events, tracked: Mutex::new(HashMap::new()) }),
            config,
            cancellation: CancellationToken::new(),
            task_handle: Mutex::new(None),
        }
    }

    /// Spawn the polling task on the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails when called outside a runtime, when the task is already running
    /// or after [`shutdown`](Self::shutdown).
    #[instrument(skip(self))]
    pub fn start(&self) -> Result<()> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            SpaceTradersError::Config("flight-plan tracker needs a Tokio runtime".into())
        })?;
        if self.cancellation.is_cancelled() {
            return Err(SpaceTradersError::Config("flight-plan tracker was shut down".into()));
        }

        let mut handle = self.task_handle.lock();
        if handle.is_some() {
            return Err(SpaceTradersError::Config("flight-plan tracker already running".into()));
        }

        let state = Arc::clone(&self.state);
        let cancel = self.cancellation.clone();
        let poll_interval = self.config.poll_interval;
        *handle = Some(runtime.spawn(Self::poll_loop(state, poll_interval, cancel)));

        info!(?poll_interval, "flight-plan tracker started");
        Ok(())
    }

    /// Cancel the polling task and wait for it to finish.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        self.cancellation.cancel();

        let handle = self.task_handle.lock().take();
        let Some(handle) = handle else {
            return;
        };

        match tokio::time::timeout(self.config.join_timeout, handle).await {
            Ok(Ok(())) => info!("flight-plan tracker stopped"),
            Ok(Err(err)) => warn!(error = %err, "flight-plan tracker task failed"),
            Err(_) => warn!("flight-plan tracker did not stop within timeout"),
        }
    }

    pub fn is_running(&self) -> bool {
        self.task_handle.lock().as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Register a freshly created flight plan.
    pub fn track(&self, session: &Session, plan: FlightPlan) {
        let op = TrackedOperation {
            id: plan.id.clone(),
            session: session.clone(),
            arrives_at: plan.arrives_at,
            last_known: plan,
        };
        debug!(id = %op.id, arrives_at = %op.arrives_at, "tracking flight plan");
        self.state.tracked.lock().insert(op.id.clone(), op);
    }

    pub fn is_tracking(&self, id: &str) -> bool {
        self.state.tracked.lock().contains_key(id)
    }

    /// Ids of every tracked flight plan, sorted.
    pub fn tracked_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.state.tracked.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Snapshot of a tracked flight plan.
    pub fn tracked(&self, id: &str) -> Option<TrackedOperation> {
        self.state.tracked.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.tracked.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run one polling pass as of `now`. Returns how many plans completed.
    pub async fn poll_once(&self, now: DateTime<Utc>) -> usize {
        self.state.poll_once(now).await
    }

    async fn poll_loop(
        state: Arc<TrackerState>,
        poll_interval: std::time::Duration,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = state.poll_once(Utc::now()) => {}
            }
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(poll_interval) => {}
            }
        }
        debug!("flight-plan tracker loop cancelled");
    }
}

impl Drop for FlightPlanTracker {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}

impl std::fmt::Debug for FlightPlanTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlightPlanTracker")
            .field("tracked", &self.len())
            .field("running", &self.is_running())
            .finish()
    }
}
