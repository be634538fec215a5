use std::mem;
use std::sync::Arc;

use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, Stream, StreamExt};
use outloud_core::model::{QuestionId, UserId, Viewer};
use outloud_core::{Effect, Event, Request, Transition, ViewerSession};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::access_service::AccessGateService;
use crate::backend::Backend;
use crate::catalog_service::CatalogService;
use crate::error::GateError;
use crate::host::Host;
use crate::purchase_service::PurchaseService;

/// Effects still waiting on the backend or the host, each resolving to the
/// event that reports its result.
type InFlight<'h> = FuturesUnordered<LocalBoxFuture<'h, Option<Event>>>;

/// Owns the `ViewerSession` and runs the effects of each transition.
///
/// Events are applied one at a time in arrival order. Effects run
/// concurrently; each completion is applied as its own event.
pub struct ViewerController {
    session: ViewerSession,
    backend: Arc<dyn Backend>,
    catalog: CatalogService,
    gate: AccessGateService,
    purchases: PurchaseService,
    view_logs: JoinSet<()>,
}

impl ViewerController {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, viewer: Option<Viewer>) -> Self {
        Self {
            session: ViewerSession::new(viewer),
            catalog: CatalogService::new(Arc::clone(&backend)),
            gate: AccessGateService::new(Arc::clone(&backend)),
            purchases: PurchaseService::new(Arc::clone(&backend)),
            backend,
            view_logs: JoinSet::new(),
        }
    }

    #[must_use]
    pub fn session(&self) -> &ViewerSession {
        &self.session
    }

    /// Apply `event` and everything it triggers until nothing is in flight.
    pub async fn dispatch(&mut self, event: Event, host: &dyn Host) {
        let mut in_flight = InFlight::new();
        self.apply(event, host, &mut in_flight);
        while let Some(completed) = in_flight.next().await {
            if let Some(event) = completed {
                self.apply(event, host, &mut in_flight);
            }
        }
        self.reap_view_logs();
    }

    /// Serve events from `inbox` until it closes.
    ///
    /// New events are accepted while earlier effects are still pending, so a
    /// slow request never holds back later input.
    pub async fn run<S>(&mut self, mut inbox: S, host: &dyn Host)
    where
        S: Stream<Item = Event> + Unpin,
    {
        let mut in_flight = InFlight::new();
        loop {
            tokio::select! {
                received = inbox.next() => match received {
                    Some(event) => self.apply(event, host, &mut in_flight),
                    None => break,
                },
                Some(completed) = in_flight.next(), if !in_flight.is_empty() => {
                    if let Some(event) = completed {
                        self.apply(event, host, &mut in_flight);
                    }
                }
            }
            self.reap_view_logs();
        }
        debug!(pending = in_flight.len(), "inbox closed");
    }

    /// Wait for every detached view log to finish.
    pub async fn settle(&mut self) {
        while let Some(result) = self.view_logs.join_next().await {
            if let Err(err) = result {
                warn!(error = %err, "view log task aborted");
            }
        }
    }

    fn apply<'h>(&mut self, event: Event, host: &'h dyn Host, in_flight: &mut InFlight<'h>) {
        debug!(?event, "dispatch");
        let Transition { session, effects } = mem::take(&mut self.session).handle(event);
        self.session = session;
        host.session_changed(&self.session);

        for effect in effects {
            if let Some(pending) = self.start(effect, host) {
                in_flight.push(pending);
            }
        }
    }

    /// Alerts and view logs complete on the spot; everything else is returned
    /// as a future yielding the follow-up event.
    fn start<'h>(
        &mut self,
        effect: Effect,
        host: &'h dyn Host,
    ) -> Option<LocalBoxFuture<'h, Option<Event>>> {
        match effect {
            Effect::FetchTheme => {
                let catalog = self.catalog.clone();
                Some(
                    async move {
                        Some(match catalog.theme().await {
                            Ok(config) => Event::ThemeLoaded(config),
                            Err(err) => {
                                warn!(error = %err, "theme unavailable, keeping defaults");
                                Event::ThemeFailed
                            }
                        })
                    }
                    .boxed_local(),
                )
            }
            Effect::FetchCatalog => {
                let catalog = self.catalog.clone();
                let user_id = self.session.user_id();
                Some(
                    async move {
                        Some(match catalog.blocks(user_id).await {
                            Ok(blocks) => Event::CatalogLoaded(blocks),
                            Err(err) => Event::CatalogFailed(err.into_failure(Request::Catalog)),
                        })
                    }
                    .boxed_local(),
                )
            }
            Effect::FetchBundlePrice => {
                let catalog = self.catalog.clone();
                Some(
                    async move {
                        match catalog.bundle_price().await {
                            Ok(price) => Some(Event::BundlePriceLoaded(price)),
                            Err(err) => {
                                warn!(error = %err, "bundle price unavailable");
                                None
                            }
                        }
                    }
                    .boxed_local(),
                )
            }
            Effect::EnterBlock { block, user_id } => {
                let gate = self.gate.clone();
                Some(
                    async move {
                        let outcome = gate
                            .enter(&block, user_id, host)
                            .await
                            .map_err(GateError::into_failure);
                        Some(Event::AccessResolved {
                            block_id: block.id(),
                            outcome,
                        })
                    }
                    .boxed_local(),
                )
            }
            Effect::FetchQuestions { block_id } => {
                let catalog = self.catalog.clone();
                Some(
                    async move {
                        let result = catalog
                            .questions(block_id)
                            .await
                            .map_err(|err| err.into_failure(Request::Questions));
                        Some(Event::QuestionsLoaded { block_id, result })
                    }
                    .boxed_local(),
                )
            }
            Effect::PurchaseAll(request) => {
                let purchases = self.purchases.clone();
                Some(
                    async move {
                        let result = purchases
                            .purchase(&request)
                            .await
                            .map_err(|err| err.into_failure(Request::Purchase));
                        Some(Event::PurchaseAllSettled(result))
                    }
                    .boxed_local(),
                )
            }
            Effect::LogView {
                user_id,
                question_id,
            } => {
                self.spawn_view_log(user_id, question_id);
                None
            }
            Effect::Alert(alert) => {
                host.alert(&alert.to_string());
                None
            }
        }
    }

    fn spawn_view_log(&mut self, user_id: UserId, question_id: QuestionId) {
        let backend = Arc::clone(&self.backend);
        self.view_logs.spawn(async move {
            if let Err(err) = backend.log_view(user_id, question_id).await {
                warn!(error = %err, %question_id, "view log failed");
            }
        });
    }

    fn reap_view_logs(&mut self) {
        while let Some(result) = self.view_logs.try_join_next() {
            if let Err(err) = result {
                warn!(error = %err, "view log task aborted");
            }
        }
    }
}

// Pending view logs outlive the controller; dropping a `JoinSet` would
// abort them.
impl Drop for ViewerController {
    fn drop(&mut self) {
        self.view_logs.detach_all();
    }
}
