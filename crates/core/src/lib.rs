pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use std::sync::Arc;

use tokio::sync::mpsc;

use errors::CoreError;
use models::coin::{Coin, CoinDetail};
use models::report::ReportSet;
use models::settings::Settings;
use providers::coingecko::CoinGeckoProvider;
use providers::traits::MarketDataProvider;
use services::catalog_service::CoinCatalog;
use services::poll_service::{PollHandle, PollLoop, RenderRequest};
use services::report_service::ReportStore;
use storage::kv::KeyValueStore;

/// Navigation targets emitted by the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    About,
    Reports,
}

/// Main entry point for the Coin Report core library.
///
/// Owns all application state — catalog, pinned reports, the live poll
/// session — and is constructed once at startup with its collaborators
/// injected. The view layer holds no state of its own: it renders the
/// plain data these methods return and feeds user intents back in.
#[must_use]
pub struct CoinDashboard {
    settings: Settings,
    provider: Arc<dyn MarketDataProvider>,
    catalog: CoinCatalog,
    reports: ReportStore,
    poll: PollLoop,
    view: View,
    /// The active report-view poll session, if any. Holding the sender
    /// here lets pin/unpin restart the loop without breaking the view's
    /// subscription.
    session: Option<PollSession>,
}

struct PollSession {
    handle: PollHandle,
    sink: mpsc::UnboundedSender<RenderRequest>,
}

impl std::fmt::Debug for CoinDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinDashboard")
            .field("catalog_len", &self.catalog.len())
            .field("pinned", &self.reports.current().len())
            .field("view", &self.view)
            .field("polling", &self.session.is_some())
            .finish()
    }
}

impl CoinDashboard {
    /// Build a dashboard with explicit collaborators. The persisted
    /// report set is loaded here; a missing or corrupt value starts empty.
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        store: Box<dyn KeyValueStore>,
        settings: Settings,
    ) -> Self {
        let reports = ReportStore::load(store, settings.max_reports);
        let poll = PollLoop::new(Arc::clone(&provider), &settings);

        Self {
            settings,
            provider,
            catalog: CoinCatalog::new(),
            reports,
            poll,
            view: View::Home,
            session: None,
        }
    }

    /// Convenience constructor against the public CoinGecko API with
    /// default settings.
    pub fn with_defaults(store: Box<dyn KeyValueStore>) -> Self {
        let settings = Settings::default();
        let provider = CoinGeckoProvider::with_base_url(
            settings.api_base_url.clone(),
            std::time::Duration::from_secs(settings.request_timeout_secs),
        );
        Self::new(Arc::new(provider), store, settings)
    }

    // ── Catalog ─────────────────────────────────────────────────────

    /// Refresh the coin catalog from the market API.
    ///
    /// Network failures degrade to an empty catalog (logged, never an
    /// error); an already-running refresh coalesces into a skip. Returns
    /// the catalog contents either way.
    pub async fn refresh_catalog(&mut self) -> &[Coin] {
        self.catalog
            .refresh(self.provider.as_ref(), &self.settings.vs_currency)
            .await;
        self.catalog.coins()
    }

    /// The full fetched catalog.
    #[must_use]
    pub fn catalog(&self) -> &[Coin] {
        self.catalog.coins()
    }

    /// The slice of the catalog the grid should render.
    #[must_use]
    pub fn catalog_page(&self) -> &[Coin] {
        self.catalog.page(self.settings.catalog_page_size)
    }

    /// Filter the catalog by name or symbol substring (case-insensitive),
    /// truncated to the grid page size.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Coin> {
        let mut matches = self.catalog.search(term);
        matches.truncate(self.settings.catalog_page_size);
        matches
    }

    /// Fetch the detail data for the "More Info" modal.
    pub async fn coin_detail(&self, id: &str) -> Result<CoinDetail, CoreError> {
        self.provider.fetch_detail(id).await
    }

    // ── Reports ─────────────────────────────────────────────────────

    /// Pin a coin into the report set.
    ///
    /// Fails with `UnknownCoin` if the id is not in the current catalog
    /// and with `ReportLimitReached` when the set is full — in the latter
    /// case the view must revert its toggle and show the limit notice.
    /// While the reports view is active, a successful pin restarts the
    /// poll session with the new id set.
    pub fn pin(&mut self, id: &str) -> Result<(), CoreError> {
        if !self.catalog.contains(id) {
            return Err(CoreError::UnknownCoin(id.to_string()));
        }
        self.reports.pin(id)?;
        self.restart_session();
        Ok(())
    }

    /// Unpin a coin. Unpinning an id that is not pinned leaves the set
    /// unchanged. While the reports view is active, the poll session is
    /// restarted with the remaining ids.
    pub fn unpin(&mut self, id: &str) -> Result<(), CoreError> {
        self.reports.unpin(id)?;
        self.restart_session();
        Ok(())
    }

    /// Read-only snapshot of the pinned set.
    #[must_use]
    pub fn pinned(&self) -> &ReportSet {
        self.reports.current()
    }

    /// Render data for the selected-coin strip: the pinned coins resolved
    /// against the catalog, in pin order. Ids missing from the current
    /// catalog are skipped rather than failing the whole strip.
    #[must_use]
    pub fn pinned_coins(&self) -> Vec<&Coin> {
        self.reports
            .current()
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .collect()
    }

    // ── Navigation & Polling ────────────────────────────────────────

    /// Switch views. The poll loop is owned by this transition, not
    /// inferred from what happens to be on screen:
    ///
    /// - entering `Reports` stops any previous session and starts a fresh
    ///   one (new rolling history), returning the render-request stream
    ///   the view should consume;
    /// - every other target stops the session and discards its history.
    pub fn navigate(&mut self, view: View) -> Option<mpsc::UnboundedReceiver<RenderRequest>> {
        self.stop_session();
        self.view = view;

        if view != View::Reports {
            return None;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let handle = self
            .poll
            .start(self.reports.current().ids().to_vec(), tx.clone());
        self.session = Some(PollSession { handle, sink: tx });
        Some(rx)
    }

    #[must_use]
    pub fn current_view(&self) -> View {
        self.view
    }

    /// Whether a poll session is currently running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Replace the running poll session with one for the current pinned
    /// ids, keeping the view's subscription alive. The old session is
    /// stopped first; its in-flight tick, if any, is discarded with it.
    fn restart_session(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.handle.stop();
        let sink = session.sink.clone();
        let handle = self
            .poll
            .start(self.reports.current().ids().to_vec(), sink);
        session.handle = handle;
    }

    fn stop_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.handle.stop();
        }
    }
}
