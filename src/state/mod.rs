mod drag;
mod sync;

pub(crate) use drag::LayoutController;
pub(crate) use sync::SyncLoop;

use crate::api::{ApiClient, EnvConfig};
use crate::models::DisplayToggle;
use crate::store::MessageStore;
use crate::util::reload_page;
use leptos::logging::{error, log};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Custom message list (settings and advanced tabs).
    pub messages: MessageStore,

    /// Live `/status` snapshot, refreshed on a timer.
    pub sync: SyncLoop,

    pub layout: LayoutController,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_config(EnvConfig::new())
    }

    pub fn with_config(config: EnvConfig) -> Self {
        log!(
            "dashboard api={} refresh={}s",
            config.api_url,
            config.refresh_interval
        );

        let api_client = RwSignal::new(ApiClient::from_env(&config));
        let interval_ms = config.refresh_interval_ms();

        Self {
            api_client,
            messages: MessageStore::new(api_client),
            sync: SyncLoop::new(api_client, interval_ms),
            layout: LayoutController::new(api_client),
        }
    }

    /// Flip a server-side switch, then pull fresh status.
    pub fn toggle(&self, path: &'static str) {
        let api_client = self.api_client.get_untracked();
        let sync = self.sync;
        spawn_local(async move {
            if let Err(e) = api_client.toggle(path).await {
                error!("toggle {path} failed: {e}");
            }
            sync.refresh_now();
        });
    }

    pub fn toggle_display(&self, t: DisplayToggle) {
        if !t.needs_page_reload() {
            self.toggle(t.path());
            return;
        }

        // Masked inputs are rendered once from the page state, so reload after the flip.
        let api_client = self.api_client.get_untracked();
        spawn_local(async move {
            if let Err(e) = api_client.toggle(t.path()).await {
                error!("toggle {} failed: {e}", t.path());
            }
            reload_page();
        });
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
