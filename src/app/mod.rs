use crate::pages::{AdvancedPage, DashboardPage, DashboardShell, SettingsPage};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let app_state = AppState::new();
    provide_context(AppContext(app_state));

    // One poller for the whole page; tabs only read its snapshot.
    let sync = app_state.sync;
    Effect::new(move |_| sync.start());
    on_cleanup(move || sync.stop());

    view! {
        <Router>
            <DashboardShell>
                <Routes fallback=|| view! { <DashboardPage /> }>
                    <Route path=path!("") view=DashboardPage />
                    <Route path=path!("settings") view=SettingsPage />
                    <Route path=path!("advanced") view=AdvancedPage />
                </Routes>
            </DashboardShell>
        </Router>
    }
}
