mod advanced;
mod dashboard;
mod settings;
mod tracking;

pub use advanced::AdvancedPage;
pub use dashboard::DashboardPage;
pub use settings::SettingsPage;

use crate::components::ui::ErrorNotice;
use crate::state::AppContext;
use leptos::prelude::*;
use leptos_router::hooks::use_location;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumIter)]
pub(crate) enum Tab {
    Dashboard,
    Settings,
    Advanced,
}

impl Tab {
    pub fn href(self) -> &'static str {
        match self {
            Tab::Dashboard => "/",
            Tab::Settings => "/settings",
            Tab::Advanced => "/advanced",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Settings => "Settings",
            Tab::Advanced => "Advanced",
        }
    }

    /// Unknown paths fall back to the dashboard tab.
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/settings" => Tab::Settings,
            "/advanced" => Tab::Advanced,
            _ => Tab::Dashboard,
        }
    }
}

/// Header, tab bar and connection banner around the routed tab content.
#[component]
pub fn DashboardShell(children: Children) -> impl IntoView {
    use strum::IntoEnumIterator;

    let app_state = expect_context::<AppContext>();
    let pathname = use_location().pathname;
    let active = move || Tab::from_path(&pathname.get());

    view! {
        <div class="mx-auto flex min-h-screen max-w-5xl flex-col gap-4 px-4 py-6">
            <header class="flex items-center justify-between gap-4">
                <h1 class="text-lg font-semibold tracking-tight">"Chatbox Dashboard"</h1>
                <nav class="flex gap-1 rounded-lg bg-muted p-1">
                    {Tab::iter()
                        .map(|tab| {
                            let tab_class = move || {
                                if active() == tab {
                                    "rounded-md bg-background px-3 py-1 text-sm font-medium shadow-xs"
                                } else {
                                    "rounded-md px-3 py-1 text-sm text-muted-foreground hover:text-foreground"
                                }
                            };
                            view! {
                                <a href=tab.href() class=tab_class>
                                    {tab.label()}
                                </a>
                            }
                        })
                        .collect_view()}
                </nav>
            </header>
            <ErrorNotice error=app_state.0.sync.last_error />
            <main>{children()}</main>
        </div>
    }
}
