use crate::components::layout_list::LayoutList;
use crate::components::message_rows::{IntervalRows, WeightRows};
use crate::components::toggles::DisplayToggleButton;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Panel, PanelBody, PanelHeader, PanelHint, PanelRow,
    PanelTitle, Spinner, TextInput,
};
use crate::models::{DisplayToggle, UpdateStatus};
use crate::pages::tracking::{HeartRatePanel, ProgressStylePanel, WindowTrackingPanel};
use crate::state::AppContext;
use crate::store::validate_settings_upload;
use crate::util::{alert, confirm, reload_page};
use leptos::logging::{error, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;
use strum::IntoEnumIterator;
use wasm_bindgen::JsCast;

#[component]
pub fn AdvancedPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    app_state.0.messages.load();
    app_state.0.layout.load();

    view! {
        <div class="grid gap-4 md:grid-cols-2">
            <div class="flex flex-col gap-4">
                <Panel>
                    <PanelHeader>
                        <PanelTitle>"Display"</PanelTitle>
                    </PanelHeader>
                    <PanelRow>
                        {DisplayToggle::iter()
                            .filter(|t| t.is_display_option())
                            .map(|t| view! { <DisplayToggleButton toggle=t /> })
                            .collect_view()}
                    </PanelRow>
                </Panel>

                <Panel>
                    <PanelHeader>
                        <PanelTitle>"Layout"</PanelTitle>
                    </PanelHeader>
                    <PanelHint>"Drag the widgets into the order they should appear in the chatbox."</PanelHint>
                    <LayoutList />
                </Panel>

                <Panel>
                    <PanelHeader>
                        <PanelTitle>"Message timings"</PanelTitle>
                    </PanelHeader>
                    <PanelHint>"Seconds each custom message stays on screen."</PanelHint>
                    <IntervalRows />
                </Panel>

                <Panel>
                    <PanelHeader>
                        <PanelTitle>"Message weights"</PanelTitle>
                    </PanelHeader>
                    <PanelHint>"Higher weights are picked more often."</PanelHint>
                    <WeightRows />
                </Panel>
            </div>

            <div class="flex flex-col gap-4">
                <ProgressStylePanel />
                <WindowTrackingPanel />
                <HeartRatePanel />
                <AiMessagePanel />
                <UpdatePanel />
                <MaintenancePanel />
            </div>
        </div>
    }
}

#[component]
fn AiMessagePanel() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = app_state.0.messages;

    let mood: RwSignal<String> = RwSignal::new("happy".to_string());
    let theme: RwSignal<String> = RwSignal::new(String::new());
    let result: RwSignal<Option<String>> = RwSignal::new(None);
    let generating: RwSignal<bool> = RwSignal::new(false);

    let on_generate = move |_: web_sys::MouseEvent| {
        if generating.get_untracked() {
            return;
        }
        generating.set(true);

        let mood = mood.get_untracked();
        let theme = theme.get_untracked();
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.generate_ai_message(&mood, &theme).await {
                Ok(msg) => result.set(Some(msg)),
                Err(e) => {
                    error!("generating message failed: {e}");
                    alert(&e.alert_text());
                }
            }
            generating.set(false);
        });
    };

    let on_keep = move |_: web_sys::MouseEvent| {
        let Some(msg) = result.get_untracked() else {
            return;
        };
        match store.add(&msg) {
            Ok(()) => {
                result.set(None);
                alert("Message added to custom messages!");
            }
            Err(e) => alert(&e.to_string()),
        }
    };

    view! {
        <Panel>
            <PanelHeader>
                <PanelTitle>"AI message"</PanelTitle>
            </PanelHeader>
            <PanelBody>
                <TextInput placeholder="Mood" bind_value=mood />
                <TextInput placeholder="Theme (optional)" bind_value=theme />
            </PanelBody>
            <PanelRow>
                <Button size=ButtonSize::Sm attr:disabled=move || generating.get() on:click=on_generate>
                    <Show when=move || generating.get() fallback=|| ().into_view()>
                        <Spinner class="text-current" />
                    </Show>
                    "Generate"
                </Button>
            </PanelRow>
            {move || result.get().map(|msg| view! {
                <div class="flex items-center justify-between gap-2 rounded-md bg-muted px-3 py-2 text-sm">
                    <span class="min-w-0 break-words">{msg}</span>
                    <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=on_keep>
                        "Add to messages"
                    </Button>
                </div>
            })}
        </Panel>
    }
}

#[component]
fn UpdatePanel() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let status: RwSignal<Option<UpdateStatus>> = RwSignal::new(None);
    let checking: RwSignal<bool> = RwSignal::new(false);

    let on_check = move |_: web_sys::MouseEvent| {
        if checking.get_untracked() {
            return;
        }
        checking.set(true);
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.get_update_info().await {
                Ok(s) => status.set(Some(s)),
                Err(e) => alert(&format!("Error checking for updates: {e}")),
            }
            checking.set(false);
        });
    };

    view! {
        <Panel>
            <PanelHeader>
                <PanelTitle>"Updates"</PanelTitle>
                <Button variant=ButtonVariant::Outline size=ButtonSize::Sm attr:disabled=move || checking.get() on:click=on_check>
                    "Check for updates"
                </Button>
            </PanelHeader>
            {move || status.get().map(|s| {
                let release = s.available_release().cloned();
                view! {
                    <PanelBody class="text-xs">
                        <div>"Current version: " {s.current_version.clone()}</div>
                        {match release {
                            Some(r) => {
                                let title = format!("{} ({})", r.release_name, r.latest_version);
                                let notes = r.notes_excerpt();
                                let url = r.release_url;
                                view! {
                                    <div class="flex flex-col gap-1">
                                        <div class="font-medium">{title}</div>
                                        <PanelHint>{notes}</PanelHint>
                                        <a class="text-primary underline underline-offset-4" href=url target="_blank" rel="noopener">
                                            "View release"
                                        </a>
                                    </div>
                                }.into_any()
                            }
                            None => view! { <PanelHint>"You are on the latest version."</PanelHint> }.into_any(),
                        }}
                    </PanelBody>
                }
            })}
        </Panel>
    }
}

const DOWNLOAD_LINK_CLASS: &str = "inline-flex h-8 items-center rounded-md border px-3 text-sm font-medium shadow-xs hover:bg-accent hover:text-accent-foreground";

#[component]
fn MaintenancePanel() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let api_client = app_state.0.api_client;

    let on_reset = move |_: web_sys::MouseEvent| {
        if !confirm("Reset all settings to defaults? This cannot be undone.") {
            return;
        }
        let api_client = api_client.get_untracked();
        spawn_local(async move {
            if let Err(e) = api_client.reset_settings().await {
                error!("reset failed: {e}");
            }
            reload_page();
        });
    };

    let file_input: NodeRef<leptos::html::Input> = NodeRef::new();

    let on_pick = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        // Picking the same file again must fire `change` again.
        input.set_value("");

        let api_client = api_client.get_untracked();
        spawn_local(async move {
            let text = match wasm_bindgen_futures::JsFuture::from(file.text()).await {
                Ok(v) => v.as_string().unwrap_or_default(),
                Err(e) => {
                    warn!("reading settings file failed: {e:?}");
                    String::new()
                }
            };

            let settings = match validate_settings_upload(&text) {
                Ok(v) => v,
                Err(e) => {
                    alert(&e.to_string());
                    return;
                }
            };

            match api_client.upload_settings(&settings).await {
                Ok(()) => {
                    alert("Settings uploaded successfully! Reloading page...");
                    reload_page();
                }
                Err(e) => {
                    error!("uploading settings failed: {e}");
                    alert("Failed to upload settings. Please check the file format.");
                }
            }
        });
    };

    view! {
        <Panel>
            <PanelHeader>
                <PanelTitle>"Maintenance"</PanelTitle>
            </PanelHeader>
            <input
                node_ref=file_input
                type="file"
                accept=".json,application/json"
                class="hidden"
                on:change=on_pick
            />
            <PanelRow>
                <a class=DOWNLOAD_LINK_CLASS href=move || api_client.with(|c| c.download_settings_url())>
                    "Download settings"
                </a>
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    on:click=move |_| {
                        if let Some(input) = file_input.get() {
                            input.click();
                        }
                    }
                >
                    "Upload settings"
                </Button>
                <a class=DOWNLOAD_LINK_CLASS href=move || api_client.with(|c| c.download_log_url())>
                    "Download log"
                </a>
                <Button variant=ButtonVariant::Destructive size=ButtonSize::Sm on:click=on_reset>
                    "Reset to defaults"
                </Button>
            </PanelRow>
        </Panel>
    }
}
