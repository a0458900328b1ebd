use crate::components::toggles::ModuleToggleRow;
use crate::components::ui::{
    Button, ButtonSize, Panel, PanelBody, PanelHeader, PanelHint, PanelRow, PanelTitle, Spinner,
    TextInput,
};
use crate::models::ModuleToggle;
use crate::state::AppContext;
use leptos::logging::error;
use leptos::prelude::*;
use leptos::task::spawn_local;
use strum::IntoEnumIterator;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let display = app_state.0.sync.display;

    let field = move |f: fn(&crate::models::DisplayState) -> String| {
        move || display.with(|d| d.as_ref().map(f).unwrap_or_default())
    };

    view! {
        <div class="grid gap-4 md:grid-cols-2">
            <Panel>
                <PanelHeader>
                    <PanelTitle>"Modules"</PanelTitle>
                    <Show when=move || display.with(|d| d.is_none()) fallback=|| ().into_view()>
                        <Spinner />
                    </Show>
                </PanelHeader>
                <PanelBody class="divide-y">
                    {ModuleToggle::iter()
                        .map(|t| view! { <ModuleToggleRow toggle=t /> })
                        .collect_view()}
                </PanelBody>
            </Panel>

            <div class="flex flex-col gap-4">
                <Panel>
                    <PanelHeader>
                        <PanelTitle>"Preview"</PanelTitle>
                    </PanelHeader>
                    <PanelBody>
                        <div class="flex items-start gap-3">
                            {move || {
                                display
                                    .with(|d| d.as_ref().and_then(|d| d.album_art_url()))
                                    .map(|src| view! {
                                        <img src=src alt="Album art" class="size-16 shrink-0 rounded-md object-cover" />
                                    })
                            }}
                            <pre class="min-h-16 flex-1 whitespace-pre-wrap rounded-md bg-muted px-3 py-2 font-mono text-xs">
                                {move || {
                                    display.with(|d| {
                                        d.as_ref()
                                            .map(|d| d.preview_or_placeholder())
                                            .unwrap_or_else(|| "Preview will show here.".to_string())
                                    })
                                }}
                            </pre>
                        </div>
                        <div class="text-xs">
                            <span class="text-muted-foreground">"Last sent: "</span>
                            {move || {
                                display.with(|d| {
                                    d.as_ref()
                                        .map(|d| d.last_message_or_placeholder())
                                        .unwrap_or_else(|| "---".to_string())
                                })
                            }}
                        </div>
                        <PanelHint>
                            {field(|d| d.connection_status.clone())}
                            " "
                            {field(|d| d.last_successful_send.clone())}
                        </PanelHint>
                    </PanelBody>
                </Panel>

                <Panel>
                    <PanelHeader>
                        <PanelTitle>"Queue"</PanelTitle>
                    </PanelHeader>
                    <PanelBody class="text-xs">
                        {move || {
                            let lines = display.with(|d| {
                                d.as_ref().map(|d| d.queue_lines()).unwrap_or_default()
                            });
                            if lines.is_empty() {
                                return view! { <PanelHint>"Nothing queued."</PanelHint> }.into_any();
                            }
                            lines
                                .into_iter()
                                .map(|l| view! { <div>{l}</div> })
                                .collect_view()
                                .into_any()
                        }}
                    </PanelBody>
                </Panel>

                <ManualSendPanel />
            </div>
        </div>
    }
}

#[component]
fn ManualSendPanel() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let message: RwSignal<String> = RwSignal::new(String::new());
    let sending: RwSignal<bool> = RwSignal::new(false);

    let on_send = move |_: web_sys::MouseEvent| {
        if sending.get_untracked() {
            return;
        }
        let text = message.get_untracked().trim().to_string();
        if text.is_empty() {
            return;
        }

        sending.set(true);
        let api_client = app_state.0.api_client.get_untracked();
        let sync = app_state.0.sync;
        spawn_local(async move {
            match api_client.send_message(&text).await {
                Ok(()) => {
                    message.set(String::new());
                    sync.refresh_now();
                }
                Err(e) => error!("manual send failed: {e}"),
            }
            sending.set(false);
        });
    };

    view! {
        <Panel>
            <PanelHeader>
                <PanelTitle>"Send now"</PanelTitle>
            </PanelHeader>
            <PanelRow class="flex-nowrap">
                <TextInput placeholder="Type a message" bind_value=message />
                <Button size=ButtonSize::Sm attr:disabled=move || sending.get() on:click=on_send>
                    <Show when=move || sending.get() fallback=|| ().into_view()>
                        <Spinner class="text-current" />
                    </Show>
                    "Send"
                </Button>
            </PanelRow>
        </Panel>
    }
}
