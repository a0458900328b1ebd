use crate::api::ConnectionSettings;
use crate::components::message_rows::MessageEditorRows;
use crate::components::ui::input::{event_value, parse_count};
use crate::components::ui::reveal_input::is_sensitive;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, ErrorNotice, Panel, PanelBody,
    PanelHeader, PanelHint, PanelRow, PanelTitle, RevealInput, Spinner, TextInput,
};
use crate::models::SettingsDocument;
use crate::state::AppContext;
use crate::store::{validate_profile_name, validate_profile_selection};
use crate::util::{alert, confirm, prompt, reload_page};
use leptos::logging::error;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn SettingsPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = app_state.0.messages;

    // Tab activation always reloads the list.
    store.load();

    let on_add = move |_: web_sys::MouseEvent| {
        let Some(text) = prompt("Enter new message:") else {
            return;
        };
        if let Err(e) = store.add(&text) {
            alert(&e.to_string());
        }
    };

    view! {
        <div class="grid gap-4 md:grid-cols-2">
            <Panel>
                <PanelHeader>
                    <PanelTitle>"Custom messages"</PanelTitle>
                    <div class="flex items-center gap-2">
                        <Show when=move || store.loading.get() fallback=|| ().into_view()>
                            <Spinner />
                        </Show>
                        <Button size=ButtonSize::Sm on:click=on_add>"Add message"</Button>
                    </div>
                </PanelHeader>
                <PanelHint>"Edits are saved when you leave the field."</PanelHint>
                <ErrorNotice error=store.error />
                <MessageEditorRows />
            </Panel>

            <div class="flex flex-col gap-4">
                <ConnectionPanel />
                <ProfilesPanel />
            </div>
        </div>
    }
}

#[component]
fn ConnectionPanel() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let display = app_state.0.sync.display;

    let quest_ip: RwSignal<String> = RwSignal::new(String::new());
    let quest_port: RwSignal<String> = RwSignal::new(String::new());
    let osc_interval: RwSignal<String> = RwSignal::new(String::new());
    let dashboard_interval: RwSignal<String> = RwSignal::new(String::new());
    let timezone: RwSignal<String> = RwSignal::new(String::new());
    let client_id: RwSignal<String> = RwSignal::new(String::new());
    let client_secret: RwSignal<String> = RwSignal::new(String::new());

    let saving: RwSignal<bool> = RwSignal::new(false);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let privacy = Signal::derive(move || {
        display.with(|d| d.as_ref().map(|d| d.streamer_mode).unwrap_or(false))
    });

    let fill = move |doc: SettingsDocument| {
        quest_ip.set(doc.quest_ip);
        quest_port.set(doc.quest_port.to_string());
        osc_interval.set(doc.osc_send_interval.to_string());
        dashboard_interval.set(doc.dashboard_update_interval.to_string());
        timezone.set(doc.timezone);
        client_id.set(doc.spotify_client_id);
        client_secret.set(doc.spotify_client_secret);
    };

    {
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.get_settings_document().await {
                Ok(doc) => fill(doc),
                Err(e) => {
                    error!("loading settings failed: {e}");
                    error.set(Some(e.to_string()));
                }
            }
        });
    }

    let on_save = move |_: web_sys::MouseEvent| {
        if saving.get_untracked() {
            return;
        }

        let defaults = SettingsDocument::default();
        let settings = ConnectionSettings {
            quest_ip: quest_ip.get_untracked().trim().to_string(),
            quest_port: quest_port
                .get_untracked()
                .trim()
                .parse::<u16>()
                .unwrap_or(defaults.quest_port),
            osc_send_interval: parse_count(
                &osc_interval.get_untracked(),
                1,
                defaults.osc_send_interval,
            ),
            dashboard_update_interval: parse_count(
                &dashboard_interval.get_untracked(),
                1,
                defaults.dashboard_update_interval,
            ),
            timezone: timezone.get_untracked().trim().to_string(),
            spotify_client_id: client_id.get_untracked().trim().to_string(),
            spotify_client_secret: client_secret.get_untracked().trim().to_string(),
        };

        saving.set(true);
        error.set(None);
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.save_connection_settings(&settings).await {
                Ok(()) => alert("Settings saved!"),
                Err(e) => {
                    error!("saving settings failed: {e}");
                    error.set(Some(e.to_string()));
                }
            }
            saving.set(false);
        });
    };

    let field = move |label: &'static str, id: &'static str, kind: &'static str, bind: RwSignal<String>| {
        let input = if is_sensitive(id) {
            view! { <RevealInput id=id bind_value=bind privacy=privacy /> }.into_any()
        } else {
            view! { <TextInput id=id r#type=kind bind_value=bind /> }.into_any()
        };
        view! {
            <label class="grid grid-cols-[9rem_1fr] items-center gap-2 text-xs">
                <span class="text-muted-foreground">{label}</span>
                {input}
            </label>
        }
    };

    view! {
        <Panel>
            <PanelHeader>
                <PanelTitle>"Connection"</PanelTitle>
            </PanelHeader>
            <PanelBody>
                {field("Quest IP", "quest_ip", "text", quest_ip)}
                {field("OSC port", "quest_port", "number", quest_port)}
                {field("Send interval (s)", "osc_send_interval", "number", osc_interval)}
                {field("Dashboard refresh (s)", "dashboard_update_interval", "number", dashboard_interval)}
                {field("Timezone", "timezone", "text", timezone)}
                {field("Spotify client ID", "spotify_client_id", "text", client_id)}
                {field("Spotify client secret", "spotify_client_secret", "text", client_secret)}
            </PanelBody>
            <ErrorNotice error=error />
            <PanelRow>
                <Button size=ButtonSize::Sm attr:disabled=move || saving.get() on:click=on_save>
                    {move || if saving.get() { "Saving..." } else { "Save" }}
                </Button>
            </PanelRow>
        </Panel>
    }
}

#[component]
fn ProfilesPanel() -> impl IntoView {
    let app_state = expect_context::<AppContext>();

    let profiles: RwSignal<Vec<String>> = RwSignal::new(vec![]);
    let selected: RwSignal<String> = RwSignal::new(String::new());

    let refresh = move || {
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.list_profiles().await {
                Ok(list) => {
                    if !list.contains(&selected.get_untracked()) {
                        selected.set(String::new());
                    }
                    profiles.set(list);
                }
                Err(e) => error!("loading profiles failed: {e}"),
            }
        });
    };
    refresh();

    let on_save = move |_: web_sys::MouseEvent| {
        let Some(raw) = prompt("Enter profile name:") else {
            return;
        };
        let name = match validate_profile_name(&raw) {
            Ok(n) => n,
            Err(e) => {
                alert(&e.to_string());
                return;
            }
        };

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.save_profile(&name).await {
                Ok(msg) => {
                    alert(&msg.unwrap_or_else(|| "Profile saved!".to_string()));
                    refresh();
                }
                Err(e) => alert(&e.alert_text()),
            }
        });
    };

    let on_load = move |_: web_sys::MouseEvent| {
        let name = match validate_profile_selection(&selected.get_untracked()) {
            Ok(n) => n,
            Err(e) => {
                alert(&e.to_string());
                return;
            }
        };

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.load_profile(&name).await {
                Ok(_) => {
                    alert("Profile loaded! Reloading page...");
                    reload_page();
                }
                Err(e) => alert(&e.alert_text()),
            }
        });
    };

    let on_delete = move |_: web_sys::MouseEvent| {
        let name = match validate_profile_selection(&selected.get_untracked()) {
            Ok(n) => n,
            Err(e) => {
                alert(&e.to_string());
                return;
            }
        };
        if !confirm(&format!("Delete profile \"{name}\"?")) {
            return;
        }

        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.delete_profile(&name).await {
                Ok(_) => {
                    alert("Profile deleted!");
                    refresh();
                }
                Err(e) => alert(&e.alert_text()),
            }
        });
    };

    view! {
        <Panel>
            <PanelHeader>
                <PanelTitle>"Profiles"</PanelTitle>
            </PanelHeader>
            <select
                class="border-input h-8 w-full rounded-md border bg-transparent px-2 text-sm"
                prop:value=move || selected.get()
                on:change=move |ev| selected.set(event_value(&ev).unwrap_or_default())
            >
                <option value="">"-- Select a profile --"</option>
                {move || {
                    profiles
                        .get()
                        .into_iter()
                        .map(|p| {
                            let label = p.clone();
                            view! { <option value=p>{label}</option> }
                        })
                        .collect_view()
                }}
            </select>
            <PanelRow>
                <Button size=ButtonSize::Sm on:click=on_save>"Save current"</Button>
                <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=on_load>"Load"</Button>
                <Button variant=ButtonVariant::Destructive size=ButtonSize::Sm on:click=on_delete>"Delete"</Button>
            </PanelRow>
        </Panel>
    }
}
