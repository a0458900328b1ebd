use crate::api::HeartRateSettings;
use crate::components::toggles::DisplayToggleButton;
use crate::components::ui::input::parse_count;
use crate::components::ui::{
    Button, ButtonSize, Panel, PanelBody, PanelHeader, PanelHint, PanelRow, PanelTitle,
    RevealInput, SelectInput, TextInput,
};
use crate::models::{
    choices, DisplayToggle, HeartRateSource, ProgressStyle, SettingsDocument, WindowTrackingMode,
};
use crate::state::AppContext;
use crate::util::alert;
use leptos::logging::error;
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn ProgressStylePanel() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let display = app_state.0.sync.display;

    let current = Signal::derive(move || {
        let style = display.with(|d| d.as_ref().map(|d| d.progress_style()).unwrap_or_default());
        <&'static str>::from(style).to_string()
    });

    let on_change = Callback::new(move |raw: String| {
        let Ok(style) = raw.parse::<ProgressStyle>() else {
            return;
        };
        let api_client = app_state.0.api_client.get_untracked();
        let sync = app_state.0.sync;
        spawn_local(async move {
            if let Err(e) = api_client.set_progress_style(style).await {
                error!("setting progress style failed: {e}");
            }
            sync.refresh_now();
        });
    });

    view! {
        <Panel>
            <PanelHeader>
                <PanelTitle>"Music progress"</PanelTitle>
            </PanelHeader>
            <SelectInput
                id="select_progress_style"
                options=choices(ProgressStyle::label)
                value=current
                on_change=on_change
            />
        </Panel>
    }
}

#[component]
pub fn WindowTrackingPanel() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let mode: RwSignal<String> = RwSignal::new(String::new());

    {
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.get_settings_document().await {
                Ok(doc) => mode.set(<&'static str>::from(doc.window_tracking_mode()).to_string()),
                Err(e) => error!("loading window tracking mode failed: {e}"),
            }
        });
    }

    let on_change = Callback::new(move |raw: String| {
        let Ok(picked) = raw.parse::<WindowTrackingMode>() else {
            return;
        };
        mode.set(raw);
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            if let Err(e) = api_client.save_window_tracking_mode(picked).await {
                error!("saving window tracking mode failed: {e}");
            }
        });
    });

    view! {
        <Panel>
            <PanelHeader>
                <PanelTitle>"Window tracking"</PanelTitle>
                <DisplayToggleButton toggle=DisplayToggle::WindowTracking />
            </PanelHeader>
            <SelectInput
                id="window_tracking_mode"
                options=choices(WindowTrackingMode::label)
                value=mode
                on_change=on_change
            />
        </Panel>
    }
}

#[component]
pub fn HeartRatePanel() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let display = app_state.0.sync.display;

    let source: RwSignal<String> = RwSignal::new(String::new());
    let pulsoid_token: RwSignal<String> = RwSignal::new(String::new());
    let hyperate_id: RwSignal<String> = RwSignal::new(String::new());
    let custom_api: RwSignal<String> = RwSignal::new(String::new());
    let update_interval: RwSignal<String> = RwSignal::new(String::new());
    let saving: RwSignal<bool> = RwSignal::new(false);

    let privacy = Signal::derive(move || {
        display.with(|d| d.as_ref().map(|d| d.streamer_mode).unwrap_or(false))
    });

    {
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.get_settings_document().await {
                Ok(doc) => {
                    source.set(<&'static str>::from(doc.heart_rate_source()).to_string());
                    pulsoid_token.set(doc.heart_rate_pulsoid_token);
                    hyperate_id.set(doc.heart_rate_hyperate_id);
                    custom_api.set(doc.heart_rate_custom_api);
                    update_interval.set(doc.heart_rate_update_interval.to_string());
                }
                Err(e) => error!("loading heart rate settings failed: {e}"),
            }
        });
    }

    let picked = move || source.with(|s| s.parse::<HeartRateSource>().unwrap_or_default());

    let on_save = move |_: web_sys::MouseEvent| {
        if saving.get_untracked() {
            return;
        }

        let settings = HeartRateSettings {
            source: picked(),
            pulsoid_token: pulsoid_token.get_untracked().trim().to_string(),
            hyperate_id: hyperate_id.get_untracked().trim().to_string(),
            custom_api: custom_api.get_untracked().trim().to_string(),
            update_interval: parse_count(
                &update_interval.get_untracked(),
                1,
                SettingsDocument::default().heart_rate_update_interval,
            ),
        };

        saving.set(true);
        let api_client = app_state.0.api_client.get_untracked();
        spawn_local(async move {
            match api_client.save_heart_rate_settings(&settings).await {
                Ok(()) => alert("Heart rate settings saved successfully!"),
                Err(e) => {
                    error!("saving heart rate settings failed: {e}");
                    alert(&e.alert_text());
                }
            }
            saving.set(false);
        });
    };

    view! {
        <Panel>
            <PanelHeader>
                <PanelTitle>"Heart rate"</PanelTitle>
                <DisplayToggleButton toggle=DisplayToggle::HeartRateMonitor />
            </PanelHeader>
            <PanelBody>
                <SelectInput
                    id="heart_rate_source"
                    options=choices(HeartRateSource::label)
                    value=source
                    on_change=Callback::new(move |v: String| source.set(v))
                />
                <label class="grid grid-cols-[9rem_1fr] items-center gap-2 text-xs">
                    <span class="text-muted-foreground">{move || picked().credential_label()}</span>
                    {move || match picked() {
                        HeartRateSource::Pulsoid => view! {
                            <RevealInput id="heart_rate_pulsoid_token" bind_value=pulsoid_token privacy=privacy />
                        }.into_any(),
                        HeartRateSource::Hyperate => view! {
                            <TextInput id="heart_rate_hyperate_id" bind_value=hyperate_id />
                        }.into_any(),
                        HeartRateSource::Custom => view! {
                            <TextInput id="heart_rate_custom_api" placeholder="http://..." bind_value=custom_api />
                        }.into_any(),
                    }}
                </label>
                <label class="grid grid-cols-[9rem_1fr] items-center gap-2 text-xs">
                    <span class="text-muted-foreground">"Update interval (s)"</span>
                    <TextInput id="heart_rate_update_interval" r#type="number" bind_value=update_interval />
                </label>
            </PanelBody>
            <PanelHint>"Only the selected source's field is used."</PanelHint>
            <PanelRow>
                <Button size=ButtonSize::Sm attr:disabled=move || saving.get() on:click=on_save>
                    {move || if saving.get() { "Saving..." } else { "Save" }}
                </Button>
            </PanelRow>
        </Panel>
    }
}
