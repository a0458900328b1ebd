use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Treat an explicit `null` like a missing field.
///
/// Settings uploads are stored as-is, so any collection the backend echoes
/// back may come through as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Sparse per-message attribute map keyed by message position.
///
/// The backend stores `per_message_intervals` and `weighted_messages` as JSON
/// objects whose keys are decimal positions. Values have been observed both as
/// numbers and as numeric strings (the interval form posts whatever the input
/// held), so both are accepted. Entries that do not parse to a positive integer
/// are dropped, which makes lookups fall back to the caller's default.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(from = "BTreeMap<String, serde_json::Value>")]
pub(crate) struct AttributeMap(BTreeMap<String, u32>);

impl From<BTreeMap<String, serde_json::Value>> for AttributeMap {
    fn from(raw: BTreeMap<String, serde_json::Value>) -> Self {
        let mut out = BTreeMap::new();
        for (k, v) in raw {
            let parsed = match &v {
                serde_json::Value::Number(n) => n
                    .as_u64()
                    .or_else(|| n.as_f64().filter(|f| *f >= 1.0).map(|f| f.trunc() as u64)),
                serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
                _ => None,
            };

            if let Some(n) = parsed.filter(|n| *n >= 1) {
                out.insert(k.trim().to_string(), n.min(u32::MAX as u64) as u32);
            }
        }
        Self(out)
    }
}

impl AttributeMap {
    pub fn get(&self, index: usize) -> Option<u32> {
        self.0.get(&index.to_string()).copied()
    }

    pub fn get_or(&self, index: usize, default: u32) -> u32 {
        self.get(index).unwrap_or(default)
    }

    pub fn insert(&mut self, index: usize, value: u32) {
        self.0.insert(index.to_string(), value);
    }

}

/// Snapshot returned by `GET /status`.
///
/// Every field defaults so an older backend (or a partially failed module on
/// the server side) still yields a renderable state.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub(crate) struct DisplayState {
    pub chatbox: bool,
    pub auto_send_paused: bool,

    pub time: String,
    pub time_on: bool,
    pub custom: String,
    pub custom_on: bool,
    pub song: String,
    pub music_on: bool,
    pub music_progress: bool,
    pub progress_style: String,
    pub progress_percent: u32,
    pub progress_string: String,
    pub window: String,
    pub window_on: bool,
    pub heartrate: String,
    pub heartrate_on: bool,
    pub weather: String,
    pub weather_on: bool,

    pub last_message: String,
    pub preview: String,
    pub album_art: String,
    pub connection_status: String,
    pub last_successful_send: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message_queue: Vec<String>,

    pub theme: String,
    pub streamer_mode: bool,
    pub compact_mode: bool,
    pub random_order: bool,
    pub show_module_icons: bool,
    pub window_tracking_enabled: bool,
    pub heart_rate_enabled: bool,
    pub patreon_supporter: bool,

    #[serde(deserialize_with = "null_as_default")]
    pub custom_texts: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub per_message_intervals: AttributeMap,
    #[serde(deserialize_with = "null_as_default")]
    pub weighted_messages: AttributeMap,
}

impl DisplayState {
    pub fn is_light(&self) -> bool {
        self.theme == "light"
    }

    /// Class list for `<body>`. Only recomputed when the backend reports a theme.
    pub fn body_class(&self) -> Option<String> {
        if self.theme.trim().is_empty() {
            return None;
        }

        let mut classes: Vec<&str> = vec![];
        if self.is_light() {
            classes.push("light");
        }
        if self.compact_mode {
            classes.push("compact");
        }
        Some(classes.join(" "))
    }

    pub fn last_message_or_placeholder(&self) -> String {
        if self.last_message.trim().is_empty() {
            "---".to_string()
        } else {
            self.last_message.clone()
        }
    }

    pub fn preview_or_placeholder(&self) -> String {
        if self.preview.trim().is_empty() {
            "Preview will show here.".to_string()
        } else {
            self.preview.clone()
        }
    }

    pub fn album_art_url(&self) -> Option<String> {
        let url = self.album_art.trim();
        (!url.is_empty()).then(|| url.to_string())
    }

    pub fn progress_style(&self) -> ProgressStyle {
        self.progress_style.parse().unwrap_or_default()
    }

    /// Song line followed by the rendered progress indicator, when one is shown.
    pub fn song_with_progress(&self) -> String {
        let progress = self.progress_string.trim();
        if self.music_progress && !progress.is_empty() && !self.song.trim().is_empty() {
            format!("{} {}", self.song, progress)
        } else {
            self.song.clone()
        }
    }

    /// Queue preview lines, numbered from 1.
    pub fn queue_lines(&self) -> Vec<String> {
        self.message_queue
            .iter()
            .enumerate()
            .map(|(i, m)| format!("{}. {}", i + 1, m))
            .collect()
    }
}

/// Chatbox modules that can be switched on and off from the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter)]
pub(crate) enum ModuleToggle {
    Chatbox,
    Time,
    Custom,
    Music,
    MusicProgress,
    Window,
    Heartrate,
    Weather,
}

impl ModuleToggle {
    pub fn path(self) -> &'static str {
        match self {
            ModuleToggle::Chatbox => "/toggle_chatbox",
            ModuleToggle::Time => "/toggle_time",
            ModuleToggle::Custom => "/toggle_custom",
            ModuleToggle::Music => "/toggle_music",
            ModuleToggle::MusicProgress => "/toggle_music_progress",
            ModuleToggle::Window => "/toggle_window",
            ModuleToggle::Heartrate => "/toggle_heartrate",
            ModuleToggle::Weather => "/toggle_weather",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ModuleToggle::Chatbox => "Chatbox",
            ModuleToggle::Time => "Time",
            ModuleToggle::Custom => "Custom",
            ModuleToggle::Music => "Music",
            ModuleToggle::MusicProgress => "Progress bar",
            ModuleToggle::Window => "Window",
            ModuleToggle::Heartrate => "Heart rate",
            ModuleToggle::Weather => "Weather",
        }
    }

    pub fn is_on(self, state: &DisplayState) -> bool {
        match self {
            ModuleToggle::Chatbox => state.chatbox,
            ModuleToggle::Time => state.time_on,
            ModuleToggle::Custom => state.custom_on,
            ModuleToggle::Music => state.music_on,
            ModuleToggle::MusicProgress => state.music_progress,
            ModuleToggle::Window => state.window_on,
            ModuleToggle::Heartrate => state.heartrate_on,
            ModuleToggle::Weather => state.weather_on,
        }
    }

    /// Status text shown next to the module; `None` for toggles without a status line.
    pub fn status_text(self, state: &DisplayState) -> Option<String> {
        let shown = |on: bool, text: &str| {
            if on {
                text.to_string()
            } else {
                "OFF".to_string()
            }
        };

        match self {
            ModuleToggle::Chatbox => Some(shown(state.chatbox, "ON")),
            ModuleToggle::Time => Some(shown(state.time_on, &state.time)),
            ModuleToggle::Custom => Some(shown(state.custom_on, &state.custom)),
            ModuleToggle::Music => Some(shown(state.music_on, &state.song_with_progress())),
            ModuleToggle::Window => Some(shown(state.window_on, &state.window)),
            ModuleToggle::Heartrate => Some(shown(state.heartrate_on, &state.heartrate)),
            ModuleToggle::Weather => Some(shown(state.weather_on, &state.weather)),
            ModuleToggle::MusicProgress => None,
        }
    }
}

/// Server-side switches shown as a captioned button ("Theme: Light").
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumIter)]
pub(crate) enum DisplayToggle {
    Theme,
    CompactMode,
    StreamerMode,
    RandomOrder,
    ModuleIcons,
    WindowTracking,
    HeartRateMonitor,
}

impl DisplayToggle {
    pub fn path(self) -> &'static str {
        match self {
            DisplayToggle::Theme => "/toggle_theme",
            DisplayToggle::CompactMode => "/toggle_compact_mode",
            DisplayToggle::StreamerMode => "/toggle_streamer_mode",
            DisplayToggle::RandomOrder => "/toggle_random_order",
            DisplayToggle::ModuleIcons => "/toggle_module_icons",
            DisplayToggle::WindowTracking => "/toggle_window_tracking",
            DisplayToggle::HeartRateMonitor => "/toggle_heart_rate_enabled",
        }
    }

    pub fn is_on(self, state: &DisplayState) -> bool {
        match self {
            DisplayToggle::Theme => state.is_light(),
            DisplayToggle::CompactMode => state.compact_mode,
            DisplayToggle::StreamerMode => state.streamer_mode,
            DisplayToggle::RandomOrder => state.random_order,
            DisplayToggle::ModuleIcons => state.show_module_icons,
            DisplayToggle::WindowTracking => state.window_tracking_enabled,
            DisplayToggle::HeartRateMonitor => state.heart_rate_enabled,
        }
    }

    pub fn caption(self, state: &DisplayState) -> String {
        let on_off = |on: bool| if on { "ON" } else { "OFF" };
        match self {
            DisplayToggle::Theme => format!(
                "Theme: {}",
                if state.is_light() { "Light" } else { "Dark" }
            ),
            DisplayToggle::CompactMode => format!("Compact Mode: {}", on_off(state.compact_mode)),
            DisplayToggle::StreamerMode => {
                format!("Streamer Mode: {}", on_off(state.streamer_mode))
            }
            DisplayToggle::RandomOrder => format!("Random Order: {}", on_off(state.random_order)),
            DisplayToggle::ModuleIcons => {
                format!("Module Icons: {}", on_off(state.show_module_icons))
            }
            DisplayToggle::WindowTracking => {
                format!("Window Tracking: {}", on_off(state.window_tracking_enabled))
            }
            DisplayToggle::HeartRateMonitor => {
                format!("Heart Rate Tracking: {}", on_off(state.heart_rate_enabled))
            }
        }
    }

    /// Toggles that belong to the general display panel; the tracking switches
    /// sit with their own settings.
    pub fn is_display_option(self) -> bool {
        !matches!(
            self,
            DisplayToggle::WindowTracking | DisplayToggle::HeartRateMonitor
        )
    }

    /// Streamer mode changes which fields are masked, so the page is reloaded after it flips.
    pub fn needs_page_reload(self) -> bool {
        matches!(self, DisplayToggle::StreamerMode)
    }
}

/// `(value, label)` pairs for a dropdown over every variant of `T`.
pub(crate) fn choices<T>(label: fn(T) -> &'static str) -> Vec<(&'static str, &'static str)>
where
    T: strum::IntoEnumIterator + Into<&'static str> + Copy,
{
    T::iter().map(|v| (v.into(), label(v))).collect()
}

/// How the music progress indicator is drawn in the chatbox.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum ProgressStyle {
    #[default]
    Bar,
    Dots,
    Percentage,
}

impl ProgressStyle {
    pub fn label(self) -> &'static str {
        match self {
            ProgressStyle::Bar => "Bar",
            ProgressStyle::Dots => "Dots",
            ProgressStyle::Percentage => "Percentage",
        }
    }
}

/// Which windows the tracker reports.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum WindowTrackingMode {
    App,
    Browser,
    #[default]
    Both,
}

impl WindowTrackingMode {
    pub fn label(self) -> &'static str {
        match self {
            WindowTrackingMode::App => "Applications only",
            WindowTrackingMode::Browser => "Browser tabs only",
            WindowTrackingMode::Both => "Applications and browser",
        }
    }
}

/// Where heart rate readings come from.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum HeartRateSource {
    #[default]
    Pulsoid,
    Hyperate,
    Custom,
}

impl HeartRateSource {
    pub fn label(self) -> &'static str {
        match self {
            HeartRateSource::Pulsoid => "Pulsoid",
            HeartRateSource::Hyperate => "HypeRate",
            HeartRateSource::Custom => "Custom API",
        }
    }

    /// Label of the one credential field this source needs.
    pub fn credential_label(self) -> &'static str {
        match self {
            HeartRateSource::Pulsoid => "Pulsoid token",
            HeartRateSource::Hyperate => "HypeRate ID",
            HeartRateSource::Custom => "API URL",
        }
    }
}

/// Chatbox widgets whose on-screen order is edited by drag-and-drop.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum LayoutModule {
    Time,
    Custom,
    Song,
    Window,
    Heartrate,
}

impl LayoutModule {
    pub fn label(self) -> &'static str {
        match self {
            LayoutModule::Time => "Time",
            LayoutModule::Custom => "Custom message",
            LayoutModule::Song => "Now playing",
            LayoutModule::Window => "Active window",
            LayoutModule::Heartrate => "Heart rate",
        }
    }

    pub fn default_order() -> Vec<LayoutModule> {
        use strum::IntoEnumIterator;
        LayoutModule::iter().collect()
    }

    /// Parse a stored layout, skipping unknown and duplicate keys.
    /// An empty result falls back to the default order, as the backend does.
    pub fn parse_order(keys: &[String]) -> Vec<LayoutModule> {
        let mut out: Vec<LayoutModule> = Vec::with_capacity(keys.len());
        for k in keys {
            if let Ok(m) = k.trim().parse::<LayoutModule>() {
                if !out.contains(&m) {
                    out.push(m);
                }
            }
        }

        if out.is_empty() {
            Self::default_order()
        } else {
            out
        }
    }
}

/// Backend settings file, as served by `GET /download_settings`.
///
/// Only the fields the dashboard edits are modelled; the rest of the document
/// is ignored.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub(crate) struct SettingsDocument {
    pub quest_ip: String,
    pub quest_port: u16,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub osc_send_interval: u32,
    pub dashboard_update_interval: u32,
    pub timezone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub layout_order: Vec<String>,

    pub window_tracking_mode: String,
    pub heart_rate_source: String,
    pub heart_rate_pulsoid_token: String,
    pub heart_rate_hyperate_id: String,
    pub heart_rate_custom_api: String,
    pub heart_rate_update_interval: u32,
}

impl SettingsDocument {
    pub fn window_tracking_mode(&self) -> WindowTrackingMode {
        self.window_tracking_mode.trim().parse().unwrap_or_default()
    }

    pub fn heart_rate_source(&self) -> HeartRateSource {
        self.heart_rate_source.trim().parse().unwrap_or_default()
    }
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self {
            quest_ip: String::new(),
            quest_port: 9000,
            spotify_client_id: String::new(),
            spotify_client_secret: String::new(),
            osc_send_interval: 3,
            dashboard_update_interval: 1,
            timezone: "local".to_string(),
            layout_order: vec![],
            window_tracking_mode: "both".to_string(),
            heart_rate_source: "pulsoid".to_string(),
            heart_rate_pulsoid_token: String::new(),
            heart_rate_hyperate_id: String::new(),
            heart_rate_custom_api: String::new(),
            heart_rate_update_interval: 5,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct ReleaseInfo {
    pub update_available: bool,
    pub latest_version: String,
    pub release_name: String,
    pub release_notes: String,
    pub release_url: String,
}

impl ReleaseInfo {
    /// First 200 characters of the notes with a trailing ellipsis.
    pub fn notes_excerpt(&self) -> String {
        let head: String = self.release_notes.chars().take(200).collect();
        format!("{head}...")
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub(crate) struct UpdateStatus {
    pub current_version: String,
    pub update_info: Option<ReleaseInfo>,
}

impl UpdateStatus {
    pub fn available_release(&self) -> Option<&ReleaseInfo> {
        self.update_info.as_ref().filter(|i| i.update_available)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_map_accepts_numbers_and_strings() {
        let parsed: AttributeMap =
            serde_json::from_str(r#"{"0": 5, "1": "7", "2": " 4 ", "3": 2.0}"#)
                .expect("attribute map should parse");
        assert_eq!(parsed.get(0), Some(5));
        assert_eq!(parsed.get(1), Some(7));
        assert_eq!(parsed.get(2), Some(4));
        assert_eq!(parsed.get(3), Some(2));
    }

    #[test]
    fn test_attribute_map_drops_non_positive_and_garbage() {
        let parsed: AttributeMap =
            serde_json::from_str(r#"{"0": 0, "1": "abc", "2": null, "3": -4, "4": 1}"#)
                .expect("attribute map should parse");
        assert_eq!(serde_json::to_value(&parsed).expect("serialize"), serde_json::json!({"4": 1}));
        assert_eq!(parsed.get_or(0, 3), 3);
        assert_eq!(parsed.get_or(1, 1), 1);
        assert_eq!(parsed.get(4), Some(1));
    }

    #[test]
    fn test_attribute_map_serializes_string_keys() {
        let mut m = AttributeMap::default();
        m.insert(2, 9);
        m.insert(0, 3);
        let v = serde_json::to_value(&m).expect("should serialize");
        assert_eq!(v, serde_json::json!({"0": 3, "2": 9}));
    }

    #[test]
    fn test_status_contract_deserialize() {
        let json = r#"{
            "chatbox": true,
            "time": "12:01 PM",
            "time_on": true,
            "custom": "hello",
            "custom_on": false,
            "song": "No song playing",
            "music_on": true,
            "album_art": "",
            "message_queue": ["a", "b"],
            "theme": "light",
            "compact_mode": true,
            "custom_texts": ["a", "b", "c"],
            "per_message_intervals": {"0": "5"},
            "weighted_messages": {"1": 5},
            "next_custom": 2,
            "unknown_future_field": {"x": 1}
        }"#;
        let state: DisplayState = serde_json::from_str(json).expect("status should parse");
        assert!(state.chatbox);
        assert_eq!(state.custom_texts.len(), 3);
        assert_eq!(state.per_message_intervals.get(0), Some(5));
        assert_eq!(state.weighted_messages.get(1), Some(5));
        assert_eq!(state.body_class().as_deref(), Some("light compact"));
        assert_eq!(state.album_art_url(), None);
        assert_eq!(state.queue_lines(), vec!["1. a", "2. b"]);
    }

    #[test]
    fn test_empty_status_uses_placeholders() {
        let state: DisplayState = serde_json::from_str("{}").expect("empty status should parse");
        assert_eq!(state.body_class(), None);
        assert_eq!(state.last_message_or_placeholder(), "---");
        assert_eq!(state.preview_or_placeholder(), "Preview will show here.");
        assert!(state.custom_texts.is_empty());
    }

    #[test]
    fn test_null_collections_degrade_to_empty() {
        let json = r#"{
            "chatbox": true,
            "per_message_intervals": null,
            "weighted_messages": null,
            "custom_texts": null,
            "message_queue": null
        }"#;
        let state: DisplayState = serde_json::from_str(json).expect("null collections should parse");
        assert!(state.chatbox);
        assert!(state.custom_texts.is_empty());
        assert!(state.message_queue.is_empty());
        assert_eq!(state.per_message_intervals, AttributeMap::default());
        assert_eq!(state.weighted_messages, AttributeMap::default());

        let doc: SettingsDocument =
            serde_json::from_str(r#"{"layout_order": null}"#).expect("null layout should parse");
        assert!(doc.layout_order.is_empty());
    }

    #[test]
    fn test_dark_theme_without_compact_clears_body_class() {
        let state = DisplayState {
            theme: "dark".to_string(),
            ..Default::default()
        };
        assert_eq!(state.body_class().as_deref(), Some(""));
    }

    #[test]
    fn test_module_status_text_shows_off_when_disabled() {
        let state = DisplayState {
            time: "10:00".to_string(),
            time_on: false,
            song: "Song A".to_string(),
            music_on: true,
            ..Default::default()
        };
        assert_eq!(ModuleToggle::Time.status_text(&state).as_deref(), Some("OFF"));
        assert_eq!(
            ModuleToggle::Music.status_text(&state).as_deref(),
            Some("Song A")
        );
        assert_eq!(ModuleToggle::MusicProgress.status_text(&state), None);
    }

    #[test]
    fn test_display_toggle_captions() {
        let state = DisplayState {
            theme: "light".to_string(),
            streamer_mode: true,
            ..Default::default()
        };
        assert_eq!(DisplayToggle::Theme.caption(&state), "Theme: Light");
        assert_eq!(DisplayToggle::StreamerMode.caption(&state), "Streamer Mode: ON");
        assert_eq!(DisplayToggle::CompactMode.caption(&state), "Compact Mode: OFF");
        assert!(DisplayToggle::StreamerMode.needs_page_reload());
        assert!(!DisplayToggle::Theme.needs_page_reload());
    }

    #[test]
    fn test_tracking_toggles_read_their_flags() {
        let state = DisplayState {
            window_tracking_enabled: true,
            ..Default::default()
        };
        assert_eq!(DisplayToggle::WindowTracking.caption(&state), "Window Tracking: ON");
        assert_eq!(DisplayToggle::WindowTracking.path(), "/toggle_window_tracking");
        assert!(!DisplayToggle::HeartRateMonitor.is_on(&state));
        assert_eq!(
            DisplayToggle::HeartRateMonitor.caption(&state),
            "Heart Rate Tracking: OFF"
        );
        assert!(!DisplayToggle::WindowTracking.is_display_option());
        assert!(DisplayToggle::Theme.is_display_option());
    }

    #[test]
    fn test_music_status_carries_progress() {
        let mut state = DisplayState {
            song: "Artist - Song".to_string(),
            music_on: true,
            music_progress: true,
            progress_style: "dots".to_string(),
            progress_string: "●●○○○".to_string(),
            ..Default::default()
        };
        assert_eq!(state.progress_style(), ProgressStyle::Dots);
        assert_eq!(
            ModuleToggle::Music.status_text(&state).as_deref(),
            Some("Artist - Song ●●○○○")
        );

        state.music_progress = false;
        assert_eq!(state.song_with_progress(), "Artist - Song");

        state.progress_style = "sparkles".to_string();
        assert_eq!(state.progress_style(), ProgressStyle::Bar);
    }

    #[test]
    fn test_settings_document_tracking_fields() {
        let doc: SettingsDocument = serde_json::from_str(
            r#"{"window_tracking_mode": "browser", "heart_rate_source": "hyperate", "heart_rate_update_interval": 10}"#,
        )
        .expect("settings should parse");
        assert_eq!(doc.window_tracking_mode(), WindowTrackingMode::Browser);
        assert_eq!(doc.heart_rate_source(), HeartRateSource::Hyperate);
        assert_eq!(doc.heart_rate_update_interval, 10);

        let defaults = SettingsDocument::default();
        assert_eq!(defaults.window_tracking_mode(), WindowTrackingMode::Both);
        assert_eq!(defaults.heart_rate_source(), HeartRateSource::Pulsoid);
        assert_eq!(HeartRateSource::Custom.as_ref(), "custom");
        assert_eq!(
            choices(WindowTrackingMode::label),
            vec![
                ("app", "Applications only"),
                ("browser", "Browser tabs only"),
                ("both", "Applications and browser"),
            ]
        );
    }

    #[test]
    fn test_layout_order_parsing() {
        let keys = vec![
            "song".to_string(),
            "bogus".to_string(),
            "time".to_string(),
            "song".to_string(),
        ];
        assert_eq!(
            LayoutModule::parse_order(&keys),
            vec![LayoutModule::Song, LayoutModule::Time]
        );
        assert_eq!(LayoutModule::parse_order(&[]), LayoutModule::default_order());
        assert_eq!(LayoutModule::Heartrate.to_string(), "heartrate");
    }

    #[test]
    fn test_settings_document_ignores_unknown_fields() {
        let json = r#"{
            "quest_ip": "192.168.1.20",
            "quest_port": 9001,
            "layout_order": ["custom", "time"],
            "weighted_messages": {},
            "theme": "dark"
        }"#;
        let doc: SettingsDocument = serde_json::from_str(json).expect("settings should parse");
        assert_eq!(doc.quest_ip, "192.168.1.20");
        assert_eq!(doc.quest_port, 9001);
        assert_eq!(doc.osc_send_interval, 3);
        assert_eq!(doc.layout_order, vec!["custom", "time"]);
    }

    #[test]
    fn test_update_status_only_reports_available_release() {
        let json = r#"{
            "current_version": "1.0.0",
            "update_info": {"update_available": false, "latest_version": "1.0.0"}
        }"#;
        let s: UpdateStatus = serde_json::from_str(json).expect("update info should parse");
        assert!(s.available_release().is_none());

        let info = ReleaseInfo {
            update_available: true,
            release_notes: "x".repeat(250),
            ..Default::default()
        };
        assert_eq!(info.notes_excerpt().chars().count(), 203);
    }
}
