use crate::models::{
    AttributeMap, DisplayState, HeartRateSource, LayoutModule, ProgressStyle, SettingsDocument,
    UpdateStatus, WindowTrackingMode,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    /// Request never got a response (offline, CORS, DNS).
    Network,
    /// Non-success HTTP status.
    Http,
    /// Response body did not match the expected contract.
    Parse,
    /// Backend answered `{ "ok": false, ... }`.
    Rejected,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            message: e.to_string(),
        }
    }

    pub(crate) fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            message: e.to_string(),
        }
    }

    fn http(status: reqwest::StatusCode, body: String, ctx: &str) -> Self {
        Self {
            kind: ApiErrorKind::Http,
            message: format!("{ctx} ({status}): {body}"),
        }
    }

    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: ApiErrorKind::Rejected,
            message: message.into(),
        }
    }

    /// The backend answered, so server-side state may have moved and a reload is worthwhile.
    pub fn backend_responded(&self) -> bool {
        matches!(self.kind, ApiErrorKind::Http | ApiErrorKind::Rejected)
    }

    /// Text for a blocking alert. Backend rejections already read as a sentence.
    pub fn alert_text(&self) -> String {
        match self.kind {
            ApiErrorKind::Rejected => self.message.clone(),
            _ => format!("Error: {}", self.message),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:5000";
pub(crate) const DEFAULT_REFRESH_SECS: u32 = 1;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    /// Status polling period in seconds.
    pub refresh_interval: u32,
}

impl EnvConfig {
    /// Read `window.CONFIG` / `window.ENV`, falling back to the page origin.
    pub fn new() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::from_values(None, None, None);
        };

        let lookup = |obj: &str, key: &str| -> Option<wasm_bindgen::JsValue> {
            let o = window.get(obj)?;
            if o.is_undefined() || !o.is_object() {
                return None;
            }
            js_sys::Reflect::get(&o, &key.into())
                .ok()
                .filter(|v| !v.is_undefined() && !v.is_null())
        };

        // `window.CONFIG` is what the dashboard template injects; `window.ENV` is
        // accepted for static deployments.
        let api_url = lookup("CONFIG", "api_url")
            .or_else(|| lookup("ENV", "API_URL"))
            .or_else(|| lookup("ENV", "api_url"))
            .and_then(|v| v.as_string());

        let refresh = lookup("CONFIG", "refresh_interval").and_then(|v| {
            v.as_f64()
                .or_else(|| v.as_string().and_then(|s| s.trim().parse::<f64>().ok()))
        });

        let origin = window.location().origin().ok();

        Self::from_values(api_url, refresh, origin)
    }

    pub(crate) fn from_values(
        api_url: Option<String>,
        refresh_interval: Option<f64>,
        origin: Option<String>,
    ) -> Self {
        let api_url = api_url
            .or(origin)
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty() && u != "null")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let refresh_interval = refresh_interval
            .filter(|r| r.is_finite() && *r >= 1.0)
            .map(|r| r.round() as u32)
            .unwrap_or(DEFAULT_REFRESH_SECS);

        Self {
            api_url,
            refresh_interval,
        }
    }

    pub fn refresh_interval_ms(&self) -> u32 {
        self.refresh_interval.saturating_mul(1000)
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum MoveDirection {
    Up,
    Down,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AddMessageRequest {
    pub text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct UpdateMessageRequest {
    pub index: usize,
    pub text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct DeleteMessageRequest {
    pub index: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct MoveMessageRequest {
    pub index: usize,
    pub direction: MoveDirection,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SetWeightRequest {
    pub index: usize,
    pub weight: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SaveIntervalsRequest {
    pub intervals: AttributeMap,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SaveLayoutRequest {
    pub layout_order: Vec<LayoutModule>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct SendMessageRequest {
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct ProfileRequest {
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct GenerateMessageRequest {
    pub mood: String,
    pub theme: String,
    pub max_length: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct ProgressStyleRequest {
    pub style: ProgressStyle,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct WindowTrackingModeRequest {
    pub mode: WindowTrackingMode,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct HeartRateSettings {
    pub source: HeartRateSource,
    pub pulsoid_token: String,
    pub hyperate_id: String,
    pub custom_api: String,
    pub update_interval: u32,
}

impl From<&SettingsDocument> for HeartRateSettings {
    fn from(doc: &SettingsDocument) -> Self {
        Self {
            source: doc.heart_rate_source(),
            pulsoid_token: doc.heart_rate_pulsoid_token.clone(),
            hyperate_id: doc.heart_rate_hyperate_id.clone(),
            custom_api: doc.heart_rate_custom_api.clone(),
            update_interval: doc.heart_rate_update_interval,
        }
    }
}

/// Form body for `POST /save_settings` (the backend reads form fields, not JSON).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct ConnectionSettings {
    pub quest_ip: String,
    pub quest_port: u16,
    pub osc_send_interval: u32,
    pub dashboard_update_interval: u32,
    pub timezone: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
}

impl From<&SettingsDocument> for ConnectionSettings {
    fn from(doc: &SettingsDocument) -> Self {
        Self {
            quest_ip: doc.quest_ip.clone(),
            quest_port: doc.quest_port,
            osc_send_interval: doc.osc_send_interval,
            dashboard_update_interval: doc.dashboard_update_interval,
            timezone: doc.timezone.clone(),
            spotify_client_id: doc.spotify_client_id.clone(),
            spotify_client_secret: doc.spotify_client_secret.clone(),
        }
    }
}

/// `{ ok, message?, error? }` acknowledgement used by profile, patreon and AI routes.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub(crate) struct AckResponse {
    pub ok: bool,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl AckResponse {
    /// Success yields the backend's message (if any); failure becomes `Rejected`.
    pub fn into_result(self, fallback: &str) -> ApiResult<Option<String>> {
        if self.ok {
            Ok(self.message)
        } else {
            Err(ApiError::rejected(
                self.error
                    .or(self.message)
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| fallback.to_string()),
            ))
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub(crate) struct ProfileListResponse {
    pub profiles: Vec<String>,
}

#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    pub(crate) base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    pub fn from_env(config: &EnvConfig) -> Self {
        Self::new(config.api_url.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn check(res: reqwest::Response, ctx: &str) -> ApiResult<reqwest::Response> {
        if res.status().is_success() {
            Ok(res)
        } else {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            Err(ApiError::http(status, body, ctx))
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let res = reqwest::Client::new()
            .get(self.url(path))
            .send()
            .await
            .map_err(ApiError::network)?;
        let res = Self::check(res, "Request failed").await?;
        res.json().await.map_err(ApiError::parse)
    }

    /// POST and only look at the status; several routes answer 204 or a redirect.
    async fn post_unit(&self, path: &str, body: Option<&impl Serialize>) -> ApiResult<()> {
        let mut req = reqwest::Client::new().post(self.url(path));
        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;
        Self::check(res, "Request failed").await.map(|_| ())
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&impl Serialize>,
    ) -> ApiResult<T> {
        let mut req = reqwest::Client::new().post(self.url(path));
        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;
        let res = Self::check(res, "Request failed").await?;
        res.json().await.map_err(ApiError::parse)
    }

    /// POST to an `{ok, ...}` route. Rejections often come with a 4xx status and a
    /// JSON body carrying the reason, so the body is read regardless of status.
    async fn post_ack(
        &self,
        path: &str,
        body: &impl Serialize,
        fallback: &str,
    ) -> ApiResult<Option<String>> {
        let res = reqwest::Client::new()
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(ApiError::network)?;

        let status = res.status();
        let text = res.text().await.map_err(ApiError::network)?;
        match serde_json::from_str::<AckResponse>(&text) {
            Ok(ack) => ack.into_result(fallback),
            Err(_) if !status.is_success() => Err(ApiError::http(status, text, fallback)),
            Err(e) => Err(ApiError::parse(e)),
        }
    }

    pub async fn get_status(&self) -> ApiResult<DisplayState> {
        self.get_json("/status").await
    }

    pub async fn add_custom_message(&self, text: &str) -> ApiResult<()> {
        self.post_unit(
            "/add_custom_message",
            Some(&AddMessageRequest {
                text: text.to_string(),
            }),
        )
        .await
    }

    pub async fn update_custom_message(&self, index: usize, text: &str) -> ApiResult<()> {
        self.post_unit(
            "/update_custom_inline",
            Some(&UpdateMessageRequest {
                index,
                text: text.to_string(),
            }),
        )
        .await
    }

    pub async fn delete_custom_message(&self, index: usize) -> ApiResult<()> {
        self.post_unit("/delete_custom_message", Some(&DeleteMessageRequest { index }))
            .await
    }

    pub async fn move_custom_message(
        &self,
        index: usize,
        direction: MoveDirection,
    ) -> ApiResult<()> {
        self.post_unit(
            "/move_custom_message",
            Some(&MoveMessageRequest { index, direction }),
        )
        .await
    }

    pub async fn set_message_weight(&self, index: usize, weight: u32) -> ApiResult<()> {
        self.post_unit("/set_message_weight", Some(&SetWeightRequest { index, weight }))
            .await
    }

    pub async fn save_per_message_intervals(&self, intervals: AttributeMap) -> ApiResult<()> {
        self.post_unit(
            "/save_per_message_intervals",
            Some(&SaveIntervalsRequest { intervals }),
        )
        .await
    }

    pub async fn save_layout(&self, order: &[LayoutModule]) -> ApiResult<()> {
        self.post_unit(
            "/save_layout",
            Some(&SaveLayoutRequest {
                layout_order: order.to_vec(),
            }),
        )
        .await
    }

    pub async fn toggle(&self, path: &str) -> ApiResult<()> {
        self.post_unit(path, None::<&()>).await
    }

    pub async fn send_message(&self, message: &str) -> ApiResult<()> {
        self.post_unit(
            "/send",
            Some(&SendMessageRequest {
                message: message.to_string(),
            }),
        )
        .await
    }

    pub async fn get_settings_document(&self) -> ApiResult<SettingsDocument> {
        self.get_json("/download_settings").await
    }

    pub async fn save_connection_settings(&self, settings: &ConnectionSettings) -> ApiResult<()> {
        let res = reqwest::Client::new()
            .post(self.url("/save_settings"))
            .form(settings)
            .send()
            .await
            .map_err(ApiError::network)?;
        Self::check(res, "Saving settings failed").await.map(|_| ())
    }

    /// Replace the whole settings file; the backend fills missing keys with defaults.
    pub async fn upload_settings(&self, settings: &serde_json::Value) -> ApiResult<()> {
        self.post_unit("/upload_settings", Some(settings)).await
    }

    pub async fn set_progress_style(&self, style: ProgressStyle) -> ApiResult<()> {
        self.post_unit("/set_progress_style", Some(&ProgressStyleRequest { style }))
            .await
    }

    pub async fn save_window_tracking_mode(&self, mode: WindowTrackingMode) -> ApiResult<()> {
        self.post_unit(
            "/save_window_tracking_mode",
            Some(&WindowTrackingModeRequest { mode }),
        )
        .await
    }

    pub async fn save_heart_rate_settings(&self, settings: &HeartRateSettings) -> ApiResult<()> {
        self.post_unit("/save_heart_rate_settings", Some(settings))
            .await
    }

    pub async fn reset_settings(&self) -> ApiResult<()> {
        self.post_unit("/reset_settings", None::<&()>).await
    }

    pub async fn list_profiles(&self) -> ApiResult<Vec<String>> {
        let data: ProfileListResponse = self.get_json("/profiles").await?;
        Ok(data.profiles)
    }

    pub async fn save_profile(&self, name: &str) -> ApiResult<Option<String>> {
        self.post_ack(
            "/save_profile",
            &ProfileRequest {
                name: name.to_string(),
            },
            "Failed to save profile",
        )
        .await
    }

    pub async fn load_profile(&self, name: &str) -> ApiResult<Option<String>> {
        self.post_ack(
            "/load_profile",
            &ProfileRequest {
                name: name.to_string(),
            },
            "Failed to load profile",
        )
        .await
    }

    pub async fn delete_profile(&self, name: &str) -> ApiResult<Option<String>> {
        self.post_ack(
            "/delete_profile",
            &ProfileRequest {
                name: name.to_string(),
            },
            "Failed to delete profile",
        )
        .await
    }

    pub async fn generate_ai_message(&self, mood: &str, theme: &str) -> ApiResult<String> {
        let msg = self
            .post_ack(
                "/generate_ai_message",
                &GenerateMessageRequest {
                    mood: mood.to_string(),
                    theme: theme.to_string(),
                    max_length: 30,
                },
                "Failed to generate message. Make sure OPENAI_API_KEY is set.",
            )
            .await?;

        msg.filter(|m| !m.trim().is_empty()).ok_or_else(|| {
            ApiError::rejected("Failed to generate message. Make sure OPENAI_API_KEY is set.")
        })
    }

    pub async fn get_update_info(&self) -> ApiResult<UpdateStatus> {
        self.get_json("/update_info").await
    }

    /// Plain navigation targets (file downloads are left to the browser).
    pub fn download_settings_url(&self) -> String {
        self.url("/download_settings")
    }

    pub fn download_log_url(&self) -> String {
        self.url("/download_log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_config_prefers_explicit_url() {
        let c = EnvConfig::from_values(
            Some("http://10.0.0.2:5000/".to_string()),
            Some(2.0),
            Some("http://localhost:8080".to_string()),
        );
        assert_eq!(c.api_url, "http://10.0.0.2:5000");
        assert_eq!(c.refresh_interval, 2);
        assert_eq!(c.refresh_interval_ms(), 2000);
    }

    #[test]
    fn test_env_config_falls_back_to_origin_then_default() {
        let c = EnvConfig::from_values(None, None, Some("http://127.0.0.1:5000".to_string()));
        assert_eq!(c.api_url, "http://127.0.0.1:5000");
        assert_eq!(c.refresh_interval, DEFAULT_REFRESH_SECS);

        // file:// pages report a "null" origin.
        let c = EnvConfig::from_values(None, None, Some("null".to_string()));
        assert_eq!(c.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_env_config_rejects_sub_second_refresh() {
        let c = EnvConfig::from_values(None, Some(0.2), None);
        assert_eq!(c.refresh_interval, DEFAULT_REFRESH_SECS);
        let c = EnvConfig::from_values(None, Some(f64::NAN), None);
        assert_eq!(c.refresh_interval, DEFAULT_REFRESH_SECS);
    }

    #[test]
    fn test_move_request_serialization() {
        let v = serde_json::to_value(MoveMessageRequest {
            index: 2,
            direction: MoveDirection::Down,
        })
        .expect("should serialize");
        assert_eq!(v, serde_json::json!({"index": 2, "direction": "down"}));
        assert_eq!(MoveDirection::Up.as_ref(), "up");
    }

    #[test]
    fn test_save_layout_request_uses_widget_keys() {
        let v = serde_json::to_value(SaveLayoutRequest {
            layout_order: vec![LayoutModule::Song, LayoutModule::Time],
        })
        .expect("should serialize");
        assert_eq!(v, serde_json::json!({"layout_order": ["song", "time"]}));
    }

    #[test]
    fn test_save_intervals_request_shape() {
        let mut intervals = AttributeMap::default();
        intervals.insert(0, 3);
        intervals.insert(1, 8);
        let v = serde_json::to_value(SaveIntervalsRequest { intervals }).expect("should serialize");
        assert_eq!(v, serde_json::json!({"intervals": {"0": 3, "1": 8}}));
    }

    #[test]
    fn test_tracking_request_shapes() {
        let v = serde_json::to_value(ProgressStyleRequest {
            style: ProgressStyle::Percentage,
        })
        .expect("should serialize");
        assert_eq!(v, serde_json::json!({"style": "percentage"}));

        let v = serde_json::to_value(WindowTrackingModeRequest {
            mode: WindowTrackingMode::App,
        })
        .expect("should serialize");
        assert_eq!(v, serde_json::json!({"mode": "app"}));
    }

    #[test]
    fn test_heart_rate_settings_from_document() {
        let doc = SettingsDocument {
            heart_rate_source: "custom".to_string(),
            heart_rate_custom_api: "http://localhost:8000/bpm".to_string(),
            ..Default::default()
        };
        let v = serde_json::to_value(HeartRateSettings::from(&doc)).expect("should serialize");
        assert_eq!(
            v,
            serde_json::json!({
                "source": "custom",
                "pulsoid_token": "",
                "hyperate_id": "",
                "custom_api": "http://localhost:8000/bpm",
                "update_interval": 5
            })
        );
    }

    #[test]
    fn test_ack_response_into_result() {
        let ok: AckResponse = serde_json::from_str(r#"{"ok": true, "message": "Profile saved!"}"#)
            .expect("ack should parse");
        assert_eq!(
            ok.into_result("fallback").expect("should be ok").as_deref(),
            Some("Profile saved!")
        );

        let rejected: AckResponse =
            serde_json::from_str(r#"{"ok": false, "error": "Profile exists"}"#)
                .expect("ack should parse");
        let err = rejected.into_result("fallback").expect_err("should be rejected");
        assert_eq!(err.kind, ApiErrorKind::Rejected);
        assert_eq!(err.to_string(), "Profile exists");

        let bare: AckResponse = serde_json::from_str(r#"{"ok": false}"#).expect("ack should parse");
        assert_eq!(
            bare.into_result("fallback").expect_err("should be rejected").message,
            "fallback"
        );
    }

    #[test]
    fn test_backend_responded_classification() {
        assert!(ApiError::rejected("no").backend_responded());
        let parse = ApiError::parse("bad json");
        assert_eq!(parse.kind, ApiErrorKind::Parse);
        assert!(!parse.backend_responded());
    }

    #[test]
    fn test_alert_text_prefixes_transport_errors_only() {
        assert_eq!(ApiError::rejected("Profile not found").alert_text(), "Profile not found");
        assert_eq!(ApiError::parse("eof").alert_text(), "Error: eof");
    }

    #[test]
    fn test_connection_settings_from_document() {
        let doc = SettingsDocument {
            quest_ip: "192.168.0.9".to_string(),
            spotify_client_secret: "s3cret".to_string(),
            ..Default::default()
        };
        let form = ConnectionSettings::from(&doc);
        assert_eq!(form.quest_ip, "192.168.0.9");
        assert_eq!(form.quest_port, 9000);
        assert_eq!(form.spotify_client_secret, "s3cret");
    }

    #[test]
    fn test_api_client_urls() {
        let client = ApiClient::new("http://localhost:5000".to_string());
        assert_eq!(client.url("/status"), "http://localhost:5000/status");
        assert_eq!(
            client.download_log_url(),
            "http://localhost:5000/download_log"
        );
    }
}
