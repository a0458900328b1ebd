use crate::api::{ApiClient, ApiResult, MoveDirection};
use crate::models::{AttributeMap, DisplayState};
use leptos::logging::{error, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;

pub(crate) const DEFAULT_INTERVAL: u32 = 3;
pub(crate) const DEFAULT_WEIGHT: u32 = 1;
pub(crate) const LABEL_MAX_CHARS: usize = 30;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ValidationError {
    EmptyMessage,
    EmptyProfileName,
    NoProfileSelected,
    InvalidSettingsFile,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyMessage => write!(f, "Message text cannot be empty"),
            ValidationError::EmptyProfileName => write!(f, "Profile name cannot be empty"),
            ValidationError::NoProfileSelected => write!(f, "Please select a profile first"),
            ValidationError::InvalidSettingsFile => {
                write!(f, "Invalid settings file. Please upload a valid JSON file.")
            }
        }
    }
}

pub(crate) fn validate_new_message(text: &str) -> Result<String, ValidationError> {
    let t = text.trim();
    if t.is_empty() {
        Err(ValidationError::EmptyMessage)
    } else {
        Ok(t.to_string())
    }
}

pub(crate) fn validate_profile_name(name: &str) -> Result<String, ValidationError> {
    let n = name.trim();
    if n.is_empty() {
        Err(ValidationError::EmptyProfileName)
    } else {
        Ok(n.to_string())
    }
}

pub(crate) fn validate_profile_selection(selected: &str) -> Result<String, ValidationError> {
    if selected.is_empty() {
        Err(ValidationError::NoProfileSelected)
    } else {
        Ok(selected.to_string())
    }
}

/// An uploaded settings file must be a non-empty JSON object.
pub(crate) fn validate_settings_upload(text: &str) -> Result<serde_json::Value, ValidationError> {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(v) if v.as_object().is_some_and(|o| !o.is_empty()) => Ok(v),
        _ => Err(ValidationError::InvalidSettingsFile),
    }
}

/// First `max` characters of `text`, with `...` appended when something was cut.
pub(crate) fn truncate_label(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// One rendered row: a message joined with its positional attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MessageRow {
    pub index: usize,
    pub text: String,
    pub interval: u32,
    pub weight: u32,
    pub can_move_up: bool,
    pub can_move_down: bool,
}

impl MessageRow {
    pub fn position_label(&self) -> String {
        format!("{}.", self.index + 1)
    }

    pub fn attribute_label(&self) -> String {
        format!(
            "Msg {}: {}",
            self.index + 1,
            truncate_label(&self.text, LABEL_MAX_CHARS)
        )
    }
}

/// Authoritative copy of the custom message list and its per-position attributes.
///
/// Always replaced wholesale from a `/status` response; never patched locally.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MessageSnapshot {
    pub messages: Vec<String>,
    pub intervals: AttributeMap,
    pub weights: AttributeMap,
}

impl MessageSnapshot {
    pub fn from_display(state: &DisplayState) -> Self {
        Self {
            messages: state.custom_texts.clone(),
            intervals: state.per_message_intervals.clone(),
            weights: state.weighted_messages.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn interval_at(&self, index: usize) -> u32 {
        self.intervals.get_or(index, DEFAULT_INTERVAL)
    }

    pub fn weight_at(&self, index: usize) -> u32 {
        self.weights.get_or(index, DEFAULT_WEIGHT)
    }

    /// A move is valid only when the neighbour in `direction` exists.
    pub fn can_move(&self, index: usize, direction: MoveDirection) -> bool {
        match direction {
            MoveDirection::Up => index > 0 && index < self.len(),
            MoveDirection::Down => index + 1 < self.len(),
        }
    }

    pub fn rows(&self) -> Vec<MessageRow> {
        self.messages
            .iter()
            .enumerate()
            .map(|(index, text)| MessageRow {
                index,
                text: text.clone(),
                interval: self.interval_at(index),
                weight: self.weight_at(index),
                can_move_up: self.can_move(index, MoveDirection::Up),
                can_move_down: self.can_move(index, MoveDirection::Down),
            })
            .collect()
    }

    /// Rows with `overrides` taking precedence over the stored intervals.
    pub fn rows_overriding(&self, overrides: &AttributeMap) -> Vec<MessageRow> {
        let mut rows = self.rows();
        for row in &mut rows {
            if let Some(v) = overrides.get(row.index) {
                row.interval = v;
            }
        }
        rows
    }

    /// Full interval map for every row, `overrides` first, then the stored value
    /// or the default.
    ///
    /// The backend replaces the whole map on save, so rows the user never
    /// touched are written with their effective value.
    pub fn intervals_with(&self, overrides: &AttributeMap) -> AttributeMap {
        let mut out = AttributeMap::default();
        for i in 0..self.len() {
            out.insert(i, overrides.get(i).unwrap_or_else(|| self.interval_at(i)));
        }
        out
    }

    /// The request for moving row `index`, or `None` at a boundary.
    pub fn move_mutation(&self, index: usize, direction: MoveDirection) -> Option<Mutation> {
        self.can_move(index, direction)
            .then_some(Mutation::Move { index, direction })
    }
}

/// One write against the server-held message list.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Mutation {
    Add(String),
    Update { index: usize, text: String },
    Delete(usize),
    Move { index: usize, direction: MoveDirection },
    SetWeight { index: usize, weight: u32 },
    SaveIntervals(AttributeMap),
}

impl Mutation {
    pub fn describe(&self) -> &'static str {
        match self {
            Mutation::Add(_) => "adding message",
            Mutation::Update { .. } => "updating message",
            Mutation::Delete(_) => "deleting message",
            Mutation::Move { .. } => "moving message",
            Mutation::SetWeight { .. } => "saving message weight",
            Mutation::SaveIntervals(_) => "saving message timings",
        }
    }

    async fn send(&self, api: &ApiClient) -> ApiResult<()> {
        match self {
            Mutation::Add(text) => api.add_custom_message(text).await,
            Mutation::Update { index, text } => api.update_custom_message(*index, text).await,
            Mutation::Delete(index) => api.delete_custom_message(*index).await,
            Mutation::Move { index, direction } => {
                api.move_custom_message(*index, *direction).await
            }
            Mutation::SetWeight { index, weight } => {
                api.set_message_weight(*index, *weight).await
            }
            Mutation::SaveIntervals(intervals) => {
                api.save_per_message_intervals(intervals.clone()).await
            }
        }
    }
}

/// Whether the list is re-fetched after a mutation finished with `res`.
///
/// A backend that answered (even with an error) may have applied part of the
/// change; a request that never arrived leaves the last snapshot standing.
pub(crate) fn reload_after(res: &ApiResult<()>) -> bool {
    match res {
        Ok(()) => true,
        Err(e) => e.backend_responded(),
    }
}

/// Only the most recently issued load may write the snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct LoadGuard {
    latest: u64,
}

impl LoadGuard {
    pub fn issue(&mut self) -> u64 {
        self.latest = self.latest.wrapping_add(1);
        self.latest
    }

    pub fn is_current(&self, id: u64) -> bool {
        self.latest == id
    }
}

/// Interval edits the user committed that a loaded snapshot may not show yet.
///
/// Each save sends the whole map, so later saves must carry earlier edits.
/// Edits are forgotten on an applied load once no save is still in flight:
/// that load was issued after the last save landed.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct PendingIntervals {
    values: AttributeMap,
    saves_in_flight: u32,
}

impl PendingIntervals {
    /// Record `index = value` and return the full map to send.
    pub fn commit(&mut self, snapshot: &MessageSnapshot, index: usize, value: u32) -> AttributeMap {
        self.values.insert(index, value.max(1));
        self.saves_in_flight += 1;
        snapshot.intervals_with(&self.values)
    }

    pub fn save_finished(&mut self) {
        self.saves_in_flight = self.saves_in_flight.saturating_sub(1);
    }

    pub fn load_applied(&mut self) {
        if self.saves_in_flight == 0 {
            self.values = AttributeMap::default();
        }
    }

    pub fn values(&self) -> &AttributeMap {
        &self.values
    }
}

/// Client-side mirror of the server-held message list.
///
/// Every mutation is sent to the backend and followed by a full `load()`;
/// the snapshot is never derived from the request that was just sent.
#[derive(Clone, Copy)]
pub(crate) struct MessageStore {
    api_client: RwSignal<ApiClient>,

    pub snapshot: RwSignal<MessageSnapshot>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,

    pending_intervals: RwSignal<PendingIntervals>,
    guard: StoredValue<LoadGuard>,
}

impl MessageStore {
    pub fn new(api_client: RwSignal<ApiClient>) -> Self {
        Self {
            api_client,
            snapshot: RwSignal::new(MessageSnapshot::default()),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
            pending_intervals: RwSignal::new(PendingIntervals::default()),
            guard: StoredValue::new(LoadGuard::default()),
        }
    }

    /// Rows as the user last committed them.
    pub fn rows(&self) -> Vec<MessageRow> {
        self.pending_intervals.with(|p| {
            self.snapshot.with(|s| s.rows_overriding(p.values()))
        })
    }

    pub fn load(&self) {
        let mut id = 0;
        self.guard.update_value(|g| id = g.issue());
        self.loading.set(true);

        let api_client = self.api_client.get_untracked();
        let store = *self;
        spawn_local(async move {
            let res = api_client.get_status().await;

            // A newer load was issued while this one was in flight.
            if !store.guard.with_value(|g| g.is_current(id)) {
                return;
            }

            match res {
                Ok(state) => {
                    store.snapshot.set(MessageSnapshot::from_display(&state));
                    store.pending_intervals.update(PendingIntervals::load_applied);
                    store.error.set(None);
                }
                Err(e) => {
                    error!("loading custom messages failed: {e}");
                    store.error.set(Some(e.to_string()));
                }
            }
            store.loading.set(false);
        });
    }

    fn submit(&self, mutation: Mutation) {
        let api_client = self.api_client.get_untracked();
        let store = *self;
        spawn_local(async move {
            let res = mutation.send(&api_client).await;

            if matches!(mutation, Mutation::SaveIntervals(_)) {
                store.pending_intervals.update(PendingIntervals::save_finished);
            }
            if let Err(e) = &res {
                let what = mutation.describe();
                error!("{what} failed: {e}");
                store.error.set(Some(format!("{what} failed: {e}")));
            }
            if reload_after(&res) {
                store.load();
            }
        });
    }

    pub fn add(&self, text: &str) -> Result<(), ValidationError> {
        let text = validate_new_message(text)?;
        self.submit(Mutation::Add(text));
        Ok(())
    }

    pub fn update(&self, index: usize, text: String) {
        self.submit(Mutation::Update { index, text });
    }

    pub fn delete(&self, index: usize) {
        self.submit(Mutation::Delete(index));
    }

    /// Returns `false` (and sends nothing) for a boundary move.
    pub fn move_item(&self, index: usize, direction: MoveDirection) -> bool {
        let Some(mutation) = self
            .snapshot
            .with_untracked(|s| s.move_mutation(index, direction))
        else {
            warn!(
                "ignoring move {} at boundary index {index}",
                direction.as_ref()
            );
            return false;
        };

        self.submit(mutation);
        true
    }

    pub fn set_weight(&self, index: usize, weight: u32) {
        self.submit(Mutation::SetWeight {
            index,
            weight: weight.max(1),
        });
    }

    pub fn set_interval(&self, index: usize, value: u32) {
        let mut intervals = AttributeMap::default();
        let snapshot = self.snapshot.get_untracked();
        self.pending_intervals
            .update(|p| intervals = p.commit(&snapshot, index, value));
        self.submit(Mutation::SaveIntervals(intervals));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    fn snapshot(messages: &[&str]) -> MessageSnapshot {
        MessageSnapshot {
            messages: messages.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn from_status(json: &str) -> MessageSnapshot {
        let state: DisplayState = serde_json::from_str(json).expect("status should parse");
        MessageSnapshot::from_display(&state)
    }

    #[test]
    fn test_weights_default_to_one() {
        let s = snapshot(&["a", "b", "c"]);
        let weights: Vec<u32> = s.rows().iter().map(|r| r.weight).collect();
        assert_eq!(weights, vec![1, 1, 1]);
    }

    #[test]
    fn test_weight_update_visible_after_reload() {
        // After set_weight(1, 5) the backend reports {"1": 5}.
        let s = from_status(r#"{"custom_texts": ["a", "b", "c"], "weighted_messages": {"1": 5}}"#);
        let weights: Vec<u32> = s.rows().iter().map(|r| r.weight).collect();
        assert_eq!(weights, vec![1, 5, 1]);
    }

    #[test]
    fn test_intervals_default_to_three() {
        let s = from_status(r#"{"custom_texts": ["a", "b"], "per_message_intervals": {"1": "6"}}"#);
        let intervals: Vec<u32> = s.rows().iter().map(|r| r.interval).collect();
        assert_eq!(intervals, vec![3, 6]);
    }

    #[test]
    fn test_boundary_moves_are_disabled() {
        let s = snapshot(&["a", "b", "c"]);
        let rows = s.rows();
        assert!(!rows[0].can_move_up);
        assert!(rows[0].can_move_down);
        assert!(rows[1].can_move_up && rows[1].can_move_down);
        assert!(rows[2].can_move_up);
        assert!(!rows[2].can_move_down);

        assert!(!s.can_move(0, MoveDirection::Up));
        assert!(!s.can_move(2, MoveDirection::Down));
        assert!(!s.can_move(7, MoveDirection::Up));
    }

    #[test]
    fn test_single_item_cannot_move() {
        let s = snapshot(&["only"]);
        assert!(!s.can_move(0, MoveDirection::Up));
        assert!(!s.can_move(0, MoveDirection::Down));
    }

    #[test]
    fn test_boundary_move_produces_no_request() {
        let s = snapshot(&["a", "b", "c"]);
        assert_eq!(s.move_mutation(0, MoveDirection::Up), None);
        assert_eq!(s.move_mutation(2, MoveDirection::Down), None);
        assert_eq!(s.move_mutation(5, MoveDirection::Down), None);
        assert_eq!(
            s.move_mutation(1, MoveDirection::Up),
            Some(Mutation::Move {
                index: 1,
                direction: MoveDirection::Up
            })
        );
    }

    #[test]
    fn test_reload_follows_any_backend_answer() {
        assert!(reload_after(&Ok(())));
        assert!(reload_after(&Err(ApiError::rejected("index out of range"))));
        assert!(!reload_after(&Err(ApiError::parse("unexpected end of input"))));
    }

    #[test]
    fn test_superseded_load_is_discarded() {
        let mut guard = LoadGuard::default();
        let first = guard.issue();
        let second = guard.issue();

        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
    }

    #[test]
    fn test_second_interval_edit_keeps_the_first() {
        let s = snapshot(&["a", "b", "c"]);
        let mut pending = PendingIntervals::default();

        let first = pending.commit(&s, 0, 5);
        assert_eq!(serde_json::to_value(&first).expect("serialize"), serde_json::json!({"0": 5, "1": 3, "2": 3}));

        // Edited again before the first save's reload arrived.
        let second = pending.commit(&s, 1, 7);
        assert_eq!(serde_json::to_value(&second).expect("serialize"), serde_json::json!({"0": 5, "1": 7, "2": 3}));
    }

    #[test]
    fn test_pending_intervals_survive_loads_until_saves_settle() {
        let s = snapshot(&["a", "b"]);
        let mut pending = PendingIntervals::default();
        pending.commit(&s, 0, 5);
        pending.commit(&s, 1, 8);

        // First save lands and its reload applies while the second is in flight.
        pending.save_finished();
        pending.load_applied();
        assert_eq!(
            s.rows_overriding(pending.values())
                .iter()
                .map(|r| r.interval)
                .collect::<Vec<_>>(),
            vec![5, 8]
        );

        pending.save_finished();
        pending.load_applied();
        assert_eq!(pending, PendingIntervals::default());
    }

    #[test]
    fn test_add_sends_trimmed_text() {
        let text = validate_new_message("  hello world \n").expect("should be valid");
        assert_eq!(Mutation::Add(text.clone()).describe(), "adding message");
        assert_eq!(text, "hello world");
    }

    #[test]
    fn test_empty_message_is_rejected_before_request() {
        assert_eq!(validate_new_message("   "), Err(ValidationError::EmptyMessage));
        assert_eq!(validate_new_message(""), Err(ValidationError::EmptyMessage));
    }

    #[test]
    fn test_repeated_load_renders_identically() {
        let json = r#"{"custom_texts": ["a", "b"], "weighted_messages": {"0": 2}}"#;
        assert_eq!(from_status(json).rows(), from_status(json).rows());
    }

    #[test]
    fn test_labels() {
        let long = "x".repeat(31);
        let s = MessageSnapshot {
            messages: vec!["short".to_string(), long.clone(), "y".repeat(30)],
            ..Default::default()
        };
        let rows = s.rows();
        assert_eq!(rows[0].position_label(), "1.");
        assert_eq!(rows[0].attribute_label(), "Msg 1: short");
        assert_eq!(
            rows[1].attribute_label(),
            format!("Msg 2: {}...", &long[..30])
        );
        assert_eq!(rows[2].attribute_label(), format!("Msg 3: {}", "y".repeat(30)));
    }

    #[test]
    fn test_truncate_label_counts_chars_not_bytes() {
        let emoji = "🎶".repeat(31);
        let t = truncate_label(&emoji, 30);
        assert_eq!(t.chars().count(), 33);
        assert!(t.ends_with("..."));
    }

    #[test]
    fn test_intervals_with_fills_every_row() {
        let s = from_status(r#"{"custom_texts": ["a", "b", "c"], "per_message_intervals": {"2": 9}}"#);
        let mut overrides = AttributeMap::default();
        overrides.insert(0, 5);
        let m = s.intervals_with(&overrides);
        assert_eq!(
            serde_json::to_value(&m).expect("serialize"),
            serde_json::json!({"0": 5, "1": DEFAULT_INTERVAL, "2": 9})
        );

        // Zero is clamped to the minimum the input allows.
        let mut pending = PendingIntervals::default();
        assert_eq!(pending.commit(&s, 1, 0).get(1), Some(1));
    }

    #[test]
    fn test_settings_upload_must_be_an_object() {
        let v = validate_settings_upload(r#"{"quest_ip": "10.0.0.2", "theme": "light"}"#)
            .expect("object should be accepted");
        assert_eq!(v["theme"], "light");

        for bad in ["", "not json", "[1, 2]", "{}", "null"] {
            assert_eq!(
                validate_settings_upload(bad),
                Err(ValidationError::InvalidSettingsFile),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_profile_validation() {
        assert_eq!(validate_profile_name("  "), Err(ValidationError::EmptyProfileName));
        assert_eq!(validate_profile_name(" Stream ").as_deref(), Ok("Stream"));
        assert_eq!(
            validate_profile_selection(""),
            Err(ValidationError::NoProfileSelected)
        );
        assert_eq!(
            ValidationError::NoProfileSelected.to_string(),
            "Please select a profile first"
        );
    }
}
