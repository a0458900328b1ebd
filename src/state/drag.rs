use crate::api::ApiClient;
use crate::geometry::resolve_insert_before;
use crate::models::LayoutModule;
use leptos::logging::error;
use leptos::prelude::*;
use leptos::task::spawn_local;

const LAYOUT_ITEM_SELECTOR: &str = ".layout-item";

/// Move `dragged` so it sits directly before `before` (or at the end for `None`).
pub(crate) fn reorder_before(
    order: &[LayoutModule],
    dragged: LayoutModule,
    before: Option<LayoutModule>,
) -> Vec<LayoutModule> {
    let mut out: Vec<LayoutModule> = order.iter().copied().filter(|m| *m != dragged).collect();
    let at = before
        .filter(|b| *b != dragged)
        .and_then(|b| out.iter().position(|m| *m == b))
        .unwrap_or(out.len());
    out.insert(at, dragged);
    out
}

/// A drag gesture in progress on the layout list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DragSession {
    pub dragged: LayoutModule,
    /// Order when the gesture started; restored if it ends without a drop.
    pub original: Vec<LayoutModule>,
    pub dropped: bool,
}

impl DragSession {
    pub fn begin(dragged: LayoutModule, order: &[LayoutModule]) -> Self {
        Self {
            dragged,
            original: order.to_vec(),
            dropped: false,
        }
    }
}

/// Widget layout list: loaded from the settings document, edited by drag-and-drop,
/// committed wholesale with `POST /save_layout`.
#[derive(Clone, Copy)]
pub(crate) struct LayoutController {
    api_client: RwSignal<ApiClient>,
    pub order: RwSignal<Vec<LayoutModule>>,
    pub session: RwSignal<Option<DragSession>>,
    pub saving: RwSignal<bool>,
    pub error: RwSignal<Option<String>>,
}

impl LayoutController {
    pub fn new(api_client: RwSignal<ApiClient>) -> Self {
        Self {
            api_client,
            order: RwSignal::new(LayoutModule::default_order()),
            session: RwSignal::new(None),
            saving: RwSignal::new(false),
            error: RwSignal::new(None),
        }
    }

    pub fn load(&self) {
        let api_client = self.api_client.get_untracked();
        let c = *self;
        spawn_local(async move {
            match api_client.get_settings_document().await {
                Ok(doc) => {
                    // Never yank the list out from under an active drag.
                    if c.session.get_untracked().is_none() {
                        c.order.set(LayoutModule::parse_order(&doc.layout_order));
                    }
                }
                Err(e) => error!("loading layout failed: {e}"),
            }
        });
    }

    pub fn is_dragging(&self, m: LayoutModule) -> bool {
        self.session
            .with(|s| s.as_ref().map(|s| s.dragged == m).unwrap_or(false))
    }

    pub fn begin(&self, dragged: LayoutModule) {
        let order = self.order.get_untracked();
        self.session.set(Some(DragSession::begin(dragged, &order)));
    }

    /// `dragover`: move the dragged item to the slot under the pointer.
    pub fn hover(&self, container: &web_sys::Element, pointer_y: f64) {
        let Some(dragged) = self.session.with_untracked(|s| s.as_ref().map(|s| s.dragged)) else {
            return;
        };

        let before = resolve_insert_before(
            container,
            LAYOUT_ITEM_SELECTOR,
            dragged.as_ref(),
            pointer_y,
        )
        .and_then(|k| k.parse::<LayoutModule>().ok());

        let next = reorder_before(&self.order.get_untracked(), dragged, before);
        if next != self.order.get_untracked() {
            self.order.set(next);
        }
    }

    /// `drop`: commit the working order.
    pub fn drop_commit(&self) {
        let Some(mut session) = self.session.get_untracked() else {
            return;
        };
        session.dropped = true;
        self.session.set(None);

        let order = self.order.get_untracked();
        if order == session.original {
            return;
        }

        let api_client = self.api_client.get_untracked();
        let c = *self;
        c.saving.set(true);
        spawn_local(async move {
            match api_client.save_layout(&order).await {
                Ok(()) => c.error.set(None),
                Err(e) => {
                    error!("saving layout failed: {e}");
                    c.error.set(Some(e.to_string()));
                }
            }
            c.saving.set(false);
            // Backend filters unknown keys; show what it actually stored.
            c.load();
        });
    }

    /// `dragend`: a gesture that ends without a drop puts the list back.
    pub fn end(&self) {
        if let Some(session) = self.session.get_untracked() {
            if !session.dropped {
                self.order.set(session.original);
            }
        }
        self.session.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LayoutModule::*;

    #[test]
    fn test_reorder_before_target() {
        let order = vec![Time, Custom, Song, Window, Heartrate];
        assert_eq!(
            reorder_before(&order, Song, Some(Time)),
            vec![Song, Time, Custom, Window, Heartrate]
        );
        assert_eq!(
            reorder_before(&order, Time, Some(Window)),
            vec![Custom, Song, Time, Window, Heartrate]
        );
    }

    #[test]
    fn test_reorder_to_end() {
        let order = vec![Time, Custom, Song];
        assert_eq!(reorder_before(&order, Time, None), vec![Custom, Song, Time]);
    }

    #[test]
    fn test_reorder_onto_itself_is_noop_position() {
        let order = vec![Time, Custom, Song];
        assert_eq!(reorder_before(&order, Custom, Some(Custom)), vec![Time, Song, Custom]);
        assert_eq!(reorder_before(&order, Custom, Some(Song)), order);
    }

    #[test]
    fn test_reorder_keeps_every_key_once() {
        let order = LayoutModule::default_order();
        for dragged in order.clone() {
            for before in order.iter().copied().map(Some).chain([None]) {
                let out = reorder_before(&order, dragged, before);
                assert_eq!(out.len(), order.len());
                for m in &order {
                    assert_eq!(out.iter().filter(|x| *x == m).count(), 1);
                }
            }
        }
    }

    #[test]
    fn test_session_remembers_original_order() {
        let order = vec![Time, Custom];
        let s = DragSession::begin(Custom, &order);
        assert_eq!(s.original, order);
        assert!(!s.dropped);
    }
}
