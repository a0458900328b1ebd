use crate::components::ui::{ErrorNotice, Spinner};
use crate::models::LayoutModule;
use crate::state::AppContext;
use leptos::html;
use leptos::prelude::*;

/// Drag-and-drop list of chatbox widgets.
///
/// Items are keyed by module so the dragged node survives the live reorders
/// that happen while hovering.
#[component]
pub fn LayoutList() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let layout = app_state.0.layout;
    let list_ref: NodeRef<html::Ul> = NodeRef::new();

    let on_dragover = move |ev: web_sys::DragEvent| {
        // Without this the browser refuses the drop.
        ev.prevent_default();
        if let Some(list) = list_ref.get_untracked() {
            layout.hover(&list, ev.client_y() as f64);
        }
    };

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        layout.drop_commit();
    };

    view! {
        <div class="flex flex-col gap-2">
            <ul
                node_ref=list_ref
                class="flex flex-col gap-1.5"
                on:dragover=on_dragover
                on:drop=on_drop
            >
                <For
                    each=move || layout.order.get()
                    key=|m: &LayoutModule| *m
                    children=move |m: LayoutModule| view! { <LayoutItem module=m /> }
                />
            </ul>
            <div class="flex items-center gap-2 text-xs text-muted-foreground">
                <Show when=move || layout.saving.get() fallback=|| ().into_view()>
                    <Spinner />
                    "Saving layout..."
                </Show>
            </div>
            <ErrorNotice error=layout.error />
        </div>
    }
}

#[component]
fn LayoutItem(module: LayoutModule) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let layout = app_state.0.layout;

    let on_dragstart = move |ev: web_sys::DragEvent| {
        if let Some(dt) = ev.data_transfer() {
            dt.set_effect_allowed("move");
            // Firefox will not start a drag with an empty payload.
            dt.set_data("text/plain", module.as_ref()).ok();
        }
        layout.begin(module);
    };

    view! {
        <li
            class="layout-item flex cursor-grab items-center gap-2 rounded-md border bg-background px-3 py-2 text-sm select-none"
            class=("opacity-50", move || layout.is_dragging(module))
            draggable="true"
            data-key=module.as_ref().to_string()
            on:dragstart=on_dragstart
            on:dragend=move |_| layout.end()
        >
            <span class="text-muted-foreground">"⋮⋮"</span>
            {module.label()}
        </li>
    }
}
