use crate::api::MoveDirection;
use crate::components::ui::{Button, ButtonSize, ButtonVariant, CountInput, TextInput};
use crate::state::AppContext;
use crate::store::MessageRow;
use icons::{ChevronDown, ChevronUp, X};
use leptos::prelude::*;

/// Editable list of custom messages.
///
/// Rows are rebuilt from scratch for every snapshot; each row's input is seeded
/// from the snapshot rather than carried over from the previous render.
#[component]
pub fn MessageEditorRows() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = app_state.0.messages;

    view! {
        <div class="flex flex-col gap-1.5">
            {move || {
                let rows = store.rows();
                if rows.is_empty() {
                    return view! {
                        <div class="text-xs text-muted-foreground">"No custom messages yet."</div>
                    }
                    .into_any();
                }

                rows.into_iter()
                    .map(|row| view! { <MessageEditorRow row=row /> })
                    .collect_view()
                    .into_any()
            }}
        </div>
    }
}

#[component]
fn MessageEditorRow(row: MessageRow) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = app_state.0.messages;

    let index = row.index;
    let text = RwSignal::new(row.text.clone());

    view! {
        <div class="flex items-center gap-1.5" data-index=index.to_string()>
            <span class="w-6 shrink-0 text-right text-xs text-muted-foreground">
                {row.position_label()}
            </span>
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                attr:title="Move up"
                attr:disabled=!row.can_move_up
                on:click=move |_| {
                    store.move_item(index, MoveDirection::Up);
                }
            >
                <ChevronUp />
            </Button>
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                attr:title="Move down"
                attr:disabled=!row.can_move_down
                on:click=move |_| {
                    store.move_item(index, MoveDirection::Down);
                }
            >
                <ChevronDown />
            </Button>
            <TextInput
                bind_value=text
                on_commit=Callback::new(move |v: String| store.update(index, v))
            />
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                class="text-destructive"
                attr:title="Delete"
                on:click=move |_| store.delete(index)
            >
                <X />
            </Button>
        </div>
    }
}

/// Per-message display interval (seconds).
#[component]
pub fn IntervalRows() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = app_state.0.messages;

    view! {
        <AttributeRows
            empty="Add custom messages to set their timings."
            value_of=|row: &MessageRow| row.interval
            on_commit=Callback::new(move |(index, v): (usize, u32)| store.set_interval(index, v))
        />
    }
}

/// Per-message selection weight; only meaningful while random order is on.
#[component]
pub fn WeightRows() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = app_state.0.messages;
    let random_order = move || {
        app_state
            .0
            .sync
            .display
            .with(|d| d.as_ref().map(|d| d.random_order).unwrap_or(false))
    };

    view! {
        <Show
            when=random_order
            fallback=|| view! {
                <div class="text-xs text-muted-foreground">
                    "Turn on Random Order to weight messages."
                </div>
            }
        >
            <AttributeRows
                empty="Add custom messages to weight them."
                value_of=|row: &MessageRow| row.weight
                on_commit=Callback::new(move |(index, v): (usize, u32)| store.set_weight(index, v))
            />
        </Show>
    }
}

#[component]
fn AttributeRows(
    empty: &'static str,
    value_of: fn(&MessageRow) -> u32,
    on_commit: Callback<(usize, u32)>,
) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let store = app_state.0.messages;

    view! {
        <div class="flex flex-col gap-1.5">
            {move || {
                let rows = store.rows();
                if rows.is_empty() {
                    return view! { <div class="text-xs text-muted-foreground">{empty}</div> }
                        .into_any();
                }

                rows.into_iter()
                    .map(|row| {
                        let index = row.index;
                        let value = value_of(&row);
                        view! {
                            <label class="flex items-center justify-between gap-3 text-xs">
                                <span class="min-w-0 truncate">{row.attribute_label()}</span>
                                <CountInput
                                    value=Signal::stored(value)
                                    on_commit=Callback::new(move |v: u32| on_commit.run((index, v)))
                                />
                            </label>
                        }
                    })
                    .collect_view()
                    .into_any()
            }}
        </div>
    }
}
