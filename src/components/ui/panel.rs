use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Panel, section, "bg-card text-card-foreground flex flex-col gap-3 rounded-xl border p-4 shadow-sm"}
    clx! {PanelHeader, header, "flex items-center justify-between gap-2"}
    clx! {PanelTitle, h2, "text-sm font-semibold tracking-tight"}
    clx! {PanelHint, p, "text-muted-foreground text-xs"}
    clx! {PanelBody, div, "flex flex-col gap-2"}
    clx! {PanelRow, div, "flex flex-wrap items-center gap-2"}
}

pub use components::*;
