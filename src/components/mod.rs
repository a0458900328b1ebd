pub mod layout_list;
pub mod message_rows;
pub mod toggles;
pub mod ui;
