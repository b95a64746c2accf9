//! Headless form and list widgets for the ERP admin front-end.
//!
//! Widgets hold state and react to input; drawing is left to the caller.
//! Changes a parent cares about are queued and drained with `take_events`.

pub mod combobox;
pub mod dialog;
pub mod events;
pub mod focus;
pub mod keys;
pub mod latch;
pub mod selection;
pub mod table;
pub mod toast;
pub mod transition;
pub mod validation;

pub use combobox::{Combobox, Creator, ValueMode};
pub use dialog::{Dialog, DialogOutcome, DialogStack};
pub use events::{ChangeEvent, EventResult};
pub use table::{Column, Table};
