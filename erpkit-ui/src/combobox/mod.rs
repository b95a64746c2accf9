//! Combobox widget - text input with a filtered option dropdown and inline
//! "create" for values that don't exist yet.

mod create;
mod filter;
mod prompt;
mod remote;
mod state;

pub use create::{CreateCallback, CreateOutcome, CreateRequest, CreateStep, Creator, PendingCreate};
pub use filter::{exact_label_match, filter_options, has_label_ignore_case};
pub use prompt::Prompt;
pub use remote::{FetchTicket, OptionsFrom};
pub use state::{Combobox, ValueMode};
