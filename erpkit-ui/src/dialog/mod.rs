//! Modal dialogs and the stack that decides which one owns the keyboard.

mod layout;
mod stack;
mod state;

pub use layout::{DialogArea, DialogSide, DialogSize};
pub use stack::{DialogId, DialogStack, StackEntry};
pub use state::{Dialog, DialogOutcome, FocusRef, PointerTarget, ReturnFocus};
