//! Data model for values exchanged with the backend.

mod envelope;
mod option;
mod params;

pub use envelope::*;
pub use option::*;
pub use params::*;
