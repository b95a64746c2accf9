//! Error types

mod api;
mod validation;

pub use api::*;
pub use validation::*;

/// Top-level error returned by the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A request was rejected before it was sent.
    #[error(transparent)]
    Validation(#[from] FieldError),
}

impl Error {
    /// Short message suitable for showing next to a field or in a toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) => err.user_message(),
            Self::Validation(err) => err.to_string(),
        }
    }
}
