//! ERP backend client library
//!
//! Typed access to the REST backend behind the ERP admin screens: option
//! normalization, list/record envelopes, errors and an async client.

pub mod error;
pub mod model;

mod client;
mod source;

pub use client::*;
pub use source::*;
