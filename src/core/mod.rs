//! Core types shared by every command: the error taxonomy and its
//! user-facing rendering.

pub mod error;

pub use error::{ChiefError, ErrorContext, user_friendly_error};
