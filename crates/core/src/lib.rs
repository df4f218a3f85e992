//! `erpdesk-core`: shared building blocks for the ERP shell.
//!
//! This crate contains **pure** primitives (no storage, no HTTP, no UI).

pub mod email;
pub mod error;
pub mod id;

pub use email::Email;
pub use error::{DomainError, DomainResult};
pub use id::{SessionId, UserId};
