//! Poise Core - Fundamental types shared by every Poise crate
//!
//! This crate defines:
//! - Identifiers (UserId)
//! - The central error type (PoiseError)
//! - The practice question bank

pub mod error;
pub mod id;
pub mod question;

pub use error::*;
pub use id::*;
pub use question::*;
