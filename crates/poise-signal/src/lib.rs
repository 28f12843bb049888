//! Poise Signal - WebRTC signaling relay
//!
//! The relay forwards connection-setup messages between peers. It never
//! touches media. This crate provides:
//! - A connection registry keyed by user identity
//! - Point-to-point send
//! - Broadcast with an exclusion set and per-recipient failure isolation

pub mod relay;

pub use relay::*;
