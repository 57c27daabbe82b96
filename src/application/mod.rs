//! Application layer containing the payment lifecycle orchestration.
//!
//! `PaymentManager` is the entry point for persisting payments and changing
//! their status. It owns the store and a handle on the caller's listener list.

pub mod listeners;
pub mod manager;
