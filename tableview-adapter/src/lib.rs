//! Host-side utilities for the `tableview` crate.
//!
//! The `tableview` crate is UI-agnostic and only decides which cells exist and where. This crate
//! provides small, framework-neutral helpers commonly needed by adapters:
//!
//! - A [`Controller`] that drives a view from viewport events and a frame clock
//! - A [`ReusePool`] item factory that recycles released instances
//!
//! This crate is intentionally framework-agnostic (no widget toolkit bindings).
#![forbid(unsafe_code)]

extern crate alloc;

mod controller;
mod reuse_pool;


pub use controller::{Controller, DEFAULT_SCROLL_RESET_DELAY_MS, TickReport};
pub use reuse_pool::{ItemId, ReusePool};
