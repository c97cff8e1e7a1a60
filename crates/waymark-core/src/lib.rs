//! Core types and trait definitions for the Waymark intake service.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! question flow and the eligibility rules live here as pure functions; the
//! persistence layer is abstracted behind [`store::CaseStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod access;
pub mod answers;
pub mod case;
pub mod decision;
pub mod error;
pub mod flow;
mod labels;
pub mod rules;
pub mod store;

pub use error::{Error, Result};
