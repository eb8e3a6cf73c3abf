//! # Herald Bot
//!
//! Discord gateway adapter, listing API and process wiring for Herald.
//!
//! This crate turns serenity interactions into dispatcher events, pushes
//! application command data through the Discord HTTP API and serves the
//! read-only command listing over HTTP.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod bot;
pub mod error;
pub mod interaction;
pub mod registrar;

pub use api::*;
pub use bot::*;
pub use error::*;
pub use interaction::*;
pub use registrar::*;
