//! # Herald I18n
//!
//! User-facing message catalogue built on the Fluent localization system.
//!
//! Every reply the dispatcher and the built-in commands send to a user is
//! resolved here, so wording lives in `.ftl` resources instead of code.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod loader;
pub mod messages;

pub use loader::*;
pub use messages::*;
