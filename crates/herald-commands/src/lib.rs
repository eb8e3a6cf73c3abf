//! # Herald Commands
//!
//! Declarative slash commands, context menus and message components for Herald.
//!
//! Declarations are read from TOML files laid out by namespace, validated into
//! [`CommandDescriptor`]s and kept in a [`CommandRegistry`]. The [`Dispatcher`]
//! routes incoming interactions through permission, capability and throttle
//! checks before handing them to the handler a declaration names.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod builtin;
pub mod capability;
pub mod context;
pub mod descriptor;
pub mod dispatcher;
pub mod eligibility;
pub mod framework;
pub mod gateway;
pub mod permissions;
pub mod prompt;
pub mod registration;
pub mod registry;
pub mod source;
pub mod throttle;

#[cfg(test)]
mod test_support;

pub use capability::*;
pub use context::*;
pub use descriptor::*;
pub use dispatcher::*;
pub use eligibility::*;
pub use framework::*;
pub use gateway::*;
pub use permissions::*;
pub use prompt::*;
pub use registration::*;
pub use registry::*;
pub use source::*;
pub use throttle::*;
