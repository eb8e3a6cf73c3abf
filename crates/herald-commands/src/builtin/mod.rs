//! Handlers for the commands and components every deployment ships with.

mod confirm;
mod deploy;
mod help;
mod links;
mod permlevel;
mod ping;
mod reload;
mod stats;

pub use confirm::{CONFIRM_ACCEPT, CONFIRM_DECLINE};

use crate::context::InvocationContext;
use crate::framework::{handler_fn, Data, HandlerCatalog};

/// Registers every built-in handler under the name declarations refer to.
pub fn register_builtins(catalog: &mut HandlerCatalog) {
    catalog
        .register("ping", handler_fn(ping::ping))
        .register("stats", handler_fn(stats::stats))
        .register("permlevel", handler_fn(permlevel::permlevel))
        .register("help", handler_fn(help::help))
        .register("help-autocomplete", handler_fn(help::help_autocomplete))
        .register("reload", handler_fn(reload::reload))
        .register("reload-autocomplete", handler_fn(reload::reload_autocomplete))
        .register("deploy", handler_fn(deploy::deploy))
        .register("confirm-prompt", handler_fn(confirm::confirm_prompt))
        .register("invite", handler_fn(links::invite))
        .register("support", handler_fn(links::support));
}

/// Renders `key` with the caller's mention as `user` plus `args`.
fn say(data: &Data, ctx: &InvocationContext, key: &str, args: &[(&str, &str)]) -> String {
    let user = ctx.mention();
    let mut all = Vec::with_capacity(args.len() + 1);
    all.push(("user", user.as_str()));
    all.extend_from_slice(args);
    data.messages.get_with_args(key, &all)
}
