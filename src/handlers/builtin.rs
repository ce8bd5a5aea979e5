//! Handlers installed on every new client.
//!
//! They go through the public registration API like any other handler and
//! can be removed or replaced by the caller.

use parley_proto::Event;

use super::handler_fn;
use crate::client::Client;
use crate::commands;
use crate::error::{HandlerError, HandlerResult};

/// Register keep-alive, disconnect and CTCP reply handlers.
pub fn install_defaults(client: &Client) {
    client.add_handler("ping", handler_fn(pong));
    client.add_handler("kill", handler_fn(killed));
    client.add_handler("error", handler_fn(closing_link));
    client.add_handler("ctcp_ping", handler_fn(ctcp_ping));
    client.add_handler("ctcp_version", handler_fn(ctcp_version));
    client.add_handler("ctcp_time", handler_fn(ctcp_time));
    client.add_handler("ctcp_clientinfo", handler_fn(ctcp_clientinfo));
}

fn pong(client: &Client, event: &Event) -> HandlerResult {
    let token = event
        .trailing()
        .ok_or(HandlerError::NeedMoreParams { command: "ping" })?;
    client.write(commands::pong(token));
    Ok(())
}

fn killed(client: &Client, event: &Event) -> HandlerResult {
    tracing::warn!(
        by = event.nick().unwrap_or("server"),
        reason = event.trailing().unwrap_or(""),
        "killed by server"
    );
    client.disconnect();
    Ok(())
}

fn closing_link(client: &Client, event: &Event) -> HandlerResult {
    let text = event.trailing().unwrap_or("");
    if text.to_ascii_lowercase().contains("closing link") {
        tracing::info!(reason = text, "server closing link");
        client.disconnect();
    }
    Ok(())
}

fn reply_target(event: &Event) -> Result<&str, HandlerError> {
    event.nick().ok_or(HandlerError::MissingOrigin)
}

fn ctcp_ping(client: &Client, event: &Event) -> HandlerResult {
    let target = reply_target(event)?;
    client.ctcp_reply(target, "PING", event.param(1));
    Ok(())
}

fn ctcp_version(client: &Client, event: &Event) -> HandlerResult {
    let target = reply_target(event)?;
    client.ctcp_reply(target, "VERSION", Some(&client.config().ctcp.version));
    Ok(())
}

fn ctcp_time(client: &Client, event: &Event) -> HandlerResult {
    let target = reply_target(event)?;
    let now = chrono::Local::now().format("%a %b %e %H:%M:%S %Y").to_string();
    client.ctcp_reply(target, "TIME", Some(&now));
    Ok(())
}

fn ctcp_clientinfo(client: &Client, event: &Event) -> HandlerResult {
    let target = reply_target(event)?;
    let supported = client.config().ctcp.clientinfo.join(" ");
    client.ctcp_reply(target, "CLIENTINFO", Some(&supported));
    Ok(())
}
