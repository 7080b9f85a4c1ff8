//! Connection commands (PING) and registry introspection (COMMAND)

use super::{wrong_arity, Command, CommandContext, CommandRegistry, CommandSpec};
use crate::protocol::RespValue;
use bytes::Bytes;

pub(super) static PING: CommandSpec = CommandSpec {
    name: "PING",
    arity: -1,
    flags: &["readonly", "fast"],
    first_key: 0,
    last_key: 0,
    key_step: 0,
    handler: ping,
    summary: "Returns PONG, or echoes the argument if one is given.",
};

fn ping(_ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    match cmd.args.as_slice() {
        [] => RespValue::simple("PONG"),
        [message] => RespValue::BulkString(message.clone()),
        _ => wrong_arity(&cmd.name),
    }
}

pub(super) static COMMAND: CommandSpec = CommandSpec {
    name: "COMMAND",
    arity: -1,
    flags: &["readonly"],
    first_key: 0,
    last_key: 0,
    key_step: 0,
    handler: command,
    summary: "Introspects the server's command table.",
};

fn command(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    match cmd.args.first() {
        None => command_table(ctx.registry),
        Some(sub) if sub.eq_ignore_ascii_case(b"DOCS") => {
            if cmd.args.len() < 2 {
                return RespValue::error("ERR wrong number of arguments for 'COMMAND DOCS'");
            }
            command_docs(ctx.registry, &cmd.args[1..])
        }
        Some(sub) => RespValue::error(format!(
            "ERR unknown subcommand '{}' for 'COMMAND'",
            String::from_utf8_lossy(sub)
        )),
    }
}

/// One `*6` spec per registered command:
/// `[name, arity, flags[], first_key, last_key, key_step]`.
fn command_table(registry: &CommandRegistry) -> RespValue {
    RespValue::array(registry.specs().map(spec_info).collect())
}

fn spec_info(spec: &CommandSpec) -> RespValue {
    RespValue::array(vec![
        RespValue::bulk(spec.name.to_lowercase()),
        RespValue::integer(spec.arity),
        RespValue::array(spec.flags.iter().map(|f| RespValue::bulk(*f)).collect()),
        RespValue::integer(spec.first_key),
        RespValue::integer(spec.last_key),
        RespValue::integer(spec.key_step),
    ])
}

/// `[name, doc-map]` pairs, flattened; unknown names get a null doc.
fn command_docs(registry: &CommandRegistry, names: &[Bytes]) -> RespValue {
    let mut items = Vec::with_capacity(names.len() * 2);
    for raw in names {
        let requested = String::from_utf8_lossy(raw).to_lowercase();
        items.push(RespValue::bulk(requested.clone()));

        match registry.get(&requested) {
            Some(spec) => items.push(RespValue::array(vec![
                RespValue::bulk("summary"),
                RespValue::bulk(spec.summary),
            ])),
            None => items.push(RespValue::null()),
        }
    }
    RespValue::array(items)
}
