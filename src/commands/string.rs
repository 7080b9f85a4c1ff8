//! String commands (GET, SET, INCR, DECR)

use super::{reply_store_error, Command, CommandContext, CommandSpec};
use crate::protocol::RespValue;

pub(super) static GET: CommandSpec = CommandSpec {
    name: "GET",
    arity: 2,
    flags: &["readonly", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: get,
    summary: "Gets the value of a key.",
};

fn get(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    match ctx.keyspace.get(&cmd.args[0]) {
        Ok(Some(value)) => RespValue::BulkString(value),
        Ok(None) => RespValue::null(),
        Err(err) => reply_store_error(err),
    }
}

pub(super) static SET: CommandSpec = CommandSpec {
    name: "SET",
    arity: 3,
    flags: &["write"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: set,
    summary: "Sets the value of a key.",
};

fn set(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    ctx.keyspace.set(cmd.args[0].clone(), cmd.args[1].clone());
    RespValue::simple("OK")
}

pub(super) static INCR: CommandSpec = CommandSpec {
    name: "INCR",
    arity: 2,
    flags: &["write", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: incr,
    summary: "Increments the integer value of a key by one.",
};

fn incr(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    match ctx.keyspace.incr(&cmd.args[0]) {
        Ok(value) => RespValue::integer(value),
        Err(err) => reply_store_error(err),
    }
}

pub(super) static DECR: CommandSpec = CommandSpec {
    name: "DECR",
    arity: 2,
    flags: &["write", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: decr,
    summary: "Decrements the integer value of a key by one.",
};

fn decr(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    match ctx.keyspace.decr(&cmd.args[0]) {
        Ok(value) => RespValue::integer(value),
        Err(err) => reply_store_error(err),
    }
}
