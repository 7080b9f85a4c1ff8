//! Generic key commands (DEL, EXISTS, EXPIRE, TTL)

use super::{parse_i64, Command, CommandContext, CommandSpec};
use crate::protocol::RespValue;

pub(super) static DEL: CommandSpec = CommandSpec {
    name: "DEL",
    arity: -2,
    flags: &["write"],
    first_key: 1,
    last_key: -1,
    key_step: 1,
    handler: del,
    summary: "Deletes one or more keys.",
};

fn del(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    let mut deleted = 0;
    for key in &cmd.args {
        if ctx.keyspace.del(key) {
            deleted += 1;
        }
    }
    RespValue::integer(deleted)
}

pub(super) static EXISTS: CommandSpec = CommandSpec {
    name: "EXISTS",
    arity: -2,
    flags: &["readonly", "fast"],
    first_key: 1,
    last_key: -1,
    key_step: 1,
    handler: exists,
    summary: "Checks how many of the given keys exist.",
};

fn exists(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    let mut present = 0;
    for key in &cmd.args {
        if ctx.keyspace.exists(key) {
            present += 1;
        }
    }
    RespValue::integer(present)
}

pub(super) static EXPIRE: CommandSpec = CommandSpec {
    name: "EXPIRE",
    arity: 3,
    flags: &["write", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: expire,
    summary: "Sets the expiration time of a key in seconds.",
};

fn expire(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    let seconds = match parse_i64(&cmd.args[1]) {
        Some(s) if s >= 0 => s as u64,
        _ => return RespValue::error("ERR invalid expire time in 'EXPIRE' command"),
    };
    if ctx.keyspace.expire(&cmd.args[0], seconds) {
        RespValue::integer(1)
    } else {
        RespValue::integer(0)
    }
}

pub(super) static TTL: CommandSpec = CommandSpec {
    name: "TTL",
    arity: 2,
    flags: &["readonly", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: ttl,
    summary: "Returns the remaining time to live of a key in seconds.",
};

fn ttl(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    RespValue::integer(ctx.keyspace.ttl(&cmd.args[0]))
}
