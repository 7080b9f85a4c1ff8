//! Hash commands (HSET, HGET, HGETALL, HDEL)

use super::{reply_store_error, wrong_arity, Command, CommandContext, CommandSpec};
use crate::protocol::RespValue;

pub(super) static HSET: CommandSpec = CommandSpec {
    name: "HSET",
    arity: -4,
    flags: &["write", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: hset,
    summary: "Sets one or more fields of a hash.",
};

fn hset(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    let fields = &cmd.args[1..];
    if fields.len() % 2 != 0 {
        return wrong_arity(&cmd.name);
    }
    let pairs: Vec<_> = fields
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect();
    match ctx.keyspace.hset(&cmd.args[0], &pairs) {
        Ok(created) => RespValue::integer(created as i64),
        Err(err) => reply_store_error(err),
    }
}

pub(super) static HGET: CommandSpec = CommandSpec {
    name: "HGET",
    arity: 3,
    flags: &["readonly", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: hget,
    summary: "Gets the value of a hash field.",
};

fn hget(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    match ctx.keyspace.hget(&cmd.args[0], &cmd.args[1]) {
        Ok(Some(value)) => RespValue::BulkString(value),
        Ok(None) => RespValue::null(),
        Err(err) => reply_store_error(err),
    }
}

pub(super) static HGETALL: CommandSpec = CommandSpec {
    name: "HGETALL",
    arity: 2,
    flags: &["readonly"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: hgetall,
    summary: "Gets all fields and values of a hash.",
};

fn hgetall(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    match ctx.keyspace.hgetall(&cmd.args[0]) {
        Ok(pairs) => {
            let mut items = Vec::with_capacity(pairs.len() * 2);
            for (field, value) in pairs {
                items.push(RespValue::BulkString(field));
                items.push(RespValue::BulkString(value));
            }
            RespValue::array(items)
        }
        Err(err) => reply_store_error(err),
    }
}

pub(super) static HDEL: CommandSpec = CommandSpec {
    name: "HDEL",
    arity: -3,
    flags: &["write", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: hdel,
    summary: "Deletes one or more fields of a hash.",
};

fn hdel(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    match ctx.keyspace.hdel(&cmd.args[0], &cmd.args[1..]) {
        Ok(removed) => RespValue::integer(removed as i64),
        Err(err) => reply_store_error(err),
    }
}
