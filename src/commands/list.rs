//! List commands (LPUSH, RPUSH, LRANGE, LPOP, RPOP, LLEN)

use super::{parse_i64, reply_store_error, wrong_arity, Command, CommandContext, CommandSpec};
use crate::protocol::RespValue;
use crate::store::Keyspace;
use bytes::Bytes;

pub(super) static LPUSH: CommandSpec = CommandSpec {
    name: "LPUSH",
    arity: -3,
    flags: &["write", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: lpush,
    summary: "Prepends one or more elements to a list.",
};

fn lpush(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    match ctx.keyspace.lpush(&cmd.args[0], &cmd.args[1..]) {
        Ok(len) => RespValue::integer(len as i64),
        Err(err) => reply_store_error(err),
    }
}

pub(super) static RPUSH: CommandSpec = CommandSpec {
    name: "RPUSH",
    arity: -3,
    flags: &["write", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: rpush,
    summary: "Appends one or more elements to a list.",
};

fn rpush(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    match ctx.keyspace.rpush(&cmd.args[0], &cmd.args[1..]) {
        Ok(len) => RespValue::integer(len as i64),
        Err(err) => reply_store_error(err),
    }
}

pub(super) static LRANGE: CommandSpec = CommandSpec {
    name: "LRANGE",
    arity: 4,
    flags: &["readonly"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: lrange,
    summary: "Returns a range of elements from a list.",
};

fn lrange(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    let (Some(start), Some(end)) = (parse_i64(&cmd.args[1]), parse_i64(&cmd.args[2])) else {
        return RespValue::error("ERR value is not an integer or out of range");
    };
    match ctx.keyspace.lrange(&cmd.args[0], start, end) {
        Ok(items) => RespValue::array(items.into_iter().map(RespValue::BulkString).collect()),
        Err(err) => reply_store_error(err),
    }
}

pub(super) static LPOP: CommandSpec = CommandSpec {
    name: "LPOP",
    arity: -2,
    flags: &["write", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: lpop,
    summary: "Removes and returns elements from the head of a list.",
};

fn lpop(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    pop(ctx.keyspace, cmd, Keyspace::lpop)
}

pub(super) static RPOP: CommandSpec = CommandSpec {
    name: "RPOP",
    arity: -2,
    flags: &["write", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: rpop,
    summary: "Removes and returns elements from the tail of a list.",
};

fn rpop(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    pop(ctx.keyspace, cmd, Keyspace::rpop)
}

/// Shared LPOP/RPOP shape: 1 or 2 arguments. Without a count the reply is
/// a single bulk (or null); with a count it is an array of the popped
/// elements in removal order.
fn pop(
    keyspace: &Keyspace,
    cmd: &Command,
    op: fn(&Keyspace, &Bytes, usize) -> Result<Vec<Bytes>, crate::store::StoreError>,
) -> RespValue {
    if cmd.args.len() > 2 {
        return wrong_arity(&cmd.name);
    }

    let count = match cmd.args.get(1) {
        None => None,
        Some(arg) => match parse_i64(arg) {
            Some(n) if n >= 0 => Some(n as usize),
            _ => {
                return RespValue::error(format!(
                    "ERR invalid count for '{}' command",
                    cmd.name
                ))
            }
        },
    };

    match op(keyspace, &cmd.args[0], count.unwrap_or(1)) {
        Ok(mut popped) => match count {
            None => match popped.pop() {
                Some(value) => RespValue::BulkString(value),
                None => RespValue::null(),
            },
            Some(_) => {
                RespValue::array(popped.into_iter().map(RespValue::BulkString).collect())
            }
        },
        Err(err) => reply_store_error(err),
    }
}

pub(super) static LLEN: CommandSpec = CommandSpec {
    name: "LLEN",
    arity: 2,
    flags: &["readonly", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: llen,
    summary: "Returns the length of a list.",
};

fn llen(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    match ctx.keyspace.llen(&cmd.args[0]) {
        Ok(len) => RespValue::integer(len as i64),
        Err(err) => reply_store_error(err),
    }
}
