//! Sorted-set commands (ZADD, ZRANGE, ZREM)

use super::{parse_i64, reply_store_error, wrong_arity, Command, CommandContext, CommandSpec};
use crate::protocol::RespValue;
use bytes::Bytes;

pub(super) static ZADD: CommandSpec = CommandSpec {
    name: "ZADD",
    arity: -4,
    flags: &["write", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: zadd,
    summary: "Adds one or more members to a sorted set, updating scores of existing ones.",
};

fn zadd(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    let tail = &cmd.args[1..];
    if tail.len() % 2 != 0 {
        return wrong_arity(&cmd.name);
    }

    let mut pairs = Vec::with_capacity(tail.len() / 2);
    for pair in tail.chunks_exact(2) {
        let Some(score) = parse_score(&pair[0]) else {
            return RespValue::error("ERR score is not a valid number");
        };
        pairs.push((score, pair[1].clone()));
    }

    match ctx.keyspace.zadd(&cmd.args[0], &pairs) {
        Ok(added) => RespValue::integer(added as i64),
        Err(err) => reply_store_error(err),
    }
}

pub(super) static ZRANGE: CommandSpec = CommandSpec {
    name: "ZRANGE",
    arity: -4,
    flags: &["readonly"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: zrange,
    summary: "Returns a range of members of a sorted set by rank.",
};

fn zrange(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    if cmd.args.len() > 4 {
        return wrong_arity(&cmd.name);
    }

    let (Some(start), Some(end)) = (parse_i64(&cmd.args[1]), parse_i64(&cmd.args[2])) else {
        return RespValue::error("ERR value is not an integer or out of range");
    };

    let with_scores = match cmd.args.get(3) {
        None => false,
        Some(arg) if arg.eq_ignore_ascii_case(b"WITHSCORES") => true,
        Some(_) => return RespValue::error("ERR syntax error"),
    };

    match ctx.keyspace.zrange(&cmd.args[0], start, end) {
        Ok(pairs) => {
            let mut items = Vec::with_capacity(pairs.len() * if with_scores { 2 } else { 1 });
            for (score, member) in pairs {
                items.push(RespValue::BulkString(member));
                if with_scores {
                    items.push(RespValue::bulk(format_score(score)));
                }
            }
            RespValue::array(items)
        }
        Err(err) => reply_store_error(err),
    }
}

pub(super) static ZREM: CommandSpec = CommandSpec {
    name: "ZREM",
    arity: -3,
    flags: &["write", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: zrem,
    summary: "Removes one or more members from a sorted set.",
};

fn zrem(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    match ctx.keyspace.zrem(&cmd.args[0], &cmd.args[1..]) {
        Ok(removed) => RespValue::integer(removed as i64),
        Err(err) => reply_store_error(err),
    }
}

fn parse_score(arg: &Bytes) -> Option<f64> {
    std::str::from_utf8(arg).ok()?.parse().ok()
}

/// Shortest decimal form that parses back to the same bit pattern.
fn format_score(score: f64) -> String {
    format!("{}", score)
}
