//! Set commands (SADD, SREM, SMEMBERS, SISMEMBER)

use super::{reply_store_error, Command, CommandContext, CommandSpec};
use crate::protocol::RespValue;

pub(super) static SADD: CommandSpec = CommandSpec {
    name: "SADD",
    arity: -3,
    flags: &["write", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: sadd,
    summary: "Adds one or more members to a set.",
};

fn sadd(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    match ctx.keyspace.sadd(&cmd.args[0], &cmd.args[1..]) {
        Ok(added) => RespValue::integer(added as i64),
        Err(err) => reply_store_error(err),
    }
}

pub(super) static SREM: CommandSpec = CommandSpec {
    name: "SREM",
    arity: -3,
    flags: &["write", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: srem,
    summary: "Removes one or more members from a set.",
};

fn srem(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    match ctx.keyspace.srem(&cmd.args[0], &cmd.args[1..]) {
        Ok(removed) => RespValue::integer(removed as i64),
        Err(err) => reply_store_error(err),
    }
}

pub(super) static SMEMBERS: CommandSpec = CommandSpec {
    name: "SMEMBERS",
    arity: 2,
    flags: &["readonly"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: smembers,
    summary: "Returns all members of a set.",
};

fn smembers(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    match ctx.keyspace.smembers(&cmd.args[0]) {
        Ok(members) => {
            RespValue::array(members.into_iter().map(RespValue::BulkString).collect())
        }
        Err(err) => reply_store_error(err),
    }
}

pub(super) static SISMEMBER: CommandSpec = CommandSpec {
    name: "SISMEMBER",
    arity: 3,
    flags: &["readonly", "fast"],
    first_key: 1,
    last_key: 1,
    key_step: 1,
    handler: sismember,
    summary: "Checks whether a member belongs to a set.",
};

fn sismember(ctx: &CommandContext<'_>, cmd: &Command) -> RespValue {
    match ctx.keyspace.sismember(&cmd.args[0], &cmd.args[1]) {
        Ok(found) => RespValue::integer(found as i64),
        Err(err) => reply_store_error(err),
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::testutil::run;
    use crate::protocol::RespValue;
    use crate::store::Keyspace;

    #[test]
    fn test_sadd_dedup() {
        let ks = Keyspace::new();
        assert_eq!(run(&ks, "SADD", &["s", "a", "b", "a"]), RespValue::integer(2));
        assert_eq!(run(&ks, "SADD", &["s", "a"]), RespValue::integer(0));
    }

    #[test]
    fn test_smembers_contents() {
        let ks = Keyspace::new();
        run(&ks, "SADD", &["s", "a", "b"]);
        let RespValue::Array(members) = run(&ks, "SMEMBERS", &["s"]) else {
            panic!("expected array reply");
        };
        let mut members: Vec<_> = members
            .into_iter()
            .map(|m| match m {
                RespValue::BulkString(b) => b,
                other => panic!("expected bulk member, got {}", other),
            })
            .collect();
        members.sort();
        assert_eq!(members, vec!["a", "b"]);
    }

    #[test]
    fn test_smembers_missing_is_empty() {
        let ks = Keyspace::new();
        assert_eq!(run(&ks, "SMEMBERS", &["nope"]), RespValue::array(vec![]));
    }

    #[test]
    fn test_sismember() {
        let ks = Keyspace::new();
        run(&ks, "SADD", &["s", "a"]);
        assert_eq!(run(&ks, "SISMEMBER", &["s", "a"]), RespValue::integer(1));
        assert_eq!(run(&ks, "SISMEMBER", &["s", "b"]), RespValue::integer(0));
        assert_eq!(run(&ks, "SISMEMBER", &["nope", "a"]), RespValue::integer(0));
    }

    #[test]
    fn test_srem_drains_key() {
        let ks = Keyspace::new();
        run(&ks, "SADD", &["s", "a", "b"]);
        assert_eq!(run(&ks, "SREM", &["s", "a", "b", "c"]), RespValue::integer(2));
        assert_eq!(run(&ks, "EXISTS", &["s"]), RespValue::integer(0));
    }
}
