//! Command layer
//!
//! A decoded request, the uniform handler contract, and the static
//! descriptor table behind the registry. Handlers are plain function
//! values dispatched through their descriptors; they are the sole
//! producers of reply values, for failures as much as for successes.

mod connection;
mod hash;
mod key;
mod list;
mod registry;
mod set;
mod string;
mod zset;

pub use registry::CommandRegistry;

use crate::protocol::RespValue;
use crate::store::{Keyspace, StoreError};
use bytes::Bytes;
use std::fmt;

/// A parsed client request: upper-cased command name plus raw byte-string
/// arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub name: String,
    pub args: Vec<Bytes>,
}

impl Command {
    pub fn new(name: &str, args: Vec<Bytes>) -> Self {
        Command {
            name: name.to_uppercase(),
            args,
        }
    }

    /// Decode a request frame: an array whose first element is the command
    /// name and whose remainder are byte-string arguments. Simple-string
    /// elements are tolerated alongside bulk strings.
    pub fn from_resp(value: &RespValue) -> Result<Self, CommandError> {
        let items = value.as_array().ok_or(CommandError::NotAnArray)?;
        let (head, tail) = items.split_first().ok_or(CommandError::Empty)?;

        let name_bytes = head.as_arg().ok_or(CommandError::BadName)?;
        let name = std::str::from_utf8(&name_bytes).map_err(|_| CommandError::BadName)?;

        let mut args = Vec::with_capacity(tail.len());
        for item in tail {
            args.push(item.as_arg().ok_or(CommandError::BadArgument)?);
        }

        Ok(Command::new(name, args))
    }

    /// Wire form of the command; also the framing of a command-log record.
    pub fn to_resp(&self) -> RespValue {
        let mut items = Vec::with_capacity(self.args.len() + 1);
        items.push(RespValue::bulk(self.name.clone()));
        for arg in &self.args {
            items.push(RespValue::BulkString(arg.clone()));
        }
        RespValue::Array(items)
    }
}

/// A request frame that does not form a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    NotAnArray,
    Empty,
    BadName,
    BadArgument,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::NotAnArray => write!(f, "expected an array of bulk strings"),
            CommandError::Empty => write!(f, "empty command array"),
            CommandError::BadName => write!(f, "invalid command name"),
            CommandError::BadArgument => write!(f, "invalid command argument"),
        }
    }
}

impl std::error::Error for CommandError {}

/// Resources a handler can reach during execution.
pub struct CommandContext<'a> {
    pub keyspace: &'a Keyspace,
    pub registry: &'a CommandRegistry,
}

/// The uniform handler contract.
pub type Handler = fn(&CommandContext<'_>, &Command) -> RespValue;

/// Static descriptor for one command.
pub struct CommandSpec {
    /// Canonical upper-case name
    pub name: &'static str,

    /// Positive: exact element count including the name.
    /// Negative `-n`: at least `n` elements.
    pub arity: i64,

    /// Advisory tags; `write` makes the dispatcher emit a log record on
    /// success.
    pub flags: &'static [&'static str],

    /// 1-based key positions for introspection; `last_key` of -1 means
    /// "through the final argument".
    pub first_key: i64,
    pub last_key: i64,
    pub key_step: i64,

    pub handler: Handler,

    /// One-line description served by COMMAND DOCS
    pub summary: &'static str,
}

impl CommandSpec {
    pub fn is_write(&self) -> bool {
        self.flags.contains(&"write")
    }

    /// Check a request's total element count (name included) against the
    /// declared arity.
    pub fn accepts(&self, element_count: usize) -> bool {
        let n = element_count as i64;
        if self.arity >= 0 {
            n == self.arity
        } else {
            n >= -self.arity
        }
    }
}

pub(crate) fn wrong_arity(name: &str) -> RespValue {
    RespValue::error(format!(
        "ERR wrong number of arguments for '{}' command",
        name
    ))
}

pub(crate) fn reply_store_error(err: StoreError) -> RespValue {
    match err {
        StoreError::WrongType => {
            RespValue::error("WRONGTYPE Operation against a key holding the wrong kind of value")
        }
        StoreError::NotAnInteger => {
            RespValue::error("ERR value is not an integer or out of range")
        }
    }
}

/// Parse a decimal integer argument (indices, counts, seconds).
pub(crate) fn parse_i64(arg: &Bytes) -> Option<i64> {
    std::str::from_utf8(arg).ok()?.parse().ok()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_resp_uppercases_name() {
        let frame = RespValue::array(vec![
            RespValue::bulk("set"),
            RespValue::bulk("key"),
            RespValue::bulk("value"),
        ]);
        let cmd = Command::from_resp(&frame).unwrap();
        assert_eq!(cmd.name, "SET");
        assert_eq!(cmd.args, vec![Bytes::from("key"), Bytes::from("value")]);
    }

    #[test]
    fn test_from_resp_accepts_simple_string_args() {
        let frame = RespValue::array(vec![
            RespValue::simple("GET"),
            RespValue::simple("key"),
        ]);
        let cmd = Command::from_resp(&frame).unwrap();
        assert_eq!(cmd.name, "GET");
        assert_eq!(cmd.args, vec![Bytes::from("key")]);
    }

    #[test]
    fn test_from_resp_rejects_non_array() {
        assert_eq!(
            Command::from_resp(&RespValue::bulk("GET")),
            Err(CommandError::NotAnArray)
        );
        assert_eq!(
            Command::from_resp(&RespValue::array(vec![])),
            Err(CommandError::Empty)
        );
        assert_eq!(
            Command::from_resp(&RespValue::array(vec![RespValue::integer(1)])),
            Err(CommandError::BadName)
        );
    }

    #[test]
    fn test_to_resp_round_trip() {
        let cmd = Command::new("RPUSH", vec![Bytes::from("l"), Bytes::from("a b")]);
        let decoded = Command::from_resp(&cmd.to_resp()).unwrap();
        assert_eq!(decoded, cmd);
    }

    #[test]
    fn test_arity_check() {
        let spec = CommandSpec {
            name: "X",
            arity: 3,
            flags: &[],
            first_key: 1,
            last_key: 1,
            key_step: 1,
            handler: |_, _| RespValue::null(),
            summary: "",
        };
        assert!(spec.accepts(3));
        assert!(!spec.accepts(2));
        assert!(!spec.accepts(4));

        let at_least_two = CommandSpec { arity: -2, ..spec };
        assert!(at_least_two.accepts(2));
        assert!(at_least_two.accepts(5));
        assert!(!at_least_two.accepts(1));
    }
}
