//! Command dispatcher
//!
//! Resolves a parsed command against the registry, enforces arity, invokes
//! the handler, and appends successful writes to the command log. Shared
//! across connection tasks without an outer lock; the keyspace's own
//! reader-writer lock is the only serialization point.

use crate::aof::AofWriter;
use crate::commands::{wrong_arity, Command, CommandContext, CommandRegistry};
use crate::protocol::RespValue;
use crate::store::Keyspace;
use std::sync::Arc;
use tracing::{debug, warn};

/// How a command reached the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A live client: the reply is returned and writes are logged.
    Client,
    /// Startup log replay: nothing is re-logged, replies are discarded.
    Replay,
}

pub struct Dispatcher {
    registry: CommandRegistry,
    keyspace: Arc<Keyspace>,
    log: Option<Arc<AofWriter>>,
}

impl Dispatcher {
    pub fn new(keyspace: Arc<Keyspace>) -> Self {
        Dispatcher {
            registry: CommandRegistry::new(),
            keyspace,
            log: None,
        }
    }

    pub fn with_log(keyspace: Arc<Keyspace>, log: Arc<AofWriter>) -> Self {
        Dispatcher {
            registry: CommandRegistry::new(),
            keyspace,
            log: Some(log),
        }
    }

    pub fn keyspace(&self) -> &Keyspace {
        &self.keyspace
    }

    /// Decode and execute one client request frame.
    pub fn dispatch(&self, request: &RespValue) -> RespValue {
        match Command::from_resp(request) {
            Ok(cmd) => self.execute(&cmd, Source::Client),
            Err(e) => RespValue::error(format!("ERR {}", e)),
        }
    }

    /// Execute a parsed command.
    pub fn execute(&self, cmd: &Command, source: Source) -> RespValue {
        let Some(spec) = self.registry.get(&cmd.name) else {
            return RespValue::error(format!("ERR unknown command '{}'", cmd.name));
        };

        if !spec.accepts(cmd.args.len() + 1) {
            return wrong_arity(&cmd.name);
        }

        debug!(name = %cmd.name, args = cmd.args.len(), "dispatching");

        let ctx = CommandContext {
            keyspace: &self.keyspace,
            registry: &self.registry,
        };
        let reply = (spec.handler)(&ctx, cmd);

        // A failed log write does not fail the command; the mutation is
        // already applied and the reply stands.
        if source == Source::Client && spec.is_write() && !reply.is_error() {
            if let Some(log) = &self.log {
                if let Err(e) = log.append(cmd) {
                    warn!(command = %cmd.name, "failed to append to command log: {}", e);
                }
            }
        }

        reply
    }

    /// Re-execute recovered log records, discarding replies. Returns how
    /// many applied cleanly.
    pub fn replay(&self, commands: Vec<Command>) -> usize {
        let mut applied = 0;
        for cmd in commands {
            let reply = self.execute(&cmd, Source::Replay);
            if reply.is_error() {
                warn!(command = %cmd.name, "log replay rejected a record: {}", reply);
            } else {
                applied += 1;
            }
        }
        applied
    }
}
