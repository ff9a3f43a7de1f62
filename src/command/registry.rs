//! Command registry
//!
//! Data-driven table from command name to descriptor. Each built-in command
//! is one row: name, parameter shape, encoding strategy, reply transform.

use std::collections::HashMap;
use std::io::{Read, Write};

use super::descriptor::{define, CommandDescriptor, ParamShape};
use super::transform::{identity, int_to_bool, split_keys, status_ok, to_float, to_set};
use super::transform::{ReplyTransform, Value};
use crate::error::{InvalidCommand, Result};
use crate::network::Connection;
use crate::protocol::EncodingStrategy::{self, Bulk, Inline, SortComposite};
use crate::protocol::Arg;

type Row = (&'static str, ParamShape, EncodingStrategy, ReplyTransform);

const fn fixed(n: usize) -> ParamShape {
    ParamShape::fixed(n)
}

const fn rest(n: usize) -> ParamShape {
    ParamShape::variadic(n)
}

const CONNECTION_COMMANDS: &[Row] = &[
    ("auth", fixed(1), Inline, status_ok),
    ("echo", fixed(1), Bulk, identity),
    ("ping", fixed(0), Inline, identity),
    ("quit", fixed(0), Inline, identity),
    ("select", fixed(1), Inline, status_ok),
];

const KEYSPACE_COMMANDS: &[Row] = &[
    ("del", rest(1), Inline, identity),
    ("exists", fixed(1), Inline, int_to_bool),
    ("expire", fixed(2), Inline, int_to_bool),
    ("expireat", fixed(2), Inline, int_to_bool),
    ("keys", fixed(1), Inline, split_keys),
    ("move", fixed(2), Inline, int_to_bool),
    ("persist", fixed(1), Inline, int_to_bool),
    ("randomkey", fixed(0), Inline, identity),
    ("rename", fixed(2), Inline, status_ok),
    ("renamenx", fixed(2), Inline, int_to_bool),
    ("sort", rest(1), SortComposite, identity),
    ("ttl", fixed(1), Inline, identity),
    ("type", fixed(1), Inline, identity),
];

const STRING_COMMANDS: &[Row] = &[
    ("append", fixed(2), Bulk, identity),
    ("decr", fixed(1), Inline, identity),
    ("decrby", fixed(2), Inline, identity),
    ("get", fixed(1), Inline, identity),
    ("getset", fixed(2), Bulk, identity),
    ("incr", fixed(1), Inline, identity),
    ("incrby", fixed(2), Inline, identity),
    ("mget", rest(1), Inline, identity),
    ("set", fixed(2), Bulk, status_ok),
    ("setex", fixed(3), Bulk, status_ok),
    ("setnx", fixed(2), Bulk, int_to_bool),
    ("strlen", fixed(1), Inline, identity),
    ("substr", fixed(3), Inline, identity),
];

const LIST_COMMANDS: &[Row] = &[
    ("lindex", fixed(2), Inline, identity),
    ("llen", fixed(1), Inline, identity),
    ("lpop", fixed(1), Inline, identity),
    ("lpush", fixed(2), Bulk, identity),
    ("lrange", fixed(3), Inline, identity),
    ("lrem", fixed(3), Bulk, identity),
    ("lset", fixed(3), Bulk, status_ok),
    ("ltrim", fixed(3), Inline, status_ok),
    ("rpop", fixed(1), Inline, identity),
    ("rpoplpush", fixed(2), Inline, identity),
    ("rpush", fixed(2), Bulk, identity),
];

const SET_COMMANDS: &[Row] = &[
    ("sadd", fixed(2), Bulk, int_to_bool),
    ("scard", fixed(1), Inline, identity),
    ("sdiff", rest(1), Inline, to_set),
    ("sdiffstore", rest(2), Inline, identity),
    ("sinter", rest(1), Inline, to_set),
    ("sinterstore", rest(2), Inline, identity),
    ("sismember", fixed(2), Bulk, int_to_bool),
    ("smembers", fixed(1), Inline, to_set),
    ("smove", fixed(3), Bulk, int_to_bool),
    ("spop", fixed(1), Inline, identity),
    ("srandmember", fixed(1), Inline, identity),
    ("srem", fixed(2), Bulk, int_to_bool),
    ("sunion", rest(1), Inline, to_set),
    ("sunionstore", rest(2), Inline, identity),
];

const SORTED_SET_COMMANDS: &[Row] = &[
    ("zadd", fixed(3), Bulk, int_to_bool),
    ("zcard", fixed(1), Inline, identity),
    ("zincrby", fixed(3), Bulk, to_float),
    ("zrange", fixed(3), Inline, identity),
    ("zrangebyscore", fixed(3), Inline, identity),
    ("zrem", fixed(2), Bulk, int_to_bool),
    ("zremrangebyscore", fixed(3), Inline, identity),
    ("zrevrange", fixed(3), Inline, identity),
    ("zscore", fixed(2), Bulk, to_float),
];

const SERVER_COMMANDS: &[Row] = &[
    ("bgsave", fixed(0), Inline, identity),
    ("dbsize", fixed(0), Inline, identity),
    ("flushall", fixed(0), Inline, status_ok),
    ("flushdb", fixed(0), Inline, status_ok),
    ("info", fixed(0), Inline, identity),
    ("lastsave", fixed(0), Inline, identity),
    ("save", fixed(0), Inline, status_ok),
];

/// Runtime command registry
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    entries: HashMap<String, CommandDescriptor>,
}

impl CommandRegistry {
    /// Builds an empty command registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Builds a registry preloaded with the built-in command table
    pub fn with_builtin_commands() -> Self {
        let mut registry = Self::new();
        for table in [
            CONNECTION_COMMANDS,
            KEYSPACE_COMMANDS,
            STRING_COMMANDS,
            LIST_COMMANDS,
            SET_COMMANDS,
            SORTED_SET_COMMANDS,
            SERVER_COMMANDS,
        ] {
            registry.register_rows(table);
        }
        registry
    }

    fn register_rows(&mut self, rows: &[Row]) {
        for &(name, shape, strategy, transform) in rows {
            self.register(define(name, shape, strategy).with_transform(transform));
        }
    }

    /// Add or replace a command, returning the previous descriptor
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Option<CommandDescriptor> {
        self.entries.insert(descriptor.name().to_string(), descriptor)
    }

    /// Look up a command by name, case-insensitively
    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.entries.get(&name.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered wire names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Invoke a registered command with a flat argument list
    pub fn call<S: Read + Write>(
        &self,
        conn: &mut Connection<S>,
        name: &str,
        args: &[Arg],
    ) -> Result<Value> {
        let descriptor = self
            .get(name)
            .ok_or_else(|| InvalidCommand::UnknownCommand(name.to_string()))?;
        descriptor.call(conn, args)
    }
}
