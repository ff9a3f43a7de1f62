//! Command descriptors
//!
//! A descriptor binds a command name, its parameter shape, an encoding
//! strategy and a reply transform. One generic [`CommandDescriptor::invoke`]
//! serves every command.

use std::io::{Read, Write};

use super::transform::{identity, ReplyTransform, Value};
use crate::error::{InvalidCommand, Result};
use crate::network::Connection;
use crate::protocol::{encode, Arg, EncodingStrategy};

/// Fixed positional parameters plus an optional trailing variadic collector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamShape {
    pub fixed: usize,
    pub variadic: bool,
}

impl ParamShape {
    /// Exactly `n` parameters
    pub const fn fixed(n: usize) -> Self {
        Self { fixed: n, variadic: false }
    }

    /// `n` parameters followed by any number of extra ones
    pub const fn variadic(n: usize) -> Self {
        Self { fixed: n, variadic: true }
    }

    pub fn accepts(&self, count: usize) -> bool {
        if self.variadic {
            count >= self.fixed
        } else {
            count == self.fixed
        }
    }

    fn describe(&self) -> String {
        if self.variadic {
            format!("at least {}", self.fixed)
        } else {
            self.fixed.to_string()
        }
    }
}

/// A declared command
#[derive(Debug, Clone)]
pub struct CommandDescriptor {
    name: String,
    shape: ParamShape,
    strategy: EncodingStrategy,
    transform: ReplyTransform,
}

/// Declare a command with the identity transform
///
/// The wire name is `name` uppercased.
pub fn define(name: &str, shape: ParamShape, strategy: EncodingStrategy) -> CommandDescriptor {
    CommandDescriptor {
        name: name.to_ascii_uppercase(),
        shape,
        strategy,
        transform: identity,
    }
}

impl CommandDescriptor {
    /// Replace the reply transform
    pub fn with_transform(mut self, transform: ReplyTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Uppercase wire name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> ParamShape {
        self.shape
    }

    pub fn strategy(&self) -> EncodingStrategy {
        self.strategy
    }

    /// Build the request bytes
    ///
    /// `rest` is spliced after `fixed`; it must be empty unless the shape
    /// is variadic.
    pub fn encode(&self, fixed: &[Arg], rest: &[Arg]) -> Result<Vec<u8>> {
        if fixed.len() != self.shape.fixed || (!self.shape.variadic && !rest.is_empty()) {
            return Err(InvalidCommand::WrongArity {
                name: self.name.clone(),
                expected: self.shape.describe(),
                actual: fixed.len() + rest.len(),
            }
            .into());
        }

        if rest.is_empty() {
            return encode(self.strategy, &self.name, fixed);
        }
        let args: Vec<Arg> = fixed.iter().chain(rest).cloned().collect();
        encode(self.strategy, &self.name, &args)
    }

    /// Encode, send, read one reply and apply the transform
    pub fn invoke<S: Read + Write>(
        &self,
        conn: &mut Connection<S>,
        fixed: &[Arg],
        rest: &[Arg],
    ) -> Result<Value> {
        let request = self.encode(fixed, rest)?;
        tracing::debug!("{} ({} args)", self.name, fixed.len() + rest.len());
        let reply = conn.request(&request)?;
        (self.transform)(reply)
    }

    /// Invoke with a flat argument list split according to the shape
    pub fn call<S: Read + Write>(&self, conn: &mut Connection<S>, args: &[Arg]) -> Result<Value> {
        if !self.shape.accepts(args.len()) {
            return Err(InvalidCommand::WrongArity {
                name: self.name.clone(),
                expected: self.shape.describe(),
                actual: args.len(),
            }
            .into());
        }
        let (fixed, rest) = args.split_at(self.shape.fixed);
        self.invoke(conn, fixed, rest)
    }
}

/// Free-function form of [`CommandDescriptor::invoke`]
pub fn invoke<S: Read + Write>(
    conn: &mut Connection<S>,
    descriptor: &CommandDescriptor,
    fixed: &[Arg],
    rest: &[Arg],
) -> Result<Value> {
    descriptor.invoke(conn, fixed, rest)
}
