//! Command Module
//!
//! Declarative command definitions.
//!
//! ## Flow
//! ```text
//! registry lookup -> arity check -> encode -> send -> decode one reply -> transform
//! ```
//!
//! Commands are rows in a table rather than hand-written call sites; adding
//! one is a single [`define`] call passed to [`CommandRegistry::register`].

mod descriptor;
mod registry;
mod transform;

pub use descriptor::{define, invoke, CommandDescriptor, ParamShape};
pub use registry::CommandRegistry;
pub use transform::{identity, int_to_bool, split_keys, status_ok, to_float, to_set};
pub use transform::{ReplyTransform, Value};
