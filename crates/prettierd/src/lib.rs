//! Request core for the prettierd formatting daemon.
//!
//! One request carries a raw argument vector, an environment overlay, a
//! working directory and a text buffer. The core parses the arguments,
//! resolves a formatting engine for the target file, checks the ignore file,
//! discovers configuration, merges it with the command line options and
//! either formats or checks the buffer.
//!
//! The modules mirror that pipeline:
//!
//! - [`args`] splits the argument vector into flags, the target file and
//!   pass-through option tokens.
//! - [`options`] decodes pass-through tokens into typed values.
//! - [`discovery`] finds the configuration that applies to the target.
//! - [`precedence`] merges command line options with discovered
//!   configuration.
//! - [`execution`] runs a parsed request against a resolved engine.
//! - [`invocation`] accepts both client call shapes and reports through a
//!   completion callback.
//!
//! Engine resolution itself lives in [`prettierd_engine`].

pub mod args;
pub mod cli;
pub mod discovery;
pub mod errors;
pub mod execution;
pub mod invocation;
pub mod options;
pub mod precedence;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use self::args::{ParsedArguments, Task, TokenizedArguments, tokenize};
pub use self::discovery::resolve_file_config;
pub use self::errors::{RequestError, UsageError};
pub use self::execution::{FILEPATH_KEY, RequestContext, run};
pub use self::invocation::{Invocation, InvocationAdapter, InvocationShape, RequestPayload};
pub use self::options::{CliOptions, ConfigPrecedence, ConfigSource, OptionValue, decode_tokens};
pub use self::precedence::merge;
