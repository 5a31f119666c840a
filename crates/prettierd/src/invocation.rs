//! Boundary adapter for callers outside the request core.
//!
//! Clients send either a flat `{ "args": [...], "clientEnv": {...} }` object
//! or a two-element `[extraArg, { ... }]` tuple whose leading token is
//! prepended to `args`. Both shapes are decoded once into a [`RequestPayload`]
//! and the adapter reports the outcome through a single completion callback.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use prettierd_config::EnvSnapshot;
use prettierd_engine::{EngineLoader, EngineResolver, ModuleLocator};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::RequestError;
use crate::execution::{self, RequestContext};

const INVOCATION_TARGET: &str = "prettierd::invocation";

/// Canonical request payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPayload {
    /// Raw argument vector.
    pub args: Vec<String>,
    /// Client environment overlay; `null` removes a variable.
    #[serde(rename = "clientEnv", default)]
    pub client_env: BTreeMap<String, Option<String>>,
}

/// The two accepted call shapes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum InvocationShape {
    /// `[extraArg, payload]`.
    Prefixed(String, RequestPayload),
    /// A bare payload object.
    Flat(RequestPayload),
}

impl InvocationShape {
    /// Normalises either shape into a payload.
    #[must_use]
    pub fn into_payload(self) -> RequestPayload {
        match self {
            Self::Prefixed(extra, mut payload) => {
                payload.args.insert(0, extra);
                payload
            }
            Self::Flat(payload) => payload,
        }
    }
}

/// One request as seen by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Request working directory.
    pub cwd: PathBuf,
    /// Raw argument vector.
    pub args: Vec<String>,
    /// Client environment overlay.
    pub client_env: BTreeMap<String, Option<String>>,
    /// Text buffer to format or check.
    pub text: String,
}

impl Invocation {
    /// Builds an invocation from a decoded payload.
    #[must_use]
    pub fn from_payload(
        cwd: impl Into<PathBuf>,
        payload: RequestPayload,
        text: impl Into<String>,
    ) -> Self {
        Self {
            cwd: cwd.into(),
            args: payload.args,
            client_env: payload.client_env,
            text: text.into(),
        }
    }
}

/// Drives requests through an engine resolver.
#[derive(Debug)]
pub struct InvocationAdapter<L, D> {
    resolver: EngineResolver<L, D>,
    base_env: Option<BTreeMap<String, String>>,
}

impl<L, D> InvocationAdapter<L, D> {
    /// Creates an adapter that snapshots the process environment per request.
    #[must_use]
    pub const fn new(resolver: EngineResolver<L, D>) -> Self {
        Self {
            resolver,
            base_env: None,
        }
    }

    /// Uses `base` in place of the process environment.
    #[must_use]
    pub fn with_base_env<I, K, V>(mut self, base: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.base_env = Some(
            base.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    /// The resolver requests run through.
    #[must_use]
    pub const fn resolver(&self) -> &EngineResolver<L, D> {
        &self.resolver
    }

    fn snapshot(&self, client_env: BTreeMap<String, Option<String>>) -> EnvSnapshot {
        match &self.base_env {
            Some(base) => EnvSnapshot::layered(base.clone(), client_env),
            None => EnvSnapshot::capture(client_env),
        }
    }
}

impl<L: ModuleLocator, D: EngineLoader> InvocationAdapter<L, D> {
    /// Runs one request and reports its outcome to `on_complete`.
    pub fn invoke<F>(&self, invocation: Invocation, on_complete: F)
    where
        F: FnOnce(Result<String, RequestError>),
    {
        let Invocation {
            cwd,
            args,
            client_env,
            text,
        } = invocation;
        let env = self.snapshot(client_env);
        let context = RequestContext {
            cwd: &cwd,
            args: &args,
            env: &env,
            text: &text,
        };

        let outcome = execution::run(&self.resolver, &context);
        debug!(
            target: INVOCATION_TARGET,
            succeeded = outcome.is_ok(),
            "request finished"
        );
        on_complete(outcome);
    }

    /// Decodes a JSON call shape and runs it.
    ///
    /// A payload matching neither shape is reported as
    /// [`RequestError::MalformedInvocation`].
    pub fn invoke_json<F>(
        &self,
        cwd: impl Into<PathBuf>,
        call: serde_json::Value,
        text: impl Into<String>,
        on_complete: F,
    ) where
        F: FnOnce(Result<String, RequestError>),
    {
        match serde_json::from_value::<InvocationShape>(call) {
            Ok(shape) => {
                let invocation = Invocation::from_payload(cwd, shape.into_payload(), text);
                self.invoke(invocation, on_complete);
            }
            Err(error) => on_complete(Err(RequestError::MalformedInvocation(Arc::new(error)))),
        }
    }
}
