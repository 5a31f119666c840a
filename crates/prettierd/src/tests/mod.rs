//! Crate-level integration and BDD tests.

use std::path::PathBuf;

use prettierd_engine::EngineResolver;
use prettierd_engine::test_support::{EngineCall, ScriptedEngine, StaticLoader, StaticLocator};
use serde_json::json;

use crate::invocation::{Invocation, InvocationAdapter};

mod behaviour;

#[test]
fn client_environment_reaches_the_resolver() {
    let engine = ScriptedEngine::new();
    let log = engine.call_log();
    let adapter = InvocationAdapter::new(EngineResolver::new(
        StaticLocator::new(None, Some(PathBuf::from("/global/prettier/index.cjs"))),
        StaticLoader::with_engine(engine),
    ))
    .with_base_env([("PRETTIERD_LOCAL_PRETTIER_ONLY", "1")]);

    let invocation = Invocation {
        cwd: PathBuf::from("/project"),
        args: vec![String::from("a.js")],
        client_env: [(String::from("PRETTIERD_LOCAL_PRETTIER_ONLY"), None)]
            .into_iter()
            .collect(),
        text: String::from("a"),
    };
    let mut outcome = None;
    adapter.invoke(invocation, |result| outcome = Some(result));

    let output = outcome.expect("callback fired").expect("request succeeds");
    assert_eq!(output, "a");
    assert!(
        log.borrow()
            .iter()
            .any(|call| matches!(call, EngineCall::Format { .. })),
        "the global engine should format once local-only mode is cleared"
    );
}

#[test]
fn malformed_calls_are_reported_through_the_callback() {
    let adapter = InvocationAdapter::new(EngineResolver::new(
        StaticLocator::new(None, None),
        StaticLoader::empty(),
    ))
    .with_base_env(Vec::<(String, String)>::new());

    let mut outcome = None;
    adapter.invoke_json("/project", json!({ "argv": [] }), "a", |result| {
        outcome = Some(result);
    });

    let error = outcome.expect("callback fired").expect_err("call is malformed");
    assert_eq!(error.exit_status(), 2);
    assert!(adapter.resolver().locator().calls().is_empty());
}
