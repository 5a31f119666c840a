//! Behaviour-driven tests for end-to-end request execution.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use prettierd_config::LOCAL_ENGINE_ONLY_VAR;
use prettierd_engine::test_support::{
    CallLog, EngineCall, LocateCall, ScriptedEngine, StaticLoader, StaticLocator,
};
use prettierd_engine::{ConfigQuery, EngineOptions, EngineResolver};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

use crate::errors::RequestError;
use crate::invocation::{Invocation, InvocationAdapter};

const LOCAL_ENTRY: &str = "/project/node_modules/prettier/index.cjs";
const INPUT: &str = "const a=1";
const FORMATTED: &str = "const a = 1;\n";

// ---------------------------------------------------------------------------
// Test world
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TestWorld {
    installed: bool,
    local_only: bool,
    discovered: Option<EngineOptions>,
    ignored: bool,
    already_formatted: bool,
    calls: Option<CallLog>,
    lookups: Vec<LocateCall>,
    result: Option<Result<String, RequestError>>,
    completions: usize,
}

impl TestWorld {
    fn adapter(&mut self) -> InvocationAdapter<StaticLocator, StaticLoader> {
        let mut engine = ScriptedEngine::new()
            .formatting_to(FORMATTED)
            .reporting_formatted(self.already_formatted);
        if let Some(discovered) = self.discovered.clone() {
            engine = engine.with_discovered(discovered);
        }
        if self.ignored {
            engine = engine.ignoring();
        }
        self.calls = Some(engine.call_log());

        let local = self.installed.then(|| PathBuf::from(LOCAL_ENTRY));
        let base_env: Vec<(&str, &str)> = if self.local_only {
            vec![(LOCAL_ENGINE_ONLY_VAR, "1")]
        } else {
            Vec::new()
        };
        InvocationAdapter::new(EngineResolver::new(
            StaticLocator::new(local, None),
            StaticLoader::with_engine(engine),
        ))
        .with_base_env(base_env)
    }

    fn record(&mut self, result: Result<String, RequestError>) {
        self.completions += 1;
        self.result = Some(result);
    }

    fn output(&self) -> &str {
        self.result
            .as_ref()
            .expect("no request ran")
            .as_ref()
            .expect("expected the request to succeed")
    }

    fn error(&self) -> &RequestError {
        self.result
            .as_ref()
            .expect("no request ran")
            .as_ref()
            .expect_err("expected the request to fail")
    }

    fn engine_calls(&self) -> Vec<EngineCall> {
        self.calls
            .as_ref()
            .map(|log| log.borrow().clone())
            .unwrap_or_default()
    }

    fn dispatched_options(&self) -> EngineOptions {
        self.engine_calls()
            .into_iter()
            .rev()
            .find_map(|call| match call {
                EngineCall::Format { options, .. } | EngineCall::Check { options, .. } => {
                    Some(options)
                }
                EngineCall::ResolveConfig { .. } | EngineCall::FileInfo { .. } => None,
            })
            .expect("the engine was never asked to format or check")
    }
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

fn literal(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

// ---------------------------------------------------------------------------
// Given steps
// ---------------------------------------------------------------------------

#[given("an engine is installed for the project")]
fn given_engine_installed(world: &RefCell<TestWorld>) {
    world.borrow_mut().installed = true;
}

#[given("no engine is installed and local-only mode is set")]
fn given_no_engine(world: &RefCell<TestWorld>) {
    let mut w = world.borrow_mut();
    w.installed = false;
    w.local_only = true;
}

#[given("the project configuration sets {key} to {value}")]
fn given_discovered_option(world: &RefCell<TestWorld>, key: String, value: String) {
    world
        .borrow_mut()
        .discovered
        .get_or_insert_with(EngineOptions::new)
        .insert(key.trim_matches('"').to_owned(), literal(&value));
}

#[given("the ignore file excludes the target")]
fn given_ignored(world: &RefCell<TestWorld>) {
    world.borrow_mut().ignored = true;
}

#[given("the text is already formatted")]
fn given_already_formatted(world: &RefCell<TestWorld>) {
    world.borrow_mut().already_formatted = true;
}

// ---------------------------------------------------------------------------
// When steps
// ---------------------------------------------------------------------------

#[when("the request {args} runs")]
fn when_request_runs(world: &RefCell<TestWorld>, args: String) {
    let mut w = world.borrow_mut();
    let adapter = w.adapter();
    let invocation = Invocation {
        cwd: PathBuf::from("/project"),
        args: args
            .trim_matches('"')
            .split_whitespace()
            .map(String::from)
            .collect(),
        client_env: Default::default(),
        text: String::from(INPUT),
    };
    adapter.invoke(invocation, |result| w.record(result));
    w.lookups = adapter.resolver().locator().calls();
}

#[when("the tuple call with {token} and {args} runs")]
fn when_tuple_call_runs(world: &RefCell<TestWorld>, token: String, args: String) {
    let mut w = world.borrow_mut();
    let adapter = w.adapter();
    let tokens: Vec<&str> = args.trim_matches('"').split_whitespace().collect();
    let call = json!([token.trim_matches('"'), { "args": tokens }]);
    adapter.invoke_json("/project", call, INPUT, |result| w.record(result));
    w.lookups = adapter.resolver().locator().calls();
}

// ---------------------------------------------------------------------------
// Then steps
// ---------------------------------------------------------------------------

#[then("the output is the formatted text")]
fn then_formatted(world: &RefCell<TestWorld>) {
    assert_eq!(world.borrow().output(), FORMATTED);
}

#[then("the output is the input unchanged")]
fn then_unchanged(world: &RefCell<TestWorld>) {
    assert_eq!(world.borrow().output(), INPUT);
}

#[then("the output is empty")]
fn then_empty(world: &RefCell<TestWorld>) {
    assert_eq!(world.borrow().output(), "");
}

#[then("the request fails as invalid formatting for {path}")]
fn then_invalid_formatting(world: &RefCell<TestWorld>, path: String) {
    let w = world.borrow();
    match w.error() {
        RequestError::InvalidFormatting { path: reported } => {
            assert_eq!(reported, Path::new(path.trim_matches('"')));
        }
        other => panic!("expected InvalidFormatting, got: {other}"),
    }
}

#[then("the request fails with a usage error")]
fn then_usage_error(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    let error = w.error();
    assert!(
        matches!(error, RequestError::Usage(_)),
        "expected a usage error, got: {error}"
    );
}

#[then("the engine received option {key} as {value}")]
fn then_received_option(world: &RefCell<TestWorld>, key: String, value: String) {
    let options = world.borrow().dispatched_options();
    assert_eq!(options.get(key.trim_matches('"')), Some(&literal(&value)));
}

#[then("the engine did not receive option {key}")]
fn then_did_not_receive(world: &RefCell<TestWorld>, key: String) {
    let options = world.borrow().dispatched_options();
    assert!(
        !options.contains_key(key.trim_matches('"')),
        "unexpected option in {options:?}"
    );
}

#[then("the ignore file consulted was {path}")]
fn then_ignore_file(world: &RefCell<TestWorld>, path: String) {
    let calls = world.borrow().engine_calls();
    let consulted: Vec<&Path> = calls
        .iter()
        .filter_map(|call| match call {
            EngineCall::FileInfo { query, .. } => Some(query.ignore_path.as_path()),
            _ => None,
        })
        .collect();
    assert_eq!(consulted, [Path::new(path.trim_matches('"'))]);
}

#[then("configuration was resolved with editorconfig {enabled}")]
fn then_editorconfig(world: &RefCell<TestWorld>, enabled: bool) {
    let calls = world.borrow().engine_calls();
    let queries: Vec<&ConfigQuery> = calls
        .iter()
        .filter_map(|call| match call {
            EngineCall::ResolveConfig { query, .. } => Some(query),
            _ => None,
        })
        .collect();
    assert_eq!(queries, [&ConfigQuery::uncached(None, enabled)]);
}

#[then("configuration was not resolved")]
fn then_config_not_resolved(world: &RefCell<TestWorld>) {
    let calls = world.borrow().engine_calls();
    assert!(
        !calls
            .iter()
            .any(|call| matches!(call, EngineCall::ResolveConfig { .. })),
        "unexpected discovery: {calls:?}"
    );
}

#[then("no engine lookup was attempted")]
fn then_no_lookup(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(w.lookups.is_empty(), "unexpected lookups: {:?}", w.lookups);
    assert!(w.engine_calls().is_empty());
}

#[then("the completion callback fired once")]
fn then_fired_once(world: &RefCell<TestWorld>) {
    assert_eq!(world.borrow().completions, 1);
}

// ---------------------------------------------------------------------------
// Scenario registration
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/request_execution.feature",
    name = "Command line options reach the engine with the file path"
)]
fn options_reach_engine(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/request_execution.feature",
    name = "Command line options override discovered configuration by default"
)]
fn cli_overrides_by_default(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/request_execution.feature",
    name = "Discovered configuration wins under file-override"
)]
fn file_override_wins(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/request_execution.feature",
    name = "Prefer-file ignores command line options when configuration exists"
)]
fn prefer_file_ignores_cli(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/request_execution.feature",
    name = "Disabling configuration skips discovery"
)]
fn no_config_skips_discovery(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/request_execution.feature",
    name = "A passing check produces no output"
)]
fn passing_check(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/request_execution.feature",
    name = "A failing check names the file"
)]
fn failing_check(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/request_execution.feature",
    name = "Without an engine the input is returned unchanged"
)]
fn missing_engine_passthrough(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/request_execution.feature",
    name = "Ignored files are returned unchanged"
)]
fn ignored_file_passthrough(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/request_execution.feature",
    name = "A missing file is rejected before any lookup"
)]
fn missing_file_rejected(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/request_execution.feature",
    name = "Tuple calls prepend their leading token"
)]
fn tuple_call(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/request_execution.feature",
    name = "The default ignore file is consulted from the working directory"
)]
fn default_ignore_file(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/request_execution.feature",
    name = "A custom ignore file is resolved against the working directory"
)]
fn custom_ignore_file(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/request_execution.feature",
    name = "Editorconfig support can be turned off"
)]
fn editorconfig_disabled(world: RefCell<TestWorld>) {
    let _ = world;
}
