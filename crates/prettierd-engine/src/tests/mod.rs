//! Crate-level integration and BDD tests.

use std::path::Path;

use prettierd_config::EnvSnapshot;

use crate::capability::Engine;
use crate::resolver::EngineResolver;
use crate::test_support::{EngineCall, ScriptedEngine, StaticLoader, StaticLocator};


#[test]
fn resolved_engine_answers_through_trait_object() {
    let engine = ScriptedEngine::new().formatting_to("formatted\n");
    let log = engine.call_log();
    let resolver = EngineResolver::new(
        StaticLocator::new(Some("/project/node_modules/prettier/index.cjs".into()), None),
        StaticLoader::with_engine(engine),
    );
    let env = EnvSnapshot::default();

    let resolved = resolver
        .resolve(&env, Path::new("/project"), Path::new("/project/src"))
        .expect("resolve")
        .expect("engine available");
    let output = resolved
        .engine()
        .format("raw", &crate::EngineOptions::new())
        .expect("format");

    assert_eq!(output, "formatted\n");
    assert!(matches!(
        log.borrow().as_slice(),
        [EngineCall::Format { text, .. }] if text == "raw"
    ));
}
