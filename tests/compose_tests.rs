//! Integration tests for the composition root: determinism, disable
//! propagation, cross-component signals, and the emission-order contract.

mod common;

use common::{bare_composer, entries_named, entry, full_composer, rule_id};
use flatkit::{Composer, GlobPattern, RootOptions, Severity, StaticProbe};
use std::sync::Arc;

#[tokio::test]
async fn identical_inputs_produce_byte_identical_output() {
    let options = RootOptions::parse_json(
        r#"{"test": {"enforceMaxAssertions": 3}, "overrides": {"eqeqeq": "off"}}"#,
    )
    .unwrap();

    let composer = full_composer();
    let first = composer.compose(options.clone()).await.unwrap();
    let second = composer.compose(options).await.unwrap();

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[tokio::test]
async fn global_ignores_entry_comes_first() {
    let mut options = RootOptions::default();
    options.ignores.push(GlobPattern::new("**/generated/**"));

    let entries = bare_composer().compose(options).await.unwrap();
    assert_eq!(entries[0].name.as_deref(), Some("flatkit/ignores"));
    assert!(entries[0].rules.is_empty());
    assert!(
        entries[0]
            .ignores
            .iter()
            .any(|p| p.as_str() == "**/generated/**")
    );
    assert!(
        entries[0]
            .ignores
            .iter()
            .any(|p| p.as_str() == "**/node_modules/**")
    );
}

#[tokio::test]
async fn markdown_component_unignores_markup_category() {
    let entries = bare_composer().compose(RootOptions::default()).await.unwrap();
    // Markdown is enabled by default and opts markup ignores back out
    assert!(
        !entries[0]
            .ignores
            .iter()
            .any(|p| p.as_str().contains("CHANGELOG"))
    );

    let options = RootOptions::parse_json(r#"{"markdown": false}"#).unwrap();
    let entries = bare_composer().compose(options).await.unwrap();
    assert!(
        entries[0]
            .ignores
            .iter()
            .any(|p| p.as_str().contains("CHANGELOG"))
    );
}

#[tokio::test]
async fn disabled_component_emits_no_fragments() {
    let options = RootOptions::parse_json(r#"{"yaml": false}"#).unwrap();
    let entries = bare_composer().compose(options).await.unwrap();
    assert_eq!(entries_named(&entries, "flatkit/yaml"), 0);
}

#[tokio::test]
async fn typescript_detection_follows_probe() {
    let absent = bare_composer().compose(RootOptions::default()).await.unwrap();
    assert_eq!(entries_named(&absent, "flatkit/typescript"), 0);

    let present = full_composer().compose(RootOptions::default()).await.unwrap();
    assert_eq!(entries_named(&present, "flatkit/typescript"), 1);
}

#[tokio::test]
async fn explicit_disable_beats_detection() {
    let options = RootOptions::parse_json(r#"{"typescript": false}"#).unwrap();
    let entries = full_composer().compose(options).await.unwrap();
    assert_eq!(entries_named(&entries, "flatkit/typescript"), 0);
}

#[tokio::test]
async fn vue_without_package_contributes_nothing() {
    // Even explicitly enabled: the installed package is a hard prerequisite
    let options = RootOptions::parse_json(r#"{"vue": true}"#).unwrap();
    let entries = bare_composer().compose(options).await.unwrap();
    assert_eq!(entries_named(&entries, "flatkit/vue"), 0);
}

#[tokio::test]
async fn vue_reads_typescript_enabled_state() {
    let entries = full_composer().compose(RootOptions::default()).await.unwrap();
    let vue = entry(&entries, "flatkit/vue/rules");
    assert!(vue.rules.contains_key(&rule_id("vue/block-lang")));

    let ts_off = RootOptions::parse_json(r#"{"typescript": false}"#).unwrap();
    let entries = full_composer().compose(ts_off).await.unwrap();
    let vue = entry(&entries, "flatkit/vue/rules");
    assert!(!vue.rules.contains_key(&rule_id("vue/block-lang")));
}

#[tokio::test]
async fn vue_major_version_gates_catalog_rules() {
    let vue2 = Composer::new(Arc::new(
        StaticProbe::empty().with_package("vue", "2.7.16"),
    ));
    let entries = vue2.compose(RootOptions::default()).await.unwrap();
    let vue = entry(&entries, "flatkit/vue/rules");
    assert!(vue.rules.contains_key(&rule_id("vue/require-v-for-key")));
    assert!(!vue.rules.contains_key(&rule_id("vue/prefer-import-from-vue")));

    let entries = full_composer().compose(RootOptions::default()).await.unwrap();
    let vue = entry(&entries, "flatkit/vue/rules");
    assert!(vue.rules.contains_key(&rule_id("vue/prefer-import-from-vue")));
}

#[tokio::test]
async fn typescript_type_aware_layer_requires_tsconfig() {
    let entries = full_composer().compose(RootOptions::default()).await.unwrap();
    let ts = entry(&entries, "flatkit/typescript/rules");
    assert!(!ts.rules.contains_key(&rule_id("ts/no-floating-promises")));

    let options =
        RootOptions::parse_json(r#"{"typescript": {"tsconfigPath": "tsconfig.json"}}"#).unwrap();
    let entries = full_composer().compose(options).await.unwrap();
    let ts = entry(&entries, "flatkit/typescript/rules");
    assert!(ts.rules.contains_key(&rule_id("ts/no-floating-promises")));
    let parser_options = ts.language_options.as_ref().unwrap();
    assert_eq!(
        parser_options["parserOptions"]["project"],
        serde_json::json!("tsconfig.json")
    );
}

#[tokio::test]
async fn fragment_order_encodes_rule_precedence() {
    let entries = full_composer().compose(RootOptions::default()).await.unwrap();

    // The last matching entry that declares a rule wins in the external
    // linter's merge; assert on that directly for a test file.
    let path = "src/demo/foo.test.ts";
    let last_no_console = entries
        .iter()
        .filter(|e| e.matches(path) && e.rules.contains_key(&rule_id("no-console")))
        .next_back()
        .expect("no entry declares no-console for the path");

    // javascript warns on console; the test component relaxes it for test
    // files, and runs later.
    assert_eq!(last_no_console.name.as_deref(), Some("flatkit/test/rules"));
    assert_eq!(
        last_no_console.rules[&rule_id("no-console")].severity,
        Severity::Off
    );
}

#[tokio::test]
async fn markdown_embedded_blocks_relax_script_rules() {
    let entries = bare_composer().compose(RootOptions::default()).await.unwrap();

    let path = "docs/guide.md/0.js";
    let last_no_undef = entries
        .iter()
        .filter(|e| e.matches(path) && e.rules.contains_key(&rule_id("no-undef")))
        .next_back()
        .unwrap();
    assert_eq!(
        last_no_undef.name.as_deref(),
        Some("flatkit/markdown/disables")
    );
    assert_eq!(
        last_no_undef.rules[&rule_id("no-undef")].severity,
        Severity::Off
    );
}

#[tokio::test]
async fn emission_order_is_pipeline_order() {
    let entries = full_composer().compose(RootOptions::default()).await.unwrap();
    let names: Vec<&str> = entries.iter().filter_map(|e| e.name.as_deref()).collect();

    let position = |name: &str| {
        names
            .iter()
            .position(|n| *n == name)
            .unwrap_or_else(|| panic!("missing entry '{name}'"))
    };

    assert_eq!(position("flatkit/ignores"), 0);
    assert!(position("flatkit/javascript/rules") < position("flatkit/typescript/rules"));
    assert!(position("flatkit/typescript/rules") < position("flatkit/vue/rules"));
    assert!(position("flatkit/vue/rules") < position("flatkit/test/rules"));
    assert!(position("flatkit/markdown/processor") < position("flatkit/markdown/disables"));
}

#[tokio::test]
async fn global_overrides_entry_is_last() {
    let options = RootOptions::parse_json(r#"{"overrides": {"eqeqeq": "off"}}"#).unwrap();
    let entries = full_composer().compose(options).await.unwrap();

    let last = entries.last().unwrap();
    assert_eq!(last.name.as_deref(), Some("flatkit/overrides"));
    assert!(last.files.is_empty());
    assert_eq!(last.rules[&rule_id("eqeqeq")].severity, Severity::Off);

    // Every matching path sees the override as the final word
    assert!(last.matches("src/index.ts"));
}
