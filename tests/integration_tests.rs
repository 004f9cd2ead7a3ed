// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for loading documents through the parse cache.
//!
//! These tests run against real files in a temporary application root and
//! check the observable cache behavior: one parse per source revision, fresh
//! content after an edit, and silent recovery from broken cache artifacts.

mod common;

use common::AppFixture;
use layercfg::adapters::FsMtimeCache;
use layercfg::domain::{path_get, CacheKey, ConfigMap, ConfigValue, Format};
use layercfg::ports::SourceLocator;
use std::fs;
use std::sync::atomic::Ordering;

fn engine_key() -> CacheKey {
    CacheKey::new(None, "engine", "config")
}

#[test]
fn test_engine_source_scenario() {
    let app = AppFixture::new();
    app.write("config/engine.ini", "[db]\nhost=localhost\n");

    let mut doc = app.document(Format::KeyFile);
    assert!(doc.load_from(None, "engine", true));
    assert_eq!(
        doc.get_one("db/host", ConfigValue::Null),
        ConfigValue::from("localhost")
    );
}

#[test]
fn test_unchanged_source_parsed_once() {
    let app = AppFixture::new();
    app.write("config/engine.ini", "[db]\nhost=localhost\n");
    app.set_mtime("config/engine.ini", 0);

    let (mut first, calls) = app.counting_document();
    assert!(first.load_from(None, "engine", true));
    assert!(first.load_from(None, "engine", true));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // another document sharing the store also hits
    let (mut second, second_calls) = app.counting_document();
    assert!(second.load_from(None, "engine", true));
    assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    assert_eq!(first.as_map(), second.as_map());
}

#[test]
fn test_edited_source_is_reparsed() {
    let app = AppFixture::new();
    app.write("config/engine.ini", "name=old\n");
    app.set_mtime("config/engine.ini", 0);

    let (mut doc, calls) = app.counting_document();
    assert!(doc.load("engine"));
    assert_eq!(doc.get_one("name", ""), ConfigValue::from("old"));

    app.write("config/engine.ini", "name=new\n");
    app.set_mtime("config/engine.ini", 60);

    assert!(doc.load("engine"));
    assert_eq!(doc.get_one("name", ""), ConfigValue::from("new"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_cache_trusts_mtime_only() {
    let app = AppFixture::new();
    app.write("config/engine.ini", "name=old\n");
    app.set_mtime("config/engine.ini", 0);

    let mut doc = app.document(Format::KeyFile);
    assert!(doc.load("engine"));

    // same mtime, different content: the stored parse is still served
    app.write("config/engine.ini", "name=new\n");
    app.set_mtime("config/engine.ini", 0);

    let mut fresh = app.document(Format::KeyFile);
    assert!(fresh.load("engine"));
    assert_eq!(fresh.get_one("name", ""), ConfigValue::from("old"));
}

#[test]
fn test_uncached_load_touches_no_store() {
    let app = AppFixture::new();
    app.write("config/engine.ini", "name=x\n");

    let (mut doc, calls) = app.counting_document();
    assert!(doc.load_from(None, "engine", false));
    assert!(doc.load_from(None, "engine", false));

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(!app.store().exists());
}

#[test]
fn test_artifact_stamp_is_the_source_mtime() {
    let app = AppFixture::new();
    app.write("config/engine.ini", "name=x\n");
    app.set_mtime("config/engine.ini", 0);

    let mut doc = app.document(Format::KeyFile);
    assert!(doc.load("engine"));

    // a redeployed artifact with its own timestamp is still valid
    let artifact = FsMtimeCache::new(app.store()).artifact_path(&engine_key());
    assert!(artifact.is_file());
    let file = fs::File::options().write(true).open(&artifact).unwrap();
    file.set_modified(std::time::SystemTime::now()).unwrap();

    let (mut again, calls) = app.counting_document();
    assert!(again.load("engine"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_corrupt_artifact_falls_back_to_source() {
    let app = AppFixture::new();
    app.write("config/engine.ini", "name=x\n");
    app.set_mtime("config/engine.ini", 0);

    let artifact = FsMtimeCache::new(app.store()).artifact_path(&engine_key());
    fs::create_dir_all(artifact.parent().unwrap()).unwrap();
    fs::write(&artifact, "{\"mtime\": ").unwrap();

    let (mut doc, calls) = app.counting_document();
    assert!(doc.load("engine"));
    assert_eq!(doc.get_one("name", ""), ConfigValue::from("x"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // the rewrite repaired the artifact
    let (mut again, again_calls) = app.counting_document();
    assert!(again.load("engine"));
    assert_eq!(again_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unwritable_store_still_loads() {
    let app = AppFixture::new();
    app.write("config/engine.ini", "name=x\n");
    // the store path is a file, so no artifact can be created
    app.write("var/store", "");

    let mut doc = app.document(Format::KeyFile);
    assert!(doc.load("engine"));
    assert_eq!(doc.get_one("name", ""), ConfigValue::from("x"));
}

#[test]
fn test_package_and_app_sources_cached_apart() {
    let app = AppFixture::new();
    app.write("config/conf.ini", "owner=app\n");
    app.write("vendor/acme/mailer/config/conf.ini", "owner=mailer\n");

    let mut app_doc = app.document(Format::KeyFile);
    assert!(app_doc.load_from(None, "conf", true));
    let mut pkg_doc = app.document(Format::KeyFile);
    assert!(pkg_doc.load_from(Some("acme/mailer"), "conf", true));

    assert_eq!(app_doc.get_one("owner", ""), ConfigValue::from("app"));
    assert_eq!(pkg_doc.get_one("owner", ""), ConfigValue::from("mailer"));
    assert!(app.store().join("acme-mailer-config/conf.json").is_file());
    assert!(app.store().join("app-config/conf.json").is_file());
}

#[test]
fn test_readable_identifier_bypasses_convention() {
    let app = AppFixture::new();
    let literal = app.write("elsewhere/special.ini", "name=literal\n");
    app.write("vendor/any/pkg/config/special.ini", "name=package\n");
    let literal = literal.to_str().unwrap();

    let resolved = app
        .context()
        .locator()
        .locate(literal, Some("any/pkg"), Format::KeyFile)
        .unwrap();
    assert_eq!(resolved.path(), std::path::Path::new(literal));

    let mut doc = app.document(Format::KeyFile);
    assert!(doc.load_from(Some("any/pkg"), literal, true));
    assert_eq!(doc.get_one("name", ""), ConfigValue::from("literal"));
}

#[test]
fn test_missing_and_malformed_are_distinguishable() {
    let app = AppFixture::new();
    app.write("config/broken.ini", "[db\n");

    let mut doc = app.document(Format::KeyFile);
    let missing = doc.try_load_from(None, "absent", true).unwrap_err();
    let broken = doc.try_load_from(None, "broken", true).unwrap_err();

    assert!(missing.is_not_found() && !missing.is_parse_failure());
    assert!(broken.is_parse_failure() && !broken.is_not_found());
    assert!(!doc.load("broken"));
    assert!(doc.as_map().is_empty());
}

#[test]
fn test_overwrite_merge_replaces_subtrees() {
    let app = AppFixture::new();
    app.write("config/a.ini", "a=1\n[b]\nx=1\n");
    app.write("config/b.ini", "[b]\ny=2\n");

    let mut doc = app.document(Format::KeyFile);
    assert!(doc.load("a"));
    assert!(doc.load("b"));

    let mut b = ConfigMap::new();
    b.insert("y".to_string(), ConfigValue::from("2"));
    let mut expected = ConfigMap::new();
    expected.insert("a".to_string(), ConfigValue::from("1"));
    expected.insert("b".to_string(), ConfigValue::Map(b));
    assert_eq!(doc.as_map(), &expected);
}

#[test]
fn test_required_path_semantics() {
    let mut map = ConfigMap::new();
    map.insert("a".to_string(), ConfigValue::Map(ConfigMap::new()));

    assert_eq!(
        path_get(&map, "a/b", ConfigValue::from(7), true),
        ConfigValue::Null
    );
    assert_eq!(
        path_get(&map, "a/b", ConfigValue::from(7), false),
        ConfigValue::from(7)
    );
}

#[test]
fn test_scalar_with_remainder_is_missing() {
    let app = AppFixture::new();
    app.write("config/engine.ini", "name=x\n");

    let mut doc = app.document(Format::KeyFile);
    assert!(doc.load("engine"));
    assert_eq!(doc.get_one("name/first", "none"), ConfigValue::from("none"));
    assert_eq!(doc.lookup("name/first"), None);
}

#[test]
fn test_env_documents_cache_separately() {
    let app = AppFixture::new();
    app.write(".env", "APP_ENV=prod\n");

    let mut env = app.document(Format::Env);
    assert!(env.load(".env"));
    assert_eq!(env.get_one("APP_ENV", ""), ConfigValue::from("prod"));
    assert!(app.store().join("app-env/.env.json").is_file());
}
