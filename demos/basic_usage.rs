// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for layercfg.
//!
//! This example demonstrates:
//! - Laying out an application with a config directory and `.env` files
//! - Building the main key-file document and the env document
//! - Reading values by slash path, with defaults and typed conversions
//! - Loading optional per-package configuration
//! - Memoizing a computed manifest as a compiled artifact
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage
//! ```

use layercfg::prelude::*;
use std::fs;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== layercfg: Basic Usage ===\n");

    let app = std::env::temp_dir().join(format!("layercfg-demo-{}", std::process::id()));
    fs::create_dir_all(app.join("config"))?;
    fs::create_dir_all(app.join("vendor/acme/mailer/config"))?;
    fs::write(
        app.join("config/engine.ini"),
        "name = \"Demo\"\ndebug = on\n\n[db]\nhost = localhost\nport = 5432\n",
    )?;
    fs::write(
        app.join("vendor/acme/mailer/config/conf.ini"),
        "from = noreply@example.com\n",
    )?;
    fs::write(app.join(".env"), "APP_ENV=prod\nAPP_SECRET=abc\n")?;
    fs::write(app.join(".env.local"), "APP_ENV=dev\n")?;

    let context = ConfigContext::new(SourceLayout::new(&app), app.join("var/store"));
    let registry = ConfigRegistry::new(context);

    // Example 1: the main key-file document
    println!("--- Example 1: Main Config ---");
    registry.build(Format::KeyFile, "engine", false, true)?;
    println!("name  = {}", registry.get(Format::KeyFile, "name", ""));
    println!("host  = {}", registry.get(Format::KeyFile, "db/host", "127.0.0.1"));
    let port = registry.get(Format::KeyFile, "db/port", 0).as_u64("db/port")?;
    println!("port  = {} (as u64)", port);
    let debug = registry.get(Format::KeyFile, "debug", false).as_bool("debug")?;
    println!("debug = {} (as bool)", debug);
    println!("user  = {} (default)", registry.get(Format::KeyFile, "db/user", "root"));

    // Example 2: the environment document
    println!("\n--- Example 2: Environment ---");
    let env = registry.build_env()?;
    println!("APP_ENV    = {}", env.get_one("APP_ENV", ""));
    println!("APP_SECRET = {}", env.get_one("APP_SECRET", ""));

    // Example 3: optional package configuration
    println!("\n--- Example 3: Package Config ---");
    for package in ["acme/mailer", "acme/missing"] {
        match registry.build_from(Format::KeyFile, Some(package), "conf", true, true)? {
            Some(doc) => println!("{}: from = {}", package, doc.get_one("from", "")),
            None => println!("{}: no configuration", package),
        }
    }

    // Example 4: compiled artifacts
    println!("\n--- Example 4: Compiled Artifacts ---");
    if let Some(compiler) = registry.compiler() {
        let libraries = compiler.get_or_compile("app-libraries", || {
            println!("computing manifest...");
            Ok(ConfigValue::List(vec![
                ConfigValue::from("core"),
                ConfigValue::from("mailer"),
            ]))
        })?;
        println!("libraries = {}", libraries);
        let again = compiler.get_or_compile("app-libraries", || Ok(ConfigValue::Null))?;
        println!("second read (no compute) = {}", again);
    }

    fs::remove_dir_all(&app)?;
    println!("\n=== Example Complete ===");
    Ok(())
}
