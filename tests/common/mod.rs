// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixtures shared by the integration tests.

use layercfg::adapters::{IniParser, SourceLayout};
use layercfg::domain::{ConfigMap, Format, Result};
use layercfg::ports::ConfigParser;
use layercfg::service::{ConfigContext, ConfigDocument};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// Key-file parser that counts how often it actually parses.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct CountingParser {
    inner: IniParser,
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl CountingParser {
    /// Creates a parser and a handle to its call counter.
    pub fn new() -> (Self, Arc<AtomicUsize>) {
        let parser = Self::default();
        let calls = Arc::clone(&parser.calls);
        (parser, calls)
    }
}

impl ConfigParser for CountingParser {
    fn parse(&self, content: &str) -> Result<ConfigMap> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.parse(content)
    }
}

/// A throwaway application root with a store directory inside it.
#[allow(dead_code)]
pub struct AppFixture {
    dir: TempDir,
}

#[allow(dead_code)]
impl AppFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn store(&self) -> PathBuf {
        self.root().join("var/store")
    }

    /// Writes `content` to `rel` under the root, creating directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Pins the mtime of `rel` to a fixed point plus `offset_secs`, so tests
    /// do not depend on filesystem timestamp granularity.
    pub fn set_mtime(&self, rel: &str, offset_secs: u64) {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + offset_secs);
        let file = fs::File::options()
            .write(true)
            .open(self.root().join(rel))
            .unwrap();
        file.set_modified(time).unwrap();
    }

    pub fn context(&self) -> ConfigContext {
        ConfigContext::new(SourceLayout::new(self.root()), self.store())
    }

    pub fn document(&self, format: Format) -> ConfigDocument {
        ConfigDocument::new(format, self.context()).unwrap()
    }

    /// A key-file document whose parses are counted.
    pub fn counting_document(&self) -> (ConfigDocument, Arc<AtomicUsize>) {
        let (parser, calls) = CountingParser::new();
        let doc = ConfigDocument::with_parser(Format::KeyFile, Arc::new(parser), self.context());
        (doc, calls)
    }
}
