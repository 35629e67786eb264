//! Shared helpers for modsync-core integration tests
//!
//! `FakeHost` is an in-memory `HostingApi`: every lookup that was not
//! configured answers `NotFound`. `LogCapture` collects formatted tracing
//! output so tests can assert on emitted log lines.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use modsync_core::host::{ContentFile, LicenseInfo, RepositoryLicense};
use modsync_core::{HostError, HostingApi, Lookup, Repository};

pub const OWNER: &str = "alice";

pub fn raw_url(repo: &str, path: &str) -> String {
    format!("https://raw.githubusercontent.com/{OWNER}/{repo}/main/{path}")
}

pub fn clone_url(repo: &str) -> String {
    format!("https://github.com/{OWNER}/{repo}.git")
}

#[derive(Default)]
pub struct FakeHost {
    repos: Vec<Repository>,
    contents: HashMap<(String, String), Lookup<ContentFile>>,
    licenses: HashMap<String, Lookup<RepositoryLicense>>,
    list_error: Option<HostError>,
    calls: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repo(mut self, name: &str) -> Self {
        self.repos.push(Repository::on_github(OWNER, name));
        self
    }

    /// A file that exists, with a raw.githubusercontent.com download URL
    pub fn file(mut self, repo: &str, path: &str) -> Self {
        let file = ContentFile {
            name: path.to_string(),
            path: path.to_string(),
            download_url: Some(raw_url(repo, path)),
        };
        self.contents
            .insert((repo.to_string(), path.to_string()), Lookup::Found(file));
        self
    }

    pub fn file_error(mut self, repo: &str, path: &str, err: HostError) -> Self {
        self.contents
            .insert((repo.to_string(), path.to_string()), Lookup::Failed(err));
        self
    }

    /// A module: the repository plus its module.prop
    pub fn module(self, name: &str) -> Self {
        self.repo(name).file(name, "module.prop")
    }

    pub fn license(mut self, repo: &str, spdx_id: &str) -> Self {
        let license = RepositoryLicense {
            license: Some(LicenseInfo {
                key: Some(spdx_id.to_lowercase()),
                name: Some(spdx_id.to_string()),
                spdx_id: Some(spdx_id.to_string()),
            }),
        };
        self.licenses
            .insert(repo.to_string(), Lookup::Found(license));
        self
    }

    pub fn license_error(mut self, repo: &str, err: HostError) -> Self {
        self.licenses.insert(repo.to_string(), Lookup::Failed(err));
        self
    }

    pub fn list_error(mut self, err: HostError) -> Self {
        self.list_error = Some(err);
        self
    }

    /// Lookups performed so far, as `repo:path` / `repo:license`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl HostingApi for FakeHost {
    async fn list_repositories(&self, _user: &str) -> Result<Vec<Repository>, HostError> {
        match &self.list_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.repos.clone()),
        }
    }

    async fn get_contents(&self, repo: &Repository, path: &str) -> Lookup<ContentFile> {
        self.record(format!("{}:{}", repo.name, path));
        self.contents
            .get(&(repo.name.clone(), path.to_string()))
            .cloned()
            .unwrap_or(Lookup::NotFound)
    }

    async fn get_license(&self, repo: &Repository) -> Lookup<RepositoryLicense> {
        self.record(format!("{}:license", repo.name));
        self.licenses
            .get(&repo.name)
            .cloned()
            .unwrap_or(Lookup::NotFound)
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Collects tracing output written while the guard from `install` is alive
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    /// Install as the thread's default subscriber
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.buffer.lock().unwrap())
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Lines logged at `level` ("ERROR", "WARN", "INFO")
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        let marker = format!(" {level} ");
        self.lines()
            .into_iter()
            .filter(|line| line.contains(&marker))
            .collect()
    }
}

/// Write `config/config.json` under `root`
pub fn write_config(root: &Path, content: &str) {
    std::fs::create_dir_all(root.join("config")).unwrap();
    std::fs::write(root.join("config/config.json"), content).unwrap();
}

/// Write `json/hosts.json` under `root`
pub fn write_hosts(root: &Path, content: &str) {
    std::fs::create_dir_all(root.join("json")).unwrap();
    std::fs::write(root.join("json/hosts.json"), content).unwrap();
}
