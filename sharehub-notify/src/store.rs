//! Document store boundary: the shared hub and push registrations.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use sharehub_core::{Hub, Registrations};

pub trait HubStore: Send + Sync {
    /// `None` when no hub document has been written yet.
    fn load_hub(&self) -> Result<Option<Hub>>;
    fn save_hub(&self, hub: &Hub) -> Result<()>;
}

pub trait RegistrationStore: Send + Sync {
    fn load_registrations(&self) -> Result<Registrations>;
    fn register(&self, recipient: &str, token: &str) -> Result<()>;
    /// Returns whether a registration was removed.
    fn remove_registration(&self, recipient: &str) -> Result<bool>;
}

/// Both documents as pretty JSON files in one directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn hub_path(&self) -> PathBuf {
        self.dir.join("hub.json")
    }

    pub fn registrations_path(&self) -> PathBuf {
        self.dir.join("registrations.json")
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let v = serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
        Ok(Some(v))
    }

    /// Write to a sibling temp file, then rename over the target.
    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| format!("create {}", self.dir.display()))?;
        let json = serde_json::to_string_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| format!("replace {}", path.display()))?;
        Ok(())
    }
}

impl HubStore for JsonFileStore {
    fn load_hub(&self) -> Result<Option<Hub>> {
        Self::read_json(&self.hub_path())
    }

    fn save_hub(&self, hub: &Hub) -> Result<()> {
        self.write_json(&self.hub_path(), hub)
    }
}

impl RegistrationStore for JsonFileStore {
    fn load_registrations(&self) -> Result<Registrations> {
        Ok(Self::read_json(&self.registrations_path())?.unwrap_or_default())
    }

    fn register(&self, recipient: &str, token: &str) -> Result<()> {
        let mut regs = self.load_registrations()?;
        regs.insert(recipient, token);
        self.write_json(&self.registrations_path(), &regs)
    }

    fn remove_registration(&self, recipient: &str) -> Result<bool> {
        let mut regs = self.load_registrations()?;
        if regs.remove(recipient).is_none() {
            return Ok(false);
        }
        self.write_json(&self.registrations_path(), &regs)?;
        Ok(true)
    }
}
