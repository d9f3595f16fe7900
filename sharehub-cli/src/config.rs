use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sharehub_core::RenderOptions;
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_sharehub_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub hub: HubSection,
    pub push: PushSection,
    pub schedule: ScheduleSection,
    pub server: ServerSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HubSection {
    /// The two people sharing the hub, as greeted in the digest header.
    pub participants: [String; 2],
    pub app_url: String,
    /// IANA zone used for "today" and the Monday–Sunday week.
    pub timezone: String,
    /// Directory holding hub.json / registrations.json (default: ~/.sharehub/data)
    pub data_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PushSection {
    /// "fcm" or "log"
    pub provider: String,
    pub project_id: Option<String>,
    /// Environment variable that holds the FCM OAuth access token.
    pub access_token_env: String,
    /// Override for the FCM host (emulator).
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSection {
    /// Six-field cron expression (sec min hour dom month dow) in hub.timezone.
    pub cron: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub addr: String,
}

impl Default for HubSection {
    fn default() -> Self {
        let render = RenderOptions::default();
        Self {
            participants: render.participants,
            app_url: render.app_url,
            timezone: "America/Chicago".to_string(),
            data_dir: None,
        }
    }
}

impl Default for PushSection {
    fn default() -> Self {
        Self {
            provider: "fcm".to_string(),
            project_id: None,
            access_token_env: "SHAREHUB_FCM_TOKEN".to_string(),
            endpoint: None,
        }
    }
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            // Sundays at 18:00
            cron: "0 0 18 * * Sun".to_string(),
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8787".to_string(),
        }
    }
}

impl Config {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            participants: self.hub.participants.clone(),
            app_url: self.hub.app_url.clone(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_sharehub_home()?.join("config.toml"))
}

pub fn parse_config(s: &str) -> Result<Config> {
    toml::from_str(s).context("parse config.toml")
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
