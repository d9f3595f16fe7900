//! Everything a trigger needs: config, store, zone and transport.

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use sharehub_core::RenderOptions;
use sharehub_core::time::{local_today, parse_timezone};
use sharehub_notify::{FcmTransport, JsonFileStore, LogTransport, PushTransport};

use crate::config::Config;
use crate::state;

pub struct AppContext {
    pub config: Config,
    pub store: JsonFileStore,
    pub tz: Tz,
}

impl AppContext {
    pub fn new(config: Config) -> Result<Self> {
        let tz = parse_timezone(&config.hub.timezone)?;
        let dir = state::data_dir(config.hub.data_dir.as_deref())?;
        Ok(Self {
            store: JsonFileStore::new(dir),
            config,
            tz,
        })
    }

    pub fn today(&self) -> NaiveDate {
        local_today(Utc::now(), self.tz)
    }

    pub fn render_options(&self) -> RenderOptions {
        self.config.render_options()
    }

    /// Transport selected by `[push].provider`; `dry_run` always logs instead.
    pub fn transport(&self, dry_run: bool) -> Result<Box<dyn PushTransport>> {
        if dry_run {
            return Ok(Box::new(LogTransport));
        }
        let push = &self.config.push;
        match push.provider.as_str() {
            "log" => Ok(Box::new(LogTransport)),
            "fcm" => {
                let project = push
                    .project_id
                    .clone()
                    .context("push.project_id is not set in config.toml")?;
                let token = std::env::var(&push.access_token_env).with_context(|| {
                    format!("{} is not set (FCM access token)", push.access_token_env)
                })?;
                let mut transport = FcmTransport::new(project, token);
                if let Some(endpoint) = &push.endpoint {
                    transport = transport.with_endpoint(endpoint.clone());
                }
                Ok(Box::new(transport))
            }
            other => bail!("unknown push provider: {other} (expected \"fcm\" or \"log\")"),
        }
    }
}
