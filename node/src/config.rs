// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use provenance_ledger::config::{Genesis, LedgerProfile};
use provenance_ledger::types::Account;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    pub genesis: Genesis,
    /// Append-only event log. When set, it is the source of truth on start-up.
    pub event_log_path: Option<PathBuf>,
    pub snapshot_path: Option<PathBuf>,
    pub auto_snapshot_interval_secs: Option<u64>,
    pub auth_token: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            genesis: Genesis::new(Account::ZERO),
            event_log_path: None,
            snapshot_path: None,
            auto_snapshot_interval_secs: None,
            auth_token: None,
        }
    }
}

fn var(key: &'static str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

impl NodeConfig {
    /// Reads `PROVENANCE_*` environment variables on top of the defaults.
    /// `PROVENANCE_ADMIN` is mandatory.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Some(v) = var("PROVENANCE_BIND_ADDR") {
            cfg.bind_addr = parse("PROVENANCE_BIND_ADDR", v)?;
        }

        let admin = var("PROVENANCE_ADMIN").ok_or(ConfigError::Missing("PROVENANCE_ADMIN"))?;
        let administrator: Account = parse("PROVENANCE_ADMIN", admin)?;
        if administrator.is_zero() {
            return Err(ConfigError::Invalid {
                key: "PROVENANCE_ADMIN",
                value: administrator.to_string(),
                reason: "administrator cannot be the zero account".into(),
            });
        }

        cfg.genesis = Genesis::new(administrator).with_profile(LedgerProfile {
            company_name: var("PROVENANCE_COMPANY_NAME").unwrap_or_default(),
            location: var("PROVENANCE_COMPANY_LOCATION").unwrap_or_default(),
            description: var("PROVENANCE_COMPANY_DESCRIPTION").unwrap_or_default(),
        });

        cfg.event_log_path = var("PROVENANCE_EVENT_LOG").map(PathBuf::from);
        cfg.snapshot_path = var("PROVENANCE_SNAPSHOT_PATH").map(PathBuf::from);
        if let Some(v) = var("PROVENANCE_SNAPSHOT_INTERVAL_SECS") {
            cfg.auto_snapshot_interval_secs = Some(parse("PROVENANCE_SNAPSHOT_INTERVAL_SECS", v)?);
        }
        cfg.auth_token = var("PROVENANCE_AUTH_TOKEN");

        Ok(cfg)
    }
}
