// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::defaults;
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Only watch SecretMirrors in this namespace; all namespaces when unset
    pub watch_namespace: Option<String>,
    /// Delay before re-checking a mirror whose destination secret was just deleted
    pub requeue_after_delete: Duration,
    /// Delay before retrying a failed reconciliation
    pub error_requeue: Duration,
    /// Upper bound for a single reconciliation pass
    pub reconcile_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            watch_namespace: None,
            requeue_after_delete: Duration::from_secs(defaults::REQUEUE_AFTER_DELETE_SECS),
            error_requeue: Duration::from_secs(defaults::ERROR_REQUEUE_SECS),
            reconcile_timeout: Duration::from_secs(defaults::RECONCILE_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let watch_namespace = lookup("WATCH_NAMESPACE").filter(|ns| !ns.is_empty());

        Ok(Config {
            watch_namespace,
            requeue_after_delete: seconds(
                &lookup,
                "REQUEUE_AFTER_DELETE_SECS",
                defaults::REQUEUE_AFTER_DELETE_SECS,
            )?,
            error_requeue: seconds(&lookup, "ERROR_REQUEUE_SECS", defaults::ERROR_REQUEUE_SECS)?,
            reconcile_timeout: seconds(
                &lookup,
                "RECONCILE_TIMEOUT_SECS",
                defaults::RECONCILE_TIMEOUT_SECS,
            )?,
        })
    }
}

fn seconds<F>(lookup: &F, key: &str, default: u64) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{} must be a whole number of seconds, got '{}'", key, raw))?,
        None => default,
    };
    Ok(Duration::from_secs(secs))
}
