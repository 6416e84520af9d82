//! Configuration management for JobNotify
//!
//! This module defines the main `Config` struct and its sub-structs,
//! responsible for holding all application settings. It uses the `figment`
//! crate to load configuration from a `jobnotify.toml` file and merge it
//! with environment variables and command-line arguments.

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cli::Cli;

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level for the application.
    pub log_level: String,
    /// Configuration for the event ingress server.
    pub server: ServerConfig,
    /// Configuration for the notification topic and its delivery endpoint.
    pub notification: NotificationConfig,
    /// Links embedded into notification bodies.
    pub links: LinksConfig,
}

/// Configuration for the event ingress server.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// Address the server binds to.
    pub listen_addr: String,
    /// Expose Prometheus metrics on `/metrics`.
    #[serde(default)]
    pub metrics_enabled: bool,
}

/// Configuration for the notification topic and its delivery endpoint.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NotificationConfig {
    /// The topic identifier notifications are published under. Required.
    pub topic: Option<String>,
    /// The HTTP bridge endpoint of the delivery service. Required.
    pub endpoint_url: Option<String>,
    /// Timeout for a single publish call, in seconds.
    pub timeout_seconds: u64,
}

impl NotificationConfig {
    /// Returns the configured topic, or an error to abort startup with.
    pub fn require_topic(&self) -> Result<&str> {
        self.topic
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("notification.topic is required"))
    }

    /// Returns the configured endpoint, or an error to abort startup with.
    pub fn require_endpoint_url(&self) -> Result<&str> {
        self.endpoint_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("notification.endpoint_url is required"))
    }
}

/// Links embedded into notification bodies. These vary per deployment, so
/// they live in configuration rather than the formatting code.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LinksConfig {
    /// Log-group path interpolated into the log-console deep link.
    pub log_group: String,
    /// Documentation link appended to failure notifications.
    pub troubleshooting_url: String,
}

impl Config {
    /// Loads the application configuration by layering sources: defaults,
    /// the TOML file, environment variables, and CLI arguments.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from("jobnotify.toml"));
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            // Allow overriding with environment variables, e.g.
            // JOBNOTIFY_LOG_LEVEL=debug
            .merge(Env::prefixed("JOBNOTIFY_"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }
}

// Provide a default implementation for tests and easy setup.
impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            server: ServerConfig::default(),
            notification: NotificationConfig::default(),
            links: LinksConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            metrics_enabled: false,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            topic: None,
            endpoint_url: None,
            timeout_seconds: 10,
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            log_group: "/aws/batch/job".to_string(),
            troubleshooting_url:
                "https://docs.aws.amazon.com/batch/latest/userguide/troubleshooting.html"
                    .to_string(),
        }
    }
}
