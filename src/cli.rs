//! Command-Line Interface (CLI) argument parsing.
//!
//! This module defines the command-line arguments for the application using
//! the `clap` crate. These arguments are parsed at startup and then merged
//! with the configuration from the `jobnotify.toml` file and environment
//! variables.

use clap::Parser;
use figment::{
    value::{Dict, Map, Tag, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Formats batch job status-change events and publishes them to a
/// notification topic.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Address the event ingress server binds to.
    #[arg(long, value_name = "ADDR")]
    pub listen_addr: Option<String>,

    /// Topic identifier notifications are published under.
    #[arg(long, value_name = "TOPIC")]
    pub topic: Option<String>,

    /// The logging level for the application.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(addr) = &self.listen_addr {
            let mut server = Dict::new();
            server.insert("listen_addr".into(), Value::from(addr.clone()));
            dict.insert("server".into(), Value::Dict(Tag::Default, server));
        }

        if let Some(topic) = &self.topic {
            let mut notification = Dict::new();
            notification.insert("topic".into(), Value::from(topic.clone()));
            dict.insert(
                "notification".into(),
                Value::Dict(Tag::Default, notification),
            );
        }

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
