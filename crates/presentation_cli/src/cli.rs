//! Command line definition
//!
//! Flags override whatever the configuration file and `BB__` environment
//! variables provided. Each flag also has its own environment fallback.

use std::{path::PathBuf, time::Duration};

use application::{StrategyKind, strategies::RESPONSE_TEXT_ARG};
use clap::{Parser, Subcommand};
use infrastructure::{AppConfig, LogFormat, METHOD_ARG, TIMEOUT_ARG, URL_ARG};

/// Building Blocks node
#[derive(Debug, Parser)]
#[command(name = "bb")]
#[command(author, version, about = "Building Blocks: a configurable node for testing networked systems", long_about = None)]
pub struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, env = "BB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Node identity; defaults to `{strategy}-grpc:{port}-h1:{port}`
    #[arg(long, env = "BB_ID")]
    pub id: Option<String>,

    /// Port for the gRPC listener
    #[arg(long, env = "BB_GRPC_SERVER_PORT")]
    pub grpc_server_port: Option<u16>,

    /// Port for the HTTP/1.1 listener
    #[arg(long, env = "BB_H1_SERVER_PORT")]
    pub h1_server_port: Option<u16>,

    /// Percentage of requests that fail on purpose
    #[arg(long, env = "BB_PERCENT_FAILURE", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub percent_failure: Option<u8>,

    /// Artificial latency added to every request, in milliseconds
    #[arg(long, env = "BB_SLEEP_IN_MILLIS")]
    pub sleep_in_millis: Option<u64>,

    /// Stop the node after this many requests (0 keeps it running)
    #[arg(long, env = "BB_TERMINATE_AFTER")]
    pub terminate_after: Option<u64>,

    /// Don't wait for downstream responses
    #[arg(long, env = "BB_FIRE_AND_FORGET")]
    pub fire_and_forget: bool,

    /// Downstream gRPC server as `host:port` (repeatable)
    #[arg(
        long = "grpc-downstream-server",
        env = "BB_GRPC_DOWNSTREAM_SERVERS",
        value_delimiter = ','
    )]
    pub grpc_downstream_servers: Vec<String>,

    /// Authority for each gRPC downstream server, in the same order (repeatable)
    #[arg(
        long = "grpc-downstream-authority",
        env = "BB_GRPC_DOWNSTREAM_AUTHORITIES",
        value_delimiter = ','
    )]
    pub grpc_downstream_authorities: Vec<String>,

    /// Downstream HTTP/1.1 server, e.g. `http://localhost:8080` (repeatable)
    #[arg(
        long = "h1-downstream-server",
        env = "BB_H1_DOWNSTREAM_SERVERS",
        value_delimiter = ','
    )]
    pub h1_downstream_servers: Vec<String>,

    /// Timeout for calls to downstream servers, e.g. `30s`
    #[arg(long, env = "BB_DOWNSTREAM_TIMEOUT", value_parser = humantime::parse_duration)]
    pub downstream_timeout: Option<Duration>,

    /// Log filter, e.g. `debug` or `application=trace,info`
    #[arg(long, env = "BB_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, env = "BB_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

/// Strategy to run
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Answer every request locally
    Terminus {
        /// Fixed payload to answer with; a generated one when empty
        #[arg(long, env = "BB_RESPONSE_TEXT")]
        response_text: Option<String>,
    },

    /// Forward every request to the single downstream server
    PointToPointChannel,

    /// Send every request to all downstream servers and join the answers
    BroadcastChannel,

    /// Turn every request into a call to an external HTTP endpoint
    HttpEgress {
        /// Absolute http:// or https:// URL to call
        #[arg(long)]
        url: String,

        /// One of GET, POST, PUT, DELETE, PATCH
        #[arg(long, default_value = "GET")]
        method: String,

        /// Timeout for the external call
        #[arg(long, default_value = "10s")]
        http_client_timeout: String,
    },
}

impl Command {
    /// Strategy this subcommand selects
    pub const fn kind(&self) -> StrategyKind {
        match self {
            Self::Terminus { .. } => StrategyKind::Terminus,
            Self::PointToPointChannel => StrategyKind::PointToPointChannel,
            Self::BroadcastChannel => StrategyKind::BroadcastChannel,
            Self::HttpEgress { .. } => StrategyKind::HttpEgress,
        }
    }

    /// Strategy parameters carried by this subcommand
    pub fn extra_arguments(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Terminus { response_text } => response_text
                .iter()
                .map(|text| (RESPONSE_TEXT_ARG, text.clone()))
                .collect(),
            Self::PointToPointChannel | Self::BroadcastChannel => Vec::new(),
            Self::HttpEgress {
                url,
                method,
                http_client_timeout,
            } => vec![
                (URL_ARG, url.clone()),
                (METHOD_ARG, method.clone()),
                (TIMEOUT_ARG, http_client_timeout.clone()),
            ],
        }
    }
}

impl Cli {
    /// Layer the command line over loaded configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(id) = &self.id {
            config.service.id.clone_from(id);
        }
        if let Some(port) = self.grpc_server_port {
            config.server.grpc_port = Some(port);
        }
        if let Some(port) = self.h1_server_port {
            config.server.h1_port = Some(port);
        }
        if let Some(percent) = self.percent_failure {
            config.service.percent_failure = percent;
        }
        if let Some(millis) = self.sleep_in_millis {
            config.service.sleep = Duration::from_millis(millis);
        }
        if let Some(count) = self.terminate_after {
            config.service.terminate_after = count;
        }
        if self.fire_and_forget {
            config.service.fire_and_forget = true;
        }
        if !self.h1_downstream_servers.is_empty() {
            config
                .downstream
                .h1_servers
                .clone_from(&self.h1_downstream_servers);
        }
        if !self.grpc_downstream_servers.is_empty() {
            config
                .downstream
                .grpc_servers
                .clone_from(&self.grpc_downstream_servers);
        }
        if !self.grpc_downstream_authorities.is_empty() {
            config
                .downstream
                .grpc_authorities
                .clone_from(&self.grpc_downstream_authorities);
        }
        if let Some(timeout) = self.downstream_timeout {
            config.service.downstream_timeout = timeout;
        }
        if let Some(level) = &self.log_level {
            config.log.filter.clone_from(level);
        }
        if let Some(format) = self.log_format {
            config.log.format = format;
        }

        for (key, value) in self.command.extra_arguments() {
            config
                .service
                .extra_arguments
                .insert(key.to_string(), value);
        }

        config.resolve_node_id(self.command.kind());
    }
}
