// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Command-line front end to the mesh routing core.
//!
//! Settings are layered, later sources overriding earlier ones:
//!  - built-in defaults
//!  - an optional TOML configuration file (`--conf-file`)
//!  - `NOC_` prefixed environment variables (e.g. `NOC_COLUMNS=8`)
//!  - command-line arguments
//!
//! Given a source and destination a single path is traced and printed.
//! Otherwise every endpoint is routed to every other endpoint and a summary
//! of the sweep is printed.

use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use log::{LevelFilter, debug, info, warn};
use noc_routing::config::{MeshConfig, bits_for};
use noc_routing::config_error;
use noc_routing::mesh_router::{MeshRouter, RoutingAlgorithm};
use noc_routing::path::Path;
use noc_routing::tables::RoutingTables;
use noc_routing::types::{NodeAddress, RoutingError};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "NOC_";

/// Command-line arguments and configuration file contents.
///
/// Every field is optional so that a value is only taken from a source when
/// it has been set there.
#[derive(Clone, Debug, Deserialize, Parser, PartialEq, Serialize)]
#[command(about = "Trace routes through a 2D mesh network-on-chip")]
pub struct Config {
    /// Number of columns of switches
    #[arg(long)]
    pub columns: Option<usize>,

    /// Number of rows of switches
    #[arg(long)]
    pub rows: Option<usize>,

    /// Bits of a node address used to select an endpoint of a switch
    #[arg(long)]
    pub node_local_bits: Option<u32>,

    /// Bits of a switch id used for the column (derived from the columns by
    /// default)
    #[arg(long)]
    pub column_bits: Option<u32>,

    /// Routing algorithm to use
    #[arg(long, value_enum)]
    pub algorithm: Option<RoutingAlgorithm>,

    /// YAML flow and next-hop tables for the computed algorithm
    #[arg(long)]
    pub tables: Option<PathBuf>,

    /// YAML mesh description (replaces the geometry arguments)
    #[arg(long)]
    pub mesh: Option<PathBuf>,

    /// Level of log messages to display
    #[arg(long)]
    pub log_level: Option<LevelFilter>,

    /// Node address to trace a path from
    #[arg(long)]
    pub source: Option<u64>,

    /// Node address to trace a path to
    #[arg(long)]
    pub destination: Option<u64>,

    /// TOML file with settings to use instead of the defaults
    #[arg(long)]
    #[serde(skip)]
    pub conf_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: Some(4),
            rows: Some(4),
            node_local_bits: Some(0),
            column_bits: None,
            algorithm: Some(RoutingAlgorithm::Static),
            tables: None,
            mesh: None,
            log_level: Some(LevelFilter::Warn),
            source: None,
            destination: None,
            conf_file: None,
        }
    }
}

fn required<T>(value: Option<T>, name: &str) -> Result<T, RoutingError> {
    match value {
        Some(value) => Ok(value),
        None => config_error!("No value given for {name}"),
    }
}

impl Config {
    /// Defaults, then the configuration file, then the environment
    fn figment(conf_file: Option<&PathBuf>) -> Result<Figment, RoutingError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(conf_file) = conf_file {
            if conf_file.is_dir() {
                return config_error!("{} is not a file path", conf_file.display());
            }
            if !conf_file.exists() {
                return config_error!("{} not found", conf_file.display());
            }
            figment = figment.merge(Toml::file(conf_file));
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Overwrite any fields that were given on the command line
    fn merge_cli(mut self, cli: Config) -> Self {
        if cli.columns.is_some() {
            self.columns = cli.columns;
        }
        if cli.rows.is_some() {
            self.rows = cli.rows;
        }
        if cli.node_local_bits.is_some() {
            self.node_local_bits = cli.node_local_bits;
        }
        if cli.column_bits.is_some() {
            self.column_bits = cli.column_bits;
        }
        if cli.algorithm.is_some() {
            self.algorithm = cli.algorithm;
        }
        if cli.tables.is_some() {
            self.tables = cli.tables;
        }
        if cli.mesh.is_some() {
            self.mesh = cli.mesh;
        }
        if cli.log_level.is_some() {
            self.log_level = cli.log_level;
        }
        if cli.source.is_some() {
            self.source = cli.source;
        }
        if cli.destination.is_some() {
            self.destination = cli.destination;
        }
        self.conf_file = cli.conf_file;
        self
    }

    /// Combine every configuration source with the parsed command line.
    pub fn from_sources(cli: Config) -> Result<Self, RoutingError> {
        let config: Config = Self::figment(cli.conf_file.as_ref())?
            .extract()
            .map_err(|e| RoutingError::Configuration(format!("{e}")))?;
        Ok(config.merge_cli(cli))
    }

    /// Parse the process command line and combine it with the other sources.
    pub fn parse_all_sources() -> Result<Self, RoutingError> {
        Self::from_sources(Self::parse())
    }

    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        self.log_level.unwrap_or(LevelFilter::Warn)
    }

    pub fn mesh_config(&self) -> Result<Arc<MeshConfig>, RoutingError> {
        let config = match &self.mesh {
            Some(mesh) => {
                debug!("Loading mesh from {}", mesh.display());
                MeshConfig::from_file(mesh)?
            }
            None => {
                let columns = required(self.columns, "columns")?;
                MeshConfig::new(
                    columns,
                    required(self.rows, "rows")?,
                    self.node_local_bits.unwrap_or(0),
                    self.column_bits.unwrap_or_else(|| bits_for(columns)),
                    None,
                )?
            }
        };
        Ok(Arc::new(config))
    }

    pub fn routing_tables(&self) -> Result<Option<Arc<RoutingTables>>, RoutingError> {
        match &self.tables {
            Some(tables) => {
                debug!("Loading routing tables from {}", tables.display());
                Ok(Some(Arc::new(RoutingTables::from_file(tables)?)))
            }
            None => Ok(None),
        }
    }

    pub fn build_router(&self) -> Result<MeshRouter, RoutingError> {
        let algorithm = self.algorithm.unwrap_or_default();
        MeshRouter::new(algorithm, self.mesh_config()?, self.routing_tables()?)
    }
}

/// Configure the logger level and formating string.
pub fn setup_logger(level: LevelFilter) {
    env_logger::builder()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();
}

/// Totals gathered by routing every endpoint to every other endpoint
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub paths: usize,
    pub failures: usize,
    pub total_hops: usize,
    pub max_hops: usize,
}

impl fmt::Display for SweepSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} paths, {} failed, {} hops in total, longest {} hops",
            self.paths, self.failures, self.total_hops, self.max_hops
        )
    }
}

/// Trace a path between every pair of endpoints in the mesh.
///
/// Failed paths are logged and counted rather than stopping the sweep.
#[must_use]
pub fn sweep_all_pairs(router: &MeshRouter) -> SweepSummary {
    let config = router.config();
    let mut summary = SweepSummary::default();
    for source in config.nodes() {
        for destination in config.nodes() {
            summary.paths += 1;
            match router.trace_path(source, destination) {
                Ok(path) => {
                    summary.total_hops += path.num_hops();
                    summary.max_hops = summary.max_hops.max(path.num_hops());
                }
                Err(e) => {
                    warn!("{source} -> {destination}: {e}");
                    summary.failures += 1;
                }
            }
        }
    }
    summary
}

/// Trace a single path from `source` to `destination`.
pub fn trace_one(
    router: &MeshRouter,
    source: NodeAddress,
    destination: NodeAddress,
) -> Result<Path, RoutingError> {
    let config = router.config();
    for node in [source, destination] {
        if !config.contains_node(node) {
            return config_error!("{node} is not part of the mesh");
        }
    }
    router.trace_path(source, destination)
}

pub fn run(config: &Config) -> Result<(), RoutingError> {
    let router = config.build_router()?;
    info!(
        "Routing with the {} algorithm on a {}x{} mesh",
        router.algorithm(),
        router.config().num_columns(),
        router.config().num_rows()
    );

    match (config.source, config.destination) {
        (Some(source), Some(destination)) => {
            let source = NodeAddress(source);
            let destination = NodeAddress(destination);
            let path = trace_one(&router, source, destination)?;
            println!("{source} -> {destination}: {path}");
            Ok(())
        }
        (None, None) => {
            let summary = sweep_all_pairs(&router);
            println!("{summary}");
            Ok(())
        }
        _ => config_error!("A single path needs both a source and a destination"),
    }
}
