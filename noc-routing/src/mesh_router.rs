// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The single routing entry point used by the simulation engine.
//!
//! A [MeshRouter] is built once at startup with one of the
//! [RoutingAlgorithm]s and then called for every flit at every switch it
//! passes through:
//!
//! ```rust
//! # use std::sync::Arc;
//! # use noc_routing::config::MeshConfig;
//! # use noc_routing::mesh_router::MeshRouter;
//! # use noc_routing::types::{NodeAddress, SwitchId};
//! let config = Arc::new(MeshConfig::with_dimensions(4, 4, 0).unwrap());
//! let router = MeshRouter::new_static(config.clone());
//!
//! // From switch 0 towards the endpoint on switch 5, go down first
//! let code = router.route(NodeAddress(0), NodeAddress(5), SwitchId(0)).unwrap();
//! assert_eq!(code, config.port_offsets().bottom);
//! ```

use std::fmt;
use std::sync::Arc;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::MeshConfig;
use crate::config_error;
use crate::path::{self, Path};
use crate::router::{ComputedRouter, Route, StaticXyRouter};
use crate::tables::RoutingTables;
use crate::types::{NodeAddress, RouteResult, RoutingError, SwitchId};

#[derive(clap::ValueEnum, Clone, Copy, Default, Debug, Serialize, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoutingAlgorithm {
    #[default]
    /// Route to the right row first, then along it to the right column
    Static,

    /// Follow precomputed flow and next-hop tables
    Computed,
}

impl fmt::Display for RoutingAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RoutingAlgorithm::Static => write!(f, "static"),
            RoutingAlgorithm::Computed => write!(f, "computed"),
        }
    }
}

pub enum MeshRouter {
    Static(StaticXyRouter),
    Computed(ComputedRouter),
}

impl MeshRouter {
    /// Build the router for `algorithm`.
    ///
    /// The computed algorithm cannot be used without tables. Tables given to
    /// the static algorithm are not used.
    pub fn new(
        algorithm: RoutingAlgorithm,
        config: Arc<MeshConfig>,
        tables: Option<Arc<RoutingTables>>,
    ) -> Result<Self, RoutingError> {
        debug!("Building {algorithm} router");
        match (algorithm, tables) {
            (RoutingAlgorithm::Static, tables) => {
                if tables.is_some() {
                    debug!("Static routing ignores the supplied routing tables");
                }
                Ok(Self::new_static(config))
            }
            (RoutingAlgorithm::Computed, Some(tables)) => Ok(Self::new_computed(config, tables)),
            (RoutingAlgorithm::Computed, None) => {
                config_error!("The computed routing algorithm requires routing tables")
            }
        }
    }

    #[must_use]
    pub fn new_static(config: Arc<MeshConfig>) -> Self {
        MeshRouter::Static(StaticXyRouter::new(config))
    }

    #[must_use]
    pub fn new_computed(config: Arc<MeshConfig>, tables: Arc<RoutingTables>) -> Self {
        MeshRouter::Computed(ComputedRouter::new(config, tables))
    }

    #[must_use]
    pub fn algorithm(&self) -> RoutingAlgorithm {
        match self {
            MeshRouter::Static(_) => RoutingAlgorithm::Static,
            MeshRouter::Computed(_) => RoutingAlgorithm::Computed,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Arc<MeshConfig> {
        match self {
            MeshRouter::Static(router) => router.config(),
            MeshRouter::Computed(router) => router.config(),
        }
    }

    /// Return the port code of the switch output a flit must leave by.
    pub fn route(
        &self,
        source: NodeAddress,
        destination: NodeAddress,
        switch: SwitchId,
    ) -> Result<usize, RoutingError> {
        let port = self.route_port(source, destination, switch)?;
        Ok(self.config().port_code(port))
    }

    /// As [route](Self::route) but returning the [Port](crate::port::Port)
    /// rather than its code.
    pub fn route_port(
        &self,
        source: NodeAddress,
        destination: NodeAddress,
        switch: SwitchId,
    ) -> RouteResult {
        let result = match self {
            MeshRouter::Static(router) => router.route(source, destination, switch),
            MeshRouter::Computed(router) => router.route(source, destination, switch),
        };
        match &result {
            Ok(port) => trace!("{switch}: {source} to {destination} via {port}"),
            Err(e) => debug!("{switch}: {source} to {destination}: {e}"),
        }
        result
    }

    /// Follow this router's decisions from `source` all the way to
    /// `destination`.
    pub fn trace_path(
        &self,
        source: NodeAddress,
        destination: NodeAddress,
    ) -> Result<Path, RoutingError> {
        path::trace_path(self, self.config(), source, destination)
    }
}

impl Route for MeshRouter {
    fn route(&self, source: NodeAddress, destination: NodeAddress, switch: SwitchId) -> RouteResult {
        self.route_port(source, destination, switch)
    }
}
