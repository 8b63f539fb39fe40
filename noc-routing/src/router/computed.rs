// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Table-driven routing.
//!
//! The route is taken from [RoutingTables] computed offline, for example to
//! balance load for a known traffic pattern. Each (source, destination) pair
//! is first mapped to a flow and each switch then looks up which direction
//! that flow leaves by. The tables are trusted completely: nothing here
//! checks that they are free of loops or that they reach the destination.

use std::sync::Arc;

use crate::config::MeshConfig;
use crate::router::{Route, local_delivery};
use crate::tables::RoutingTables;
use crate::types::{NodeAddress, RouteResult, SwitchId};

pub struct ComputedRouter {
    config: Arc<MeshConfig>,
    tables: Arc<RoutingTables>,
}

impl ComputedRouter {
    #[must_use]
    pub fn new(config: Arc<MeshConfig>, tables: Arc<RoutingTables>) -> Self {
        Self { config, tables }
    }

    #[must_use]
    pub fn config(&self) -> &Arc<MeshConfig> {
        &self.config
    }

    #[must_use]
    pub fn tables(&self) -> &Arc<RoutingTables> {
        &self.tables
    }
}

impl Route for ComputedRouter {
    fn route(&self, source: NodeAddress, destination: NodeAddress, switch: SwitchId) -> RouteResult {
        // Arrival never needs a table entry.
        if let Some(local) = local_delivery(&self.config, destination, switch) {
            return Ok(local);
        }

        let flow = self.tables.flows().get(source, destination)?;
        let direction = self.tables.next_hops().get(switch, flow)?;
        Ok(direction.into())
    }
}
