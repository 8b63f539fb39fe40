// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Dimension-order routing using only the mesh geometry.
//!
//! The row offset is resolved first: a flit travels up or down until it
//! reaches the destination row and only then left or right along that row.
//! ```txt
//!  S . . .        S = source switch
//!  v . . .        D = destination switch
//!  v . . .
//!  > > D .
//! ```
//! The order must not be changed to column-first without also changing every
//! switch in the mesh, otherwise the turn restrictions that keep the mesh free
//! of deadlock no longer hold.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::config::MeshConfig;
use crate::port::Port;
use crate::router::{Route, local_delivery};
use crate::types::{NodeAddress, RouteResult, RoutingFailure, SwitchId};

pub struct StaticXyRouter {
    config: Arc<MeshConfig>,
}

impl StaticXyRouter {
    #[must_use]
    pub fn new(config: Arc<MeshConfig>) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &Arc<MeshConfig> {
        &self.config
    }
}

impl Route for StaticXyRouter {
    /// The source is not needed: the route depends only on where the flit is
    /// and where it is going.
    fn route(
        &self,
        _source: NodeAddress,
        destination: NodeAddress,
        switch: SwitchId,
    ) -> RouteResult {
        let config = &self.config;
        let dest_switch = config.switch_of(destination);
        for s in [switch, dest_switch] {
            if !config.contains_switch(s) {
                return Err(RoutingFailure::OutsideMesh { switch: s }.into());
            }
        }

        if let Some(local) = local_delivery(config, destination, switch) {
            return Ok(local);
        }

        let dest_row = config.row_of(dest_switch);
        let dest_col = config.col_of(dest_switch);
        let switch_row = config.row_of(switch);
        let switch_col = config.col_of(switch);

        match dest_row.cmp(&switch_row) {
            Ordering::Less => Ok(Port::Top),
            Ordering::Greater => Ok(Port::Bottom),
            // Row reached, route by column.
            Ordering::Equal => match dest_col.cmp(&switch_col) {
                Ordering::Less => Ok(Port::Left),
                Ordering::Greater => Ok(Port::Right),
                Ordering::Equal => Err(RoutingFailure::NoMatchingBranch {
                    destination,
                    switch,
                }
                .into()),
            },
        }
    }
}
