// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Routing algorithms.
//!
//! Each algorithm decides which output port of a switch a flit must leave by,
//! given the flit's source and destination and the switch currently holding
//! it. Algorithms are stateless once built: the same inputs always give the
//! same port.

use crate::config::MeshConfig;
use crate::port::Port;
use crate::types::{NodeAddress, RouteResult, SwitchId};

pub mod computed;
pub mod static_xy;

pub use computed::ComputedRouter;
pub use static_xy::StaticXyRouter;

/// Trait required for routing algorithms to implement.
pub trait Route {
    /// Return the port a flit from `source` to `destination` must leave
    /// `switch` by.
    fn route(&self, source: NodeAddress, destination: NodeAddress, switch: SwitchId)
    -> RouteResult;
}

/// The local port for `destination` if it is attached to `switch`.
#[must_use]
pub(crate) fn local_delivery(
    config: &MeshConfig,
    destination: NodeAddress,
    switch: SwitchId,
) -> Option<Port> {
    (config.switch_of(destination) == switch)
        .then(|| Port::Local(config.local_node_of(destination, switch)))
}
