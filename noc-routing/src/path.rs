// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Follow routing decisions switch by switch.
//!
//! This does what the simulation engine does with each decision, without any
//! of the timing: start at the switch the source is attached to, ask the
//! router for a port, move to the neighbouring switch through that port and
//! repeat until the router asks for local delivery.

use std::collections::HashSet;
use std::fmt;

use log::trace;

use crate::config::MeshConfig;
use crate::port::Port;
use crate::router::Route;
use crate::types::{NodeAddress, RoutingError, RoutingFailure, SwitchId};

/// The switches a flit passes through and the port it leaves each one by.
///
/// The last port is always the local delivery port.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path {
    switches: Vec<SwitchId>,
    ports: Vec<Port>,
}

impl Path {
    /// Every switch visited, starting with the source's switch
    #[must_use]
    pub fn switches(&self) -> &[SwitchId] {
        &self.switches
    }

    /// Number of links traversed
    #[must_use]
    pub fn num_hops(&self) -> usize {
        self.switches.len() - 1
    }

    #[must_use]
    pub fn destination_switch(&self) -> SwitchId {
        self.switches[self.switches.len() - 1]
    }

    /// The port taken at each switch in [switches](Self::switches)
    #[must_use]
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    #[must_use]
    pub fn local_port(&self) -> Port {
        self.ports[self.ports.len() - 1]
    }

    /// Each switch paired with the port taken there
    pub fn hops(&self) -> impl Iterator<Item = (SwitchId, Port)> + '_ {
        self.switches.iter().copied().zip(self.ports.iter().copied())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (switch, port)) in self.hops().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{switch} ({port})")?;
        }
        Ok(())
    }
}

/// Walk from `source` to `destination` using `router`.
///
/// Fails if the router fails, if a port leads off the edge of the mesh or if
/// a switch is reached for a second time.
pub fn trace_path<R>(
    router: &R,
    config: &MeshConfig,
    source: NodeAddress,
    destination: NodeAddress,
) -> Result<Path, RoutingError>
where
    R: Route + ?Sized,
{
    let mut switch = config.switch_of(source);
    if !config.contains_switch(switch) {
        return Err(RoutingFailure::OutsideMesh { switch }.into());
    }

    let mut switches = vec![switch];
    let mut ports = Vec::new();
    let mut visited = HashSet::from([switch]);
    loop {
        let port = router.route(source, destination, switch)?;
        ports.push(port);
        if port.is_local() {
            return Ok(Path { switches, ports });
        }

        let next = config
            .neighbour(switch, port)
            .ok_or(RoutingFailure::LeftMesh { switch, port })?;
        trace!("{switch} -> {next} via {port}");
        if !visited.insert(next) {
            return Err(RoutingFailure::Loop { switch: next }.into());
        }
        switches.push(next);
        switch = next;
    }
}
