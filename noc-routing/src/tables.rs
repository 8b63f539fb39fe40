// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Precomputed routing tables.
//!
//! The tables are produced by an offline generator and are only read here.
//! They are normally loaded from a YAML document of the form:
//! ```yaml
//! flows:
//!   - { source: 0, destination: 5, flow: 0 }
//! next_hops:
//!   - { switch: 0, flow: 0, direction: 4 }
//!   - { switch: 4, flow: 0, direction: 2 }
//! ```
//!
//! where `direction` is `1` (left), `2` (right), `3` (top) or `4` (bottom).
//! Direction codes are kept exactly as given; an unknown code is reported when
//! a flit actually needs it.

use std::collections::HashMap;
use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::config_error;
use crate::port::Direction;
use crate::types::{FlowId, NodeAddress, RoutingError, RoutingFailure, SwitchId};

/// Maps a (source, destination) pair to its flow
#[derive(Clone, Debug, Default)]
pub struct FlowTable {
    flows: HashMap<(NodeAddress, NodeAddress), FlowId>,
}

impl FlowTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        source: NodeAddress,
        destination: NodeAddress,
        flow: FlowId,
    ) -> Result<(), RoutingError> {
        if self.flows.insert((source, destination), flow).is_some() {
            return config_error!("Duplicate flow from {source} to {destination}");
        }
        Ok(())
    }

    pub fn get(
        &self,
        source: NodeAddress,
        destination: NodeAddress,
    ) -> Result<FlowId, RoutingFailure> {
        self.flows
            .get(&(source, destination))
            .copied()
            .ok_or(RoutingFailure::MissingFlow {
                source,
                destination,
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

/// Maps a (switch, flow) pair to the raw direction code to leave by
#[derive(Clone, Debug, Default)]
pub struct NextHopTable {
    next_hops: HashMap<(SwitchId, FlowId), u8>,
}

impl NextHopTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, switch: SwitchId, flow: FlowId, code: u8) -> Result<(), RoutingError> {
        if self.next_hops.insert((switch, flow), code).is_some() {
            return config_error!("Duplicate next hop for {flow} at {switch}");
        }
        Ok(())
    }

    pub fn get(&self, switch: SwitchId, flow: FlowId) -> Result<Direction, RoutingFailure> {
        let code = *self
            .next_hops
            .get(&(switch, flow))
            .ok_or(RoutingFailure::MissingNextHop { switch, flow })?;
        Direction::try_from(code)
            .map_err(|code| RoutingFailure::UnknownDirection { switch, flow, code })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.next_hops.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.next_hops.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct TablesSection {
    flows: Option<Vec<FlowSection>>,
    next_hops: Option<Vec<NextHopSection>>,
}

#[derive(Debug, Deserialize)]
struct FlowSection {
    source: NodeAddress,
    destination: NodeAddress,
    flow: FlowId,
}

#[derive(Debug, Deserialize)]
struct NextHopSection {
    switch: SwitchId,
    flow: FlowId,
    direction: u8,
}

/// The pair of tables used by the computed router
#[derive(Clone, Debug, Default)]
pub struct RoutingTables {
    flows: FlowTable,
    next_hops: NextHopTable,
}

impl RoutingTables {
    #[must_use]
    pub fn new(flows: FlowTable, next_hops: NextHopTable) -> Self {
        Self { flows, next_hops }
    }

    pub fn from_file(tables_path: &Path) -> Result<Self, RoutingError> {
        let s = std::fs::read_to_string(tables_path).map_err(|e| {
            RoutingError::Configuration(format!("Unable to read {}: {e}", tables_path.display()))
        })?;
        Self::from_string(&s)
    }

    pub fn from_string(tables: &str) -> Result<Self, RoutingError> {
        let section: TablesSection = serde_yaml::from_str(tables).map_err(|e| {
            RoutingError::Configuration(format!("serde_yaml::from_str failed: {e}"))
        })?;

        let mut flows = FlowTable::new();
        for entry in section.flows.unwrap_or_default() {
            flows.insert(entry.source, entry.destination, entry.flow)?;
        }
        let mut next_hops = NextHopTable::new();
        for entry in section.next_hops.unwrap_or_default() {
            next_hops.insert(entry.switch, entry.flow, entry.direction)?;
        }
        debug!(
            "Loaded {} flows and {} next hops",
            flows.len(),
            next_hops.len()
        );

        Ok(Self::new(flows, next_hops))
    }

    #[must_use]
    pub fn flows(&self) -> &FlowTable {
        &self.flows
    }

    #[must_use]
    pub fn next_hops(&self) -> &NextHopTable {
        &self.next_hops
    }
}
