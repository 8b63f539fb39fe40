// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Shared types.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::port::Port;

/// Address of an endpoint attached to the mesh.
///
/// The switch the endpoint is attached to occupies the high-order bits and the
/// endpoint's index within that switch occupies the low `node_local_bits`.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeAddress(pub u64);

/// Identifier of a switch: `(row << column_bits) | column`.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SwitchId(pub u64);

/// Label assigned by the external table generator to a (source, destination)
/// pair.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FlowId(pub u64);

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "node {}", self.0)
    }
}

impl fmt::Display for SwitchId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "switch {}", self.0)
    }
}

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "flow {}", self.0)
    }
}

#[macro_export]
/// Build a configuration [RoutingError] from `format!` style arguments
macro_rules! config_error {
    ($($arg:tt)*) => {
        Err($crate::types::RoutingError::Configuration(format!($($arg)*)))
    };
}

/// The reasons a single routing call can fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoutingFailure {
    /// None of the dimension-order branches applied. Only happens when the
    /// switch ids do not decode consistently.
    NoMatchingBranch {
        destination: NodeAddress,
        switch: SwitchId,
    },

    /// The flow table has no entry for the pair.
    MissingFlow {
        source: NodeAddress,
        destination: NodeAddress,
    },

    /// The next-hop table has no entry for the flow at this switch.
    MissingNextHop { switch: SwitchId, flow: FlowId },

    /// The next-hop table holds a code that is not a known direction.
    UnknownDirection {
        switch: SwitchId,
        flow: FlowId,
        code: u8,
    },

    /// Following the port would leave the mesh.
    LeftMesh { switch: SwitchId, port: Port },

    /// A path visited the same switch twice.
    Loop { switch: SwitchId },

    /// The switch is not part of the configured mesh.
    OutsideMesh { switch: SwitchId },
}

impl fmt::Display for RoutingFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RoutingFailure::NoMatchingBranch {
                destination,
                switch,
            } => write!(f, "no route from {switch} towards {destination}"),
            RoutingFailure::MissingFlow {
                source,
                destination,
            } => write!(f, "no flow defined from {source} to {destination}"),
            RoutingFailure::MissingNextHop { switch, flow } => {
                write!(f, "no next hop for {flow} at {switch}")
            }
            RoutingFailure::UnknownDirection { switch, flow, code } => {
                write!(f, "unknown direction code {code} for {flow} at {switch}")
            }
            RoutingFailure::LeftMesh { switch, port } => {
                write!(f, "{port} port of {switch} leaves the mesh")
            }
            RoutingFailure::Loop { switch } => write!(f, "{switch} visited twice"),
            RoutingFailure::OutsideMesh { switch } => write!(f, "{switch} is outside the mesh"),
        }
    }
}

/// The `RoutingError` is returned by all fallible routing functions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoutingError {
    /// A per-call failure to produce a valid output port.
    Failure(RoutingFailure),

    /// Inconsistent geometry or tables, detected before routing starts.
    Configuration(String),
}

impl RoutingError {
    #[must_use]
    pub fn is_routing_failure(&self) -> bool {
        matches!(self, RoutingError::Failure(_))
    }

    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, RoutingError::Configuration(_))
    }
}

impl From<RoutingFailure> for RoutingError {
    fn from(failure: RoutingFailure) -> Self {
        RoutingError::Failure(failure)
    }
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RoutingError::Failure(failure) => write!(f, "Routing failure: {failure}"),
            RoutingError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl Error for RoutingError {}

/// Result of a routing decision
pub type RouteResult = Result<Port, RoutingError>;
