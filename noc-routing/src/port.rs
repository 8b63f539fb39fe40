// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Switch output ports and their numeric codes.
//!
//! Every switch has one local port per attached endpoint plus up to four mesh
//! links:
//! ```txt
//!                 +-----------------------+
//!                 |          top          |
//!                 |                       |
//!                 | left           right  |
//!                 |                       |
//!                 | local[0..N-1] bottom  |
//!                 +-----------------------+
//! ```
//!
//! Top leads to the row above (lower row number) and left to the column with
//! the lower column number. The numeric code handed back to the switch for
//! each port is owned by the [PortOffsets] in the mesh configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config_error;
use crate::types::RoutingError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Port {
    /// Deliver to the endpoint with this local index on the current switch
    Local(u64),
    Left,
    Right,
    Top,
    Bottom,
}

impl Port {
    /// The four links to neighbouring switches
    pub const MESH_LINKS: [Port; 4] = [Port::Left, Port::Right, Port::Top, Port::Bottom];

    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Port::Local(_))
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Port::Local(n) => write!(f, "local_{n}"),
            Port::Left => write!(f, "left"),
            Port::Right => write!(f, "right"),
            Port::Top => write!(f, "top"),
            Port::Bottom => write!(f, "bottom"),
        }
    }
}

/// Direction codes as written by the external next-hop table generator.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Left = 1,
    Right = 2,
    Top = 3,
    Bottom = 4,
}

impl TryFrom<u8> for Direction {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Direction::Left),
            2 => Ok(Direction::Right),
            3 => Ok(Direction::Top),
            4 => Ok(Direction::Bottom),
            other => Err(other),
        }
    }
}

impl From<Direction> for Port {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Left => Port::Left,
            Direction::Right => Port::Right,
            Direction::Top => Port::Top,
            Direction::Bottom => Port::Bottom,
        }
    }
}

/// Numeric port codes used by the switches.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortOffsets {
    /// Code of local port 0; local port `n` is `local + n`
    pub local: usize,
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

impl PortOffsets {
    /// Local ports first, then left, right, top and bottom.
    #[must_use]
    pub fn after_local_ports(nodes_per_switch: usize) -> Self {
        Self {
            local: 0,
            left: nodes_per_switch,
            right: nodes_per_switch + 1,
            top: nodes_per_switch + 2,
            bottom: nodes_per_switch + 3,
        }
    }

    #[must_use]
    pub fn code(&self, port: Port) -> usize {
        match port {
            Port::Local(n) => self.local + n as usize,
            Port::Left => self.left,
            Port::Right => self.right,
            Port::Top => self.top,
            Port::Bottom => self.bottom,
        }
    }

    /// Map a port code back to its [Port], if any port uses it.
    #[must_use]
    pub fn decode(&self, code: usize, nodes_per_switch: usize) -> Option<Port> {
        if code >= self.local && code - self.local < nodes_per_switch {
            return Some(Port::Local((code - self.local) as u64));
        }
        Port::MESH_LINKS
            .into_iter()
            .find(|port| self.code(*port) == code)
    }

    pub(crate) fn validate(&self, nodes_per_switch: usize) -> Result<(), RoutingError> {
        let Some(local_end) = self.local.checked_add(nodes_per_switch) else {
            return config_error!(
                "local port base {} with {nodes_per_switch} local ports overflows",
                self.local
            );
        };

        let links = [
            (Port::Left, self.left),
            (Port::Right, self.right),
            (Port::Top, self.top),
            (Port::Bottom, self.bottom),
        ];
        for (i, (port, code)) in links.iter().enumerate() {
            if (self.local..local_end).contains(code) {
                return config_error!(
                    "{port} port code {code} overlaps local ports {}..{local_end}",
                    self.local
                );
            }
            if let Some((other, _)) = links[i + 1..].iter().find(|(_, c)| c == code) {
                return config_error!("{port} and {other} ports share code {code}");
            }
        }
        Ok(())
    }
}

#[test]
fn default_codes_round_trip() {
    let offsets = PortOffsets::after_local_ports(2);
    assert_eq!(offsets.code(Port::Local(1)), 1);
    assert_eq!(offsets.code(Port::Left), 2);
    assert_eq!(offsets.code(Port::Bottom), 5);

    for code in 0..6 {
        let port = offsets.decode(code, 2).unwrap();
        assert_eq!(offsets.code(port), code);
    }
    assert_eq!(offsets.decode(6, 2), None);
}

#[test]
fn overlapping_codes_rejected() {
    let mut offsets = PortOffsets::after_local_ports(4);
    offsets.top = 3;
    assert!(offsets.validate(4).unwrap_err().is_configuration_error());

    let mut offsets = PortOffsets::after_local_ports(1);
    offsets.bottom = offsets.left;
    let err = offsets.validate(1).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Configuration error: left and bottom ports share code 1"
    );
}
