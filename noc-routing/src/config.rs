// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Mesh geometry configuration.
//!
//! The mesh is a rectangular grid of `num_columns` x `num_rows` switches.
//! Each switch has `2^node_local_bits` endpoints attached to it. Switch ids
//! always reserve `column_bits` bits for the column so that the row and column
//! can be recovered with a shift and a mask.
//!
//! A [MeshConfig] is created once, validated, and then shared (usually in an
//! [Arc](std::sync::Arc)) with every router. It is never modified afterwards.

use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::address;
use crate::config_error;
use crate::port::{Port, PortOffsets};
use crate::types::{NodeAddress, RoutingError, SwitchId};

/// Serialized description of a mesh, as found in configuration files.
///
/// Any bit width that is not given is derived from the dimensions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeshSection {
    pub columns: usize,
    pub rows: usize,
    pub node_local_bits: Option<u32>,
    pub column_bits: Option<u32>,
    pub ports: Option<PortOffsets>,
}

/// Validated geometry of a mesh
#[derive(Clone, Debug, PartialEq)]
pub struct MeshConfig {
    /// Number of columns of switches
    num_columns: usize,

    /// Number of rows of switches
    num_rows: usize,

    /// Width of the local endpoint field of a node address
    node_local_bits: u32,

    /// Width of the column field of a switch id
    column_bits: u32,

    /// Codes handed back for each output port
    port_offsets: PortOffsets,
}

/// Number of bits needed to represent the values `0..n`.
#[must_use]
pub fn bits_for(n: usize) -> u32 {
    usize::BITS - n.saturating_sub(1).leading_zeros()
}

impl MeshConfig {
    /// Create and validate a mesh configuration.
    ///
    /// When `port_offsets` is `None` the mesh links are numbered directly after
    /// the local ports (see [PortOffsets::after_local_ports]).
    pub fn new(
        num_columns: usize,
        num_rows: usize,
        node_local_bits: u32,
        column_bits: u32,
        port_offsets: Option<PortOffsets>,
    ) -> Result<Self, RoutingError> {
        if num_columns == 0 || num_rows == 0 {
            return config_error!("Cannot create a {num_columns}x{num_rows} mesh");
        }
        if node_local_bits >= usize::BITS {
            return config_error!("{node_local_bits} node local bits is too many");
        }
        if column_bits >= u64::BITS {
            return config_error!("{column_bits} column bits is too many");
        }
        if bits_for(num_columns) > column_bits {
            return config_error!("{num_columns} columns do not fit in {column_bits} column bits");
        }
        let address_bits = node_local_bits + column_bits + bits_for(num_rows);
        if address_bits > u64::BITS {
            return config_error!(
                "Node addresses need {address_bits} bits, only {} available",
                u64::BITS
            );
        }

        let nodes_per_switch = 1_usize << node_local_bits;
        let port_offsets =
            port_offsets.unwrap_or_else(|| PortOffsets::after_local_ports(nodes_per_switch));
        port_offsets.validate(nodes_per_switch)?;

        if !num_columns.is_power_of_two() {
            warn!(
                "{num_columns} columns is not a power of two: column codes {num_columns}..{} are unused",
                1_u64 << column_bits
            );
        }
        debug!(
            "Mesh {num_columns}x{num_rows}, {node_local_bits} node bits, {column_bits} column bits, ports {port_offsets:?}"
        );

        Ok(Self {
            num_columns,
            num_rows,
            node_local_bits,
            column_bits,
            port_offsets,
        })
    }

    /// Create a mesh using the narrowest column field and the default port
    /// numbering.
    pub fn with_dimensions(
        num_columns: usize,
        num_rows: usize,
        node_local_bits: u32,
    ) -> Result<Self, RoutingError> {
        Self::new(
            num_columns,
            num_rows,
            node_local_bits,
            bits_for(num_columns),
            None,
        )
    }

    pub fn from_section(section: &MeshSection) -> Result<Self, RoutingError> {
        Self::new(
            section.columns,
            section.rows,
            section.node_local_bits.unwrap_or(0),
            section
                .column_bits
                .unwrap_or_else(|| bits_for(section.columns)),
            section.ports,
        )
    }

    pub fn from_file(mesh_path: &Path) -> Result<Self, RoutingError> {
        let s = std::fs::read_to_string(mesh_path).map_err(|e| {
            RoutingError::Configuration(format!("Unable to read {}: {e}", mesh_path.display()))
        })?;
        Self::from_string(&s)
    }

    pub fn from_string(mesh_config: &str) -> Result<Self, RoutingError> {
        let section: MeshSection = serde_yaml::from_str(mesh_config).map_err(|e| {
            RoutingError::Configuration(format!("serde_yaml::from_str failed: {e}"))
        })?;
        Self::from_section(&section)
    }

    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[must_use]
    pub fn node_local_bits(&self) -> u32 {
        self.node_local_bits
    }

    #[must_use]
    pub fn column_bits(&self) -> u32 {
        self.column_bits
    }

    #[must_use]
    pub fn port_offsets(&self) -> &PortOffsets {
        &self.port_offsets
    }

    #[must_use]
    pub fn nodes_per_switch(&self) -> usize {
        1 << self.node_local_bits
    }

    #[must_use]
    pub fn num_switches(&self) -> usize {
        self.num_columns * self.num_rows
    }

    #[must_use]
    pub fn switch_of(&self, node: NodeAddress) -> SwitchId {
        address::switch_of(node, self.node_local_bits)
    }

    #[must_use]
    pub fn local_node_of(&self, node: NodeAddress, switch: SwitchId) -> u64 {
        address::local_node_of(node, switch, self.node_local_bits)
    }

    #[must_use]
    pub fn row_of(&self, switch: SwitchId) -> u64 {
        address::row_of(switch, self.column_bits)
    }

    #[must_use]
    pub fn col_of(&self, switch: SwitchId) -> u64 {
        address::col_of(switch, self.column_bits)
    }

    #[must_use]
    pub fn switch_at(&self, row: u64, col: u64) -> SwitchId {
        address::switch_at(row, col, self.column_bits)
    }

    #[must_use]
    pub fn node_at(&self, switch: SwitchId, local_node: u64) -> NodeAddress {
        address::node_at(switch, local_node, self.node_local_bits)
    }

    #[must_use]
    pub fn contains_switch(&self, switch: SwitchId) -> bool {
        self.row_of(switch) < self.num_rows as u64 && self.col_of(switch) < self.num_columns as u64
    }

    #[must_use]
    pub fn contains_node(&self, node: NodeAddress) -> bool {
        self.contains_switch(self.switch_of(node))
    }

    /// All switches of the mesh in row-major order
    pub fn switches(&self) -> impl Iterator<Item = SwitchId> + '_ {
        (0..self.num_rows as u64)
            .flat_map(move |row| (0..self.num_columns as u64).map(move |col| (row, col)))
            .map(move |(row, col)| self.switch_at(row, col))
    }

    /// All endpoints of the mesh, grouped by switch
    pub fn nodes(&self) -> impl Iterator<Item = NodeAddress> + '_ {
        let nodes_per_switch = self.nodes_per_switch() as u64;
        self.switches()
            .flat_map(move |switch| (0..nodes_per_switch).map(move |n| self.node_at(switch, n)))
    }

    /// The switch reached by leaving `switch` through `port`.
    ///
    /// Returns `None` for local ports and for links off the edge of the mesh.
    #[must_use]
    pub fn neighbour(&self, switch: SwitchId, port: Port) -> Option<SwitchId> {
        let row = self.row_of(switch);
        let col = self.col_of(switch);
        let (row, col) = match port {
            Port::Local(_) => return None,
            Port::Left => (row, col.checked_sub(1)?),
            Port::Right => (row, col + 1),
            Port::Top => (row.checked_sub(1)?, col),
            Port::Bottom => (row + 1, col),
        };
        if row < self.num_rows as u64 && col < self.num_columns as u64 {
            Some(self.switch_at(row, col))
        } else {
            None
        }
    }

    /// Manhattan distance between two switches
    #[must_use]
    pub fn hop_distance(&self, from: SwitchId, to: SwitchId) -> u64 {
        self.row_of(from).abs_diff(self.row_of(to)) + self.col_of(from).abs_diff(self.col_of(to))
    }

    #[must_use]
    pub fn port_code(&self, port: Port) -> usize {
        self.port_offsets.code(port)
    }

    #[must_use]
    pub fn decode_port(&self, code: usize) -> Option<Port> {
        self.port_offsets.decode(code, self.nodes_per_switch())
    }
}

#[test]
fn bits_for_dimensions() {
    assert_eq!(bits_for(1), 0);
    assert_eq!(bits_for(2), 1);
    assert_eq!(bits_for(4), 2);
    assert_eq!(bits_for(5), 3);
    assert_eq!(bits_for(8), 3);
}

#[test]
fn neighbours_stop_at_edges() {
    let config = MeshConfig::with_dimensions(3, 2, 0).unwrap();
    let corner = config.switch_at(0, 0);
    assert_eq!(config.neighbour(corner, Port::Left), None);
    assert_eq!(config.neighbour(corner, Port::Top), None);
    assert_eq!(
        config.neighbour(corner, Port::Right),
        Some(config.switch_at(0, 1))
    );
    assert_eq!(
        config.neighbour(corner, Port::Bottom),
        Some(config.switch_at(1, 0))
    );

    let far = config.switch_at(1, 2);
    assert_eq!(config.neighbour(far, Port::Right), None);
    assert_eq!(config.neighbour(far, Port::Bottom), None);
    assert_eq!(config.neighbour(far, Port::Local(0)), None);
}

#[test]
fn switches_skip_unused_column_codes() {
    let config = MeshConfig::with_dimensions(3, 2, 0).unwrap();
    let switches: Vec<u64> = config.switches().map(|s| s.0).collect();
    assert_eq!(switches, vec![0, 1, 2, 4, 5, 6]);
    assert!(!config.contains_switch(SwitchId(3)));
    assert_eq!(config.nodes().count(), 6);
}
