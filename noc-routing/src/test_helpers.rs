// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Helpers for building meshes and routing tables in tests and benchmarks.

use std::sync::Arc;

use crate::config::MeshConfig;
use crate::port::{Direction, Port};
use crate::tables::{FlowTable, NextHopTable, RoutingTables};
use crate::types::{FlowId, NodeAddress, SwitchId};

#[must_use]
pub fn create_mesh(num_columns: usize, num_rows: usize, node_local_bits: u32) -> Arc<MeshConfig> {
    Arc::new(
        MeshConfig::with_dimensions(num_columns, num_rows, node_local_bits)
            .expect("should be able to create mesh"),
    )
}

/// Which offset a generated table resolves first
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DimensionOrder {
    RowFirst,
    ColumnFirst,
}

/// Direction to take from `from` towards `to`, which must be different
/// switches.
#[must_use]
pub fn dimension_order_step(
    config: &MeshConfig,
    from: SwitchId,
    to: SwitchId,
    order: DimensionOrder,
) -> Direction {
    let (from_row, from_col) = (config.row_of(from), config.col_of(from));
    let (to_row, to_col) = (config.row_of(to), config.col_of(to));

    let row_direction = match to_row.cmp(&from_row) {
        std::cmp::Ordering::Less => Some(Direction::Top),
        std::cmp::Ordering::Greater => Some(Direction::Bottom),
        std::cmp::Ordering::Equal => None,
    };
    let col_direction = match to_col.cmp(&from_col) {
        std::cmp::Ordering::Less => Some(Direction::Left),
        std::cmp::Ordering::Greater => Some(Direction::Right),
        std::cmp::Ordering::Equal => None,
    };
    match order {
        DimensionOrder::RowFirst => row_direction.or(col_direction),
        DimensionOrder::ColumnFirst => col_direction.or(row_direction),
    }
    .expect("switches should be different")
}

/// Build tables that give every (source, destination) pair of the mesh its
/// own flow routed in dimension order.
///
/// This stands in for the external table generator.
#[must_use]
pub fn dimension_order_tables(config: &MeshConfig, order: DimensionOrder) -> RoutingTables {
    let mut flows = FlowTable::new();
    let mut next_hops = NextHopTable::new();

    let nodes: Vec<NodeAddress> = config.nodes().collect();
    let pairs = nodes
        .iter()
        .flat_map(|source| nodes.iter().map(move |destination| (*source, *destination)));
    for (i, (source, destination)) in pairs.enumerate() {
        let flow = FlowId(i as u64);
        flows
            .insert(source, destination, flow)
            .expect("pairs should be unique");

        let dest_switch = config.switch_of(destination);
        let mut switch = config.switch_of(source);
        while switch != dest_switch {
            let direction = dimension_order_step(config, switch, dest_switch, order);
            next_hops
                .insert(switch, flow, direction as u8)
                .expect("paths should not revisit a switch");
            switch = config
                .neighbour(switch, Port::from(direction))
                .expect("dimension order should stay in the mesh");
        }
    }
    RoutingTables::new(flows, next_hops)
}
