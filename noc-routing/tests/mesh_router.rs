// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::sync::Arc;
use std::thread;

use noc_routing::config::MeshConfig;
use noc_routing::mesh_router::{MeshRouter, RoutingAlgorithm};
use noc_routing::port::Port;
use noc_routing::test_helpers::{DimensionOrder, create_mesh, dimension_order_tables};
use noc_routing::types::{NodeAddress, SwitchId};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn algorithm_selected_at_construction() {
    let config = create_mesh(4, 4, 0);
    let tables = Arc::new(dimension_order_tables(&config, DimensionOrder::ColumnFirst));

    let router = MeshRouter::new(
        RoutingAlgorithm::Static,
        config.clone(),
        Some(tables.clone()),
    )
    .unwrap();
    assert_eq!(router.algorithm(), RoutingAlgorithm::Static);
    assert_eq!(
        router.route_port(NodeAddress(0), NodeAddress(5), SwitchId(0)),
        Ok(Port::Bottom)
    );

    let router = MeshRouter::new(RoutingAlgorithm::Computed, config, Some(tables)).unwrap();
    assert_eq!(router.algorithm(), RoutingAlgorithm::Computed);
    assert_eq!(
        router.route_port(NodeAddress(0), NodeAddress(5), SwitchId(0)),
        Ok(Port::Right)
    );
}

#[test]
fn mesh_from_yaml() {
    let config = MeshConfig::from_string(
        "
columns: 4
rows: 2
node_local_bits: 1
ports:
  local: 4
  left: 0
  right: 1
  top: 2
  bottom: 3
",
    )
    .unwrap();
    assert_eq!(config.column_bits(), 2);
    assert_eq!(config.nodes_per_switch(), 2);

    let router = MeshRouter::new_static(Arc::new(config));
    // Endpoint 1 of switch 5 (row 1, column 1)
    let destination = NodeAddress(11);
    assert_eq!(
        router.route(NodeAddress(0), destination, SwitchId(0)),
        Ok(3)
    );
    assert_eq!(
        router.route(NodeAddress(0), destination, SwitchId(5)),
        Ok(5)
    );
}

#[test]
fn mesh_yaml_defaults() {
    let config = MeshConfig::from_string("{ columns: 8, rows: 8 }").unwrap();
    assert_eq!(config.column_bits(), 3);
    assert_eq!(config.node_local_bits(), 0);
    assert_eq!(config.port_offsets().left, 1);
    assert_eq!(config.port_offsets().bottom, 4);
}

#[test]
fn shared_between_threads() {
    assert_send_sync::<MeshRouter>();

    let config = create_mesh(8, 8, 1);
    let router = MeshRouter::new_static(config.clone());

    thread::scope(|s| {
        for row in 0..config.num_rows() as u64 {
            let router = &router;
            let config = &config;
            s.spawn(move || {
                let source = config.node_at(config.switch_at(row, 0), 0);
                for destination in config.nodes() {
                    let path = router.trace_path(source, destination).unwrap();
                    assert_eq!(path.destination_switch(), config.switch_of(destination));
                }
            });
        }
    });
}
