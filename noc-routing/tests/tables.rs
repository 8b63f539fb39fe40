// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::io::Write;
use std::sync::Arc;

use noc_routing::mesh_router::{MeshRouter, RoutingAlgorithm};
use noc_routing::port::Direction;
use noc_routing::tables::RoutingTables;
use noc_routing::test_helpers::create_mesh;
use noc_routing::types::{FlowId, NodeAddress, RoutingFailure, SwitchId};

const TABLES: &str = "
flows:
  - { source: 0, destination: 5, flow: 0 }
  - { source: 5, destination: 0, flow: 1 }
next_hops:
  - { switch: 0, flow: 0, direction: 2 }
  - { switch: 1, flow: 0, direction: 4 }
  - { switch: 5, flow: 1, direction: 3 }
  - { switch: 1, flow: 1, direction: 1 }
";

#[test]
fn parse_tables() {
    let tables = RoutingTables::from_string(TABLES).unwrap();

    assert_eq!(tables.flows().len(), 2);
    assert_eq!(tables.next_hops().len(), 4);
    assert_eq!(
        tables.flows().get(NodeAddress(5), NodeAddress(0)),
        Ok(FlowId(1))
    );
    assert_eq!(
        tables.next_hops().get(SwitchId(5), FlowId(1)),
        Ok(Direction::Top)
    );
    assert_eq!(
        tables.flows().get(NodeAddress(0), NodeAddress(1)),
        Err(RoutingFailure::MissingFlow {
            source: NodeAddress(0),
            destination: NodeAddress(1),
        })
    );
}

#[test]
fn empty_sections_allowed() {
    let tables = RoutingTables::from_string("flows:\nnext_hops:\n").unwrap();
    assert!(tables.flows().is_empty());
    assert!(tables.next_hops().is_empty());
}

#[test]
fn load_tables_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(TABLES.as_bytes()).unwrap();

    let tables = Arc::new(RoutingTables::from_file(file.path()).unwrap());
    let config = create_mesh(4, 4, 0);
    let router = MeshRouter::new(RoutingAlgorithm::Computed, config, Some(tables)).unwrap();

    let there = router.trace_path(NodeAddress(0), NodeAddress(5)).unwrap();
    assert_eq!(there.switches(), &[SwitchId(0), SwitchId(1), SwitchId(5)]);
    let back = router.trace_path(NodeAddress(5), NodeAddress(0)).unwrap();
    assert_eq!(back.switches(), &[SwitchId(5), SwitchId(1), SwitchId(0)]);
}

#[test]
#[should_panic(expected = "Duplicate flow from node 0 to node 5")]
fn duplicate_flow() {
    RoutingTables::from_string(
        "
flows:
  - { source: 0, destination: 5, flow: 0 }
  - { source: 0, destination: 5, flow: 1 }
",
    )
    .unwrap();
}

#[test]
#[should_panic(expected = "Duplicate next hop for flow 0 at switch 1")]
fn duplicate_next_hop() {
    RoutingTables::from_string(
        "
next_hops:
  - { switch: 1, flow: 0, direction: 4 }
  - { switch: 1, flow: 0, direction: 2 }
",
    )
    .unwrap();
}

#[test]
#[should_panic(expected = "serde_yaml::from_str failed")]
fn malformed_tables() {
    RoutingTables::from_string("flows: [ { source: left } ]").unwrap();
}

#[test]
#[should_panic(expected = "Unable to read")]
fn missing_tables_file() {
    let dir = tempfile::tempdir().unwrap();
    RoutingTables::from_file(&dir.path().join("missing.yaml")).unwrap();
}
