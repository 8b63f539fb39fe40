// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

/// Benchmark the cost of individual routing decisions.
use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use noc_routing::mesh_router::MeshRouter;
use noc_routing::test_helpers::{DimensionOrder, create_mesh, dimension_order_tables};
use noc_routing::types::NodeAddress;

/// Route every endpoint to every other endpoint from the source's switch
fn route_all_pairs(router: &MeshRouter, nodes: &[NodeAddress]) {
    let config = router.config();
    for source in nodes {
        let switch = config.switch_of(*source);
        for destination in nodes {
            black_box(router.route(*source, *destination, switch).unwrap());
        }
    }
}

fn bench_routing(c: &mut Criterion) {
    let config = create_mesh(8, 8, 1);
    let nodes: Vec<NodeAddress> = config.nodes().collect();

    let static_router = MeshRouter::new_static(config.clone());
    c.bench_function("static_all_pairs", |b| {
        b.iter(|| route_all_pairs(&static_router, &nodes));
    });

    let tables = Arc::new(dimension_order_tables(&config, DimensionOrder::RowFirst));
    let computed_router = MeshRouter::new_computed(config.clone(), tables);
    c.bench_function("computed_all_pairs", |b| {
        b.iter(|| route_all_pairs(&computed_router, &nodes));
    });

    c.bench_function("static_trace_path", |b| {
        b.iter(|| {
            black_box(
                static_router
                    .trace_path(nodes[0], nodes[nodes.len() - 1])
                    .unwrap(),
            )
        });
    });
}

criterion_group!(benches, bench_routing);
criterion_main!(benches);
