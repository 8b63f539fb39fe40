// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Encoding and decoding of node addresses and switch ids.
//!
//! Addresses are laid out as
//! ```txt
//!  node address: | row | column | local node |
//!                        <------> column_bits
//!                                 <----------> node_local_bits
//!  switch id:    | row | column |
//! ```
//!
//! These functions assume well-formed inputs and never fail. The
//! [MeshConfig](crate::config::MeshConfig) exposes the same operations using
//! its configured bit widths.

use crate::types::{NodeAddress, SwitchId};

#[must_use]
pub fn switch_of(node: NodeAddress, node_local_bits: u32) -> SwitchId {
    SwitchId(node.0 >> node_local_bits)
}

/// Index of the endpoint within `switch`.
///
/// Uses subtraction rather than masking so that the result only makes sense
/// when `node` really is attached to `switch`.
#[must_use]
pub fn local_node_of(node: NodeAddress, switch: SwitchId, node_local_bits: u32) -> u64 {
    node.0.wrapping_sub(switch.0 << node_local_bits)
}

#[must_use]
pub fn row_of(switch: SwitchId, column_bits: u32) -> u64 {
    switch.0 >> column_bits
}

#[must_use]
pub fn col_of(switch: SwitchId, column_bits: u32) -> u64 {
    switch.0 & column_mask(column_bits)
}

#[must_use]
pub fn switch_at(row: u64, col: u64, column_bits: u32) -> SwitchId {
    SwitchId((row << column_bits) | (col & column_mask(column_bits)))
}

#[must_use]
pub fn node_at(switch: SwitchId, local_node: u64, node_local_bits: u32) -> NodeAddress {
    NodeAddress((switch.0 << node_local_bits) | local_node)
}

#[must_use]
fn column_mask(column_bits: u32) -> u64 {
    (1 << column_bits) - 1
}

#[test]
fn decode_four_by_four() {
    let column_bits = 2;
    let node_local_bits = 0;

    let switch = switch_of(NodeAddress(5), node_local_bits);
    assert_eq!(switch, SwitchId(5));
    assert_eq!(row_of(switch, column_bits), 1);
    assert_eq!(col_of(switch, column_bits), 1);
    assert_eq!(local_node_of(NodeAddress(5), switch, node_local_bits), 0);

    assert_eq!(switch_at(3, 2, column_bits), SwitchId(14));
    assert_eq!(row_of(SwitchId(14), column_bits), 3);
    assert_eq!(col_of(SwitchId(14), column_bits), 2);
}

#[test]
fn decode_with_local_nodes() {
    let column_bits = 3;
    let node_local_bits = 2;

    // Row 2, column 5, endpoint 3
    let node = node_at(switch_at(2, 5, column_bits), 3, node_local_bits);
    assert_eq!(node, NodeAddress(0b10_101_11));

    let switch = switch_of(node, node_local_bits);
    assert_eq!(switch, SwitchId(0b10_101));
    assert_eq!(row_of(switch, column_bits), 2);
    assert_eq!(col_of(switch, column_bits), 5);
    assert_eq!(local_node_of(node, switch, node_local_bits), 3);
}
