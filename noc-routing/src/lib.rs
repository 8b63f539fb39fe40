// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

#![doc(test(attr(warn(unused))))]

//! Routing decisions for a 2D mesh network-on-chip.
//!
//! Given the source and destination addresses of a flit and the switch that
//! currently holds it, this library works out which output port of the switch
//! the flit must be forwarded to next.
//!
//! The main pieces are:
//!  - the [mesh geometry](crate::config::MeshConfig), created once at startup
//!    and shared read-only by everything else.
//!  - the [address codec](crate::address) that splits node addresses and
//!    switch ids into their fields.
//!  - two [routing algorithms](crate::router): static dimension-order routing
//!    and table-driven routing from [precomputed tables](crate::tables).
//!  - the [MeshRouter](crate::mesh_router::MeshRouter) which is the only thing
//!    a simulation engine needs to call.
//!
//! # Simple Application
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use noc_routing::config::MeshConfig;
//! use noc_routing::mesh_router::{MeshRouter, RoutingAlgorithm};
//! use noc_routing::port::Port;
//! use noc_routing::types::{NodeAddress, SwitchId};
//!
//! let config = Arc::new(MeshConfig::with_dimensions(4, 4, 0).unwrap());
//! let router = MeshRouter::new(RoutingAlgorithm::Static, config.clone(), None).unwrap();
//!
//! let path = router.trace_path(NodeAddress(0), NodeAddress(5)).unwrap();
//! assert_eq!(path.switches(), &[SwitchId(0), SwitchId(4), SwitchId(5)]);
//! assert_eq!(path.local_port(), Port::Local(0));
//! ```

pub mod address;
pub mod config;
pub mod mesh_router;
pub mod path;
pub mod port;
pub mod router;
pub mod tables;
pub mod test_helpers;
pub mod types;
