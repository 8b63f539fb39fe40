// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use noc_route::{Config, run, setup_logger};
use noc_routing::types::RoutingError;

fn main() -> Result<(), RoutingError> {
    let config = Config::parse_all_sources()?;
    setup_logger(config.log_level());
    run(&config)
}
