// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::io::Write;

use clap::Parser;
use log::LevelFilter;
use noc_route::{Config, SweepSummary, run, sweep_all_pairs, trace_one};
use noc_routing::mesh_router::RoutingAlgorithm;
use noc_routing::port::Port;
use noc_routing::types::{NodeAddress, SwitchId};
use serial_test::serial;
use tempfile::NamedTempFile;

const TWO_SWITCH_TABLES: &str = "
flows:
  - { source: 0, destination: 1, flow: 0 }
  - { source: 1, destination: 0, flow: 1 }
next_hops:
  - { switch: 0, flow: 0, direction: 2 }
  - { switch: 1, flow: 1, direction: 1 }
";

fn cli(args: &[&str]) -> Config {
    Config::try_parse_from(std::iter::once("noc-route").chain(args.iter().copied())).unwrap()
}

fn temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn defaults_without_other_sources() {
    let config = Config::from_sources(cli(&[])).unwrap();
    assert_eq!(config.columns, Some(4));
    assert_eq!(config.rows, Some(4));
    assert_eq!(config.algorithm, Some(RoutingAlgorithm::Static));
    assert_eq!(config.log_level(), LevelFilter::Warn);

    let router = config.build_router().unwrap();
    assert_eq!(router.config().num_switches(), 16);
    assert_eq!(router.config().column_bits(), 2);
}

#[test]
#[serial]
fn command_line_overrides_conf_file() {
    let conf_file = temp_file("columns = 8\nrows = 2\nalgorithm = \"computed\"\nlog_level = \"debug\"\n");
    let path = conf_file.path().to_str().unwrap();

    let config = Config::from_sources(cli(&["--conf-file", path, "--rows", "3"])).unwrap();
    assert_eq!(config.columns, Some(8));
    assert_eq!(config.rows, Some(3));
    assert_eq!(config.algorithm, Some(RoutingAlgorithm::Computed));
    assert_eq!(config.log_level(), LevelFilter::Debug);
}

#[test]
#[serial]
#[should_panic(expected = "not found")]
fn missing_conf_file() {
    Config::from_sources(cli(&["--conf-file", "no/such/file.toml"])).unwrap();
}

#[test]
#[serial]
fn environment_overrides_defaults() {
    // SAFETY: tests that read the environment are run serially
    unsafe {
        std::env::set_var("NOC_COLUMNS", "6");
        std::env::set_var("NOC_ALGORITHM", "computed");
    }
    let from_env = Config::from_sources(cli(&[]));
    let from_cli = Config::from_sources(cli(&["--columns", "2"]));
    unsafe {
        std::env::remove_var("NOC_COLUMNS");
        std::env::remove_var("NOC_ALGORITHM");
    }

    let from_env = from_env.unwrap();
    assert_eq!(from_env.columns, Some(6));
    assert_eq!(from_env.algorithm, Some(RoutingAlgorithm::Computed));
    assert_eq!(from_cli.unwrap().columns, Some(2));
}

#[test]
#[serial]
fn computed_router_from_table_file() {
    let tables = temp_file(TWO_SWITCH_TABLES);
    let path = tables.path().to_str().unwrap();

    let config = Config::from_sources(cli(&[
        "--columns",
        "2",
        "--rows",
        "1",
        "--algorithm",
        "computed",
        "--tables",
        path,
    ]))
    .unwrap();
    let router = config.build_router().unwrap();

    let path = trace_one(&router, NodeAddress(0), NodeAddress(1)).unwrap();
    assert_eq!(path.switches(), &[SwitchId(0), SwitchId(1)]);
    assert_eq!(path.ports(), &[Port::Right, Port::Local(0)]);

    assert_eq!(
        sweep_all_pairs(&router),
        SweepSummary {
            paths: 4,
            failures: 0,
            total_hops: 2,
            max_hops: 1,
        }
    );
}

#[test]
#[serial]
fn sweep_counts_failures() {
    // Only the flow from node 0 to node 1 can be routed
    let tables = temp_file(
        "
flows:
  - { source: 0, destination: 1, flow: 0 }
next_hops:
  - { switch: 0, flow: 0, direction: 2 }
",
    );
    let path = tables.path().to_str().unwrap();
    let config = Config::from_sources(cli(&[
        "--columns",
        "2",
        "--rows",
        "1",
        "--algorithm",
        "computed",
        "--tables",
        path,
    ]))
    .unwrap();

    let summary = sweep_all_pairs(&config.build_router().unwrap());
    assert_eq!(summary.paths, 4);
    assert_eq!(summary.failures, 1);
    assert_eq!(
        summary.to_string(),
        "4 paths, 1 failed, 1 hops in total, longest 1 hops"
    );
}

#[test]
#[serial]
fn static_sweep_of_default_mesh() {
    let config = Config::from_sources(cli(&[])).unwrap();
    let summary = sweep_all_pairs(&config.build_router().unwrap());
    assert_eq!(summary.paths, 256);
    assert_eq!(summary.failures, 0);
    assert_eq!(summary.max_hops, 6);
    // Mean distance between switches of a 4x4 mesh is 2.5 hops
    assert_eq!(summary.total_hops, 640);
}

#[test]
#[serial]
fn run_single_path() {
    let config = Config::from_sources(cli(&["--source", "0", "--destination", "15"])).unwrap();
    run(&config).unwrap();
}

#[test]
#[serial]
#[should_panic(expected = "needs both a source and a destination")]
fn run_needs_source_and_destination() {
    let config = Config::from_sources(cli(&["--source", "0"])).unwrap();
    run(&config).unwrap();
}

#[test]
#[serial]
#[should_panic(expected = "node 16 is not part of the mesh")]
fn trace_outside_mesh() {
    let config = Config::from_sources(cli(&[])).unwrap();
    let router = config.build_router().unwrap();
    trace_one(&router, NodeAddress(0), NodeAddress(16)).unwrap();
}

#[test]
#[serial]
#[should_panic(expected = "requires routing tables")]
fn computed_without_table_file() {
    let config = Config::from_sources(cli(&["--algorithm", "computed"])).unwrap();
    config.build_router().unwrap();
}
