//! Command-line definition.

use clap::{App, Arg, ArgMatches, SubCommand};

pub fn parse_command_line() -> ArgMatches<'static> {
    let curves_option = Arg::with_name("curves")
        .long("curves")
        .short("c")
        .takes_value(true)
        .value_name("FILE")
        .help("Keyframe curve definitions (JSON); defaults to the built-in two-segment scene");

    let offsets_option = Arg::with_name("offsets")
        .long("offsets")
        .short("o")
        .takes_value(true)
        .value_name("FILE")
        .help("Per-unit base offsets (JSON); defaults to two units 4 apart along y");

    let config_option = Arg::with_name("config")
        .long("config")
        .takes_value(true)
        .value_name("FILE")
        .help("SwarmConfig as JSON; flags below override its fields");

    let out_dir_option = Arg::with_name("out-dir")
        .long("out-dir")
        .short("d")
        .takes_value(true)
        .value_name("DIR")
        .default_value("output/flsim");

    let drift_option = Arg::with_name("drift")
        .long("drift")
        .takes_value(true)
        .possible_values(&["neutral", "split_rate"]);

    let frame_rate_option = Arg::with_name("frame-rate")
        .long("frame-rate")
        .short("r")
        .takes_value(true);

    let threads_option = Arg::with_name("threads")
        .long("threads")
        .short("j")
        .takes_value(true)
        .help("Worker threads (only with the `parallel` feature)");

    let interval_option = Arg::with_name("interval")
        .long("interval")
        .takes_value(true)
        .help("Write a tick row every N ticks; 0 writes none");

    let check_subcommand = SubCommand::with_name("check")
        .about("Row-wise distances between two header-less x,y,z CSV files")
        .arg(Arg::with_name("expected").required(true).index(1))
        .arg(Arg::with_name("actual").required(true).index(2))
        .arg(
            Arg::with_name("out")
                .long("out")
                .takes_value(true)
                .default_value("waypoint_checker.csv"),
        );

    App::new("flsim")
        .version(env!("CARGO_PKG_VERSION"))
        .about("FLS swarm trajectory simulator")
        .arg(curves_option)
        .arg(offsets_option)
        .arg(config_option)
        .arg(out_dir_option)
        .arg(drift_option)
        .arg(frame_rate_option)
        .arg(threads_option)
        .arg(interval_option)
        .subcommand(check_subcommand)
        .get_matches()
}
