use clap::{arg, command};
use roadnet_core::store::DEFAULT_NETWORK_PATH;
use roadnet_provider::overpass::DEFAULT_ENDPOINT;
use roadnet_provider::{BoundingBox, NetworkType};
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

fn canvas_args(command: clap::Command) -> clap::Command {
    command
        .arg(
            arg!(--"width" <PIXELS>)
                .required(false)
                .help("Canvas width")
                .value_parser(clap::value_parser!(f64))
                .default_value("750"),
        )
        .arg(
            arg!(--"height" <PIXELS>)
                .required(false)
                .help("Canvas height")
                .value_parser(clap::value_parser!(f64))
                .default_value("550"),
        )
        .arg(
            arg!(--"margin" <PIXELS>)
                .required(false)
                .help("Margin kept clear on every side of the canvas")
                .value_parser(clap::value_parser!(f64))
                .default_value("25"),
        )
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("roadnet")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("roadnet")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Log debug details to stderr")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(canvas_args(
            command!("fetch")
                .about(
                    "Fetch a road network from OpenStreetMap and write it as node-link JSON \
                laid out on a fixed canvas.",
                )
                .arg(
                    arg!(-b --"bbox" <BBOX>)
                        .required(false)
                        .help(format!(
                            "Bounding box as min_lat,min_lon,max_lat,max_lon [default: {}]",
                            BoundingBox::default()
                        ))
                        .allow_hyphen_values(true),
                )
                .arg(
                    arg!(-n --"network-type" <TYPE>)
                        .required(false)
                        .help("Which ways make up the network")
                        .value_parser(NetworkType::variants().to_vec())
                        .default_value("drive"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Where to write the network JSON (overwritten)")
                        .default_value(DEFAULT_NETWORK_PATH),
                )
                .arg(
                    arg!(--"endpoint" <URL>)
                        .required(false)
                        .help("Overpass API interpreter endpoint")
                        .value_parser(clap::value_parser!(Url))
                        .default_value(DEFAULT_ENDPOINT),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Provider request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("180"),
                )
                .arg(
                    arg!(--"seed" <SEED>)
                        .required(false)
                        .help("Seed for edge weights (default: random each run)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--"no-simplify")
                        .required(false)
                        .help("Keep every way node instead of only intersections and dead ends")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"retain-all")
                        .required(false)
                        .help("Keep road fragments that are not connected to the main network")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"label-scheme" <SCHEME>)
                        .required(false)
                        .help("Node label scheme: legacy keeps labels of earlier datasets")
                        .value_parser(["legacy", "spreadsheet"])
                        .default_value("legacy"),
                )
                .arg(
                    arg!(--"padding" <FRACTION>)
                        .required(false)
                        .help("Fraction of the coordinate range added around the network")
                        .value_parser(clap::value_parser!(f64))
                        .default_value("0.1"),
                )
                .arg(
                    arg!(--"allow-empty")
                        .required(false)
                        .help("Write the output even if the provider returns no roads")
                        .action(clap::ArgAction::SetTrue),
                ),
        ))
        .subcommand(
            command!("filter")
                .about(
                    "Drop nodes left of the westernmost reference node, and every edge \
                touching them.",
                )
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(false)
                        .help("Network JSON to filter")
                        .default_value(DEFAULT_NETWORK_PATH),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Where to write the result (default: overwrite the input)"),
                )
                .arg(
                    arg!(-r --"reference-ids" <IDS>)
                        .required(false)
                        .help("Comma-separated reference node ids (default: built-in Athens set)")
                        .value_delimiter(',')
                        .action(clap::ArgAction::Append),
                )
                .arg(
                    arg!(--"skip-missing")
                        .required(false)
                        .help("Ignore reference ids that are not in the network instead of failing")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(canvas_args(
            command!("validate")
                .about("Check a network JSON file for dangling edges, duplicate ids and bounds.")
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(false)
                        .help("Network JSON to check")
                        .default_value(DEFAULT_NETWORK_PATH),
                )
                .arg(
                    arg!(--"no-bounds")
                        .required(false)
                        .help("Skip the canvas bounds check")
                        .action(clap::ArgAction::SetTrue),
                ),
        ))
}
