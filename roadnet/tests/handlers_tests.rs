use roadnet::commands::command_argument_builder;
use roadnet::handlers::*;
use roadnet_core::filter::MissingReferencePolicy;
use roadnet_core::label::LabelScheme;
use roadnet_core::store::{read_document, write_document};
use roadnet_core::{Edge, NetworkDocument, Node};
use roadnet_provider::{BoundingBox, NetworkType};
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn sub_matches(argv: &[&str]) -> clap::ArgMatches {
    let mut full = vec!["roadnet"];
    full.extend_from_slice(argv);
    let matches = command_argument_builder()
        .try_get_matches_from(full)
        .expect("arguments should parse");
    let (_, sub) = matches.subcommand().expect("subcommand expected");
    sub.clone()
}

fn three_nodes() -> NetworkDocument {
    let node = |id: &str, x: f64| Node {
        id: id.to_string(),
        x,
        y: 50.0,
        label: id.to_string(),
    };
    NetworkDocument::new(
        vec![node("1", 30.0), node("2", 50.0), node("3", 70.0)],
        vec![
            Edge {
                from: "1".to_string(),
                to: "2".to_string(),
                weight: 4.2,
            },
            Edge {
                from: "2".to_string(),
                to: "3".to_string(),
                weight: 7.9,
            },
        ],
    )
}

#[test]
fn test_parse_reference_ids_trims_and_dedupes() {
    let ids = parse_reference_ids(&["250691723, 250691724", " ", "250691723", "3339821648"]).unwrap();
    assert_eq!(ids, vec!["250691723", "250691724", "3339821648"]);
}

#[test]
fn test_parse_reference_ids_empty() {
    let result = parse_reference_ids(&[" , ", ""]);
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("At least one reference node id")
    );
}

#[test]
fn test_expand_path_plain() {
    assert_eq!(
        expand_path("scripts/network_data.json"),
        PathBuf::from("scripts/network_data.json")
    );
}

#[test]
fn test_fetch_defaults() {
    let args = sub_matches(&["fetch"]);
    let options = fetch_options_from_args(&args, true).unwrap();

    assert_eq!(options.network_type, NetworkType::Drive);
    assert_eq!(options.bbox, roadnet_provider::BoundingBox::default());
    assert_eq!(options.output, PathBuf::from("scripts/network_data.json"));
    assert_eq!(options.layout.canvas.width, 750.0);
    assert_eq!(options.layout.canvas.height, 550.0);
    assert_eq!(options.layout.canvas.margin, 25.0);
    assert_eq!(options.layout.canvas.padding, 0.1);
    assert_eq!(options.layout.label_scheme, LabelScheme::Legacy);
    assert_eq!(options.seed, None);
    assert!(!options.allow_empty);
    assert!(!options.show_progress_bars);
}

#[test]
fn test_fetch_custom_arguments() {
    let args = sub_matches(&[
        "fetch",
        "--bbox",
        "-33.9,151.1,-33.8,151.3",
        "--network-type",
        "walk",
        "--seed",
        "42",
        "--label-scheme",
        "spreadsheet",
        "--width",
        "1000",
        "--padding",
        "0",
        "--allow-empty",
        "-o",
        "out/net.json",
    ]);
    let options = fetch_options_from_args(&args, false).unwrap();

    assert_eq!(options.bbox.min_lat, -33.9);
    assert_eq!(options.bbox.max_lon, 151.3);
    assert_eq!(options.network_type, NetworkType::Walk);
    assert_eq!(options.seed, Some(42));
    assert_eq!(options.layout.label_scheme, LabelScheme::Spreadsheet);
    assert_eq!(options.layout.canvas.width, 1000.0);
    assert_eq!(options.layout.canvas.padding, 0.0);
    assert!(options.allow_empty);
    assert!(options.show_progress_bars);
    assert_eq!(options.output, PathBuf::from("out/net.json"));
}

#[test]
fn test_fetch_bbox_help_shows_provider_default() {
    let cmd = command_argument_builder();
    let fetch = cmd.find_subcommand("fetch").unwrap();
    let bbox = fetch.get_arguments().find(|a| a.get_id() == "bbox").unwrap();

    assert!(bbox.get_default_values().is_empty());
    let help = bbox.get_help().unwrap().to_string();
    assert!(help.contains(&BoundingBox::default().to_string()));
}

#[test]
fn test_quiet_accepted_after_subcommand() {
    let matches = command_argument_builder()
        .try_get_matches_from(["roadnet", "filter", "-q"])
        .unwrap();
    assert!(matches.get_flag("quiet"));

    let matches = command_argument_builder()
        .try_get_matches_from(["roadnet", "-q", "validate"])
        .unwrap();
    assert!(matches.get_flag("quiet"));
}

#[test]
fn test_fetch_invalid_bbox() {
    let args = sub_matches(&["fetch", "--bbox", "38.0,23.7,37.9,23.8"]);
    let result = fetch_options_from_args(&args, true);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Invalid --bbox"));
}

#[test]
fn test_filter_defaults_overwrite_input() {
    let args = sub_matches(&["filter"]);
    let (input, output, options) = filter_options_from_args(&args).unwrap();

    assert_eq!(input, PathBuf::from("scripts/network_data.json"));
    assert_eq!(output, input);
    assert_eq!(options.reference_ids.len(), 10);
    assert_eq!(options.missing, MissingReferencePolicy::Error);
}

#[test]
fn test_filter_reference_ids_and_skip_missing() {
    let args = sub_matches(&[
        "filter",
        "-i",
        "in.json",
        "-o",
        "out.json",
        "-r",
        "1,2",
        "--reference-ids",
        "3",
        "--skip-missing",
    ]);
    let (input, output, options) = filter_options_from_args(&args).unwrap();

    assert_eq!(input, PathBuf::from("in.json"));
    assert_eq!(output, PathBuf::from("out.json"));
    assert_eq!(options.reference_ids, vec!["1", "2", "3"]);
    assert_eq!(options.missing, MissingReferencePolicy::Skip);
}

#[test]
fn test_run_filter_in_place() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("network_data.json");
    write_document(&file, &three_nodes()).unwrap();
    let file_arg = file.to_string_lossy().to_string();

    let args = sub_matches(&["filter", "-i", &file_arg, "-r", "2"]);
    let (outcome, output) = run_filter(&args).unwrap();

    assert_eq!(output, file);
    assert_eq!(outcome.threshold.min_x, 50.0);
    let written = read_document(&file).unwrap();
    assert_eq!(written.nodes.len(), 2);
    assert_eq!(written.edges.len(), 1);
}

#[test]
fn test_run_filter_missing_reference_fails() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("network_data.json");
    write_document(&file, &three_nodes()).unwrap();
    let file_arg = file.to_string_lossy().to_string();

    let args = sub_matches(&["filter", "-i", &file_arg]);
    let result = run_filter(&args);

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Reference nodes not found"));
    assert_eq!(read_document(&file).unwrap(), three_nodes());
}

#[test]
fn test_run_validate_reports_dangling_edges() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("network_data.json");
    let mut document = three_nodes();
    document.edges.push(Edge {
        from: "3".to_string(),
        to: "9".to_string(),
        weight: 1.0,
    });
    write_document(&file, &document).unwrap();
    let file_arg = file.to_string_lossy().to_string();

    let (_, violations) = run_validate(&sub_matches(&["validate", "-i", &file_arg])).unwrap();
    assert_eq!(violations.len(), 1);

    let (_, without_bounds) = run_validate(&sub_matches(&["validate", "-i", &file_arg, "--no-bounds"])).unwrap();
    assert_eq!(without_bounds.len(), 1);
}

#[tokio::test]
async fn test_run_fetch_against_mock_overpass() {
    let mock_server = MockServer::start().await;
    let body = serde_json::json!({"elements": [
        {"type": "node", "id": 250691723, "lat": 37.977, "lon": 23.731},
        {"type": "node", "id": 250691724, "lat": 37.978, "lon": 23.735},
        {"type": "node", "id": 250698924, "lat": 37.984, "lon": 23.740},
        {"type": "way", "id": 1, "nodes": [250691723, 250691724, 250698924],
         "tags": {"highway": "residential"}},
    ]});

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let file = dir.path().join("network_data.json");
    let file_arg = file.to_string_lossy().to_string();
    let endpoint = format!("{}/api/interpreter", mock_server.uri());

    let args = sub_matches(&[
        "fetch",
        "--endpoint",
        &endpoint,
        "--no-simplify",
        "--seed",
        "5",
        "-o",
        &file_arg,
    ]);
    let outcome = run_fetch(&args, true).await.unwrap();

    assert_eq!(outcome.document.nodes.len(), 3);
    assert_eq!(outcome.document.edges.len(), 4);
    let labels: Vec<&str> = outcome.document.nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(labels, vec!["A", "B", "C"]);
    assert_eq!(read_document(&file).unwrap(), outcome.document);

    let (_, violations) = run_validate(&sub_matches(&["validate", "-i", &file_arg])).unwrap();
    assert!(violations.is_empty());
}

async fn fetch_two_fragments(extra_args: &[&str]) -> roadnet_core::fetch::FetchOutcome {
    let mock_server = MockServer::start().await;
    // A three-node street and a detached two-node stub, both inside the default box
    let body = serde_json::json!({"elements": [
        {"type": "node", "id": 1, "lat": 37.977, "lon": 23.731},
        {"type": "node", "id": 2, "lat": 37.978, "lon": 23.735},
        {"type": "node", "id": 3, "lat": 37.980, "lon": 23.736},
        {"type": "node", "id": 4, "lat": 37.984, "lon": 23.739},
        {"type": "node", "id": 5, "lat": 37.984, "lon": 23.740},
        {"type": "way", "id": 10, "nodes": [1, 2, 3], "tags": {"highway": "residential"}},
        {"type": "way", "id": 11, "nodes": [4, 5], "tags": {"highway": "residential"}},
    ]});

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let file_arg = dir.path().join("network_data.json").to_string_lossy().to_string();
    let endpoint = format!("{}/api/interpreter", mock_server.uri());

    let mut argv = vec!["fetch", "--endpoint", &endpoint, "--no-simplify", "--seed", "1", "-o", &file_arg];
    argv.extend_from_slice(extra_args);
    run_fetch(&sub_matches(&argv), true).await.unwrap()
}

#[tokio::test]
async fn test_run_fetch_keeps_largest_fragment_by_default() {
    let outcome = fetch_two_fragments(&[]).await;

    let ids: Vec<&str> = outcome.document.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(outcome.document.edges.len(), 4);
}

#[tokio::test]
async fn test_run_fetch_retain_all_keeps_fragments() {
    let outcome = fetch_two_fragments(&["--retain-all"]).await;

    assert_eq!(outcome.document.nodes.len(), 5);
    assert_eq!(outcome.document.edges.len(), 6);
}

#[tokio::test]
async fn test_run_fetch_provider_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(504).set_body_string("gateway timeout"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let file = dir.path().join("network_data.json");
    let file_arg = file.to_string_lossy().to_string();
    let endpoint = format!("{}/api/interpreter", mock_server.uri());

    let args = sub_matches(&["fetch", "--endpoint", &endpoint, "-o", &file_arg]);
    let result = run_fetch(&args, true).await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("504"));
    assert!(!file.exists());
}
