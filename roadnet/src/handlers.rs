use anyhow::{Context, anyhow, bail};
use clap::ArgMatches;
use colored::Colorize;
use roadnet_core::fetch::{FetchOptions, FetchOutcome, FetchProgressCallback, LayoutOptions, execute_fetch};
use roadnet_core::filter::{FilterOptions, FilterOutcome, MissingReferencePolicy, execute_filter};
use roadnet_core::label::LabelScheme;
use roadnet_core::layout::Canvas;
use roadnet_core::report::{generate_fetch_report, generate_filter_report, generate_violation_report};
use roadnet_core::store::read_document;
use roadnet_core::validate::{Violation, find_violations};
use roadnet_provider::{BoundingBox, NetworkType, OverpassClient};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Level;
use url::Url;

/// Install the stderr log subscriber; WARN unless `verbose`
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Expand a leading `~` in a user-supplied path
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Normalise reference ids from the command line: trimmed, non-empty, first occurrence kept
pub fn parse_reference_ids<S: AsRef<str>>(raw: &[S]) -> anyhow::Result<Vec<String>> {
    let mut seen = HashSet::new();
    let ids: Vec<String> = raw
        .iter()
        .flat_map(|entry| entry.as_ref().split(','))
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.to_string()))
        .map(|id| id.to_string())
        .collect();

    if ids.is_empty() {
        bail!("At least one reference node id is required");
    }
    Ok(ids)
}

fn canvas_from_args(args: &ArgMatches) -> Canvas {
    let defaults = Canvas::default();
    Canvas {
        width: args.get_one::<f64>("width").copied().unwrap_or(defaults.width),
        height: args.get_one::<f64>("height").copied().unwrap_or(defaults.height),
        margin: args.get_one::<f64>("margin").copied().unwrap_or(defaults.margin),
        padding: args
            .try_get_one::<f64>("padding")
            .ok()
            .flatten()
            .copied()
            .unwrap_or(defaults.padding),
    }
}

pub fn fetch_options_from_args(args: &ArgMatches, quiet: bool) -> anyhow::Result<FetchOptions> {
    let bbox = match args.get_one::<String>("bbox") {
        Some(raw) => raw
            .parse::<BoundingBox>()
            .with_context(|| format!("Invalid --bbox '{}'", raw))?,
        None => BoundingBox::default(),
    };

    let network_type = match args.get_one::<String>("network-type") {
        Some(raw) => raw.parse::<NetworkType>()?,
        None => NetworkType::default(),
    };

    let label_scheme = match args.get_one::<String>("label-scheme") {
        Some(raw) => raw.parse::<LabelScheme>().map_err(|e| anyhow!(e))?,
        None => LabelScheme::default(),
    };

    let output = args
        .get_one::<String>("output")
        .map(|p| expand_path(p))
        .ok_or_else(|| anyhow!("--output is required"))?;

    Ok(FetchOptions {
        bbox,
        network_type,
        layout: LayoutOptions {
            canvas: canvas_from_args(args),
            label_scheme,
        },
        output,
        seed: args.get_one::<u64>("seed").copied(),
        allow_empty: args.get_flag("allow-empty"),
        show_progress_bars: !quiet,
    })
}

pub fn provider_from_args(args: &ArgMatches) -> anyhow::Result<OverpassClient> {
    let mut client = OverpassClient::new().context("Failed to create HTTP client")?;
    if let Some(endpoint) = args.get_one::<Url>("endpoint") {
        client = client.with_endpoint(endpoint.clone());
    }
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        client = client.with_timeout(*timeout);
    }
    Ok(client
        .with_simplify(!args.get_flag("no-simplify"))
        .with_retain_all(args.get_flag("retain-all")))
}

/// Input path, output path and options for `filter`
pub fn filter_options_from_args(args: &ArgMatches) -> anyhow::Result<(PathBuf, PathBuf, FilterOptions)> {
    let input = args
        .get_one::<String>("input")
        .map(|p| expand_path(p))
        .ok_or_else(|| anyhow!("--input is required"))?;
    let output = args
        .get_one::<String>("output")
        .map(|p| expand_path(p))
        .unwrap_or_else(|| input.clone());

    let mut options = match args.get_many::<String>("reference-ids") {
        Some(values) => {
            let raw: Vec<&String> = values.collect();
            FilterOptions::new(parse_reference_ids(&raw)?)
        }
        None => FilterOptions::default(),
    };
    if args.get_flag("skip-missing") {
        options = options.with_missing_policy(MissingReferencePolicy::Skip);
    }

    Ok((input, output, options))
}

pub async fn run_fetch(args: &ArgMatches, quiet: bool) -> anyhow::Result<FetchOutcome> {
    let options = fetch_options_from_args(args, quiet)?;
    let provider = provider_from_args(args)?;

    let progress_callback: Option<FetchProgressCallback> = if quiet {
        None
    } else {
        Some(Arc::new(|msg: String| {
            println!("{} {}", "→".blue(), msg);
        }))
    };

    let outcome = execute_fetch(&provider, options, progress_callback).await?;
    Ok(outcome)
}

pub fn run_filter(args: &ArgMatches) -> anyhow::Result<(FilterOutcome, PathBuf)> {
    let (input, output, options) = filter_options_from_args(args)?;
    let outcome = execute_filter(&input, &output, &options)?;
    Ok((outcome, output))
}

/// Violations found in the document named by `args`
pub fn run_validate(args: &ArgMatches) -> anyhow::Result<(PathBuf, Vec<Violation>)> {
    let input = args
        .get_one::<String>("input")
        .map(|p| expand_path(p))
        .ok_or_else(|| anyhow!("--input is required"))?;
    let document = read_document(&input)?;

    let canvas = canvas_from_args(args);
    let check_bounds = !args.get_flag("no-bounds");
    if check_bounds {
        canvas.validate()?;
    }
    let violations = find_violations(&document, check_bounds.then_some(&canvas));
    Ok((input, violations))
}

fn fail(context: &str, err: anyhow::Error) -> ! {
    eprintln!("{} {}: {:#}", "✗".red().bold(), context, err);
    std::process::exit(1);
}

pub async fn handle_fetch(sub_matches: &ArgMatches, quiet: bool) {
    let outcome = match run_fetch(sub_matches, quiet).await {
        Ok(outcome) => outcome,
        Err(e) => fail("Fetch failed", e),
    };

    if !quiet {
        println!("\n{} Fetch complete!\n", "✓".green().bold());
        print!("{}", generate_fetch_report(&outcome));
    }
}

pub fn handle_filter(sub_matches: &ArgMatches, quiet: bool) {
    let (outcome, output) = match run_filter(sub_matches) {
        Ok(result) => result,
        Err(e) => fail("Filter failed", e),
    };

    if !quiet {
        print!("{}", generate_filter_report(&outcome, &output));
        println!(
            "{} Removed {} nodes and {} edges",
            "✓".green().bold(),
            outcome.removed_nodes().to_string().cyan(),
            outcome.removed_edges().to_string().cyan()
        );
    }
}

pub fn handle_validate(sub_matches: &ArgMatches, quiet: bool) {
    let (input, violations) = match run_validate(sub_matches) {
        Ok(result) => result,
        Err(e) => fail("Validation failed", e),
    };

    if violations.is_empty() {
        if !quiet {
            println!("{} {} is valid", "✓".green().bold(), display(&input));
        }
        return;
    }

    eprintln!("{} {} is invalid", "✗".red().bold(), display(&input));
    eprint!("{}", generate_violation_report(&violations));
    std::process::exit(1);
}

fn display(path: &Path) -> String {
    path.display().to_string().bright_white().to_string()
}
