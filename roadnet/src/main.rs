use roadnet::commands::command_argument_builder;
use roadnet::handlers::{handle_fetch, handle_filter, handle_validate, init_tracing};
use roadnet_core::print_banner;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");
    let verbose = chosen_command.get_flag("verbose");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    init_tracing(verbose);

    match chosen_command.subcommand() {
        Some(("fetch", primary_command)) => handle_fetch(primary_command, quiet).await,
        Some(("filter", primary_command)) => handle_filter(primary_command, quiet),
        Some(("validate", primary_command)) => handle_validate(primary_command, quiet),
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
