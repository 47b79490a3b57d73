pub mod commands;
pub mod handlers;

// Re-export commonly used handler helpers for convenience
pub use handlers::{
    expand_path, fetch_options_from_args, filter_options_from_args, parse_reference_ids,
    run_fetch, run_filter, run_validate,
};
