//! Command execution for prlens.
//!
//! Each subcommand module follows the same pattern: resolve configuration
//! from CLI arguments, build the API client, run the command-specific
//! workflow, and hand the result to a formatter.

/// Fetch pull requests with their full discussion and render them.
pub mod fetch;
