//! Rendering of assembled pull request records into output documents.

pub mod json;
pub mod markdown;

use clap::ValueEnum;

/// Supported output document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
}
