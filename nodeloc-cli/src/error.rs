//! Error types emitted by the nodeloc CLI.

use std::{io, sync::Arc};

use nodeloc_core::ResolveError;
use nodeloc_store::FlatNodesError;
use thiserror::Error;

/// Errors emitted by the nodeloc CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (pass it as the first argument or set {env})")]
    MissingArgument {
        /// Name of the missing option.
        field: &'static str,
        /// Environment variable that can supply it.
        env: &'static str,
    },
    /// Opening the flat nodes file failed.
    #[error(transparent)]
    OpenStore(#[from] FlatNodesError),
    /// Reading identifiers or writing results failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// Writing the usage message failed.
    #[error("failed to write usage message: {0}")]
    WriteUsage(#[source] io::Error),
}
