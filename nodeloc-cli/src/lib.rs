//! Command-line interface resolving OSM node identifiers against a flat nodes
//! file.
//!
//! The `get-lonlat` binary reads whitespace-separated node identifiers from
//! standard input and prints `lon;lat;id` for each one the store can place.
#![forbid(unsafe_code)]

mod error;

use std::{
    io::{self, BufRead, Write},
    sync::Arc,
};

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use log::debug;
use nodeloc_core::{MalformedInput, ResolutionLoop};
use nodeloc_store::{AccessMode, FlatNodesStore};
use ortho_config::{
    OrthoConfig, OrthoError, SubcmdConfigMerge,
    figment::{Figment, providers::Env},
};
use serde::{Deserialize, Serialize};

pub use error::CliError;

const ARG_FLATNODES_FILE: &str = "flatnodes_file";
const ENV_PREFIX: &str = "NODELOC_";
const ENV_FLATNODES_FILE: &str = "NODELOC_FLATNODES_FILE";
const DEFAULT_PROGRAM: &str = "get-lonlat";

/// Run `get-lonlat` with the current process arguments, environment and
/// standard streams.
pub fn run() -> Result<(), CliError> {
    let args = LookupArgs::try_parse().map_err(CliError::ArgumentParsing)?;
    let merged = args.merge_layers()?;
    let program = program_name();
    execute(
        merged,
        &program,
        io::stdin().lock(),
        io::stdout().lock(),
        io::stderr().lock(),
    )
}

fn program_name() -> String {
    std::env::args_os().next().map_or_else(
        || DEFAULT_PROGRAM.to_owned(),
        |arg| arg.to_string_lossy().into_owned(),
    )
}

/// Resolve identifiers from `input` into `output` using merged `args`.
///
/// A missing store path prints the usage message to `errors` and succeeds.
/// A reader that stops consuming output ends the run quietly.
fn execute<R, W, E>(
    args: LookupArgs,
    program: &str,
    input: R,
    output: W,
    mut errors: E,
) -> Result<(), CliError>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let config = match LookupConfig::try_from(args) {
        Ok(config) => config,
        Err(CliError::MissingArgument { .. }) => return write_usage(&mut errors, program),
        Err(err) => return Err(err),
    };

    let store = FlatNodesStore::open_with(&config.flatnodes_file, config.access_mode)?;
    let resolver = ResolutionLoop::new(store).with_malformed_input(config.malformed);
    match resolver.run(input, output) {
        Ok(summary) => {
            debug!(
                "Finished resolving {} against {}: {} emitted",
                summary.read, config.flatnodes_file, summary.emitted
            );
            Ok(())
        }
        Err(err) if err.is_broken_pipe() => {
            debug!("Output closed early; stopping");
            Ok(())
        }
        Err(err) => Err(CliError::Resolve(err)),
    }
}

fn write_usage<E: Write>(errors: &mut E, program: &str) -> Result<(), CliError> {
    writeln!(errors, "Usage: {program} [flatnodes_file]")
        .and_then(|()| writeln!(errors, "\tThen write one {{osm_id}} per input line,"))
        .and_then(|()| {
            writeln!(
                errors,
                "\tWill print one-line results: {{lon}};{{lat}};{{osm_id}}"
            )
        })
        .and_then(|()| errors.flush())
        .map_err(CliError::WriteUsage)
}

/// Handling for tokens that are not node identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum MalformedArg {
    /// End the run at the first malformed token.
    Stop,
    /// Discard malformed tokens and keep reading.
    Skip,
}

impl From<MalformedArg> for MalformedInput {
    fn from(arg: MalformedArg) -> Self {
        match arg {
            MalformedArg::Stop => Self::Stop,
            MalformedArg::Skip => Self::Skip,
        }
    }
}

/// How the flat nodes file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum AccessArg {
    /// Open with read and write access, as osm2pgsql does.
    ReadWrite,
    /// Open without write access.
    ReadOnly,
}

impl From<AccessArg> for AccessMode {
    fn from(arg: AccessArg) -> Self {
        match arg {
            AccessArg::ReadWrite => Self::ReadWrite,
            AccessArg::ReadOnly => Self::ReadOnly,
        }
    }
}

/// Arguments for `get-lonlat`.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "get-lonlat",
    about = "Print lon;lat;id for OSM node identifiers read from stdin",
    long_about = "Read one OSM node identifier per input line and print \
                 lon;lat;id for every node the flat nodes file places. \
                 The file path can come from the first argument, a \
                 configuration file, or NODELOC_FLATNODES_FILE.",
    version
)]
#[ortho_config(prefix = "NODELOC")]
struct LookupArgs {
    /// Path to the osm2pgsql flat nodes file.
    #[arg(value_name = ARG_FLATNODES_FILE)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    flatnodes_file: Option<Utf8PathBuf>,
    /// What to do with tokens that are not node identifiers.
    #[arg(long = "on-malformed", value_enum, value_name = "policy")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    on_malformed: Option<MalformedArg>,
    /// Access mode used to open the flat nodes file.
    #[arg(long = "access", value_enum, value_name = "mode")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access: Option<AccessArg>,
}

impl LookupArgs {
    /// Fill options missing on the command line from, in order, `NODELOC_*`
    /// variables, then configuration files and `NODELOC_CMDS_GET_LONLAT_*`
    /// variables.
    fn merge_layers(self) -> Result<Self, CliError> {
        let layered = self.load_and_merge().map_err(CliError::Configuration)?;
        let environment: Self = Figment::from(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|err| CliError::Configuration(Arc::new(OrthoError::merge(err))))?;
        Ok(self.or(environment).or(layered))
    }

    fn or(self, fallback: Self) -> Self {
        Self {
            flatnodes_file: self.flatnodes_file.or(fallback.flatnodes_file),
            on_malformed: self.on_malformed.or(fallback.on_malformed),
            access: self.access.or(fallback.access),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LookupConfig {
    flatnodes_file: Utf8PathBuf,
    malformed: MalformedInput,
    access_mode: AccessMode,
}

impl TryFrom<LookupArgs> for LookupConfig {
    type Error = CliError;

    fn try_from(args: LookupArgs) -> Result<Self, Self::Error> {
        let flatnodes_file = args.flatnodes_file.ok_or(CliError::MissingArgument {
            field: ARG_FLATNODES_FILE,
            env: ENV_FLATNODES_FILE,
        })?;
        Ok(Self {
            flatnodes_file,
            malformed: args.on_malformed.map(Into::into).unwrap_or_default(),
            access_mode: args.access.map(Into::into).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests;
