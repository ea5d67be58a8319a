//! Solve command implementation for the Waybill CLI.

use std::io::{BufReader, Write};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, ValueEnum};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use waybill_core::{
    ModelConfig, RoutingSolver, SolveError, SolveRequest, Solver, SolverConfig, TimeConstraint,
};
use waybill_fs::{open_utf8_file, write_utf8_file};
use waybill_solver_gls::GlsOracle;

use crate::{
    ARG_SOLVE_ENGINE, ARG_SOLVE_MAX_ROUTE_DURATION, ARG_SOLVE_OUTPUT, ARG_SOLVE_REQUEST,
    ARG_SOLVE_TIME_LIMIT_MS, CliError, ENV_SOLVE_REQUEST,
};

/// Routing engine selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Engine {
    /// Path-cheapest-arc construction plus guided local search.
    #[default]
    Gls,
    /// The `vrp-core` metaheuristic.
    Vrp,
}

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Solve a capacitated routing request. The request is a \
                 JSON-encoded SolveRequest listing vehicles, jobs and a \
                 square travel-time matrix. Options can come from CLI \
                 flags, configuration files, or environment variables.",
    about = "Route a JSON solve request"
)]
#[ortho_config(prefix = "WAYBILL")]
pub(crate) struct SolveArgs {
    /// Path to a JSON file containing a SolveRequest.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Routing engine to use.
    #[arg(long = ARG_SOLVE_ENGINE, value_enum)]
    #[serde(default)]
    pub(crate) engine: Option<Engine>,
    /// Wall-clock search budget in milliseconds.
    #[arg(long = ARG_SOLVE_TIME_LIMIT_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) time_limit_ms: Option<u64>,
    /// Fixed limit on each route's delivery duration.
    #[arg(long = ARG_SOLVE_MAX_ROUTE_DURATION, value_name = "units")]
    #[serde(default)]
    pub(crate) max_route_duration: Option<u64>,
    /// Write the result here instead of stdout.
    #[arg(long = ARG_SOLVE_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl SolveArgs {
    pub(crate) fn into_config(self) -> Result<SolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SolveConfig::try_from(merged)
    }
}

/// Resolved `solve` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SolveConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Engine that searches the model.
    pub(crate) engine: Engine,
    /// Model and search settings handed to the solver.
    pub(crate) solver: SolverConfig,
    /// Output file, or `None` for stdout.
    pub(crate) output: Option<Utf8PathBuf>,
}

impl SolveConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.request_path, ARG_SOLVE_REQUEST)
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match waybill_fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<SolveArgs> for SolveConfig {
    type Error = CliError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_SOLVE_REQUEST,
            env: ENV_SOLVE_REQUEST,
        })?;

        let mut solver = SolverConfig::default();
        if let Some(limit) = args.max_route_duration {
            solver.model = ModelConfig {
                time_constraint: TimeConstraint::Fixed(limit),
                ..solver.model
            };
        }
        if let Some(millis) = args.time_limit_ms {
            solver.search = solver
                .search
                .with_time_limit(Duration::from_millis(millis));
        }

        Ok(Self {
            request_path,
            engine: args.engine.unwrap_or_default(),
            solver,
            output: args.output,
        })
    }
}

/// Builds a solver instance for the current solve invocation.
pub(super) trait SolveSolverBuilder {
    fn build(&self, config: &SolveConfig) -> Result<Box<dyn Solver>, CliError>;
}

pub(super) struct DefaultSolveSolverBuilder;

impl SolveSolverBuilder for DefaultSolveSolverBuilder {
    fn build(&self, config: &SolveConfig) -> Result<Box<dyn Solver>, CliError> {
        match config.engine {
            Engine::Gls => Ok(Box::new(RoutingSolver::with_config(
                GlsOracle,
                config.solver,
            ))),
            Engine::Vrp => build_vrp(config),
        }
    }
}

#[cfg(feature = "solver-vrp")]
fn build_vrp(config: &SolveConfig) -> Result<Box<dyn Solver>, CliError> {
    Ok(Box::new(RoutingSolver::with_config(
        waybill_solver_vrp::VrpOracle::new(),
        config.solver,
    )))
}

#[cfg(not(feature = "solver-vrp"))]
fn build_vrp(_config: &SolveConfig) -> Result<Box<dyn Solver>, CliError> {
    Err(CliError::MissingFeature {
        feature: "solver-vrp",
        action: "--engine vrp",
    })
}

pub(super) fn run_solve(args: SolveArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    let builder = DefaultSolveSolverBuilder;
    run_solve_with(args, &builder, &mut stdout)
}

/// Document written in place of a result when no plan exists.
#[derive(Debug, Serialize)]
struct ErrorDocument {
    error: String,
}

pub(super) fn run_solve_with(
    args: SolveArgs,
    builder: &dyn SolveSolverBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_solve_config(args)?;
    let request = load_solve_request(&config.request_path)?;
    let solver = builder.build(&config)?;
    match solver.solve(&request) {
        Ok(response) => {
            info!(
                "{} routed in {:?} with objective {}",
                config.request_path, response.diagnostics.elapsed, response.diagnostics.objective
            );
            write_solve_output(&config, writer, &response.result)
        }
        Err(SolveError::Infeasible) => {
            let document = ErrorDocument {
                error: SolveError::Infeasible.to_string(),
            };
            write_solve_output(&config, writer, &document)?;
            Err(CliError::NoSolution {
                path: config.request_path,
            })
        }
        Err(source) => Err(CliError::Solve {
            path: config.request_path,
            source,
        }),
    }
}

fn resolve_solve_config(args: SolveArgs) -> Result<SolveConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Loads a JSON-encoded [`SolveRequest`] from disk.
pub(super) fn load_solve_request(path: &Utf8Path) -> Result<SolveRequest, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenSolveRequest {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseSolveRequest {
        path: path.to_path_buf(),
        source,
    })
}

fn write_solve_output<T: Serialize>(
    config: &SolveConfig,
    writer: &mut dyn Write,
    document: &T,
) -> Result<(), CliError> {
    let mut payload =
        serde_json::to_string_pretty(document).map_err(CliError::SerialiseSolveOutput)?;
    payload.push('\n');
    match &config.output {
        Some(path) => {
            write_utf8_file(path, payload.as_bytes()).map_err(|source| {
                CliError::WriteOutputFile {
                    path: path.clone(),
                    source,
                }
            })
        }
        None => writer
            .write_all(payload.as_bytes())
            .map_err(CliError::WriteSolveOutput),
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SolveConfig, CliError> {
    let merged = SolveArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SolveConfig::try_from(merged)
}
