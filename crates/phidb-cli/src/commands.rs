//! Module: commands
//! Responsibility: the `run` and `check` subcommands.
//! Does not own: argument parsing or logger setup (`main`).

use crate::table::PsqlTableSink;
use clap::Args;
use log::{debug, info};
use phidb_config::{ConfigError, PhidbConfig};
use phidb_core::{
    engine::Engine,
    error::EngineError,
    phi::{PhiOperator, parse_phi},
    source::{Relation, SourceError},
};
use std::{
    fs::{self, File},
    io::{self, BufReader, Write},
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// CliError
///

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid rows file {}: {source}", path.display())]
    Rows {
        path: PathBuf,
        #[source]
        source: SourceError,
    },

    #[error("specification path {} has no file name", path.display())]
    NoFileName { path: PathBuf },

    #[error("failed to encode result as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

///
/// RunArgs
///

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Phi specification file
    pub spec: PathBuf,

    /// JSON-lines file holding the base relation, one object per row
    #[arg(long)]
    pub rows: PathBuf,

    /// Configuration file (defaults to ./phidb.toml when present)
    #[arg(long, env = "PHIDB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory the result table is written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Print the result to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Hard limit on distinct groups
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_groups: Option<u64>,

    /// Emit the result as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

///
/// CheckArgs
///

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Phi specification file
    pub spec: PathBuf,

    /// JSON-lines file whose columns every name must resolve against
    #[arg(long)]
    pub rows: Option<PathBuf>,
}

/// Execute a specification and write its result.
pub fn run(args: &RunArgs) -> Result<(), CliError> {
    let config = PhidbConfig::load_or_default(args.config.as_deref())?;
    let mut engine_config = config.engine_config();
    if let Some(max_groups) = args.max_groups {
        engine_config = engine_config.with_max_groups(max_groups);
    }
    debug!("engine config: {engine_config:?}");

    let phi = read_spec(&args.spec)?;
    let mut relation = read_rows(&args.rows)?;
    let engine = Engine::new(engine_config);

    // Render into memory first so a failed run leaves no partial file.
    let (rendered, rows) = if args.json {
        let result = engine.execute(&phi, &mut relation)?;
        let mut json = serde_json::to_vec_pretty(&result)?;
        json.push(b'\n');

        (json, result.len())
    } else {
        let mut sink = PsqlTableSink::new(Vec::new());
        let summary = engine.run(&phi, &mut relation, &mut sink)?;
        let rows = usize::try_from(summary.rows_emitted).unwrap_or(usize::MAX);

        (sink.into_inner(), rows)
    };

    if args.stdout || config.output.stdout {
        let mut out = io::stdout().lock();
        out.write_all(&rendered)
            .and_then(|()| out.flush())
            .map_err(|source| CliError::Write {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
        println!("({rows} rows)");

        return Ok(());
    }

    let dir = args.output_dir.as_ref().unwrap_or(&config.output.dir);
    let path = output_path(dir, &args.spec)?;
    fs::create_dir_all(dir)
        .and_then(|()| fs::write(&path, &rendered))
        .map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?;
    info!("wrote {rows} rows to {}", path.display());
    println!("{rows} rows written to {}", path.display());

    Ok(())
}

/// Parse a specification and report what it describes.
pub fn check(args: &CheckArgs) -> Result<(), CliError> {
    let phi = read_spec(&args.spec)?;
    print!("{}", describe(&phi));

    if let Some(rows) = &args.rows {
        let relation = read_rows(rows)?;
        Engine::default().validate(&phi, relation.schema())?;
        println!(
            "all names resolve against {} columns of {}",
            relation.schema().len(),
            rows.display()
        );
    }

    Ok(())
}

/// Multi-line summary of an operator, one component per line.
#[must_use]
pub fn describe(phi: &PhiOperator) -> String {
    let aggregates: Vec<&str> = phi.aggregates().iter().map(|f| f.name()).collect();
    let mut text = format!(
        "grouping attributes: {}\ngrouping variables: {}\naggregates: {}\nselect: {}\n",
        phi.grouping_attrs().join(", "),
        phi.grouping_var_count(),
        if aggregates.is_empty() {
            "NONE".to_string()
        } else {
            aggregates.join(", ")
        },
        phi.select().join(", "),
    );
    for gv in phi.grouping_vars() {
        text.push_str(&format!(
            "predicate {gv}: {}\n",
            phi.predicate(gv).unwrap_or("TRUE")
        ));
    }
    text.push_str(&format!("having: {}\n", phi.having().unwrap_or("NONE")));

    text
}

fn read_spec(path: &Path) -> Result<PhiOperator, CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_phi(&text).map_err(|err| CliError::Engine(err.into()))
}

fn read_rows(path: &Path) -> Result<Relation, CliError> {
    let file = File::open(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let relation =
        Relation::from_json_lines(BufReader::new(file)).map_err(|source| CliError::Rows {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(
        "loaded {} rows over {} columns from {}",
        relation.len(),
        relation.schema().len(),
        path.display()
    );

    Ok(relation)
}

// Results are named after the specification file they came from.
fn output_path(dir: &Path, spec: &Path) -> Result<PathBuf, CliError> {
    spec.file_name()
        .map(|name| dir.join(name))
        .ok_or_else(|| CliError::NoFileName {
            path: spec.to_path_buf(),
        })
}
