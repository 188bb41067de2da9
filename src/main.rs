//! lndpoly CLI - optimize, verify and decompose 2V behaviours.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use lndpoly::article::{ARTICLE_INEQUALITY, ARTICLE_VERTICES, article_behaviour};
use lndpoly::report::{VertexEntries, VertexRow};
use lndpoly::{Behaviour, Config, LpBackend, Pipeline, Polytope, Report};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "lndpoly")]
#[command(version)]
#[command(about = "Linear programs over non-signaling, non-disturbing 2V behaviours")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Facet file overriding the configured one
    #[arg(long, global = true)]
    facets: Option<PathBuf>,

    /// LP backend overriding the configured one
    #[arg(long, global = true, value_enum)]
    backend: Option<LpBackend>,
}

#[derive(Subcommand)]
enum Commands {
    /// Maximize an inequality, verify the optimum and decompose it
    Optimize {
        /// Inequality in the `±p<a><b0><b1>|A<A>B<B0>B<B1> ... <= <n>` format
        #[arg(short, long, default_value = ARTICLE_INEQUALITY)]
        inequality: String,
    },

    /// Decompose a behaviour over the vertices of Lnd and/or L
    Decompose {
        /// Behaviour JSON file
        #[arg(short, long)]
        behaviour: PathBuf,

        #[arg(short, long, value_enum, default_value_t = PolytopeArg::Both)]
        polytope: PolytopeArg,
    },

    /// Check a behaviour against every constraint
    Verify {
        /// Behaviour JSON file
        #[arg(short, long)]
        behaviour: PathBuf,
    },

    /// Print the vertex list of a polytope
    Vertices {
        #[arg(short, long, value_enum)]
        polytope: Polytope,
    },

    /// Print the facet inequalities in use
    Facets,

    /// Verify and decompose the published behaviour
    Article,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolytopeArg {
    Lnd,
    L,
    Both,
}

impl PolytopeArg {
    fn polytopes(self) -> &'static [Polytope] {
        match self {
            Self::Lnd => &[Polytope::Lnd],
            Self::L => &[Polytope::L],
            Self::Both => &Polytope::ALL,
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("lndpoly: a global tracing subscriber was already installed");
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config from {path:?}"))?,
        None => Config::default(),
    };

    // CLI flags win over the file
    if let Some(path) = &cli.facets {
        config.facets.path = Some(path.clone());
    }
    if let Some(backend) = cli.backend {
        config.solver.backend = backend;
    }
    Ok(config)
}

fn load_behaviour(path: &Path) -> Result<Behaviour> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read behaviour file {path:?}"))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse behaviour file {path:?}"))
}

fn emit(report: &Report, json: bool) -> Result<()> {
    if json {
        println!("{}", report.to_json().context("Failed to serialize report")?);
    } else {
        print!("{report}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config = load_config(&cli)?;
    let pipeline = Pipeline::new(config).context("Failed to set up pipeline")?;

    match &cli.command {
        Commands::Optimize { inequality } => {
            let report = pipeline
                .optimize_report(inequality)
                .with_context(|| format!("Failed to optimize '{inequality}'"))?;
            emit(&report, cli.json)?;
        }

        Commands::Decompose {
            behaviour,
            polytope,
        } => {
            let target = load_behaviour(behaviour)?;
            let report = pipeline.behaviour_report(target, polytope.polytopes())?;
            emit(&report, cli.json)?;
        }

        Commands::Verify { behaviour } => {
            let target = load_behaviour(behaviour)?;
            let report = Report {
                verification: Some(pipeline.verify(&target)),
                behaviour: Some(target),
                ..Default::default()
            };
            emit(&report, cli.json)?;
            if report.verification.as_ref().is_some_and(|v| v.has_error()) {
                std::process::exit(1);
            }
        }

        Commands::Facets => {
            info!(facets = pipeline.facets().len(), "printing facets");
            print!("{}", pipeline.facets().to_text());
        }

        Commands::Article => {
            let behaviour = article_behaviour().context("Published behaviour is malformed")?;
            let report = pipeline.behaviour_report(behaviour, &Polytope::ALL)?;
            emit(&report, cli.json)?;
            if !cli.json {
                for (i, vertex) in ARTICLE_VERTICES.iter().enumerate() {
                    println!("Vertex {}", i + 1);
                    println!("{}", VertexEntries(vertex));
                }
            }
        }

        Commands::Vertices { polytope } => {
            let vertices = polytope.vertices();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(vertices.as_slice())?);
            } else {
                for (i, vertex) in vertices.iter().enumerate() {
                    println!("{i:>3} {}", VertexRow(vertex));
                }
            }
        }
    }

    Ok(())
}
