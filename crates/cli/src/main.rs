use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::fmt::SubscriberBuilder;

use yieldline::prelude::*;

#[derive(Parser)]
#[command(name = "yieldline")]
#[command(about = "Slab collapse-load analysis by discontinuity layout optimisation")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Solve a domain file and write the collapse result as JSON
    Solve {
        /// Domain file (points, support codes, yield moments, density)
        #[arg(long)]
        input: PathBuf,
        /// Output JSON path; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print discretisation statistics for a domain file
    Info {
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Serialize)]
struct SolveReport {
    lambda: f64,
    solves: usize,
    history: Vec<f64>,
    /// One record per yield line: phi_n, phi_t, delta, plastic, x1, y1, x2, y2.
    yield_lines: Vec<[f64; 8]>,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Solve { input, out } => run_solve(&input, out.as_deref()),
        Action::Info { input } => run_info(&input),
    }
}

fn load_built(input: &Path) -> Result<Domain> {
    let mut domain =
        Domain::load(input).with_context(|| format!("loading {}", input.display()))?;
    domain.build_edges();
    Ok(domain)
}

fn run_solve(input: &Path, out: Option<&Path>) -> Result<()> {
    let mut domain = load_built(input)?;
    let mut backend = InteriorPoint::default();
    let result = solve(&mut domain, &mut backend)
        .with_context(|| format!("solving {}", input.display()))?;
    tracing::info!(
        lambda = result.lambda,
        solves = result.solves,
        yield_lines = result.yield_lines.len(),
        "solved"
    );

    let report = SolveReport {
        lambda: result.lambda,
        solves: result.solves,
        history: result.history,
        yield_lines: result.yield_lines.iter().map(|l| l.to_row()).collect(),
    };
    let json = serde_json::to_string_pretty(&report)?;
    match out {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_info(input: &Path) -> Result<()> {
    let domain = load_built(input)?;
    let added = domain.active_edges().filter(|e| e.added).count();
    let info = serde_json::json!({
        "nodes": domain.nodes().len(),
        "boundary_edges": domain.boundary_edge_count(),
        "mesh_edges": domain.mesh_edge_count(),
        "candidates": domain.active().len(),
        "initially_added": added,
        "area": domain.polygon().area(),
    });
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
