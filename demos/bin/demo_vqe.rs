//! VQE (Variational Quantum Eigensolver) Demo
//!
//! Minimizes the energy of a small Hamiltonian over a parameterized circuit,
//! estimating every energy from its Pauli decomposition.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use vqe_demos::ansatz::AnsatzKind;
use vqe_demos::optimizer::NelderMead;
use vqe_demos::problems::{Problem, exact_ground_energy};
use vqe_demos::runner::{VqeResult, VqeRunner};
use vqe_demos::{create_spinner, print_header, print_info, print_result, print_section, print_success};
use vqe_energy::{EstimationMode, EstimatorConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Analytical,
    Sampling,
}

#[derive(Parser, Debug)]
#[command(name = "demo-vqe")]
#[command(about = "Find ground state energies with a variational eigensolver")]
struct Args {
    /// Problem Hamiltonian
    #[arg(short, long, value_enum, default_value = "h2")]
    problem: Problem,

    /// Estimation mode (overrides config file and VQE_MODE)
    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Shots per Pauli term; implies sampling unless --mode analytical
    #[arg(short, long)]
    shots: Option<u32>,

    /// Number of ansatz repetitions
    #[arg(short, long, default_value = "1")]
    reps: usize,

    /// Maximum optimization iterations
    #[arg(short, long, default_value = "200")]
    iterations: usize,

    /// Seed for initial parameters and sampling
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Estimator configuration file (YAML)
    #[arg(short, long, env = "VQE_CONFIG")]
    config: Option<PathBuf>,

    /// Write the result as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Report<'a> {
    problem: Problem,
    num_qubits: usize,
    num_terms: usize,
    exact_energy: f64,
    absolute_error: f64,
    #[serde(flatten)]
    result: &'a VqeResult,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

/// Apply `--mode` and `--shots` on top of file and environment settings.
fn resolve_config(args: &Args) -> Result<EstimatorConfig> {
    let mut config = EstimatorConfig::load(args.config.as_deref()).context("loading estimator config")?;

    let current_shots = match config.mode {
        EstimationMode::Sampling { shots } => shots,
        EstimationMode::Analytical => 1000,
    };
    config.mode = match (args.mode, args.shots) {
        (Some(ModeArg::Analytical), _) => EstimationMode::Analytical,
        (Some(ModeArg::Sampling), shots) => EstimationMode::Sampling {
            shots: shots.unwrap_or(current_shots),
        },
        (None, Some(shots)) => EstimationMode::Sampling { shots },
        (None, None) => config.mode,
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = resolve_config(&args)?;

    print_header("VQE Ground State Demo");

    let hamiltonian = args.problem.hamiltonian();
    let exact = exact_ground_energy(&hamiltonian, 100_000)?;
    let ansatz = AnsatzKind::TwoLocal { reps: args.reps };
    let runner = VqeRunner::from_matrix(&hamiltonian)?
        .with_ansatz(ansatz)
        .with_optimizer(NelderMead::new().with_max_iterations(args.iterations))
        .with_config(config.clone())
        .with_seed(args.seed);

    print_section("Problem Setup");
    print_result("Problem", args.problem.name());
    print_result("Qubits", runner.num_qubits());
    print_result("Pauli terms", runner.decomposition().len());
    print_result("Ansatz repetitions", args.reps);
    print_result("Parameters", runner.num_parameters());
    print_result("Estimation", config.mode);
    print_result("Exact ground state", format!("{exact:.6}"));

    print_section("Hamiltonian");
    for (label, coefficient) in runner.decomposition().iter() {
        println!("  {:>+10.6} · {}", coefficient.re, label);
    }

    print_section("Running VQE Optimization");
    let spinner = create_spinner("");
    let result = runner.run_observed(runner.initial_parameters(), |evaluation, energy| {
        spinner.set_position(evaluation as u64);
        if energy.is_finite() {
            spinner.set_message(format!("E = {energy:.6}"));
        }
    })?;
    spinner.finish_with_message("optimization complete");

    let error = (result.optimal_energy - exact).abs();
    print_section("Results");
    print_result("Optimal energy", format!("{:.6}", result.optimal_energy));
    print_result("Absolute error", format!("{error:.2e}"));
    print_result("Iterations", result.iterations);
    print_result("Energy evaluations", result.energy_evaluations);
    print_result("Converged", if result.converged { "Yes" } else { "No" });
    print_result("Time", format!("{} ms", result.elapsed_ms));

    print_section("Energy Convergence");
    let history = &result.energy_history;
    let step = (history.len() / 10).max(1);
    for (i, energy) in history.iter().enumerate().step_by(step) {
        println!("  Improvement {i:3}: {energy:.6}");
    }

    if let Some(path) = &args.output {
        let report = Report {
            problem: args.problem,
            num_qubits: runner.num_qubits(),
            num_terms: runner.decomposition().len(),
            exact_energy: exact,
            absolute_error: error,
            result: &result,
        };
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        print_info(&format!("Result written to {}", path.display()));
    }

    println!();
    print_success("VQE demo complete!");
    Ok(())
}
