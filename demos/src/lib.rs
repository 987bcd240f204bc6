//! VQE Demo Suite
//!
//! End-to-end variational eigensolver runs on top of the Pauli energy core:
//!
//! - **Ansatz circuits**: [`ansatz::ry_ansatz`] and [`ansatz::two_local_ansatz`]
//! - **Optimizer**: a derivative-free [`optimizer::NelderMead`] simplex
//! - **Problems**: small Hamiltonians with exact reference energies
//! - **Runner**: [`runner::VqeRunner`] ties decomposition, measurement plan,
//!   energy estimator and optimizer together
//!
//! ```no_run
//! use vqe_demos::problems::Problem;
//! use vqe_demos::runner::VqeRunner;
//!
//! let runner = VqeRunner::from_matrix(&Problem::H2.hamiltonian()).unwrap();
//! let result = runner.run().unwrap();
//! println!("E = {:.6}", result.optimal_energy);
//! ```

pub mod ansatz;
pub mod error;
pub mod optimizer;
pub mod problems;
pub mod runner;

pub use error::{DemoError, DemoResult};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a spinner that counts energy evaluations.
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {pos} evaluations {msg}") {
        pb.set_style(template);
    }
    pb.set_message(message.to_string());
    pb
}

/// Print a demo header.
pub fn print_header(title: &str) {
    println!();
    println!("{}", style("═".repeat(60)).cyan());
    println!("{}", style(format!("  {title}")).cyan().bold());
    println!("{}", style("═".repeat(60)).cyan());
    println!();
}

/// Print a demo section.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(format!("▶ {title}")).green().bold());
    println!("{}", style("─".repeat(40)).dim());
}

/// Print a result line.
pub fn print_result(label: &str, value: impl std::fmt::Display) {
    println!("  {} {}", style(format!("{label}:")).dim(), value);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}
