//! Derivative-free optimization for variational circuits.
//!
//! Energy evaluations are noisy under sampling and gradients cost two
//! evaluations per parameter, so the demos use a simplex method that only
//! compares objective values.

use serde::Serialize;
use tracing::{debug, trace};

/// Result of an optimization run.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    /// Optimal parameter values.
    pub optimal_params: Vec<f64>,
    /// Optimal objective value.
    pub optimal_value: f64,
    /// Number of function evaluations.
    pub num_evaluations: usize,
    /// Number of simplex iterations.
    pub num_iterations: usize,
    /// Best objective value after each improvement.
    pub history: Vec<f64>,
    /// Whether the optimization converged.
    pub converged: bool,
}

/// Minimizer of a scalar function of a parameter vector.
pub trait Optimizer {
    /// Minimize `objective` starting from `initial_params`.
    fn minimize<F>(&self, objective: F, initial_params: Vec<f64>) -> OptimizationResult
    where
        F: FnMut(&[f64]) -> f64;
}

/// Nelder-Mead simplex with a bounded step.
///
/// Reflections are clipped to `step` per coordinate. When the simplex
/// flattens (value spread below `tolerance`) it is rebuilt around the best
/// vertex with half the step, until the step reaches `min_step`.
#[derive(Debug, Clone)]
pub struct NelderMead {
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Convergence tolerance on the spread of simplex values.
    pub tolerance: f64,
    /// Initial simplex edge length.
    pub initial_step: f64,
    /// Smallest step before declaring convergence.
    pub min_step: f64,
}

impl Default for NelderMead {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-6,
            initial_step: 0.5,
            min_step: 1e-4,
        }
    }
}

impl NelderMead {
    /// Create an optimizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set initial and final step sizes.
    #[must_use]
    pub fn with_steps(mut self, initial_step: f64, min_step: f64) -> Self {
        self.initial_step = initial_step;
        self.min_step = min_step;
        self
    }
}

/// Simplex vertices with their objective values and an evaluation counter.
struct Simplex {
    points: Vec<Vec<f64>>,
    values: Vec<f64>,
    evaluations: usize,
}

impl Simplex {
    fn around<F>(center: Vec<f64>, center_value: f64, step: f64, objective: &mut F) -> Self
    where
        F: FnMut(&[f64]) -> f64,
    {
        let mut simplex = Self {
            points: Vec::with_capacity(center.len() + 1),
            values: Vec::with_capacity(center.len() + 1),
            evaluations: 0,
        };
        for i in 0..center.len() {
            let mut point = center.clone();
            point[i] += step;
            simplex.push(point, objective);
        }
        simplex.points.insert(0, center);
        simplex.values.insert(0, center_value);
        simplex
    }

    fn push<F>(&mut self, point: Vec<f64>, objective: &mut F)
    where
        F: FnMut(&[f64]) -> f64,
    {
        let value = self.eval(&point, objective);
        self.points.push(point);
        self.values.push(value);
    }

    fn eval<F>(&mut self, point: &[f64], objective: &mut F) -> f64
    where
        F: FnMut(&[f64]) -> f64,
    {
        self.evaluations += 1;
        objective(point)
    }

    fn replace(&mut self, index: usize, point: Vec<f64>, value: f64) {
        self.points[index] = point;
        self.values[index] = value;
    }

    /// Vertex indices sorted by ascending value.
    fn order(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.points.len()).collect();
        indices.sort_by(|&a, &b| self.values[a].total_cmp(&self.values[b]));
        indices
    }

    fn best(&self) -> usize {
        self.order()[0]
    }
}

impl Optimizer for NelderMead {
    fn minimize<F>(&self, mut objective: F, initial_params: Vec<f64>) -> OptimizationResult
    where
        F: FnMut(&[f64]) -> f64,
    {
        let n = initial_params.len();
        let initial_value = objective(&initial_params);
        let mut best_value = initial_value;
        let mut history = vec![initial_value];

        if n == 0 {
            return OptimizationResult {
                optimal_params: initial_params,
                optimal_value: initial_value,
                num_evaluations: 1,
                num_iterations: 0,
                history,
                converged: true,
            };
        }

        let mut step = self.initial_step;
        let mut simplex = Simplex::around(initial_params, initial_value, step, &mut objective);
        let mut evaluations = 1;
        let mut converged = false;
        let mut iterations = 0;

        while iterations < self.max_iterations {
            iterations += 1;
            let order = simplex.order();
            let best = order[0];
            let second_worst = order[n - 1];
            let worst = order[n];

            let spread = simplex.values[worst] - simplex.values[best];
            if spread < self.tolerance {
                if step <= self.min_step {
                    converged = true;
                    break;
                }
                step = (step * 0.5).max(self.min_step);
                trace!(step, "restarting simplex");
                evaluations += simplex.evaluations;
                let center = simplex.points[best].clone();
                simplex = Simplex::around(center, simplex.values[best], step, &mut objective);
                continue;
            }

            let mut centroid = vec![0.0; n];
            for &idx in &order[..n] {
                for (c, x) in centroid.iter_mut().zip(&simplex.points[idx]) {
                    *c += x;
                }
            }
            for c in &mut centroid {
                *c /= n as f64;
            }

            let reflected: Vec<f64> = centroid
                .iter()
                .zip(&simplex.points[worst])
                .map(|(c, w)| {
                    let d = (c - w).clamp(-step, step);
                    c + d
                })
                .collect();
            let f_reflected = simplex.eval(&reflected, &mut objective);

            if f_reflected < simplex.values[best] {
                let expanded: Vec<f64> = centroid
                    .iter()
                    .zip(&reflected)
                    .map(|(c, r)| c + 2.0 * (r - c))
                    .collect();
                let f_expanded = simplex.eval(&expanded, &mut objective);
                if f_expanded < f_reflected {
                    simplex.replace(worst, expanded, f_expanded);
                } else {
                    simplex.replace(worst, reflected, f_reflected);
                }
            } else if f_reflected < simplex.values[second_worst] {
                simplex.replace(worst, reflected, f_reflected);
            } else {
                let contracted: Vec<f64> = centroid
                    .iter()
                    .zip(&simplex.points[worst])
                    .map(|(c, w)| 0.5 * (c + w))
                    .collect();
                let f_contracted = simplex.eval(&contracted, &mut objective);
                if f_contracted < simplex.values[worst] {
                    simplex.replace(worst, contracted, f_contracted);
                } else {
                    // Shrink towards the best vertex.
                    let anchor = simplex.points[best].clone();
                    for i in (0..=n).filter(|&i| i != best) {
                        let shrunk: Vec<f64> = anchor
                            .iter()
                            .zip(&simplex.points[i])
                            .map(|(a, x)| 0.5 * (a + x))
                            .collect();
                        let value = simplex.eval(&shrunk, &mut objective);
                        simplex.replace(i, shrunk, value);
                    }
                }
            }

            let current = simplex.values[simplex.best()];
            if current < best_value {
                best_value = current;
                history.push(current);
            }
        }

        evaluations += simplex.evaluations;
        let best = simplex.best();
        if simplex.values[best] < best_value {
            history.push(simplex.values[best]);
        }
        debug!(
            iterations,
            evaluations,
            converged,
            value = simplex.values[best],
            "optimization finished"
        );

        OptimizationResult {
            optimal_params: simplex.points[best].clone(),
            optimal_value: simplex.values[best],
            num_evaluations: evaluations,
            num_iterations: iterations,
            history,
            converged,
        }
    }
}
