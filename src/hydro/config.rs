use serde::{Deserialize, Serialize};

use super::error::Error;

/// Number of secant iterates the two-shock solver can record; also the
/// largest accepted `max_iterations`.
pub const HISTORY_SIZE: usize = 40;

/// The bisection fallback may take this many times `max_iterations` steps.
pub const PSTAR_BISECT_FACTOR: usize = 5;




/**
 * Which Riemann solver resolves the interface.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverVariant {
    /// Iterative two-shock solver of Colella & Glaz (1985)
    TwoShock,
    /// Closed-form solver of Colella, Glaz & Ferguson; the only variant
    /// that accepts radiation-coupled states
    DirectCgf,
}




/**
 * What the two-shock solver does when the secant iteration fails to
 * converge within `max_iterations`.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NonConvergencePolicy {
    Fatal,
    LinearFallback,
    Bisection,
}




/**
 * Read-only options for a flux evaluation. One value is fixed before a sweep
 * begins and passed by reference into every entry point.
 */
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Limited (Colella & Woodward plus Colella & Sekora) vs. unlimited
    /// fourth-order edge interpolation
    pub limiting: bool,

    /// Below this central density the hydrostatic pressure is not
    /// subtracted before reconstruction
    pub pslope_cutoff_density: f64,

    pub solver: SolverVariant,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub non_convergence: NonConvergencePolicy,

    pub density_floor: f64,
    pub pressure_floor: f64,

    /// Temperature handed to the EOS when an input state is repaired
    pub temperature_floor: f64,
}




// ============================================================================
impl Default for Config {
    fn default() -> Self {
        Self {
            limiting: true,
            pslope_cutoff_density: -1.0e20,
            solver: SolverVariant::TwoShock,
            max_iterations: 12,
            tolerance: 1.0e-5,
            non_convergence: NonConvergencePolicy::Bisection,
            density_floor: 1.0e-200,
            pressure_floor: 1.0e-200,
            temperature_floor: 1.0e-200,
        }
    }
}




// ============================================================================
impl Config {

    /**
     * Return a copy of this configuration using the given solver variant.
     */
    pub fn with_solver(mut self, solver: SolverVariant) -> Self {
        self.solver = solver;
        self
    }

    /**
     * Return a copy of this configuration using the given non-convergence
     * policy.
     */
    pub fn with_policy(mut self, policy: NonConvergencePolicy) -> Self {
        self.non_convergence = policy;
        self
    }

    /**
     * Check the options are usable. Entry points assume a validated
     * configuration.
     */
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_iterations == 0 || self.max_iterations > HISTORY_SIZE {
            return Err(Error::InvalidConfig(format!(
                "max_iterations must be in 1..={}, got {}",
                HISTORY_SIZE, self.max_iterations
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if !(self.density_floor > 0.0 && self.pressure_floor > 0.0 && self.temperature_floor > 0.0) {
            return Err(Error::InvalidConfig(
                "density, pressure and temperature floors must be positive".to_string(),
            ));
        }
        Ok(())
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_options() {
        let mut config = Config::default();
        config.max_iterations = HISTORY_SIZE + 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.max_iterations = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tolerance = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.pressure_floor = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn builders_replace_one_option() {
        let config = Config::default()
            .with_solver(SolverVariant::DirectCgf)
            .with_policy(NonConvergencePolicy::Fatal);
        assert_eq!(config.solver, SolverVariant::DirectCgf);
        assert_eq!(config.non_convergence, NonConvergencePolicy::Fatal);
        assert_eq!(config.max_iterations, Config::default().max_iterations);
    }
}
