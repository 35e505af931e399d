//! Resolution of the one-dimensional Riemann problem at a zone interface.
//!
//! Two approximate-state solvers are provided, both of which assume a pair
//! of shocks bounding a contact: the iterative solver of Colella & Glaz
//! (1985), which supports a general equation of state through an effective
//! gamma predicted across each wave, and the closed-form solver of Colella,
//! Glaz & Ferguson, which also handles radiation-coupled states. The entry
//! points `resolve` and `resolve_coupled` repair thermodynamically bad inputs
//! with the EOS, enforce floors, and dispatch on `Config::solver`.

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use super::config::{Config, SolverVariant};
use super::eos::{EosInput, EosState, EquationOfState};
use super::error::Error;
use super::state::{CoupledState, Coupling, InterfaceState, RadiationState, RiemannAux};

pub mod cgf;
pub mod two_shock;

pub use cgf::{riemann_cgf, riemann_cgf_radiation};
pub use two_shock::{riemann_cg, two_shock_star, wsqge, GammaRange, StarState};

/// Relative pressure jump below which a wave is treated as acoustic
pub const SMLP1: f64 = 1.0e-10;

/// Contact velocities smaller than this fraction of the mean input normal
/// speed are set to zero
pub const SMALLU: f64 = 1.0e-12;

/// Secant updates smaller than this fraction of the mean sound speed are
/// replaced by a linearized estimate
pub const WEAK_WAVE: f64 = 1.0e-3;




/**
 * One side of a Riemann problem: the traced state together with the mass
 * fractions the EOS needs if the state has to be repaired.
 */
#[derive(Clone, Copy, Debug)]
pub struct RiemannInput<'a, S = InterfaceState> {
    pub state: S,
    pub mass_fractions: &'a [f64],
}




#[derive(Clone, Debug, Serialize, Deserialize)]

/**
 * Everything known about an interface the two-shock solver failed to
 * resolve: its inputs, the star pressure after each secant iteration, the
 * bisection iterates and bracket if the bisection fallback ran, and the
 * relative change of the star pressure on the final iteration.
 */
pub struct NonConvergence {
    pub left: InterfaceState,
    pub right: InterfaceState,
    pub aux: RiemannAux,
    pub history: Vec<f64>,
    pub bisection_history: Vec<f64>,
    pub bracket: Option<(f64, f64)>,
    pub residual: f64,
}

impl fmt::Display for NonConvergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pstar history:")?;
        for (n, p) in self.history.iter().enumerate() {
            writeln!(f, "{} {}", n, p)?;
        }
        if let Some((lo, hi)) = self.bracket {
            writeln!(f, "bisection bracket: [{}, {}]", lo, hi)?;
            writeln!(f, "pstar extra history:")?;
            for (n, p) in self.bisection_history.iter().enumerate() {
                writeln!(f, "{} {}", n, p)?;
            }
        }
        writeln!(f, "final relative change: {}", self.residual)?;
        writeln!(f)?;
        writeln!(f, "left state:")?;
        writeln!(f, "{}", self.left)?;
        writeln!(f, "right state:")?;
        writeln!(f, "{}", self.right)?;
        writeln!(f, "aux information:")?;
        write!(f, "{}", self.aux)
    }
}




/**
 * Which part of the wave structure sits on the interface, once the contact
 * has selected the left or right ('outer') state.
 */
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Region {
    Outer,
    Star,
    /// Inside a rarefaction fan, at the given fraction from the outer state
    /// toward the star state
    Fan(f64),
}

impl Region {

    /**
     * Classify from the characteristic speeds on the inner (star) and outer
     * side of the non-contact wave, measured away from the contact.
     */
    pub(crate) fn classify(spin: f64, spout: f64, frac: f64) -> Self {
        if spin >= 0.0 {
            Region::Star
        } else if spout < 0.0 {
            Region::Outer
        } else {
            Region::Fan(frac.max(0.0).min(1.0))
        }
    }

    pub(crate) fn pick(&self, outer: f64, star: f64) -> f64 {
        match *self {
            Region::Outer => outer,
            Region::Star => star,
            Region::Fan(frac) => outer + frac * (star - outer),
        }
    }
}

/**
 * Weights (fp, fm) selecting the left state, the right state, or their
 * average, from the sign of the contact velocity.
 */
pub(crate) fn contact_weights(ustar: f64) -> (f64, f64) {
    if ustar > 0.0 {
        (1.0, 0.0)
    } else if ustar < 0.0 {
        (0.0, 1.0)
    } else {
        (0.5, 0.5)
    }
}

/**
 * Zero the contact velocity if it is negligible compared to the input normal
 * velocities, so mirror-symmetric problems stay exactly symmetric.
 */
pub(crate) fn symmetrize_contact(ustar: f64, ql: &InterfaceState, qr: &InterfaceState) -> f64 {
    if ustar.abs() < SMALLU * 0.5 * (ql.un.abs() + qr.un.abs()) {
        0.0
    } else {
        ustar
    }
}




/**
 * Recompute pressure, internal energy and Gamma_1 from the EOS at the state's
 * density and the floor temperature, if the state has non-positive internal
 * energy or sub-floor pressure. Returns whether a repair was made.
 */
pub fn repair_thermodynamics<E: EquationOfState + ?Sized>(
    state: &mut InterfaceState,
    mass_fractions: &[f64],
    eos: &E,
    config: &Config,
) -> bool {
    if !state.is_thermodynamically_bad(config.pressure_floor) {
        return false;
    }
    warn!(
        "(rho e) <= 0 or p < pressure floor in Riemann: {} {} {}",
        state.rhoe, state.p, config.pressure_floor
    );

    let eos_state = floor_temperature_state(state.rho, mass_fractions, eos, config);
    state.rhoe = state.rho * eos_state.e;
    state.p = eos_state.pressure;
    state.gamc = eos_state.gam1;
    true
}

/**
 * The radiation-coupled counterpart of `repair_thermodynamics`: the gas part
 * is repaired and the totals rebuilt from gas plus radiation.
 */
pub fn repair_radiation_thermodynamics<E: EquationOfState + ?Sized, const G: usize>(
    state: &mut InterfaceState,
    radiation: &mut RadiationState<G>,
    mass_fractions: &[f64],
    eos: &E,
    config: &Config,
) -> bool {
    if !(radiation.rhoe_gas <= 0.0 || radiation.p_gas < config.pressure_floor) {
        return false;
    }
    warn!(
        "(rho e)_gas <= 0 or p_gas < pressure floor in Riemann: {} {} {}",
        radiation.rhoe_gas, radiation.p_gas, config.pressure_floor
    );

    let eos_state = floor_temperature_state(state.rho, mass_fractions, eos, config);
    radiation.rhoe_gas = state.rho * eos_state.e;
    radiation.p_gas = eos_state.pressure;
    radiation.gamc_gas = eos_state.gam1;
    state.p = radiation.p_gas + radiation.pressure();
    state.rhoe = radiation.rhoe_gas + radiation.energy();
    true
}

fn floor_temperature_state<'a, E: EquationOfState + ?Sized>(
    rho: f64,
    mass_fractions: &'a [f64],
    eos: &E,
    config: &Config,
) -> EosState<'a> {
    let input = EosState {
        rho,
        temperature: config.temperature_floor,
        pressure: 0.0,
        e: 0.0,
        mass_fractions,
        gam1: 0.0,
    };
    eos.evaluate(EosInput::DensityTemperature, input)
}

fn prepare<E: EquationOfState + ?Sized>(input: RiemannInput, eos: &E, config: &Config) -> InterfaceState {
    let mut state = input.state;
    state.rho = state.rho.max(config.density_floor);
    repair_thermodynamics(&mut state, input.mass_fractions, eos, config);
    state.p = state.p.max(config.pressure_floor);
    state
}




/**
 * Resolve the interface between two hydrodynamic states with the configured
 * solver. Inputs are floored and repaired before solving; the result
 * satisfies the density and pressure floors.
 */
pub fn resolve<E: EquationOfState + ?Sized>(
    left: RiemannInput,
    right: RiemannInput,
    aux: &RiemannAux,
    eos: &E,
    config: &Config,
) -> Result<InterfaceState, Error> {
    let ql = prepare(left, eos, config);
    let qr = prepare(right, eos, config);

    match config.solver {
        SolverVariant::TwoShock => riemann_cg(&ql, &qr, aux, config),
        SolverVariant::DirectCgf => Ok(riemann_cgf(&ql, &qr, aux, config)),
    }
}

/**
 * Resolve the interface between two states carrying a coupling payload. Both
 * sides must carry the same kind of payload, and radiation-coupled states
 * require the direct solver.
 */
pub fn resolve_coupled<E: EquationOfState + ?Sized, const G: usize>(
    left: RiemannInput<CoupledState<G>>,
    right: RiemannInput<CoupledState<G>>,
    aux: &RiemannAux,
    eos: &E,
    config: &Config,
) -> Result<CoupledState<G>, Error> {
    match (left.state.coupling, right.state.coupling) {
        (Coupling::Hydro, Coupling::Hydro) => {
            let fluid = resolve(
                RiemannInput { state: left.state.fluid, mass_fractions: left.mass_fractions },
                RiemannInput { state: right.state.fluid, mass_fractions: right.mass_fractions },
                aux,
                eos,
                config,
            )?;
            Ok(CoupledState::hydro(fluid))
        }
        (Coupling::Radiation(mut rl), Coupling::Radiation(mut rr)) => {
            if config.solver != SolverVariant::DirectCgf {
                return Err(Error::InvalidConfig(
                    "radiation-coupled states require the direct CGF solver".to_string(),
                ));
            }
            let mut ql = left.state.fluid;
            let mut qr = right.state.fluid;
            ql.rho = ql.rho.max(config.density_floor);
            qr.rho = qr.rho.max(config.density_floor);
            repair_radiation_thermodynamics(&mut ql, &mut rl, left.mass_fractions, eos, config);
            repair_radiation_thermodynamics(&mut qr, &mut rr, right.mass_fractions, eos, config);
            ql.p = ql.p.max(config.pressure_floor);
            qr.p = qr.p.max(config.pressure_floor);

            let (fluid, radiation) = riemann_cgf_radiation(&ql, &rl, &qr, &rr, aux, config);
            Ok(CoupledState::radiation(fluid, radiation))
        }
        _ => Err(Error::InvalidConfig(
            "left and right states carry different coupling payloads".to_string(),
        )),
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;
    use crate::hydro::config::NonConvergencePolicy;
    use crate::hydro::eos::GammaLaw;

    const X: &[f64] = &[1.0];

    fn aux(ql: &InterfaceState, qr: &InterfaceState) -> RiemannAux {
        RiemannAux::from_sound_speeds(ql.sound_speed(), qr.sound_speed(), 1.0)
    }

    fn input(state: InterfaceState) -> RiemannInput<'static> {
        RiemannInput { state, mass_fractions: X }
    }

    fn both_solvers() -> Vec<Config> {
        vec![
            Config::default(),
            Config::default().with_solver(SolverVariant::DirectCgf),
        ]
    }

    /// Deterministic pseudo-random numbers in [0, 1)
    fn sequence(seed: u64) -> impl Iterator<Item = f64> {
        let mut state = seed.wrapping_mul(2862933555777941757).wrapping_add(3037000493);
        std::iter::repeat_with(move || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 11) as f64 / (1u64 << 53) as f64
        })
    }

    #[test]
    fn identical_states_resolve_to_themselves() {
        let eos = GammaLaw::new(1.4);
        let states = [
            InterfaceState::new(1.3, 0.7, 1.75, 1.4, 0.0, 0.2, -0.1),
            InterfaceState::new(0.125, 0.1, 0.25, 1.4, 0.6, -0.3, 0.9),
            InterfaceState::new(2.7, 3.1, 7.75, 1.4, -2.9, 0.0, 0.0),
            InterfaceState::new(1.0e-3, 1.0e-5, 2.5e-5, 1.4, 7.0, 1.0, 1.0),
        ];
        for q in states.iter() {
            for config in both_solvers() {
                let resolved = resolve(input(*q), input(*q), &aux(q, q), &eos, &config).unwrap();
                assert_eq!(resolved, *q, "{:?}", config.solver);
            }
        }
    }

    #[test]
    fn resolved_state_respects_floors() {
        let eos = GammaLaw::new(1.4);
        let floor = 1e-6;
        let base = Config { density_floor: floor, pressure_floor: floor, ..Config::default() };
        let configs = vec![
            base.clone(),
            base.clone().with_solver(SolverVariant::DirectCgf),
            base.clone().with_policy(NonConvergencePolicy::LinearFallback),
        ];

        for seed in 0..300 {
            let mut rng = sequence(seed);
            let mut draw = |lo: f64, hi: f64| lo + (hi - lo) * rng.next().unwrap();
            let gamma = draw(1.1, 1.67);
            let ql = InterfaceState::gamma_law(10f64.powf(draw(-7.0, 2.0)), 10f64.powf(draw(-7.0, 2.0)), draw(-20.0, 20.0), gamma);
            let qr = InterfaceState::gamma_law(10f64.powf(draw(-7.0, 2.0)), 10f64.powf(draw(-7.0, 2.0)), draw(-20.0, 20.0), gamma);

            for config in &configs {
                let q = match resolve(input(ql), input(qr), &aux(&ql, &qr), &eos, config) {
                    Ok(q) => q,
                    // only the bisection fallback may give up
                    Err(Error::NonConvergence(_))
                        if config.solver == SolverVariant::TwoShock
                            && config.non_convergence == NonConvergencePolicy::Bisection =>
                    {
                        continue
                    }
                    Err(e) => panic!("seed {}: {}", seed, e),
                };
                assert!(q.rho >= floor, "seed {}: {:?}", seed, q);
                assert!(q.p >= floor, "seed {}: {:?}", seed, q);
            }
        }
    }

    #[test]
    fn mirror_symmetric_states_have_zero_contact_velocity() {
        let eos = GammaLaw::new(1.4);
        for &u in &[0.1, 1.0, 3.3, 25.0] {
            let ql = InterfaceState::new(1.7, 2.3, 5.75, 1.4, u, 0.4, 0.1);
            let qr = InterfaceState { ut: -0.2, ..ql.reflect() };
            for config in both_solvers() {
                let q = resolve(input(ql), input(qr), &aux(&ql, &qr), &eos, &config).unwrap();
                assert_eq!(q.un, 0.0, "u = {}, {:?}", u, config.solver);
                assert!((q.ut - 0.1).abs() < 1e-15);
                let q = resolve(input(qr), input(ql), &aux(&qr, &ql), &eos, &config).unwrap();
                assert_eq!(q.un, 0.0, "u = {}, {:?}", -u, config.solver);
            }
        }
    }

    #[test]
    fn wall_factor_zeroes_normal_velocity() {
        let eos = GammaLaw::new(1.4);
        let ql = InterfaceState::gamma_law(1.0, 1.0, 0.5, 1.4);
        let qr = InterfaceState::gamma_law(0.5, 0.4, 0.5, 1.4);
        let wall = RiemannAux { bnd_fac: 0.0, ..aux(&ql, &qr) };
        for config in both_solvers() {
            let q = resolve(input(ql), input(qr), &wall, &eos, &config).unwrap();
            assert_eq!(q.un, 0.0);
        }
    }

    #[test]
    fn bad_inputs_are_repaired_before_solving() {
        let eos = GammaLaw::new(1.4);
        let config = Config { temperature_floor: 1e-3, ..Config::default() };

        let mut q = InterfaceState::new(2.0, 1.0, -1.0, 1.4, 0.0, 0.0, 0.0);
        assert!(repair_thermodynamics(&mut q, X, &eos, &config));
        assert!((q.p - 2.0e-3).abs() < 1e-15);
        assert!((q.rhoe - 5.0e-3).abs() < 1e-15);
        assert_eq!(q.gamc, 1.4);

        let mut good = InterfaceState::gamma_law(1.0, 1.0, 0.0, 1.4);
        assert!(!repair_thermodynamics(&mut good, X, &eos, &config));
        assert_eq!(good, InterfaceState::gamma_law(1.0, 1.0, 0.0, 1.4));

        let bad = InterfaceState::new(1.0, -5.0, -2.0, 1.4, 0.0, 0.0, 0.0);
        let ok = InterfaceState::gamma_law(1.0, 1.0, 0.0, 1.4);
        for config in both_solvers() {
            let config = Config { temperature_floor: 1e-3, ..config };
            let q = resolve(input(bad), input(ok), &aux(&ok, &ok), &eos, &config).unwrap();
            assert!(q.p > 0.0 && q.rhoe > 0.0);
        }
    }

    #[test]
    fn radiation_states_need_direct_solver() {
        let eos = GammaLaw::new(1.4);
        let fluid = InterfaceState::gamma_law(1.0, 1.0, 0.0, 1.4);
        let radiation = RadiationState { lam: [1.0 / 3.0], er: [0.0], p_gas: 1.0, rhoe_gas: 2.5, gamc_gas: 1.4 };
        let state = CoupledState::radiation(fluid, radiation);
        let side = RiemannInput { state, mass_fractions: X };
        let aux = aux(&fluid, &fluid);

        let result = resolve_coupled(side, side, &aux, &eos, &Config::default());
        assert!(matches!(result, Err(Error::InvalidConfig(_))));

        let hydro = RiemannInput { state: CoupledState::<1>::hydro(fluid), mass_fractions: X };
        let direct = Config::default().with_solver(SolverVariant::DirectCgf);
        assert!(matches!(resolve_coupled(side, hydro, &aux, &eos, &direct), Err(Error::InvalidConfig(_))));

        let resolved = resolve_coupled(side, side, &aux, &eos, &direct).unwrap();
        assert_eq!(resolved.fluid.rho, 1.0);
        assert!(matches!(resolved.coupling, Coupling::Radiation(_)));

        let resolved = resolve_coupled(hydro, hydro, &aux, &eos, &Config::default()).unwrap();
        assert_eq!(resolved, CoupledState::hydro(fluid));
    }

    #[test]
    fn region_classification() {
        assert_eq!(Region::classify(0.0, -1.0, 0.5), Region::Star);
        assert_eq!(Region::classify(-1.0, -0.5, 0.5), Region::Outer);
        assert_eq!(Region::classify(-1.0, 1.0, 0.25), Region::Fan(0.25));
        assert_eq!(Region::Fan(0.25).pick(1.0, 2.0), 1.25);
        assert_eq!(Region::Fan(0.3).pick(1.1, 1.1), 1.1);
    }
}
