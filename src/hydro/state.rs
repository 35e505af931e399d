use std::fmt;

use serde::{Deserialize, Serialize};

/// Sound-speed floor scale and denominator guard
pub const SMALL: f64 = 1.0e-8;




#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]

/**
 * Primitive state on one side of a zone interface, or the resolved Godunov
 * state on the interface itself. Velocities are ordered relative to the sweep
 * direction: `un` is normal to the interface, `ut` and `utt` are the two
 * transverse components.
 */
pub struct InterfaceState {
    pub rho: f64,
    pub p: f64,
    /// Internal energy density, rho e
    pub rhoe: f64,
    /// First adiabatic index Gamma_1
    pub gamc: f64,
    pub un: f64,
    pub ut: f64,
    pub utt: f64,
}




#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]

/**
 * Auxiliary data for one interface: a sound-speed floor, the average of the
 * two adjacent cell sound speeds, and a 0/1 factor multiplying the resolved
 * normal velocity (zero on a wall or symmetry plane).
 */
pub struct RiemannAux {
    pub csmall: f64,
    pub cavg: f64,
    pub bnd_fac: f64,
}




#[derive(Clone, Copy, Debug, PartialEq)]

/**
 * Radiation payload carried by a state when the hydrodynamics is coupled to
 * `G` radiation groups. In a coupled state `InterfaceState::p` and
 * `InterfaceState::rhoe` are totals (gas plus radiation).
 */
pub struct RadiationState<const G: usize> {
    /// Flux limiter per group
    pub lam: [f64; G],
    /// Radiation energy density per group
    pub er: [f64; G],
    pub p_gas: f64,
    pub rhoe_gas: f64,
    pub gamc_gas: f64,
}




#[derive(Clone, Copy, Debug, PartialEq)]

/**
 * Which physics the interface states carry.
 */
pub enum Coupling<const G: usize> {
    Hydro,
    Radiation(RadiationState<G>),
}




#[derive(Clone, Copy, Debug, PartialEq)]

/**
 * An interface state together with its coupling payload.
 */
pub struct CoupledState<const G: usize> {
    pub fluid: InterfaceState,
    pub coupling: Coupling<G>,
}




// ============================================================================
impl InterfaceState {

    pub fn new(rho: f64, p: f64, rhoe: f64, gamc: f64, un: f64, ut: f64, utt: f64) -> Self {
        Self { rho, p, rhoe, gamc, un, ut, utt }
    }

    /**
     * Build a state for a gamma-law gas, where rho e = p / (gamma - 1) and
     * Gamma_1 = gamma.
     */
    pub fn gamma_law(rho: f64, p: f64, un: f64, gamma_law_index: f64) -> Self {
        Self::new(rho, p, p / (gamma_law_index - 1.0), gamma_law_index, un, 0.0, 0.0)
    }

    /**
     * The effective gamma relating pressure to internal energy density,
     * p = (gamma_e - 1) rho e.
     */
    pub fn game(&self) -> f64 {
        self.p / self.rhoe + 1.0
    }

    pub fn sound_speed(&self) -> f64 {
        (self.gamc * self.p / self.rho).abs().sqrt()
    }

    /**
     * Return this state with the normal velocity reversed, i.e. as seen in a
     * mirror placed at the interface.
     */
    pub fn reflect(&self) -> Self {
        Self { un: -self.un, ..*self }
    }

    /**
     * Whether the state needs thermodynamic repair before it can enter the
     * Riemann solver.
     */
    pub fn is_thermodynamically_bad(&self, pressure_floor: f64) -> bool {
        self.rhoe <= 0.0 || self.p < pressure_floor
    }
}




// ============================================================================
impl RiemannAux {

    /**
     * Build the aux data from the sound speeds of the two zones sharing the
     * interface.
     */
    pub fn from_sound_speeds(c_left: f64, c_right: f64, bnd_fac: f64) -> Self {
        Self {
            csmall: SMALL.max(SMALL * c_left.max(c_right)),
            cavg: 0.5 * (c_left + c_right),
            bnd_fac,
        }
    }
}




// ============================================================================
impl<const G: usize> RadiationState<G> {

    /**
     * Radiation pressure summed over groups, lambda_g E_r,g.
     */
    pub fn pressure(&self) -> f64 {
        self.lam.iter().zip(self.er.iter()).map(|(l, e)| l * e).sum()
    }

    pub fn energy(&self) -> f64 {
        self.er.iter().sum()
    }
}




// ============================================================================
impl<const G: usize> CoupledState<G> {
    pub fn hydro(fluid: InterfaceState) -> Self {
        Self { fluid, coupling: Coupling::Hydro }
    }

    pub fn radiation(fluid: InterfaceState, radiation: RadiationState<G>) -> Self {
        Self { fluid, coupling: Coupling::Radiation(radiation) }
    }
}




// ============================================================================
impl fmt::Display for InterfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rho  = {}", self.rho)?;
        writeln!(f, "p    = {}", self.p)?;
        writeln!(f, "rhoe = {}", self.rhoe)?;
        writeln!(f, "gamc = {}", self.gamc)?;
        writeln!(f, "un   = {}", self.un)?;
        writeln!(f, "ut   = {}", self.ut)?;
        writeln!(f, "utt  = {}", self.utt)
    }
}

impl fmt::Display for RiemannAux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "csmall  = {}", self.csmall)?;
        writeln!(f, "cavg    = {}", self.cavg)?;
        writeln!(f, "bnd_fac = {}", self.bnd_fac)
    }
}
