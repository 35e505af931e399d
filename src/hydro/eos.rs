/**
 * Selects which pair of thermodynamic variables in an `EosState` is treated
 * as independent; the EOS fills in everything else.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EosInput {
    DensityTemperature,
    DensityPressure,
    DensityEnergy,
}




/**
 * The thermodynamic record exchanged with an equation of state. Mass
 * fractions are borrowed from the caller's cell data.
 */
#[derive(Clone, Copy, Debug)]
pub struct EosState<'a> {
    pub rho: f64,
    pub temperature: f64,
    pub pressure: f64,
    /// Specific internal energy (per unit mass)
    pub e: f64,
    pub mass_fractions: &'a [f64],
    /// First adiabatic index, d ln p / d ln rho at constant entropy
    pub gam1: f64,
}




/**
 * Capability to close the thermodynamics. Implementations must be pure: the
 * flux engine may call them concurrently from any number of threads and does
 * not retry on their result.
 */
pub trait EquationOfState: Sync {
    fn evaluate<'a>(&self, input: EosInput, state: EosState<'a>) -> EosState<'a>;
}




/**
 * An ideal gas with constant ratio of specific heats, p = rho R T and
 * p = (gamma - 1) rho e.
 */
#[derive(Clone, Copy, Debug)]
pub struct GammaLaw {
    pub gamma_law_index: f64,
    pub gas_constant: f64,
}




// ============================================================================
impl GammaLaw {
    pub fn new(gamma_law_index: f64) -> Self {
        Self {
            gamma_law_index,
            gas_constant: 1.0,
        }
    }

    pub fn sound_speed(&self, rho: f64, pressure: f64) -> f64 {
        (self.gamma_law_index * pressure / rho).sqrt()
    }
}

impl EquationOfState for GammaLaw {
    fn evaluate<'a>(&self, input: EosInput, state: EosState<'a>) -> EosState<'a> {
        let gm1 = self.gamma_law_index - 1.0;
        let rho = state.rho;

        let (temperature, pressure, e) = match input {
            EosInput::DensityTemperature => {
                let p = rho * self.gas_constant * state.temperature;
                (state.temperature, p, p / (gm1 * rho))
            }
            EosInput::DensityPressure => {
                let p = state.pressure;
                (p / (rho * self.gas_constant), p, p / (gm1 * rho))
            }
            EosInput::DensityEnergy => {
                let p = gm1 * rho * state.e;
                (p / (rho * self.gas_constant), p, state.e)
            }
        };

        EosState {
            rho,
            temperature,
            pressure,
            e,
            mass_fractions: state.mass_fractions,
            gam1: self.gamma_law_index,
        }
    }
}
