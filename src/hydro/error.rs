use std::error;
use std::fmt;

use super::riemann::NonConvergence;

#[derive(Debug)]

/**
 * Error to represent invalid hydrodynamics data, a rejected configuration,
 * or an interface the Riemann solver could not resolve.
 */
pub enum Error {
    InvalidConfig(String),
    NonConvergence(Box<NonConvergence>),
    NegativeGasPressure(f64),
    NegativeMassDensity(f64),
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        use Error::*;

        match self {
            InvalidConfig(msg) => writeln!(fmt, "invalid configuration: {}", msg),
            NonConvergence(diag) => {
                writeln!(fmt, "non-convergence in the Riemann solver")?;
                write!(fmt, "{}", diag)
            }
            NegativeGasPressure(p) => writeln!(fmt, "negative gas pressure: {}", p),
            NegativeMassDensity(d) => writeln!(fmt, "negative mass density: {}", d),
        }
    }
}

impl error::Error for Error {}
