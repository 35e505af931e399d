//! Godunov is a library for computing the time-centered states on the zone
//! interfaces of a finite-volume compressible hydrodynamics scheme. Cell data
//! along a one-dimensional sweep is reconstructed with the piecewise
//! parabolic method (PPM), traced under the characteristics over half a time
//! step to the zone faces, and the resulting left/right pairs are resolved by
//! a two-shock approximate Riemann solver: either the iterative solver of
//! Colella & Glaz (1985), which accommodates a general equation of state, or
//! the direct solver of Colella, Glaz & Ferguson, which also handles
//! radiation-coupled states.
//!
//! The thermodynamics are closed by a caller-supplied `EquationOfState`, and
//! all options are carried by an explicit `Config` value. Everything is pure
//! and re-entrant; the `solvers::ppm_sweep` driver resolves the interfaces of
//! a pencil in parallel with rayon.

pub mod field;
pub mod hydro;
pub mod solvers;
