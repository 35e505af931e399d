pub mod config;
pub mod eos;
pub mod error;
pub mod geometry;
pub mod ppm;
pub mod riemann;
pub mod state;
pub mod stencil;
pub mod trace;
