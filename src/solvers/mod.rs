pub mod ppm_sweep;
