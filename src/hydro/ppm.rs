use super::config::Config;
use super::geometry::Direction;
use super::stencil::{Field, Offset::*, Stencil};

#[derive(Clone, Copy, Debug, PartialEq)]

/**
 * The parabolic profile of a quantity within one zone, given by its values
 * on the left and right zone edges and its zone average.
 */
pub struct Parabola {
    pub sm: f64,
    pub sp: f64,
    pub center: f64,
}




// ============================================================================
impl Parabola {

    /**
     * A profile that is constant across the zone.
     */
    pub fn flat(value: f64) -> Self {
        Self { sm: value, sp: value, center: value }
    }

    /**
     * The curvature coefficient, 6 s_i - 3 (s_- + s_+).
     */
    pub fn s6(&self) -> f64 {
        6.0 * self.center - 3.0 * (self.sm + self.sp)
    }
}




/**
 * The van Leer limited slope at the middle of three consecutive zone values,
 * or zero if the one-sided differences change sign.
 */
fn van_leer_slope(left: f64, center: f64, right: f64) -> f64 {
    let dsl = 2.0 * (center - left);
    let dsr = 2.0 * (right - center);

    if dsl * dsr > 0.0 {
        let dsc = 0.5 * (right - left);
        dsc.signum() * dsc.abs().min(dsl.abs()).min(dsr.abs())
    } else {
        0.0
    }
}

fn clamp_between(x: f64, a: f64, b: f64) -> f64 {
    x.max(a.min(b)).min(a.max(b))
}




/**
 * Compute the edge values of a parabolic reconstruction of the data in a
 * zone. With limiting enabled this uses the monotonized edge interpolation of
 * Colella & Woodward (1984), flattening, and the quadratic limiter of
 * Colella & Sekora (2008); otherwise the unlimited fourth-order edge
 * interpolation is returned.
 *
 * `flatn` is the flattening coefficient in [0, 1]; zero reduces the profile
 * to the zone average.
 */
pub fn ppm_reconstruct(s: &Stencil, flatn: f64, config: &Config) -> Parabola {
    let s0 = s[I0];

    if !config.limiting {
        // 7/12 (a + b) - 1/12 (c + d), written to be exact for flat data
        let sm = 0.5 * (s0 + s[Im1]) + (1.0 / 12.0) * ((s0 + s[Im1]) - (s[Im2] + s[Ip1]));
        let sp = 0.5 * (s[Ip1] + s0) + (1.0 / 12.0) * ((s[Ip1] + s0) - (s[Im1] + s[Ip2]));
        return Parabola { sm, sp, center: s0 };
    }

    let dsvl_im1 = van_leer_slope(s[Im2], s[Im1], s0);
    let dsvl_i0 = van_leer_slope(s[Im1], s0, s[Ip1]);
    let dsvl_ip1 = van_leer_slope(s0, s[Ip1], s[Ip2]);

    let sm = 0.5 * (s0 + s[Im1]) - (1.0 / 6.0) * (dsvl_i0 - dsvl_im1);
    let sp = 0.5 * (s[Ip1] + s0) - (1.0 / 6.0) * (dsvl_ip1 - dsvl_i0);

    // no new extrema at the edges
    let sm = clamp_between(sm, s0, s[Im1]);
    let sp = clamp_between(sp, s0, s[Ip1]);

    let mut sm = flatn * sm + (1.0 - flatn) * s0;
    let mut sp = flatn * sp + (1.0 - flatn) * s0;

    if (sp - s0) * (s0 - sm) <= 0.0 {
        sp = s0;
        sm = s0;
    } else if (sp - s0).abs() >= 2.0 * (sm - s0).abs() {
        sp = 3.0 * s0 - 2.0 * sm;
    } else if (sm - s0).abs() >= 2.0 * (sp - s0).abs() {
        sm = 3.0 * s0 - 2.0 * sp;
    }

    Parabola { sm, sp, center: s0 }
}




/**
 * Reconstruct the pressure after subtracting the hydrostatic pressure
 * supported by the source term `src` (an acceleration), so that only the
 * wave-generating part of the pressure is limited. The hydrostatic profile is
 * integrated outward from the zone center with the trapezoid rule, and added
 * back at the zone edges.
 *
 * The subtraction is skipped if any hydrostatic estimate is non-positive or
 * the central density is below `config.pslope_cutoff_density`.
 */
pub fn ppm_reconstruct_pslope(
    rho: &Stencil,
    p: &Stencil,
    src: &Stencil,
    flatn: f64,
    dx: f64,
    config: &Config,
) -> Parabola {
    let p0_hse = p[I0];
    let pp1_hse = p0_hse + 0.25 * dx * (rho[I0] + rho[Ip1]) * (src[I0] + src[Ip1]);
    let pp2_hse = pp1_hse + 0.25 * dx * (rho[Ip1] + rho[Ip2]) * (src[Ip1] + src[Ip2]);
    let pm1_hse = p0_hse - 0.25 * dx * (rho[I0] + rho[Im1]) * (src[I0] + src[Im1]);
    let pm2_hse = pm1_hse - 0.25 * dx * (rho[Im1] + rho[Im2]) * (src[Im1] + src[Im2]);

    let hse = Stencil::new([pm2_hse, pm1_hse, p0_hse, pp1_hse, pp2_hse]);
    let usable = hse.values().iter().all(|&x| x > 0.0) && rho[I0] >= config.pslope_cutoff_density;

    if !usable {
        return ppm_reconstruct(p, flatn, config);
    }

    let residual = ppm_reconstruct(&p.zip_with(&hse, |p, h| p - h), flatn, config);

    Parabola {
        sm: residual.sm + p0_hse - 0.5 * dx * rho[I0] * src[I0],
        sp: residual.sp + p0_hse + 0.5 * dx * rho[I0] * src[I0],
        center: p[I0],
    }
}




/**
 * Return true if the source field is non-zero anywhere in the five-point
 * stencil about the zone, meaning it must be traced alongside the state.
 */
pub fn trace_source_required<F: Field + ?Sized>(
    src: &F,
    direction: Direction,
    index: (i64, i64, i64),
    component: usize,
) -> bool {
    (-2..=2).any(|n| src.get(direction.shift(index, n), component).abs() > 0.0)
}
