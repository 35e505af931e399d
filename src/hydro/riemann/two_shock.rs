use log::debug;

use crate::hydro::config::{Config, NonConvergencePolicy, HISTORY_SIZE, PSTAR_BISECT_FACTOR};
use crate::hydro::error::Error;
use crate::hydro::state::{InterfaceState, RiemannAux, SMALL};
use super::{contact_weights, symmetrize_contact, NonConvergence, Region, SMLP1, WEAK_WAVE};




/**
 * Bounds and rate of change of the effective gamma across a shock, shared by
 * both sides of one interface.
 */
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GammaRange {
    pub gdot: f64,
    pub gmin: f64,
    pub gmax: f64,
}




/**
 * The resolved pressure and velocity between the two non-contact waves.
 */
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarState {
    pub pstar: f64,
    pub ustar: f64,
    /// Number of secant iterations taken
    pub iterations: usize,
}




/**
 * The quantities of one side that enter the shock jump conditions.
 */
#[derive(Clone, Copy, Debug)]
struct Side {
    u: f64,
    p: f64,
    tau: f64,
    game: f64,
    clsq: f64,
}




// ============================================================================
impl GammaRange {
    pub fn between(ql: &InterfaceState, qr: &InterfaceState) -> Self {
        let gamel = ql.game();
        let gamer = qr.game();
        let game_bar = 0.5 * (gamel + gamer);
        let gamc_bar = 0.5 * (ql.gamc + qr.gamc);

        Self {
            gdot: 2.0 * (1.0 - game_bar / gamc_bar) * (game_bar - 1.0),
            gmin: gamel.min(gamer).min(1.0),
            gmax: gamel.max(gamer).max(2.0),
        }
    }
}




// ============================================================================
impl Side {
    fn new(q: &InterfaceState) -> Self {
        Self {
            u: q.un,
            p: q.p,
            tau: 1.0 / q.rho,
            game: q.game(),
            clsq: q.gamc * q.p * q.rho,
        }
    }

    /// Lagrangian shock speed W for a star pressure `pstar`
    fn impedance(&self, pstar: f64, range: &GammaRange) -> f64 {
        wsqge(self.p, self.tau, self.game, self.clsq, pstar, range).1.sqrt()
    }
}




/**
 * Predict the effective gamma behind a shock to pressure `pstar`, and the
 * square of the Lagrangian shock speed that follows from the Rankine-Hugoniot
 * conditions with that gamma (Colella & Glaz 1985, Eqs. 31 and 34). Returns
 * `(gstar, wsq)`.
 *
 * For a negligible pressure jump `wsq` is the Lagrangian sound speed squared
 * `csq`, and it is never less than `csq (gam - 1) / (2 gam)`.
 */
pub fn wsqge(p: f64, tau: f64, gam: f64, csq: f64, pstar: f64, range: &GammaRange) -> (f64, f64) {
    let gstar = ((pstar - p) * range.gdot / (pstar + p) + gam)
        .max(range.gmin)
        .min(range.gmax);

    let mut alpha = pstar - (gstar - 1.0) * p / (gam - 1.0);
    if alpha == 0.0 {
        alpha = SMLP1 * (pstar + p);
    }
    let beta = pstar + 0.5 * (gstar - 1.0) * (pstar + p);

    let wsq = if (pstar - p).abs() < SMLP1 * (pstar + p) {
        csq
    } else {
        (pstar - p) * beta / (tau * alpha)
    };
    (gstar, wsq.max((0.5 * (gam - 1.0) / gam) * csq))
}




/**
 * The acoustic (linearized two-shock) estimate of the star pressure, given
 * the impedances W of the two sides.
 */
fn linear_estimate(ql: &InterfaceState, qr: &InterfaceState, wl: f64, wr: f64) -> f64 {
    ql.p + ((qr.p - ql.p) - wr * (qr.un - ql.un)) * wl / (wl + wr)
}




/**
 * Velocity mismatch u*_L(p) - u*_R(p) across the contact, decreasing in p.
 */
fn mismatch(left: &Side, right: &Side, range: &GammaRange, p: f64) -> f64 {
    let ustar_l = left.u - (p - left.p) / left.impedance(p, range);
    let ustar_r = right.u + (p - right.p) / right.impedance(p, range);
    ustar_l - ustar_r
}




/**
 * Outcome of a bisection search: the star pressure if the search converged,
 * the last bracket searched, and the number of trial pressures recorded.
 */
struct Bisection {
    pstar: Option<f64>,
    bracket: (f64, f64),
    steps: usize,
}




/**
 * Bisect the velocity mismatch starting from the bracket `(lo, hi)`. The
 * mismatch decreases with p, so a bracket lying on one side of the root is
 * first widened toward it, doubling its width at each step and never going
 * below `pfloor`. Every trial pressure is recorded into `history`, whose
 * length bounds the total number of steps. The search converges only once
 * the root is bracketed and the bracket is narrower than the tolerance.
 */
fn pstar_bisection(
    bracket: (f64, f64),
    left: &Side,
    right: &Side,
    range: &GammaRange,
    tolerance: f64,
    pfloor: f64,
    history: &mut [f64],
) -> Bisection {
    let (mut lo, mut hi) = bracket;
    let f = |p: f64| mismatch(left, right, range, p);
    let mut f_lo = f(lo);
    let mut f_hi = f(hi);
    let mut steps = 0;

    while f_lo * f_hi > 0.0 {
        if steps == history.len() || (f_lo < 0.0 && lo <= pfloor) {
            return Bisection { pstar: None, bracket: (lo, hi), steps };
        }
        let width = if hi > lo { hi - lo } else { tolerance * hi };

        if f_lo > 0.0 {
            lo = hi;
            f_lo = f_hi;
            hi += 2.0 * width;
            f_hi = f(hi);
            history[steps] = hi;
        } else {
            hi = lo;
            f_hi = f_lo;
            lo = (lo - 2.0 * width).max(pfloor);
            f_lo = f(lo);
            history[steps] = lo;
        }
        steps += 1;
    }

    while steps < history.len() {
        let pstar = 0.5 * (lo + hi);
        history[steps] = pstar;
        steps += 1;

        if 0.5 * (hi - lo) < tolerance * pstar {
            return Bisection { pstar: Some(pstar), bracket: (lo, hi), steps };
        }

        let f_c = f(pstar);

        if f_lo * f_c < 0.0 {
            hi = pstar;
        } else {
            lo = pstar;
            f_lo = f_c;
        }
    }
    Bisection { pstar: None, bracket: (lo, hi), steps }
}




/**
 * Find the star state of the two-shock approximation by secant iteration on
 * the star pressure. If the iteration does not converge within
 * `config.max_iterations` (at least two iterations are always taken), the
 * configured `NonConvergencePolicy` decides whether to fail, fall back to the
 * linear estimate, or bisect starting from the range of the most recent
 * iterates. A configuration that fails `Config::validate` is rejected.
 */
pub fn two_shock_star(
    ql: &InterfaceState,
    qr: &InterfaceState,
    aux: &RiemannAux,
    config: &Config,
) -> Result<StarState, Error> {
    config.validate()?;

    let range = GammaRange::between(ql, qr);
    let left = Side::new(ql);
    let right = Side::new(qr);
    let pfloor = config.pressure_floor;

    let wsmall = config.density_floor * aux.csmall;
    let wl = wsmall.max(left.clsq.abs().sqrt());
    let wr = wsmall.max(right.clsq.abs().sqrt());
    let mut pstar = linear_estimate(ql, qr, wl, wr).max(pfloor);

    let wl = left.impedance(pstar, &range);
    let wr = right.impedance(pstar, &range);
    let mut pstar_old = pstar;
    let mut ustar_l = ql.un - (pstar - ql.p) / wl;
    let mut ustar_r = qr.un + (pstar - qr.p) / wr;
    pstar = linear_estimate(ql, qr, wl, wr).max(pfloor);

    // inverse impedances from here on
    let mut wl = 1.0 / wl;
    let mut wr = 1.0 / wr;

    let mut history = [0.0; HISTORY_SIZE];
    let mut iterations = 0;
    let mut converged = false;

    while (iterations < config.max_iterations && !converged) || iterations < 2 {
        wl = 1.0 / left.impedance(pstar, &range);
        wr = 1.0 / right.impedance(pstar, &range);

        let ustar_l_old = ustar_l;
        let ustar_r_old = ustar_r;
        ustar_r = qr.un - (qr.p - pstar) * wr;
        ustar_l = ql.un + (ql.p - pstar) * wl;

        let dpditer = (pstar_old - pstar).abs();

        // |du*| on each side, or its acoustic estimate for a weak change
        let mut zp = (ustar_l - ustar_l_old).abs();
        if zp - WEAK_WAVE * aux.cavg <= 0.0 {
            zp = dpditer * wl;
        }
        let mut zm = (ustar_r - ustar_r_old).abs();
        if zm - WEAK_WAVE * aux.cavg <= 0.0 {
            zm = dpditer * wr;
        }

        let denom = if dpditer > 0.0 {
            dpditer / (zp + zm).max(SMALL * aux.cavg)
        } else {
            0.0
        };
        pstar_old = pstar;
        pstar = (pstar - denom * (ustar_r - ustar_l)).max(pfloor);

        converged = (pstar - pstar_old).abs() < config.tolerance * pstar;
        history[iterations] = pstar;
        iterations += 1;
    }

    if !converged {
        let residual = (pstar - pstar_old).abs() / pstar;

        let failure = |bisection_history: Vec<f64>, bracket: Option<(f64, f64)>| {
            Error::NonConvergence(Box::new(NonConvergence {
                left: *ql,
                right: *qr,
                aux: *aux,
                history: history[..iterations].to_vec(),
                bisection_history,
                bracket,
                residual,
            }))
        };

        match config.non_convergence {
            NonConvergencePolicy::Fatal => {
                return Err(failure(Vec::new(), None));
            }
            NonConvergencePolicy::LinearFallback => {
                debug!("two-shock iteration stalled at p* = {}, using the linear estimate", pstar);
                pstar = linear_estimate(ql, qr, 1.0 / wl, 1.0 / wr).max(pfloor);
            }
            NonConvergencePolicy::Bisection => {
                let recent = &history[iterations.saturating_sub(6)..iterations];
                let lo = recent.iter().cloned().fold(f64::INFINITY, f64::min).max(pfloor);
                let hi = recent.iter().cloned().fold(f64::NEG_INFINITY, f64::max).max(pfloor);

                let mut extra = [0.0; PSTAR_BISECT_FACTOR * HISTORY_SIZE];
                let steps = PSTAR_BISECT_FACTOR * config.max_iterations;
                let search = pstar_bisection((lo, hi), &left, &right, &range, config.tolerance, pfloor, &mut extra[..steps]);

                match search.pstar {
                    Some(p) => {
                        debug!("two-shock iteration stalled, bisection gave p* = {} in {} steps", p, search.steps);
                        pstar = p;
                    }
                    None => {
                        return Err(failure(extra[..search.steps].to_vec(), Some(search.bracket)));
                    }
                }
            }
        }
        wl = 1.0 / left.impedance(pstar, &range);
        wr = 1.0 / right.impedance(pstar, &range);
    }

    let ustar_r = qr.un - (qr.p - pstar) * wr;
    let ustar_l = ql.un + (ql.p - pstar) * wl;
    let ustar = symmetrize_contact(0.5 * (ustar_l + ustar_r), ql, qr);

    Ok(StarState { pstar, ustar, iterations })
}




/**
 * The Colella & Glaz (1985) approximate Riemann solver. The star state comes
 * from `two_shock_star`; the interface state is then sampled from the wave
 * on the upwind side of the contact, interpolating linearly through a
 * rarefaction fan.
 */
pub fn riemann_cg(
    ql: &InterfaceState,
    qr: &InterfaceState,
    aux: &RiemannAux,
    config: &Config,
) -> Result<InterfaceState, Error> {
    let StarState { pstar, ustar, .. } = two_shock_star(ql, qr, aux, config)?;
    let range = GammaRange::between(ql, qr);
    let (fp, fm) = contact_weights(ustar);
    let blend = |l: f64, r: f64| fp * l + fm * r;

    let ro = if ustar > 0.0 {
        ql.rho
    } else if ustar < 0.0 {
        qr.rho
    } else {
        // 1 / rho averaged, i.e. the harmonic mean of the densities
        ql.rho + (qr.rho - ql.rho) * ql.rho / (ql.rho + qr.rho)
    };
    let ro = ro.max(config.density_floor);
    let tauo = 1.0 / ro;
    let uo = blend(ql.un, qr.un);
    let po = blend(ql.p, qr.p);
    let reo = blend(ql.rhoe, qr.rhoe);
    let gamco = blend(ql.gamc, qr.gamc);
    let gameo = blend(ql.game(), qr.game());

    let co = (gamco * po * tauo).abs().sqrt().max(aux.csmall);
    let clsq = (co * ro).powi(2);
    let (gamstar, wosq) = wsqge(po, tauo, gameo, clsq, pstar, &range);

    let sgnm = 1.0f64.copysign(ustar);
    let wo = wosq.sqrt();
    let dpjmp = pstar - po;

    let rstar = (ro / (1.0 - ro * dpjmp / wosq)).max(config.density_floor);
    let cstar = (gamco * pstar / rstar).abs().sqrt().max(aux.csmall);

    let mut spout = co - sgnm * uo;
    let mut spin = cstar - sgnm * ustar;

    if dpjmp >= 0.0 {
        let ushock = wo * tauo - sgnm * uo;
        spin = ushock;
        spout = ushock;
    }

    let frac = 0.5 * (1.0 + (spin + spout) / (spout - spin).max(spin + spout).max(SMALL * aux.cavg));
    let region = Region::classify(spin, spout, frac);

    let p = region.pick(po, pstar).max(config.pressure_floor);
    let rhoe = match region {
        Region::Outer => reo,
        Region::Star if dpjmp == 0.0 => reo,
        Region::Star => p / (gamstar - 1.0),
        Region::Fan(_) => p / (region.pick(gameo, gamstar) - 1.0),
    };

    Ok(InterfaceState {
        rho: region.pick(ro, rstar).max(config.density_floor),
        p,
        rhoe,
        gamc: gamco,
        un: region.pick(uo, ustar) * aux.bnd_fac,
        ut: blend(ql.ut, qr.ut),
        utt: blend(ql.utt, qr.utt),
    })
}
