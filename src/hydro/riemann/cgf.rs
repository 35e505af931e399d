use crate::hydro::config::Config;
use crate::hydro::state::{InterfaceState, RadiationState, RiemannAux, SMALL};
use super::{contact_weights, symmetrize_contact, Region};




/**
 * Closed-form star pressure and velocity from the acoustic impedances of the
 * two sides (Castro I, Eq. 33). Written as increments on the left state so
 * that identical states return their own pressure and velocity.
 */
fn star_estimate(ql: &InterfaceState, qr: &InterfaceState, aux: &RiemannAux, config: &Config) -> (f64, f64) {
    let wsmall = config.density_floor * aux.csmall;
    let wl = wsmall.max((ql.gamc * ql.p * ql.rho).abs().sqrt());
    let wr = wsmall.max((qr.gamc * qr.p * qr.rho).abs().sqrt());
    let wwinv = 1.0 / (wl + wr);

    let pstar = ql.p + ((qr.p - ql.p) - wr * (qr.un - ql.un)) * wl * wwinv;
    let ustar = ql.un + (wr * (qr.un - ql.un) + (ql.p - qr.p)) * wwinv;

    (pstar.max(config.pressure_floor), symmetrize_contact(ustar, ql, qr))
}




/**
 * Locate the interface relative to the non-contact wave on the upwind side of
 * the contact. `dp` is the pressure jump from the outer to the star state; a
 * compression is treated as a shock moving at the mean of the two
 * characteristic speeds.
 */
fn classify_wave(co: f64, cstar: f64, uo: f64, ustar: f64, dp: f64, aux: &RiemannAux) -> Region {
    let sgnm = if ustar == 0.0 { 0.0 } else { 1.0f64.copysign(ustar) };
    let mut spout = co - sgnm * uo;
    let mut spin = cstar - sgnm * ustar;

    if dp > 0.0 {
        let ushock = 0.5 * (spin + spout);
        spin = ushock;
        spout = ushock;
    }

    let scr = if spout - spin == 0.0 { SMALL * aux.cavg } else { spout - spin };
    let frac = (1.0 + (spout + spin) / scr) * 0.5;

    Region::classify(spin, spout, frac)
}




/**
 * The Colella, Glaz & Ferguson approximate Riemann solver. The star state is
 * a single linearized estimate, and the internal energy is carried through
 * the waves with its own jump condition so that a general EOS is handled
 * without iteration.
 */
pub fn riemann_cgf(ql: &InterfaceState, qr: &InterfaceState, aux: &RiemannAux, config: &Config) -> InterfaceState {
    let (pstar, ustar) = star_estimate(ql, qr, aux, config);
    let (fp, fm) = contact_weights(ustar);
    let blend = |l: f64, r: f64| fp * l + fm * r;

    let ro = blend(ql.rho, qr.rho).max(config.density_floor);
    let uo = blend(ql.un, qr.un);
    let po = blend(ql.p, qr.p);
    let reo = blend(ql.rhoe, qr.rhoe);
    let gamco = blend(ql.gamc, qr.gamc);

    let roinv = 1.0 / ro;
    let co = (gamco * po * roinv).abs().sqrt().max(aux.csmall);
    let co2inv = 1.0 / (co * co);

    let drho = (pstar - po) * co2inv;
    let rstar = (ro + drho).max(config.density_floor);
    let entho = (reo + po) * roinv * co2inv;
    let estar = reo + (pstar - po) * entho;
    let cstar = (gamco * pstar / rstar).abs().sqrt().max(aux.csmall);

    let region = classify_wave(co, cstar, uo, ustar, pstar - po, aux);

    InterfaceState {
        rho: region.pick(ro, rstar).max(config.density_floor),
        p: region.pick(po, pstar).max(config.pressure_floor),
        rhoe: region.pick(reo, estar),
        gamc: gamco,
        un: region.pick(uo, ustar) * aux.bnd_fac,
        ut: blend(ql.ut, qr.ut),
        utt: blend(ql.utt, qr.utt),
    }
}




/**
 * The Colella, Glaz & Ferguson solver for states coupled to `G` radiation
 * groups. Pressures and energies in `ql` and `qr` are totals; the gas part
 * and each group's radiation energy are carried through the waves
 * separately. The interface flux limiter is upwinded with the contact, or
 * harmonically averaged for a stationary contact. Each group's radiation
 * energy is clamped at zero, while the total energy sums the unclamped
 * values.
 */
pub fn riemann_cgf_radiation<const G: usize>(
    ql: &InterfaceState,
    rl: &RadiationState<G>,
    qr: &InterfaceState,
    rr: &RadiationState<G>,
    aux: &RiemannAux,
    config: &Config,
) -> (InterfaceState, RadiationState<G>) {
    let (pstar, ustar) = star_estimate(ql, qr, aux, config);
    let (fp, fm) = contact_weights(ustar);
    let blend = |l: f64, r: f64| fp * l + fm * r;

    let mut lam = [0.0; G];
    let mut reo_r = [0.0; G];
    let mut po_r = [0.0; G];

    for g in 0..G {
        lam[g] = if ustar == 0.0 {
            2.0 * (rl.lam[g] * rr.lam[g]) / (rl.lam[g] + rr.lam[g] + 1.0e-50)
        } else {
            blend(rl.lam[g], rr.lam[g])
        };
        reo_r[g] = blend(rl.er[g], rr.er[g]);
        po_r[g] = lam[g] * reo_r[g];
    }

    let po_g = blend(rl.p_gas, rr.p_gas);
    let reo_g = blend(rl.rhoe_gas, rr.rhoe_gas);
    let gamco_g = blend(rl.gamc_gas, rr.gamc_gas);

    let ro = blend(ql.rho, qr.rho).max(config.density_floor);
    let uo = blend(ql.un, qr.un);
    let po = blend(ql.p, qr.p);
    let gamco = blend(ql.gamc, qr.gamc);

    let roinv = 1.0 / ro;
    let co = (gamco * po * roinv).abs().sqrt().max(aux.csmall);
    let co2inv = 1.0 / (co * co);

    let drho = (pstar - po) * co2inv;
    let rstar = (ro + drho).max(config.density_floor);

    let estar_g = reo_g + drho * (reo_g + po_g) * roinv;
    let co_g = (gamco_g * po_g * roinv).abs().sqrt().max(aux.csmall);
    let pstar_g = (po_g + drho * co_g * co_g).max(config.pressure_floor);

    let cstar = (gamco * pstar / rstar).abs().sqrt().max(aux.csmall);
    let region = classify_wave(co, cstar, uo, ustar, pstar - po, aux);

    // the total energy carries the unclamped radiation energies
    let mut er = [0.0; G];
    let mut rhoe = region.pick(reo_g, estar_g);
    let rhoe_gas = rhoe;

    for g in 0..G {
        let estar_r = reo_r[g] + drho * (reo_r[g] + po_r[g]) * roinv;
        let picked = region.pick(reo_r[g], estar_r);
        rhoe += picked;
        er[g] = picked.max(0.0);
    }

    let fluid = InterfaceState {
        rho: region.pick(ro, rstar).max(config.density_floor),
        p: region.pick(po, pstar).max(config.pressure_floor),
        rhoe,
        gamc: gamco,
        un: region.pick(uo, ustar) * aux.bnd_fac,
        ut: blend(ql.ut, qr.ut),
        utt: blend(ql.utt, qr.utt),
    };
    let radiation = RadiationState {
        lam,
        er,
        p_gas: region.pick(po_g, pstar_g),
        rhoe_gas,
        gamc_gas: gamco_g,
    };
    (fluid, radiation)
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;

    fn aux(ql: &InterfaceState, qr: &InterfaceState) -> RiemannAux {
        RiemannAux::from_sound_speeds(ql.sound_speed(), qr.sound_speed(), 1.0)
    }

    fn radiating(rho: f64, p_gas: f64, un: f64, er: [f64; 2]) -> (InterfaceState, RadiationState<2>) {
        let radiation = RadiationState {
            lam: [1.0 / 3.0, 1.0 / 3.0],
            er,
            p_gas,
            rhoe_gas: p_gas / 0.4,
            gamc_gas: 1.4,
        };
        let fluid = InterfaceState::new(
            rho,
            p_gas + radiation.pressure(),
            radiation.rhoe_gas + radiation.energy(),
            1.4,
            un,
            0.0,
            0.0,
        );
        (fluid, radiation)
    }

    #[test]
    fn sod_star_state_is_bracketed() {
        let ql = InterfaceState::gamma_law(1.0, 1.0, 0.0, 1.4);
        let qr = InterfaceState::gamma_law(0.125, 0.1, 0.0, 1.4);
        let q = riemann_cgf(&ql, &qr, &aux(&ql, &qr), &Config::default());
        assert!(q.p > qr.p && q.p < ql.p);
        assert!(q.un > 0.0);
        assert!(q.rho >= 0.125 && q.rho <= 1.0);
        assert!(q.rhoe > 0.0);
    }

    #[test]
    fn supersonic_flow_returns_upwind_state() {
        let ql = InterfaceState::new(1.0, 1.0, 2.5, 1.4, 10.0, 0.3, -0.3);
        let qr = InterfaceState::new(0.5, 0.8, 2.0, 1.4, 9.0, 0.1, 0.1);
        let q = riemann_cgf(&ql, &qr, &aux(&ql, &qr), &Config::default());
        assert_eq!(q, ql);
    }

    #[test]
    fn static_contact_keeps_pressure() {
        let ql = InterfaceState::gamma_law(1.0, 1.0, 0.0, 1.4);
        let qr = InterfaceState::gamma_law(0.1, 1.0, 0.0, 1.4);
        let q = riemann_cgf(&ql, &qr, &aux(&ql, &qr), &Config::default());
        assert_eq!(q.un, 0.0);
        assert_eq!(q.p, 1.0);
    }

    #[test]
    fn radiation_identical_states_are_preserved() {
        let (fluid, radiation) = radiating(1.0, 1.0, 0.5, [0.6, 0.3]);
        let (q, r) = riemann_cgf_radiation(&fluid, &radiation, &fluid, &radiation, &aux(&fluid, &fluid), &Config::default());
        assert_eq!(q.rho, fluid.rho);
        assert_eq!(q.un, fluid.un);
        assert_eq!(r.er, radiation.er);
        assert_eq!(r.lam, radiation.lam);
        assert!((q.rhoe - fluid.rhoe).abs() < 1e-14);
        assert!((r.p_gas - radiation.p_gas).abs() < 1e-14);
    }

    #[test]
    fn radiation_energy_is_never_negative() {
        let (ql, rl) = radiating(1.0, 1.0, -3.0, [1e-12, 0.0]);
        let (qr, rr) = radiating(1.0, 1.0, 3.0, [0.0, 1e-12]);
        let (q, r) = riemann_cgf_radiation(&ql, &rl, &qr, &rr, &aux(&ql, &qr), &Config::default());
        assert!(r.er.iter().all(|&e| e >= 0.0));
        assert!(q.p >= Config::default().pressure_floor);
        assert_eq!(q.un, 0.0);
    }

    #[test]
    fn total_energy_keeps_unclamped_radiation() {
        // Gamma_1 < 1 + lambda lets a strong rarefaction drive Er negative
        let (mut ql, rl) = radiating(1.0, 1.0, -3.0, [0.5, 0.5]);
        ql.gamc = 1.2;
        let qr = ql.reflect();
        let (q, r) = riemann_cgf_radiation(&ql, &rl, &qr, &rl, &aux(&ql, &qr), &Config::default());

        let unclamped = 0.5 * (1.0 - (4.0 / 3.0) / 1.2);
        assert_eq!(q.un, 0.0);
        assert_eq!(r.er, [0.0, 0.0]);
        assert!(unclamped < 0.0);
        assert!((q.rhoe - (r.rhoe_gas + 2.0 * unclamped)).abs() < 1e-12, "{:?} {:?}", q, r);
    }

    #[test]
    fn stationary_contact_averages_flux_limiter_harmonically() {
        let (ql, mut rl) = radiating(1.0, 1.0, 0.0, [0.5, 0.5]);
        let (qr, mut rr) = radiating(1.0, 1.0, 0.0, [0.5, 0.5]);
        rl.lam = [0.1, 1.0 / 3.0];
        rr.lam = [0.3, 1.0 / 3.0];
        let (_, r) = riemann_cgf_radiation(&ql, &rl, &qr, &rr, &aux(&ql, &qr), &Config::default());
        assert!((r.lam[0] - 0.15).abs() < 1e-14);
        assert!((r.lam[1] - 1.0 / 3.0).abs() < 1e-14);
    }
}
