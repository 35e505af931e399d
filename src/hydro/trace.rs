use super::config::Config;
use super::ppm::Parabola;
use super::state::InterfaceState;

#[derive(Clone, Copy, Debug, PartialEq)]

/**
 * Integrals under a parabola over the domain of dependence of the u - c, u,
 * and u + c waves. `ip` integrates toward the right zone edge and `im`
 * toward the left zone edge.
 */
pub struct WaveIntegrals {
    pub ip: [f64; 3],
    pub im: [f64; 3],
}




/**
 * Integrate under the parabola from the left and right edges for a single
 * wave speed `lam`, over the extent the wave travels in one time step.
 * Returns (Ip, Im). With `dtdx = 0` these are the edge values themselves.
 */
pub fn ppm_int_profile_single(parabola: &Parabola, lam: f64, dtdx: f64) -> (f64, f64) {
    let Parabola { sm, sp, .. } = *parabola;
    let s6 = parabola.s6();
    let sigma = lam.abs() * dtdx;

    // if lam == 0 either branch gives the same result
    if lam <= 0.0 {
        (sp, sm + 0.5 * sigma * (sp - sm + (1.0 - (2.0 / 3.0) * sigma) * s6))
    } else {
        (sp - 0.5 * sigma * (sp - sm - (1.0 - (2.0 / 3.0) * sigma) * s6), sm)
    }
}

/**
 * Integrate under the parabola for the three hydrodynamic waves, with fluid
 * velocity `u` and sound speed `c`.
 */
pub fn ppm_int_profile(parabola: &Parabola, u: f64, c: f64, dtdx: f64) -> WaveIntegrals {
    let mut ip = [0.0; 3];
    let mut im = [0.0; 3];

    for (n, &speed) in [u - c, u, u + c].iter().enumerate() {
        let (p, m) = ppm_int_profile_single(parabola, speed, dtdx);
        ip[n] = p;
        im[n] = m;
    }
    WaveIntegrals { ip, im }
}




/**
 * The reconstructed profiles of one zone, with velocities ordered relative
 * to the sweep direction. `src_un` is the acceleration along the sweep,
 * present only when it must be traced.
 */
#[derive(Clone, Copy, Debug)]
pub struct ZoneProfiles {
    pub rho: Parabola,
    pub un: Parabola,
    pub p: Parabola,
    pub rhoe: Parabola,
    pub ut: Parabola,
    pub utt: Parabola,
    pub src_un: Option<Parabola>,
}

/**
 * Zone-centered wave information: normal velocity, sound speed and Gamma_1.
 */
#[derive(Clone, Copy, Debug)]
pub struct ZoneWaves {
    pub un: f64,
    pub c: f64,
    pub gamc: f64,
}

/**
 * The time-centered states on the two faces of a zone. `plus` sits on the
 * low face and is the right input to that interface; `minus` sits on the
 * high face and is the left input to that interface.
 */
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStates {
    pub plus: InterfaceState,
    pub minus: InterfaceState,
}

#[derive(Clone, Copy, PartialEq)]
enum Face {
    Low,
    High,
}




/**
 * Trace the zone's profiles to its two faces: integrate each primitive under
 * the three characteristics, then project the jumps relative to a reference
 * state onto the characteristic families, keeping only the waves that move
 * toward each face.
 */
pub fn trace_zone(
    profiles: &ZoneProfiles,
    waves: &ZoneWaves,
    dt: f64,
    dtdx: f64,
    config: &Config,
) -> EdgeStates {
    let ZoneWaves { un: u, c, .. } = *waves;
    let rho = ppm_int_profile(&profiles.rho, u, c, dtdx);
    let p = ppm_int_profile(&profiles.p, u, c, dtdx);
    let rhoe = ppm_int_profile(&profiles.rhoe, u, c, dtdx);
    let ut = ppm_int_profile(&profiles.ut, u, c, dtdx);
    let utt = ppm_int_profile(&profiles.utt, u, c, dtdx);
    let mut un = ppm_int_profile(&profiles.un, u, c, dtdx);

    if let Some(src) = &profiles.src_un {
        let src = ppm_int_profile(src, u, c, dtdx);
        for n in 0..3 {
            un.ip[n] += 0.5 * dt * src.ip[n];
            un.im[n] += 0.5 * dt * src.im[n];
        }
    }

    let speeds = [u - c, u, u + c];
    let plus = project(Face::Low, &speeds, &rho.im, &un.im, &p.im, &rhoe.im, waves.gamc, config);
    let minus = project(Face::High, &speeds, &rho.ip, &un.ip, &p.ip, &rhoe.ip, waves.gamc, config);

    EdgeStates {
        plus: InterfaceState { ut: ut.im[1], utt: utt.im[1], ..plus },
        minus: InterfaceState { ut: ut.ip[1], utt: utt.ip[1], ..minus },
    }
}

#[allow(clippy::too_many_arguments)]
fn project(
    face: Face,
    speeds: &[f64; 3],
    rho: &[f64; 3],
    un: &[f64; 3],
    p: &[f64; 3],
    rhoe: &[f64; 3],
    gamc: f64,
    config: &Config,
) -> InterfaceState {

    // the reference state is the fastest wave moving toward the face
    let r = match face {
        Face::Low => 0,
        Face::High => 2,
    };
    let reaches = |speed: f64| match face {
        Face::Low => speed <= 0.0,
        Face::High => speed > 0.0,
    };

    let rho_ref = rho[r].max(config.density_floor);
    let p_ref = p[r].max(config.pressure_floor);
    let un_ref = un[r];
    let rhoe_ref = rhoe[r];

    let cc_ref = (gamc * p_ref / rho_ref).abs().sqrt();
    let csq_ref = cc_ref * cc_ref;
    let h_ref = (p_ref + rhoe_ref) / rho_ref;

    let dum = un_ref - un[0];
    let dptotm = p_ref - p[0];

    let drho = rho_ref - rho[1];
    let dptot = p_ref - p[1];
    let drhoe = rhoe_ref - rhoe[1];

    let dup = un_ref - un[2];
    let dptotp = p_ref - p[2];

    // wave amplitudes, in units of density
    let mut betam = 0.5 * (dptotm / (rho_ref * cc_ref) - dum) * rho_ref / cc_ref;
    let mut betap = 0.5 * (dptotp / (rho_ref * cc_ref) + dup) * rho_ref / cc_ref;
    let mut beta0r = drho - dptot / csq_ref;
    let mut beta0e = drhoe - dptot * h_ref / csq_ref;

    if !reaches(speeds[0]) {
        betam = 0.0;
    }
    if !reaches(speeds[1]) {
        beta0r = 0.0;
        beta0e = 0.0;
    }
    if !reaches(speeds[2]) {
        betap = 0.0;
    }

    InterfaceState {
        rho: (rho_ref - (betam + betap + beta0r)).max(config.density_floor),
        p: (p_ref - (betam + betap) * csq_ref).max(config.pressure_floor),
        rhoe: rhoe_ref - (betam + betap) * h_ref - beta0e,
        gamc,
        un: un_ref - (betap - betam) * cc_ref / rho_ref,
        ut: 0.0,
        utt: 0.0,
    }
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::*;

    fn profiles(rho: Parabola, un: Parabola, p: Parabola) -> ZoneProfiles {
        ZoneProfiles {
            rho,
            un,
            p,
            rhoe: Parabola { sm: p.sm / 0.4, sp: p.sp / 0.4, center: p.center / 0.4 },
            ut: Parabola::flat(0.25),
            utt: Parabola::flat(-0.5),
            src_un: None,
        }
    }

    fn waves(un: f64) -> ZoneWaves {
        ZoneWaves { un, c: 1.4f64.sqrt(), gamc: 1.4 }
    }

    #[test]
    fn zero_time_step_returns_edge_values() {
        let parabola = Parabola { sm: 1.0, sp: 3.0, center: 2.2 };
        for &speed in &[-2.0, -0.5, 0.0, 0.5, 2.0] {
            assert_eq!(ppm_int_profile_single(&parabola, speed, 0.0), (3.0, 1.0));
            let integrals = ppm_int_profile(&parabola, speed, 1.0, 0.0);
            assert_eq!(integrals.ip, [3.0; 3]);
            assert_eq!(integrals.im, [1.0; 3]);
        }
    }

    #[test]
    fn flat_profile_integrates_to_center() {
        let parabola = Parabola::flat(1.7);
        for &dtdx in &[0.0, 0.1, 0.5] {
            for &speed in &[-2.0, -0.5, 0.0, 0.5, 2.0] {
                assert_eq!(ppm_int_profile_single(&parabola, speed, dtdx), (1.7, 1.7));
            }
        }
    }

    #[test]
    fn full_courant_number_integrates_whole_zone() {
        let parabola = Parabola { sm: 1.0, sp: 2.0, center: 1.8 };
        let (ip, im) = ppm_int_profile_single(&parabola, 1.0, 1.0);
        assert!((ip - 1.8).abs() < 1e-14);
        assert_eq!(im, 1.0);
        let (ip, im) = ppm_int_profile_single(&parabola, -1.0, 1.0);
        assert_eq!(ip, 2.0);
        assert!((im - 1.8).abs() < 1e-14);
    }

    #[test]
    fn integrals_lie_between_edges() {
        let parabola = Parabola { sm: 1.0, sp: 2.0, center: 1.5 };
        for n in 0..=10 {
            let sigma = n as f64 / 10.0;
            for &speed in &[-1.0, 1.0] {
                let (ip, im) = ppm_int_profile_single(&parabola, speed, sigma);
                assert!(ip >= 1.0 && ip <= 2.0);
                assert!(im >= 1.0 && im <= 2.0);
            }
        }
    }

    #[test]
    fn uniform_zone_traces_to_cell_state() {
        let flat = profiles(Parabola::flat(1.0), Parabola::flat(0.3), Parabola::flat(1.0));
        for &dtdx in &[0.0, 0.2, 0.4] {
            let edges = trace_zone(&flat, &waves(0.3), 0.1, dtdx, &Config::default());
            for state in &[edges.plus, edges.minus] {
                assert_eq!(state.rho, 1.0);
                assert_eq!(state.un, 0.3);
                assert_eq!(state.p, 1.0);
                assert_eq!(state.rhoe, 2.5);
                assert_eq!(state.ut, 0.25);
                assert_eq!(state.utt, -0.5);
            }
        }
    }

    #[test]
    fn zero_time_step_traces_to_edges() {
        let rho = Parabola { sm: 0.9, sp: 1.1, center: 1.0 };
        let p = Parabola { sm: 0.8, sp: 1.2, center: 1.0 };
        let edges = trace_zone(&profiles(rho, Parabola::flat(0.0), p), &waves(0.0), 0.1, 0.0, &Config::default());
        assert_eq!(edges.plus.rho, 0.9);
        assert_eq!(edges.plus.p, 0.8);
        assert_eq!(edges.minus.rho, 1.1);
        assert_eq!(edges.minus.p, 1.2);
    }

    #[test]
    fn supersonic_flow_takes_upwind_edge() {
        // every wave moves right: the low face sees no characteristic
        let rho = Parabola { sm: 0.9, sp: 1.1, center: 1.0 };
        let p = Parabola { sm: 0.8, sp: 1.2, center: 1.0 };
        let edges = trace_zone(&profiles(rho, Parabola::flat(5.0), p), &waves(5.0), 0.1, 0.1, &Config::default());
        assert_eq!(edges.plus.rho, 0.9);
        assert_eq!(edges.plus.p, 0.8);
        assert!(edges.minus.rho < 1.1 && edges.minus.rho > 0.9);
    }

    #[test]
    fn velocity_source_is_half_step_kick() {
        let mut zone = profiles(Parabola::flat(1.0), Parabola::flat(0.0), Parabola::flat(1.0));
        zone.src_un = Some(Parabola::flat(-2.0));
        let edges = trace_zone(&zone, &waves(0.0), 0.1, 0.3, &Config::default());
        assert!((edges.plus.un + 0.1).abs() < 1e-14);
        assert!((edges.minus.un + 0.1).abs() < 1e-14);
    }

    #[test]
    fn traced_states_respect_floors() {
        let config = Config { density_floor: 1e-3, pressure_floor: 1e-4, ..Config::default() };
        let rho = Parabola { sm: 1e-6, sp: 1.0, center: 0.5 };
        let p = Parabola { sm: 1e-8, sp: 1.0, center: 0.5 };
        let edges = trace_zone(&profiles(rho, Parabola::flat(-3.0), p), &waves(-3.0), 0.1, 0.3, &config);
        for state in &[edges.plus, edges.minus] {
            assert!(state.rho >= 1e-3);
            assert!(state.p >= 1e-4);
        }
    }
}
