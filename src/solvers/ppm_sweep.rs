use std::ops::Range;

use log::error;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::hydro::config::Config;
use crate::hydro::eos::{EosInput, EosState, EquationOfState};
use crate::hydro::error::Error;
use crate::hydro::geometry::Direction;
use crate::hydro::ppm::{ppm_reconstruct, ppm_reconstruct_pslope, trace_source_required};
use crate::hydro::riemann::{resolve, RiemannInput};
use crate::hydro::state::{InterfaceState, RiemannAux};
use crate::hydro::stencil::{load_stencil, Field, Stencil};
use crate::hydro::trace::{trace_zone, EdgeStates, ZoneProfiles, ZoneWaves};

/// Guard zones needed beyond the first and last zone adjacent to a resolved
/// interface
pub const NUM_GUARD: i64 = 3;

pub const QRHO: usize = 0;
pub const QU: usize = 1;
pub const QV: usize = 2;
pub const QW: usize = 3;
pub const QPRES: usize = 4;
pub const QREINT: usize = 5;

/// Index of the first mass fraction in the primitive field
pub const QFS: usize = 6;




#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]

/**
 * A line of interfaces to resolve. Interface `n` is the low face of the zone
 * `n` steps from `origin` along `direction`.
 */
pub struct Pencil {
    pub direction: Direction,
    pub origin: (i64, i64, i64),
    pub interfaces: Range<i64>,
    pub dt: f64,
    pub dx: f64,

    /// Flattening coefficient applied in every zone
    pub flattening: f64,

    /// Factors on the normal velocity at the first and last interface; zero
    /// makes that interface a reflecting wall
    pub bnd_fac: (f64, f64),

    pub num_species: usize,
}




/**
 * Everything an interface needs from one adjacent zone.
 */
struct Zone {
    edges: EdgeStates,
    sound_speed: f64,
    mass_fractions: Vec<f64>,
}




// ============================================================================
impl Pencil {

    /**
     * A pencil of interfaces with no walls, no flattening, and a single
     * species.
     */
    pub fn new(direction: Direction, origin: (i64, i64, i64), interfaces: Range<i64>, dt: f64, dx: f64) -> Self {
        Self {
            direction,
            origin,
            interfaces,
            dt,
            dx,
            flattening: 1.0,
            bnd_fac: (1.0, 1.0),
            num_species: 1,
        }
    }

    pub fn with_walls(mut self, lower: bool, upper: bool) -> Self {
        self.bnd_fac = (if lower { 0.0 } else { 1.0 }, if upper { 0.0 } else { 1.0 });
        self
    }

    fn zone_index(&self, n: i64) -> (i64, i64, i64) {
        self.direction.shift(self.origin, n)
    }
}




/**
 * Reconstruct and trace one zone of the pencil. Velocities in the primitive
 * field are Cartesian, and `source` (if any) holds a Cartesian acceleration;
 * only its component along the sweep is traced.
 */
fn load_zone<P, S, E>(
    primitive: &P,
    source: Option<&S>,
    eos: &E,
    pencil: &Pencil,
    n: i64,
    config: &Config,
) -> Result<Zone, Error>
where
    P: Field + ?Sized,
    S: Field + ?Sized,
    E: EquationOfState + ?Sized,
{
    let dir = pencil.direction;
    let at = pencil.zone_index(n);
    let rho0 = primitive.get(at, QRHO);
    let p0 = primitive.get(at, QPRES);

    if rho0 <= 0.0 {
        return Err(Error::NegativeMassDensity(rho0));
    }
    if p0 < 0.0 {
        return Err(Error::NegativeGasPressure(p0));
    }

    let mass_fractions: Vec<f64> = (0..pencil.num_species).map(|s| primitive.get(at, QFS + s)).collect();
    let eos_state = eos.evaluate(EosInput::DensityPressure, EosState {
        rho: rho0,
        temperature: 0.0,
        pressure: p0,
        e: 0.0,
        mass_fractions: &mass_fractions,
        gam1: 0.0,
    });
    let gamc = eos_state.gam1;
    let sound_speed = (gamc * p0 / rho0).sqrt();

    let velocity = |m: i64| {
        let x = dir.shift(at, m);
        dir.split_velocity((primitive.get(x, QU), primitive.get(x, QV), primitive.get(x, QW)))
    };
    let un = Stencil::from_fn(|m| velocity(m).0);
    let ut = Stencil::from_fn(|m| velocity(m).1);
    let utt = Stencil::from_fn(|m| velocity(m).2);
    let rho = load_stencil(primitive, dir, at, QRHO);
    let p = load_stencil(primitive, dir, at, QPRES);
    let rhoe = load_stencil(primitive, dir, at, QREINT);
    let flatn = pencil.flattening;

    let (p_profile, src_un) = match source.filter(|src| trace_source_required(*src, dir, at, dir.axis())) {
        Some(src) => {
            let g = load_stencil(src, dir, at, dir.axis());
            (
                ppm_reconstruct_pslope(&rho, &p, &g, flatn, pencil.dx, config),
                Some(ppm_reconstruct(&g, flatn, config)),
            )
        }
        None => (ppm_reconstruct(&p, flatn, config), None),
    };

    let profiles = ZoneProfiles {
        rho: ppm_reconstruct(&rho, flatn, config),
        un: ppm_reconstruct(&un, flatn, config),
        p: p_profile,
        rhoe: ppm_reconstruct(&rhoe, flatn, config),
        ut: ppm_reconstruct(&ut, flatn, config),
        utt: ppm_reconstruct(&utt, flatn, config),
        src_un,
    };
    let waves = ZoneWaves { un: un.center(), c: sound_speed, gamc };
    let edges = trace_zone(&profiles, &waves, pencil.dt, pencil.dt / pencil.dx, config);

    Ok(Zone { edges, sound_speed, mass_fractions })
}




/**
 * Compute the Godunov state on every interface of the pencil: reconstruct
 * and trace the zones on both sides of each interface, then resolve the
 * interfaces in parallel. The primitive field holds density, the three
 * Cartesian velocities, pressure, internal energy density and then
 * `pencil.num_species` mass fractions, and must be readable `NUM_GUARD` zones
 * beyond the zones adjacent to the pencil's interfaces.
 *
 * Any interface that fails to resolve aborts the sweep with its error.
 */
pub fn sweep<P, S, E>(
    primitive: &P,
    source: Option<&S>,
    eos: &E,
    pencil: &Pencil,
    config: &Config,
) -> Result<Vec<InterfaceState>, Error>
where
    P: Field + ?Sized,
    S: Field + ?Sized,
    E: EquationOfState + ?Sized,
{
    config.validate()?;

    if pencil.interfaces.is_empty() {
        return Ok(Vec::new());
    }

    let zone_numbers: Vec<i64> = (pencil.interfaces.start - 1..pencil.interfaces.end).collect();
    let zones = zone_numbers
        .par_iter()
        .map(|&n| load_zone(primitive, source, eos, pencil, n, config))
        .collect::<Result<Vec<_>, _>>()?;

    let num_interfaces = zones.len() - 1;

    (0..num_interfaces)
        .into_par_iter()
        .map(|m| {
            let (l, r) = (&zones[m], &zones[m + 1]);
            let mut bnd_fac = 1.0;
            if m == 0 {
                bnd_fac *= pencil.bnd_fac.0;
            }
            if m == num_interfaces - 1 {
                bnd_fac *= pencil.bnd_fac.1;
            }
            let aux = RiemannAux::from_sound_speeds(l.sound_speed, r.sound_speed, bnd_fac);
            let left = RiemannInput { state: l.edges.minus, mass_fractions: &l.mass_fractions };
            let right = RiemannInput { state: r.edges.plus, mass_fractions: &r.mass_fractions };

            resolve(left, right, &aux, eos, config).map_err(|e| {
                error!(
                    "interface {} of pencil {:?} from {:?} failed to resolve: {}",
                    pencil.interfaces.start + m as i64,
                    pencil.direction,
                    pencil.origin,
                    e
                );
                e
            })
        })
        .collect()
}
