use std::ops::Index;

use super::geometry::Direction;

/**
 * Random-access read of a multi-component scalar field at a 3D zone index.
 * Callers of the stencil loaders guarantee at least two valid zones beyond
 * the active domain along the sweep direction; implementations need not
 * check bounds.
 */
pub trait Field: Sync {
    fn get(&self, index: (i64, i64, i64), component: usize) -> f64;
}




/**
 * Named positions in a five-point stencil, relative to the target zone.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Offset {
    Im2,
    Im1,
    I0,
    Ip1,
    Ip2,
}




#[derive(Clone, Copy, Debug, PartialEq)]

/**
 * Five samples of a field along one sweep direction, centered on the target
 * zone.
 */
pub struct Stencil([f64; 5]);




// ============================================================================
impl Offset {
    pub const ALL: [Offset; 5] = [Offset::Im2, Offset::Im1, Offset::I0, Offset::Ip1, Offset::Ip2];

    pub fn distance(&self) -> i64 {
        match self {
            Offset::Im2 => -2,
            Offset::Im1 => -1,
            Offset::I0 => 0,
            Offset::Ip1 => 1,
            Offset::Ip2 => 2,
        }
    }
}




// ============================================================================
impl Stencil {

    pub fn new(values: [f64; 5]) -> Self {
        Self(values)
    }

    /**
     * A stencil with every sample equal to `value`.
     */
    pub fn uniform(value: f64) -> Self {
        Self([value; 5])
    }

    /**
     * Build a stencil from a function of the offset distance.
     */
    pub fn from_fn<F: Fn(i64) -> f64>(f: F) -> Self {
        Self([f(-2), f(-1), f(0), f(1), f(2)])
    }

    pub fn values(&self) -> [f64; 5] {
        self.0
    }

    pub fn center(&self) -> f64 {
        self.0[2]
    }

    /**
     * Combine two stencils sample-wise.
     */
    pub fn zip_with<F: Fn(f64, f64) -> f64>(&self, other: &Stencil, f: F) -> Self {
        let mut data = [0.0; 5];
        for (n, x) in data.iter_mut().enumerate() {
            *x = f(self.0[n], other.0[n]);
        }
        Self(data)
    }
}

impl Index<Offset> for Stencil {
    type Output = f64;

    fn index(&self, offset: Offset) -> &Self::Output {
        &self.0[(offset.distance() + 2) as usize]
    }
}




/**
 * Load the five-point stencil of `component` centered on zone (i, j, k)
 * along `direction`.
 */
pub fn load_stencil<F: Field + ?Sized>(
    field: &F,
    direction: Direction,
    index: (i64, i64, i64),
    component: usize,
) -> Stencil {
    Stencil::from_fn(|n| field.get(direction.shift(index, n), component))
}

/**
 * Load a stencil of a conserved quantity converted to a per-unit-mass
 * quantity, by dividing by the companion density at each sample.
 */
pub fn load_passive_stencil<F: Field + ?Sized, R: Field + ?Sized>(
    conserved: &F,
    density: &R,
    density_component: usize,
    direction: Direction,
    index: (i64, i64, i64),
    component: usize,
) -> Stencil {
    Stencil::from_fn(|n| {
        let at = direction.shift(index, n);
        conserved.get(at, component) / density.get(at, density_component)
    })
}
