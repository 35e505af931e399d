use serde::{Deserialize, Serialize};

/**
 * Enum to hold a unit vector in 3D space; identifies the sweep direction.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    I,
    J,
    K,
}

// ============================================================================
impl Direction {
    pub const ALL: [Direction; 3] = [Direction::I, Direction::J, Direction::K];

    /**
     * The Cartesian axis number of this direction, which is also the
     * component of a vector field along it.
     */
    pub fn axis(&self) -> usize {
        match self {
            Direction::I => 0,
            Direction::J => 1,
            Direction::K => 2,
        }
    }

    /**
     * Return the index displacement of `n` zones along this direction.
     */
    pub fn offset(&self, n: i64) -> (i64, i64, i64) {
        match self {
            Direction::I => (n, 0, 0),
            Direction::J => (0, n, 0),
            Direction::K => (0, 0, n),
        }
    }

    /**
     * Return the index (i, j, k) translated by `n` zones along this
     * direction.
     */
    pub fn shift(&self, index: (i64, i64, i64), n: i64) -> (i64, i64, i64) {
        let (di, dj, dk) = self.offset(n);
        (index.0 + di, index.1 + dj, index.2 + dk)
    }

    /**
     * Order a Cartesian velocity (v1, v2, v3) as (normal, transverse,
     * second transverse) relative to this direction. The transverse
     * components keep their relative Cartesian order.
     */
    pub fn split_velocity(&self, v: (f64, f64, f64)) -> (f64, f64, f64) {
        match self {
            Direction::I => (v.0, v.1, v.2),
            Direction::J => (v.1, v.0, v.2),
            Direction::K => (v.2, v.0, v.1),
        }
    }

    /**
     * Inverse of `split_velocity`.
     */
    pub fn join_velocity(&self, un: f64, ut: f64, utt: f64) -> (f64, f64, f64) {
        match self {
            Direction::I => (un, ut, utt),
            Direction::J => (ut, un, utt),
            Direction::K => (ut, utt, un),
        }
    }
}

// ============================================================================
#[cfg(test)]
mod test {

    use super::Direction;

    #[test]
    fn split_and_join_velocity_are_inverse() {
        let v = (1.0, 2.0, 3.0);
        for dir in Direction::ALL.iter() {
            let (un, ut, utt) = dir.split_velocity(v);
            assert_eq!(dir.join_velocity(un, ut, utt), v);
        }
        assert_eq!(Direction::J.split_velocity(v), (2.0, 1.0, 3.0));
        assert_eq!(Direction::K.split_velocity(v), (3.0, 1.0, 2.0));
    }

    #[test]
    fn shift_moves_along_one_axis() {
        assert_eq!(Direction::I.shift((4, 5, 6), -2), (2, 5, 6));
        assert_eq!(Direction::J.shift((4, 5, 6), 1), (4, 6, 6));
        assert_eq!(Direction::K.shift((4, 5, 6), 2), (4, 5, 8));
        assert_eq!(Direction::K.axis(), 2);
        assert_eq!(Direction::ALL.iter().map(|d| d.axis()).sum::<usize>(), 3);
    }
}
