use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::hydro::stencil::Field;




#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]

/**
 * A block of cell data: a rectangular range of 3D zone indices, each zone
 * holding `num_fields` components. The backing array is stored row-major in
 * (i, j, k) with the component index fastest. Indexes are absolute, so a
 * block that carries guard zones starts at a negative index.
 */
pub struct FieldBlock {
    area: (Range<i64>, Range<i64>, Range<i64>),
    num_fields: usize,
    data: Vec<f64>,
}




// ============================================================================
impl FieldBlock {

    /**
     * Generate a block covering the given area, with values defined by a
     * closure that fills the components of one zone.
     */
    pub fn from_function<F>(area: (Range<i64>, Range<i64>, Range<i64>), num_fields: usize, f: F) -> Self
    where
        F: Fn((i64, i64, i64), &mut [f64]),
    {
        let (di, dj, dk) = area.clone();
        let num_zones = di.clone().count() * dj.clone().count() * dk.clone().count();
        let mut data = vec![0.0; num_zones * num_fields];
        let mut chunks = data.chunks_exact_mut(num_fields.max(1));

        for i in di {
            for j in dj.clone() {
                for k in dk.clone() {
                    if let Some(slice) = chunks.next() {
                        f((i, j, k), slice)
                    }
                }
            }
        }
        Self { area, num_fields, data }
    }

    /**
     * A block of the given area with every component zero.
     */
    pub fn zeros(area: (Range<i64>, Range<i64>, Range<i64>), num_fields: usize) -> Self {
        Self::from_function(area, num_fields, |_, _| {})
    }

    pub fn area(&self) -> (Range<i64>, Range<i64>, Range<i64>) {
        self.area.clone()
    }

    pub fn num_fields(&self) -> usize {
        self.num_fields
    }

    /**
     * Return the logical dimensions (the memory extent) of the backing array,
     * in zones.
     */
    pub fn dim(&self) -> (usize, usize, usize) {
        (
            (self.area.0.end - self.area.0.start) as usize,
            (self.area.1.end - self.area.1.start) as usize,
            (self.area.2.end - self.area.2.start) as usize,
        )
    }

    pub fn contains(&self, index: (i64, i64, i64)) -> bool {
        self.area.0.contains(&index.0) && self.area.1.contains(&index.1) && self.area.2.contains(&index.2)
    }

    /**
     * Return the components of the zone at the given index.
     */
    pub fn get_slice(&self, index: (i64, i64, i64)) -> &[f64] {
        let s = self.offset(index);
        &self.data[s..s + self.num_fields]
    }

    pub fn get_slice_mut(&mut self, index: (i64, i64, i64)) -> &mut [f64] {
        let s = self.offset(index);
        &mut self.data[s..s + self.num_fields]
    }

    fn offset(&self, index: (i64, i64, i64)) -> usize {
        self.validate_index(index);

        let i = (index.0 - self.area.0.start) as usize;
        let j = (index.1 - self.area.1.start) as usize;
        let k = (index.2 - self.area.2.start) as usize;
        let (_, n, o) = self.dim();
        ((i * n + j) * o + k) * self.num_fields
    }

    fn validate_index(&self, index: (i64, i64, i64)) {
        if !self.contains(index) {
            panic!("index ({} {} {}) out of range on block ({}..{} {}..{} {}..{})",
                index.0,
                index.1,
                index.2,
                self.area.0.start,
                self.area.0.end,
                self.area.1.start,
                self.area.1.end,
                self.area.2.start,
                self.area.2.end);
        }
    }
}




// ============================================================================
impl Field for FieldBlock {
    fn get(&self, index: (i64, i64, i64), component: usize) -> f64 {
        if component >= self.num_fields {
            panic!("component {} out of range on block with {} fields", component, self.num_fields);
        }
        self.get_slice(index)[component]
    }
}
