use super::ca::{self, DecodeError};
use nalgebra::Point3;

/// A decoded C-alpha trace, one point per residue, stored axis-major.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoordinateTrace {
    coords: Vec<f32>,
    residue_count: usize,
}

impl CoordinateTrace {
    pub fn decode(
        block: &[u8],
        residue_count: usize,
        block_length: usize,
    ) -> Result<Self, DecodeError> {
        let coords = ca::decode(block, residue_count, block_length)?;
        Ok(Self {
            coords,
            residue_count,
        })
    }

    pub fn residue_count(&self) -> usize {
        self.residue_count
    }

    /// The flattened values: every x, then every y, then every z.
    pub fn as_slice(&self) -> &[f32] {
        &self.coords
    }

    pub fn point(&self, residue: usize) -> Option<Point3<f32>> {
        if residue >= self.residue_count {
            return None;
        }
        let n = self.residue_count;
        Some(Point3::new(
            self.coords[residue],
            self.coords[n + residue],
            self.coords[2 * n + residue],
        ))
    }

    pub fn points(&self) -> impl ExactSizeIterator<Item = Point3<f32>> + '_ {
        let n = self.residue_count;
        (0..n).map(move |i| Point3::new(self.coords[i], self.coords[n + i], self.coords[2 * n + i]))
    }

    /// Renders every value with a fixed number of decimals, in storage order.
    pub fn to_fixed(&self, decimals: usize) -> Vec<String> {
        self.coords
            .iter()
            .map(|v| format!("{:.*}", decimals, v))
            .collect()
    }

    /// Largest distance between consecutive residues, or `None` for traces
    /// shorter than two residues.
    pub fn max_step(&self) -> Option<f32> {
        self.points()
            .zip(self.points().skip(1))
            .map(|(a, b)| nalgebra::distance(&a, &b))
            .reduce(f32::max)
    }
}
