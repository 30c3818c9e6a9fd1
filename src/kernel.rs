//! Pupil model and the complex blur kernel built from it.
//!
//! The kernel is the pupil function sampled on a square grid:
//!
//! ```text
//! h(x, y) = M(x, y) * exp(i * (p_s(x, y, dz) + p(x, y)))
//! ```
//!
//! where `M` is a disk indicator, `p` the single layer phase and `p_s` the
//! phase contributed by a layer separation `dz`.

use crate::error::{Error, Result};
use ndarray::Array2;
use num_complex::Complex64;
use rayon::prelude::*;
use std::f64::consts::PI;

/// Samples per axis of the default kernel grid.
pub const GRID_SIZE: usize = 512;
/// Radius of the transmitting disk in normalized coordinates.
pub const APERTURE_RADIUS: f64 = PI / 2.;
pub const SINGLE_LAYER_COEFF: f64 = 0.5;
pub const MULTI_LAYER_COEFF: f64 = 0.375;
/// Layer separation used when none is configured.
pub const DEFAULT_DELTA_Z: f64 = 20. * PI;

/// Returns 1 inside the default aperture and 0 on or outside its edge.
pub fn indicator(x: f64, y: f64) -> u8 {
    Pupil::default().indicator(x, y)
}

pub fn contribution_single_layer(x: f64, y: f64) -> f64 {
    Pupil::default().contribution_single_layer(x, y)
}

pub fn contribution_multi_layer(x: f64, y: f64, delta_z: f64) -> f64 {
    Pupil::default().contribution_multi_layer(x, y, delta_z)
}

/// Builds the default 512x512 kernel for a layer separation.
pub fn build_kernel(delta_z: f64) -> Array2<Complex64> {
    Pupil::default().build_kernel(&KernelGrid::default(), delta_z)
}

/// Circular pupil with two quadratic phase terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pupil {
    radius: f64,
    single_layer_coeff: f64,
    multi_layer_coeff: f64,
}

impl Default for Pupil {
    fn default() -> Self {
        Self {
            radius: APERTURE_RADIUS,
            single_layer_coeff: SINGLE_LAYER_COEFF,
            multi_layer_coeff: MULTI_LAYER_COEFF,
        }
    }
}

impl Pupil {
    pub fn new(radius: f64, single_layer_coeff: f64, multi_layer_coeff: f64) -> Self {
        Self {
            radius,
            single_layer_coeff,
            multi_layer_coeff,
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Points exactly on the edge are outside.
    pub fn indicator(&self, x: f64, y: f64) -> u8 {
        if x * x + y * y < self.radius * self.radius {
            1
        } else {
            0
        }
    }

    pub fn contribution_single_layer(&self, x: f64, y: f64) -> f64 {
        self.single_layer_coeff * PI * (x * x + y * y)
    }

    pub fn contribution_multi_layer(&self, x: f64, y: f64, delta_z: f64) -> f64 {
        self.multi_layer_coeff * delta_z * PI * (x * x + y * y)
    }

    /// Complex transmission at a single point.
    ///
    /// Outside the aperture this is exactly `0 + 0i`; inside it has unit
    /// magnitude.
    pub fn transmission(&self, x: f64, y: f64, delta_z: f64) -> Complex64 {
        if self.indicator(x, y) == 0 {
            return Complex64::new(0., 0.);
        }

        let phase =
            self.contribution_multi_layer(x, y, delta_z) + self.contribution_single_layer(x, y);
        Complex64::cis(phase)
    }

    /// Samples the pupil on every cell of `grid`.
    ///
    /// Entry `[i, j]` holds the transmission at `(grid.coord(i), grid.coord(j))`.
    pub fn build_kernel(&self, grid: &KernelGrid, delta_z: f64) -> Array2<Complex64> {
        let n = grid.size();
        let cells: Vec<Complex64> = (0..n * n)
            .into_par_iter()
            .map(|cell| {
                let (i, j) = (cell / n, cell % n);
                self.transmission(grid.coord(i), grid.coord(j), delta_z)
            })
            .collect();

        Array2::from_shape_vec((n, n), cells).expect("one value per grid cell")
    }
}

/// Square sampling grid spreading indices over an interval of width pi.
///
/// `coord(i) = pi / (n - 1) * (i - (n / 2 - 1))`, which for `n = 512` is
/// `pi / 511 * (i - 255)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelGrid {
    size: usize,
    step: f64,
    center: f64,
}

impl Default for KernelGrid {
    fn default() -> Self {
        Self::with_size(GRID_SIZE)
    }
}

impl KernelGrid {
    pub fn new(size: usize) -> Result<Self> {
        if size < 2 {
            return Err(Error::InvalidGrid(size));
        }

        Ok(Self::with_size(size))
    }

    fn with_size(size: usize) -> Self {
        Self {
            size,
            step: PI / (size - 1) as f64,
            center: (size / 2 - 1) as f64,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn coord(&self, index: usize) -> f64 {
        self.step * (index as f64 - self.center)
    }
}

/// Summary of a built kernel, reported after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelStats {
    pub min_re: f64,
    pub max_re: f64,
    pub min_im: f64,
    pub max_im: f64,
    /// Cells inside the aperture.
    pub inside: usize,
}

impl KernelStats {
    pub fn of(kernel: &Array2<Complex64>) -> Self {
        let init = Self {
            min_re: f64::INFINITY,
            max_re: f64::NEG_INFINITY,
            min_im: f64::INFINITY,
            max_im: f64::NEG_INFINITY,
            inside: 0,
        };

        kernel.iter().fold(init, |stats, value| Self {
            min_re: stats.min_re.min(value.re),
            max_re: stats.max_re.max(value.re),
            min_im: stats.min_im.min(value.im),
            max_im: stats.max_im.max(value.im),
            inside: stats.inside + usize::from(value.norm_sqr() > 0.),
        })
    }
}
