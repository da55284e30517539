//! Dimension-generic geometry: points, spheres, and the predicates used by packing and walkmaps.
//!
//! Positions are glam `f64` vectors. [`Point`] is implemented for [`DVec2`] (disks) and
//! [`DVec3`] (balls) and fixes the dimensionality of everything built on top of it at
//! compile time.
use std::f64::consts::PI;
use std::fmt::Debug;

use glam::{DVec2, DVec3};

use crate::error::{Error, Result};

pub mod predicates;
pub mod sphere;

pub use predicates::{
    inside_boundaries, minimum_image, overlaps, overlaps_any, walkable, walkable_periodic,
};
pub use sphere::Sphere;

mod sealed {
    pub trait Sealed {}

    impl Sealed for glam::DVec2 {}
    impl Sealed for glam::DVec3 {}
}

/// A position in 2D or 3D space.
pub trait Point: sealed::Sealed + Copy + Debug + PartialEq + Send + Sync + 'static {
    /// Number of spatial dimensions.
    const DIM: usize;

    /// Interop vector type from `mint`.
    type Mint: From<Self> + Into<Self>;

    /// Build a point from its per-axis components.
    fn from_fn(f: impl FnMut(usize) -> f64) -> Self;

    /// Component along `axis`. Panics if `axis >= DIM`.
    fn axis(&self, axis: usize) -> f64;

    /// Euclidean distance to `other`.
    fn distance_to(&self, other: Self) -> f64;

    /// Product of all components; the volume of a box with this extent.
    fn box_volume(&self) -> f64;

    /// Volume of a ball of `radius` (disk area in 2D).
    fn ball_volume(radius: f64) -> f64;
}

impl Point for DVec2 {
    const DIM: usize = 2;
    type Mint = mint::Vector2<f64>;

    #[inline]
    fn from_fn(mut f: impl FnMut(usize) -> f64) -> Self {
        DVec2::new(f(0), f(1))
    }

    #[inline]
    fn axis(&self, axis: usize) -> f64 {
        self[axis]
    }

    #[inline]
    fn distance_to(&self, other: Self) -> f64 {
        self.distance(other)
    }

    #[inline]
    fn box_volume(&self) -> f64 {
        self.element_product()
    }

    #[inline]
    fn ball_volume(radius: f64) -> f64 {
        PI * radius * radius
    }
}

impl Point for DVec3 {
    const DIM: usize = 3;
    type Mint = mint::Vector3<f64>;

    #[inline]
    fn from_fn(mut f: impl FnMut(usize) -> f64) -> Self {
        DVec3::new(f(0), f(1), f(2))
    }

    #[inline]
    fn axis(&self, axis: usize) -> f64 {
        self[axis]
    }

    #[inline]
    fn distance_to(&self, other: Self) -> f64 {
        self.distance(other)
    }

    #[inline]
    fn box_volume(&self) -> f64 {
        self.element_product()
    }

    #[inline]
    fn ball_volume(radius: f64) -> f64 {
        4.0 / 3.0 * PI * radius * radius * radius
    }
}

/// Volume of a ball of `radius` in `dim` dimensions (disk area for `dim == 2`).
pub fn volume(radius: f64, dim: usize) -> Result<f64> {
    match dim {
        2 => Ok(DVec2::ball_volume(radius)),
        3 => Ok(DVec3::ball_volume(radius)),
        other => Err(Error::UnsupportedDimension(other)),
    }
}

/// Checks that every extent component is finite and strictly positive.
pub(crate) fn validate_extent<P: Point>(extent: P) -> Result<()> {
    for i in 0..P::DIM {
        let e = extent.axis(i);
        if !e.is_finite() || e <= 0.0 {
            return Err(Error::invalid(format!(
                "domain extent must be > 0 along every axis, got {e} on axis {i}"
            )));
        }
    }
    Ok(())
}

/// Checks that a radius is finite and strictly positive.
pub(crate) fn validate_radius(radius: f64) -> Result<()> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(Error::invalid(format!(
            "radius must be a finite number > 0, got {radius}"
        )));
    }
    Ok(())
}
