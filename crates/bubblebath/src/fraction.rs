//! Packing fraction: the share of the domain volume occupied by spheres.
//!
//! The analytic forms sum ball volumes and are inexact when spheres overlap or cross the
//! boundary. The walkmap form measures the grid directly and is exact up to resolution.
use crate::error::{Error, Result};
use crate::geometry::{validate_extent, validate_radius, volume, Point, Sphere};
use crate::walkmap::Walkmap;

/// Sum of sphere volumes over the domain volume. Zero for an empty slice.
pub fn packing_fraction<P: Point>(spheres: &[Sphere<P>], extent: P) -> Result<f64> {
    validate_extent(extent)?;
    let occupied: f64 = spheres.iter().map(Sphere::volume).sum();
    Ok(occupied / extent.box_volume())
}

/// Packing fraction of bare `radii` in a box of `extent`; the dimension is `extent.len()`.
pub fn radii_packing_fraction(radii: &[f64], extent: &[f64]) -> Result<f64> {
    let dim = extent.len();
    if !matches!(dim, 2 | 3) {
        return Err(Error::UnsupportedDimension(dim));
    }
    let mut domain = 1.0;
    for &e in extent {
        if !e.is_finite() || e <= 0.0 {
            return Err(Error::invalid(format!(
                "domain extent must be > 0 along every axis, got {e}"
            )));
        }
        domain *= e;
    }
    let mut occupied = 0.0;
    for &r in radii {
        validate_radius(r)?;
        occupied += volume(r, dim)?;
    }
    Ok(occupied / domain)
}

/// Occupied share of a walkmap's cells. Zero for a grid without cells.
pub fn walkmap_packing_fraction<P: Point>(walkmap: &Walkmap<P>) -> f64 {
    if walkmap.is_empty() {
        return 0.0;
    }
    1.0 - walkmap.walkable_count() as f64 / walkmap.len() as f64
}
