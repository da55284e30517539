//! Immutable sphere record.
use crate::error::{Error, Result};
use crate::geometry::{validate_radius, Point};

/// A sphere (a disk in 2D) with a fixed center and a strictly positive radius.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere<P: Point> {
    position: P,
    radius: f64,
}

impl<P: Point> Sphere<P> {
    /// Create a sphere, failing with [`Error::InvalidArgument`] for a radius that is not a
    /// finite positive number or a non-finite position.
    pub fn new(position: P, radius: f64) -> Result<Self> {
        validate_radius(radius)?;
        for i in 0..P::DIM {
            if !position.axis(i).is_finite() {
                return Err(Error::invalid(format!(
                    "sphere position must be finite, got {position:?}"
                )));
            }
        }
        Ok(Self { position, radius })
    }

    /// Create a sphere from a coordinate slice whose length must equal `P::DIM`.
    pub fn from_coords(coords: &[f64], radius: f64) -> Result<Self> {
        if coords.len() != P::DIM {
            return Err(Error::DimensionMismatch {
                expected: P::DIM,
                found: coords.len(),
            });
        }
        Self::new(P::from_fn(|i| coords[i]), radius)
    }

    /// Like [`Sphere::from_coords`], additionally checking an explicitly requested dimension
    /// against the coordinate arity.
    pub fn with_dimension(coords: &[f64], radius: f64, dim: usize) -> Result<Self> {
        if dim != coords.len() {
            return Err(Error::DimensionMismatch {
                expected: dim,
                found: coords.len(),
            });
        }
        Self::from_coords(coords, radius)
    }

    /// Built by the packing engine from already validated values.
    #[inline]
    pub(crate) fn new_unchecked(position: P, radius: f64) -> Self {
        debug_assert!(radius > 0.0);
        Self { position, radius }
    }

    #[inline]
    pub fn position(&self) -> P {
        self.position
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Number of spatial dimensions.
    #[inline]
    pub fn dim(&self) -> usize {
        P::DIM
    }

    /// Volume of the sphere (area in 2D).
    pub fn volume(&self) -> f64 {
        P::ball_volume(self.radius)
    }

    /// Center as a `mint` vector for interop with other math libraries.
    pub fn mint_position(&self) -> P::Mint {
        self.position.into()
    }
}
