//! Runner bundling a domain extent with packing options.
use rand::RngCore;

use crate::error::Result;
use crate::geometry::{validate_extent, Point, Sphere};
use crate::packing::events::EventSink;
use crate::packing::{
    bubblebath_from_distribution_in_place_with_events, bubblebath_in_place_with_events,
    PackOptions, PackReport,
};
use crate::radii::{RadiusDistribution, RadiusSource};

/// Packs spheres into a fixed domain with fixed options.
#[derive(Debug, Clone)]
pub struct Packer<P: Point> {
    /// Size of the domain; positions live in `[0, extent[i])`.
    pub extent: P,
    /// Options applied to every run.
    pub options: PackOptions,
}

impl<P: Point> Packer<P> {
    /// Creates a runner after validating `extent` and `options`.
    pub fn try_new(extent: P, options: PackOptions) -> Result<Self> {
        validate_extent(extent)?;
        options.validate()?;
        Ok(Self { extent, options })
    }

    pub fn new(extent: P, options: PackOptions) -> Self {
        debug_assert!(
            validate_extent(extent).is_ok(),
            "extent must be > 0 along every axis"
        );
        debug_assert!(options.validate().is_ok(), "options must be valid");
        Self { extent, options }
    }

    /// Packs `radii` into an empty domain.
    pub fn pack(&self, radii: &[f64], rng: &mut impl RngCore) -> Result<Vec<Sphere<P>>> {
        let mut spheres = Vec::with_capacity(radii.len());
        self.pack_into(&mut spheres, radii, rng)?;
        Ok(spheres)
    }

    /// Appends `radii` to an existing packing.
    pub fn pack_into(
        &self,
        spheres: &mut Vec<Sphere<P>>,
        radii: &[f64],
        rng: &mut impl RngCore,
    ) -> Result<PackReport> {
        bubblebath_in_place_with_events(spheres, radii, self.extent, &self.options, rng, &mut ())
    }

    pub fn pack_into_with_events(
        &self,
        spheres: &mut Vec<Sphere<P>>,
        radii: &[f64],
        rng: &mut impl RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<PackReport> {
        bubblebath_in_place_with_events(spheres, radii, self.extent, &self.options, rng, sink)
    }

    /// Packs radii drawn from `distribution` up to fraction `phi_max`.
    pub fn pack_distribution(
        &self,
        distribution: &dyn RadiusDistribution,
        phi_max: f64,
        rng: &mut impl RngCore,
    ) -> Result<Vec<Sphere<P>>> {
        let mut spheres = Vec::new();
        self.pack_distribution_into(&mut spheres, distribution, phi_max, rng)?;
        Ok(spheres)
    }

    pub fn pack_distribution_into(
        &self,
        spheres: &mut Vec<Sphere<P>>,
        distribution: &dyn RadiusDistribution,
        phi_max: f64,
        rng: &mut impl RngCore,
    ) -> Result<PackReport> {
        self.pack_distribution_into_with_events(spheres, distribution, phi_max, rng, &mut ())
    }

    pub fn pack_distribution_into_with_events(
        &self,
        spheres: &mut Vec<Sphere<P>>,
        distribution: &dyn RadiusDistribution,
        phi_max: f64,
        rng: &mut impl RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<PackReport> {
        bubblebath_from_distribution_in_place_with_events(
            spheres,
            distribution,
            phi_max,
            self.extent,
            &self.options,
            rng,
            sink,
        )
    }

    /// Packs from either kind of [`RadiusSource`]; `phi_max` only bounds distributions.
    pub fn pack_source(
        &self,
        source: &RadiusSource,
        phi_max: f64,
        rng: &mut impl RngCore,
    ) -> Result<Vec<Sphere<P>>> {
        let mut spheres = Vec::new();
        match source {
            RadiusSource::List(radii) => {
                crate::radii::validate_phi_max(phi_max)?;
                self.pack_into(&mut spheres, radii, rng)?;
            }
            RadiusSource::Distribution(dist) => {
                self.pack_distribution_into(&mut spheres, dist.as_ref(), phi_max, rng)?;
            }
        }
        Ok(spheres)
    }
}
