//! Radius sources and fraction-bounded radius sequence generation.
//!
//! A [`RadiusDistribution`] is the crate's only external collaborator: anything that can draw
//! one positive radius from an RNG. Closures implement it directly, so a distribution from
//! another crate plugs in as `|rng| dist.sample(rng)`. A [`RadiusSource`] is either such a
//! distribution or an explicit list of radii.
use rand::RngCore;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::geometry::{validate_extent, validate_radius, Point};
use crate::packing::events::{EventSink, PackEvent, PackEventKind};
use crate::sampling::{rand01, uniform_in};

pub const DEFAULT_RADII_MAX_TRIES: usize = 10_000;

/// Trait for drawing single radii.
pub trait RadiusDistribution: Send + Sync {
    fn sample(&self, rng: &mut dyn RngCore) -> f64;
}

impl<F> RadiusDistribution for F
where
    F: Fn(&mut dyn RngCore) -> f64 + Send + Sync,
{
    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        self(rng)
    }
}

/// Always yields the same radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantRadius(pub f64);

impl RadiusDistribution for ConstantRadius {
    fn sample(&self, _rng: &mut dyn RngCore) -> f64 {
        self.0
    }
}

/// Radii drawn uniformly from `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformRadius {
    pub min: f64,
    pub max: f64,
}

impl UniformRadius {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        validate_radius(min)?;
        validate_radius(max)?;
        if min > max {
            return Err(Error::invalid(format!(
                "uniform radius range is empty: min {min} > max {max}"
            )));
        }
        Ok(Self { min, max })
    }
}

impl RadiusDistribution for UniformRadius {
    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        uniform_in(rng, self.min, self.max)
    }
}

/// Radii chosen uniformly among a fixed set of values.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteRadius {
    values: Vec<f64>,
}

impl DiscreteRadius {
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::invalid("discrete radius set must not be empty"));
        }
        validate_radii(&values)?;
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl RadiusDistribution for DiscreteRadius {
    fn sample(&self, rng: &mut dyn RngCore) -> f64 {
        let idx = ((rand01(rng) * self.values.len() as f64) as usize).min(self.values.len() - 1);
        self.values[idx]
    }
}

/// Where the radii of a packing come from.
pub enum RadiusSource {
    /// An explicit list; used as-is (no fraction trimming).
    List(Vec<f64>),
    /// A distribution sampled until the fraction budget is exhausted.
    Distribution(Box<dyn RadiusDistribution>),
}

impl RadiusSource {
    /// Create a source from a concrete distribution.
    pub fn distribution<D: RadiusDistribution + 'static>(distribution: D) -> Self {
        RadiusSource::Distribution(Box::new(distribution))
    }

    /// Produce the finite radius list for a packing of `extent` bounded by `phi_max`.
    ///
    /// `phi_max` is validated in both cases but only bounds distribution draws.
    pub fn resolve<P: Point>(
        &self,
        phi_max: f64,
        extent: P,
        options: &RadiiOptions,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<f64>> {
        validate_phi_max(phi_max)?;
        match self {
            RadiusSource::List(radii) => {
                validate_radii(radii)?;
                Ok(radii.clone())
            }
            RadiusSource::Distribution(dist) => {
                generate_radii(dist.as_ref(), phi_max, extent, options, rng)
            }
        }
    }
}

impl std::fmt::Debug for RadiusSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RadiusSource::List(radii) => f.debug_tuple("List").field(radii).finish(),
            RadiusSource::Distribution(_) => f.write_str("Distribution(..)"),
        }
    }
}

/// Options for radius sequence generation.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RadiiOptions {
    /// Consecutive over-budget draws tolerated before generation stops.
    pub max_tries: usize,
    /// Log the generated count at `info` level instead of `debug`.
    pub verbose: bool,
}

impl Default for RadiiOptions {
    fn default() -> Self {
        Self {
            max_tries: DEFAULT_RADII_MAX_TRIES,
            verbose: true,
        }
    }
}

impl RadiiOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of consecutive over-budget draws tolerated.
    pub fn with_max_tries(mut self, max_tries: usize) -> Self {
        self.max_tries = max_tries;
        self
    }

    /// Sets verbosity of the summary log line.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_tries == 0 {
            return Err(Error::invalid("max_tries must be >= 1"));
        }
        Ok(())
    }
}

/// Draw radii until `max_tries` consecutive draws would push the packing fraction of
/// `extent` above `phi_max`.
///
/// Over-budget draws are skipped, not terminal: a smaller radius drawn after a large
/// rejected one can still be accepted.
pub fn generate_radii<P: Point>(
    distribution: &dyn RadiusDistribution,
    phi_max: f64,
    extent: P,
    options: &RadiiOptions,
    rng: &mut dyn RngCore,
) -> Result<Vec<f64>> {
    generate_radii_with_events(distribution, phi_max, extent, options, rng, &mut ())
}

pub fn generate_radii_with_events<P: Point>(
    distribution: &dyn RadiusDistribution,
    phi_max: f64,
    extent: P,
    options: &RadiiOptions,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> Result<Vec<f64>> {
    validate_phi_max(phi_max)?;
    draw_radii(distribution, phi_max, 0.0, extent, options, rng, sink)
}

/// Budgeted draw loop; `occupied` is volume already taken by existing spheres.
pub(crate) fn draw_radii<P: Point>(
    distribution: &dyn RadiusDistribution,
    phi_max: f64,
    occupied: f64,
    extent: P,
    options: &RadiiOptions,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> Result<Vec<f64>> {
    validate_extent(extent)?;
    options.validate()?;

    let domain_volume = extent.box_volume();
    let mut total = occupied;
    let mut radii = Vec::new();
    let mut consecutive = 0;
    let mut rejected = 0;

    while consecutive < options.max_tries {
        let r = distribution.sample(rng);
        validate_radius(r)?;
        let v = P::ball_volume(r);
        if !(v.is_finite() && v > 0.0) {
            return Err(Error::invalid(format!(
                "radius {r} has ball volume {v}; it must be finite and > 0"
            )));
        }
        // A volume lost to rounding leaves `total` unchanged and counts as a rejection.
        let next = total + v;
        if next > total && next / domain_volume <= phi_max {
            total = next;
            radii.push(r);
            consecutive = 0;
        } else {
            consecutive += 1;
            rejected += 1;
        }
    }

    if options.verbose {
        info!(
            "Generated {} radii (phi = {:.4}, {} over-budget draws).",
            radii.len(),
            total / domain_volume,
            rejected
        );
    } else {
        debug!("Generated {} radii.", radii.len());
    }
    if sink.wants(PackEventKind::RadiiGenerated) {
        sink.send(PackEvent::RadiiGenerated {
            count: radii.len(),
            rejected_draws: rejected,
        });
    }

    Ok(radii)
}

pub(crate) fn validate_phi_max(phi_max: f64) -> Result<()> {
    if !(phi_max > 0.0 && phi_max <= 1.0) {
        return Err(Error::invalid(format!(
            "phi_max must be in (0, 1], got {phi_max}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_radii(radii: &[f64]) -> Result<()> {
    radii.iter().try_for_each(|&r| validate_radius(r))
}

#[cfg(test)]
mod tests {
    use glam::{DVec2, DVec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::packing::events::VecSink;

    fn quiet() -> RadiiOptions {
        RadiiOptions::new().with_verbose(false)
    }

    #[test]
    fn phi_max_outside_unit_interval_is_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let extent = DVec2::new(10.0, 10.0);
        for phi in [0.0, -0.1, 1.01, f64::NAN] {
            let err =
                generate_radii(&ConstantRadius(1.0), phi, extent, &quiet(), &mut rng).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "phi {phi}");
        }
        assert!(generate_radii(&ConstantRadius(1.0), 1.0, extent, &quiet(), &mut rng).is_ok());
    }

    #[test]
    fn constant_radius_fills_up_to_budget() {
        let mut rng = StdRng::seed_from_u64(2);
        let extent = DVec2::new(10.0, 10.0);
        // Each disk takes pi/100 of the domain; floor(0.3 / (pi/100)) = 9.
        let radii =
            generate_radii(&ConstantRadius(1.0), 0.3, extent, &quiet(), &mut rng).unwrap();
        assert_eq!(radii.len(), 9);
    }

    #[test]
    fn fraction_of_generated_radii_never_exceeds_budget() {
        let mut rng = StdRng::seed_from_u64(3);
        let extent = DVec3::new(20.0, 20.0, 20.0);
        let dist = UniformRadius::new(0.5, 3.0).unwrap();
        let radii = generate_radii(&dist, 0.25, extent, &quiet(), &mut rng).unwrap();
        let volume: f64 = radii.iter().map(|&r| DVec3::ball_volume(r)).sum();
        assert!(!radii.is_empty());
        assert!(volume / 8000.0 <= 0.25);
    }

    #[test]
    fn small_draws_fit_after_large_rejections() {
        // Alternates a radius that never fits with one that does.
        let big_then_small = |rng: &mut dyn RngCore| {
            if rng.next_u32() % 2 == 0 {
                100.0
            } else {
                0.5
            }
        };
        let mut rng = StdRng::seed_from_u64(4);
        let radii = generate_radii(
            &big_then_small,
            0.5,
            DVec2::new(10.0, 10.0),
            &quiet(),
            &mut rng,
        )
        .unwrap();
        assert!(!radii.is_empty());
        assert!(radii.iter().all(|&r| r == 0.5));
    }

    #[test]
    fn non_positive_draw_is_an_error() {
        let mut rng = StdRng::seed_from_u64(5);
        let err = generate_radii(
            &ConstantRadius(-1.0),
            0.5,
            DVec2::new(10.0, 10.0),
            &quiet(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn radius_with_vanishing_volume_is_an_error() {
        let mut rng = StdRng::seed_from_u64(5);
        let extent = DVec2::new(10.0, 10.0);
        let err = generate_radii(&ConstantRadius(1e-200), 0.5, extent, &quiet(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(ref msg) if msg.contains("ball volume")));

        let err = generate_radii(
            &ConstantRadius(1e200),
            0.5,
            DVec3::splat(10.0),
            &quiet(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn draws_lost_to_rounding_count_as_rejections() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut sink = VecSink::new();
        // pi * 1e-16 is below half an ulp of 50.0.
        let radii = draw_radii(
            &ConstantRadius(1e-8),
            0.9,
            50.0,
            DVec2::new(10.0, 10.0),
            &quiet().with_max_tries(100),
            &mut rng,
            &mut sink,
        )
        .unwrap();
        assert!(radii.is_empty());
        assert_eq!(
            sink.as_slice(),
            &[PackEvent::RadiiGenerated {
                count: 0,
                rejected_draws: 100,
            }]
        );
    }

    #[test]
    fn events_report_generated_count() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut sink = VecSink::new();
        let options = quiet().with_max_tries(5);
        let radii = generate_radii_with_events(
            &ConstantRadius(1.0),
            0.3,
            DVec2::new(10.0, 10.0),
            &options,
            &mut rng,
            &mut sink,
        )
        .unwrap();
        assert_eq!(
            sink.as_slice(),
            &[PackEvent::RadiiGenerated {
                count: radii.len(),
                rejected_draws: 5,
            }]
        );
    }

    #[test]
    fn list_source_is_validated_not_trimmed() {
        let mut rng = StdRng::seed_from_u64(7);
        let extent = DVec2::new(10.0, 10.0);
        let source = RadiusSource::List(vec![4.0, 4.0, 4.0]);
        assert_eq!(
            source.resolve(0.1, extent, &quiet(), &mut rng).unwrap(),
            vec![4.0, 4.0, 4.0]
        );

        let bad = RadiusSource::List(vec![1.0, 0.0]);
        assert!(bad.resolve(0.5, extent, &quiet(), &mut rng).is_err());
        assert!(source.resolve(1.5, extent, &quiet(), &mut rng).is_err());
    }

    #[test]
    fn distribution_source_draws_from_distribution() {
        let mut rng = StdRng::seed_from_u64(8);
        let source = RadiusSource::distribution(DiscreteRadius::new(vec![1.0, 2.0]).unwrap());
        let radii = source
            .resolve(0.4, DVec2::new(20.0, 20.0), &quiet(), &mut rng)
            .unwrap();
        assert!(!radii.is_empty());
        assert!(radii.iter().all(|&r| r == 1.0 || r == 2.0));
    }

    #[test]
    fn shipped_distributions_validate_parameters() {
        assert!(UniformRadius::new(2.0, 1.0).is_err());
        assert!(UniformRadius::new(0.0, 1.0).is_err());
        assert!(DiscreteRadius::new(Vec::new()).is_err());
        assert!(DiscreteRadius::new(vec![1.0, -2.0]).is_err());
        assert!(RadiiOptions::new().with_max_tries(0).validate().is_err());
    }
}
