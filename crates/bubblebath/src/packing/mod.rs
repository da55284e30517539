//! Random sequential insertion of spheres, largest radius first.
//!
//! Each radius gets up to `max_tries` uniformly drawn candidate centers; the first candidate
//! that clears every present sphere (at exclusion radius `radius + min_distance`) is kept.
//! Radii that run out of attempts are dropped and counted as failures, and once more than
//! `max_fails` radii failed the rest of the queue is abandoned. Dropping is not an error:
//! compare the output length to the input, or read the [`PackReport`].
use rand::RngCore;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::geometry::{inside_boundaries, overlaps_any, validate_extent, Point, Sphere};
use crate::packing::events::{EventSink, PackEvent, PackEventKind};
use crate::radii::{draw_radii, validate_phi_max, validate_radii, RadiiOptions, RadiusDistribution};
use crate::sampling::uniform_point;

pub mod events;
pub mod runner;

pub const DEFAULT_MAX_TRIES: usize = 10_000;
pub const DEFAULT_MAX_FAILS: usize = 100;

/// Options controlling a packing run.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackOptions {
    /// Minimum gap between the surfaces of any two spheres.
    pub min_distance: f64,
    /// Allow spheres to cross the domain boundary.
    pub through_boundaries: bool,
    /// Candidate centers drawn per sphere before it counts as failed.
    pub max_tries: usize,
    /// Failed spheres tolerated before the remaining queue is abandoned.
    pub max_fails: usize,
    /// Log summaries at `info` level instead of `debug`.
    pub verbose: bool,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            min_distance: 0.0,
            through_boundaries: false,
            max_tries: DEFAULT_MAX_TRIES,
            max_fails: DEFAULT_MAX_FAILS,
            verbose: true,
        }
    }
}

impl PackOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum surface-to-surface distance.
    pub fn with_min_distance(mut self, min_distance: f64) -> Self {
        self.min_distance = min_distance;
        self
    }

    /// Sets whether spheres may cross the domain boundary.
    pub fn with_through_boundaries(mut self, through_boundaries: bool) -> Self {
        self.through_boundaries = through_boundaries;
        self
    }

    /// Sets the number of attempts per sphere.
    pub fn with_max_tries(mut self, max_tries: usize) -> Self {
        self.max_tries = max_tries;
        self
    }

    /// Sets the number of tolerated failures.
    pub fn with_max_fails(mut self, max_fails: usize) -> Self {
        self.max_fails = max_fails;
        self
    }

    /// Sets verbosity of summary logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Validates the options, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.min_distance.is_finite() || self.min_distance < 0.0 {
            return Err(Error::invalid(format!(
                "min_distance must be a finite number >= 0, got {}",
                self.min_distance
            )));
        }
        if self.max_tries == 0 {
            return Err(Error::invalid("max_tries must be >= 1"));
        }
        Ok(())
    }

    /// Radius generation settings derived from these options.
    pub fn radii_options(&self) -> RadiiOptions {
        RadiiOptions::new()
            .with_max_tries(self.max_tries)
            .with_verbose(self.verbose)
    }
}

/// Counts describing a finished packing run.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackReport {
    /// Radii queued for insertion.
    pub requested: usize,
    /// Spheres appended to the collection.
    pub inserted: usize,
    /// Radii dropped after exhausting their attempts.
    pub failed: usize,
    /// Whether the failure limit cut the queue short.
    pub aborted: bool,
}

impl PackReport {
    pub fn new(requested: usize) -> Self {
        Self {
            requested,
            ..Default::default()
        }
    }

    /// Radii neither inserted nor counted as failed (only non-zero after an abort).
    pub fn skipped(&self) -> usize {
        self.requested - self.inserted - self.failed
    }

    /// True if every requested radius was inserted.
    pub fn is_complete(&self) -> bool {
        self.inserted == self.requested
    }
}

/// Pack `radii` into an empty domain of `extent`.
pub fn bubblebath<P: Point, R: RngCore>(
    radii: &[f64],
    extent: P,
    options: &PackOptions,
    rng: &mut R,
) -> Result<Vec<Sphere<P>>> {
    let mut spheres = Vec::with_capacity(radii.len());
    bubblebath_in_place(&mut spheres, radii, extent, options, rng)?;
    Ok(spheres)
}

/// Pack `radii` into `spheres`, keeping every sphere already present.
pub fn bubblebath_in_place<P: Point, R: RngCore>(
    spheres: &mut Vec<Sphere<P>>,
    radii: &[f64],
    extent: P,
    options: &PackOptions,
    rng: &mut R,
) -> Result<PackReport> {
    bubblebath_in_place_with_events(spheres, radii, extent, options, rng, &mut ())
}

pub fn bubblebath_in_place_with_events<P: Point, R: RngCore>(
    spheres: &mut Vec<Sphere<P>>,
    radii: &[f64],
    extent: P,
    options: &PackOptions,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<PackReport> {
    validate_extent(extent)?;
    options.validate()?;
    validate_radii(radii)?;
    Ok(insert_all(spheres, radii, extent, options, rng, sink))
}

/// Draw radii from `distribution` up to packing fraction `phi_max`, then pack them.
pub fn bubblebath_from_distribution<P: Point, R: RngCore>(
    distribution: &dyn RadiusDistribution,
    phi_max: f64,
    extent: P,
    options: &PackOptions,
    rng: &mut R,
) -> Result<Vec<Sphere<P>>> {
    let mut spheres = Vec::new();
    bubblebath_from_distribution_in_place(&mut spheres, distribution, phi_max, extent, options, rng)?;
    Ok(spheres)
}

/// In-place variant of [`bubblebath_from_distribution`].
///
/// Volume already occupied by `spheres` counts against the `phi_max` budget.
pub fn bubblebath_from_distribution_in_place<P: Point, R: RngCore>(
    spheres: &mut Vec<Sphere<P>>,
    distribution: &dyn RadiusDistribution,
    phi_max: f64,
    extent: P,
    options: &PackOptions,
    rng: &mut R,
) -> Result<PackReport> {
    bubblebath_from_distribution_in_place_with_events(
        spheres,
        distribution,
        phi_max,
        extent,
        options,
        rng,
        &mut (),
    )
}

pub fn bubblebath_from_distribution_in_place_with_events<P: Point, R: RngCore>(
    spheres: &mut Vec<Sphere<P>>,
    distribution: &dyn RadiusDistribution,
    phi_max: f64,
    extent: P,
    options: &PackOptions,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<PackReport> {
    validate_phi_max(phi_max)?;
    validate_extent(extent)?;
    options.validate()?;

    let occupied: f64 = spheres.iter().map(Sphere::volume).sum();
    let radii = draw_radii(
        distribution,
        phi_max,
        occupied,
        extent,
        &options.radii_options(),
        rng,
        sink,
    )?;
    Ok(insert_all(spheres, &radii, extent, options, rng, sink))
}

/// Insertion loop over pre-validated inputs.
fn insert_all<P: Point>(
    spheres: &mut Vec<Sphere<P>>,
    radii: &[f64],
    extent: P,
    options: &PackOptions,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> PackReport {
    let mut queue = radii.to_vec();
    queue.sort_by(|a, b| b.total_cmp(a));

    let mut report = PackReport::new(queue.len());
    if sink.wants(PackEventKind::RunStarted) {
        sink.send(PackEvent::RunStarted {
            options: options.clone(),
            requested: queue.len(),
            preexisting: spheres.len(),
        });
    }
    spheres.reserve(queue.len());
    // The queue is sorted, so equal oversized radii are adjacent and warned about once.
    let mut last_oversized: Option<f64> = None;

    for (queue_index, &radius) in queue.iter().enumerate() {
        // No candidate can pass the boundary test; skip the draws.
        let fits = options.through_boundaries
            || (0..P::DIM).all(|i| 2.0 * radius <= extent.axis(i));
        if !fits && last_oversized != Some(radius) {
            last_oversized = Some(radius);
            if sink.wants(PackEventKind::Warning) {
                sink.send(PackEvent::Warning {
                    context: format!("queue:{queue_index}"),
                    message: format!("radius {radius} does not fit inside the domain"),
                });
            }
        }
        let found = if fits {
            find_position(spheres, radius, extent, options, rng)
        } else {
            None
        };
        match found {
            Some((position, attempts)) => {
                spheres.push(Sphere::new_unchecked(position, radius));
                report.inserted += 1;
                if sink.wants(PackEventKind::SpherePlaced) {
                    sink.send(PackEvent::SpherePlaced {
                        queue_index,
                        center: (0..P::DIM).map(|i| position.axis(i)).collect(),
                        radius,
                        attempts,
                    });
                }
            }
            None => {
                report.failed += 1;
                debug!(
                    "Sphere {} (r = {}) not placed after {} tries.",
                    queue_index, radius, options.max_tries
                );
                if sink.wants(PackEventKind::SphereFailed) {
                    sink.send(PackEvent::SphereFailed {
                        queue_index,
                        radius,
                        failures: report.failed,
                    });
                }
                if report.failed > options.max_fails {
                    let remaining = queue.len() - queue_index - 1;
                    report.aborted = true;
                    warn!(
                        "Aborting after {} failed spheres; {} radii left unprocessed.",
                        report.failed, remaining
                    );
                    if sink.wants(PackEventKind::Aborted) {
                        sink.send(PackEvent::Aborted { remaining });
                    }
                    break;
                }
            }
        }
    }

    if options.verbose {
        info!(
            "Inserted {} of {} spheres | failed: {}.",
            report.inserted, report.requested, report.failed
        );
    } else {
        debug!(
            "Inserted {} of {} spheres | failed: {}.",
            report.inserted, report.requested, report.failed
        );
    }
    if sink.wants(PackEventKind::RunFinished) {
        sink.send(PackEvent::RunFinished { report });
    }

    report
}

/// Rejection-samples a center for `radius`; returns it with the number of draws used.
fn find_position<P: Point>(
    spheres: &[Sphere<P>],
    radius: f64,
    extent: P,
    options: &PackOptions,
    rng: &mut dyn RngCore,
) -> Option<(P, usize)> {
    let confined = !options.through_boundaries;
    let margin = if confined { radius } else { 0.0 };
    let exclusion = radius + options.min_distance;
    for attempt in 1..=options.max_tries {
        let candidate = uniform_point(rng, margin, extent);
        if overlaps_any(candidate, exclusion, spheres) {
            continue;
        }
        if confined && !inside_boundaries(candidate, radius, extent) {
            continue;
        }
        return Some((candidate, attempt));
    }
    None
}
