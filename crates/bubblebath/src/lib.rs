#![forbid(unsafe_code)]
//! bubblebath: Random sequential sphere packing with walkmaps and packing-fraction metrics.
//!
//! Modules:
//! - geometry: dimension-generic points, spheres, and overlap/boundary/walkability predicates
//! - radii: radius distributions and fraction-bounded radius sequence generation
//! - packing: largest-first rejection-sampling insertion, runner, events
//! - walkmap: boolean occupancy grids with cut or periodic boundaries
//! - fraction: packing fraction from spheres, bare radii, or walkmaps
//!
//! Positions are glam `DVec2` (disks) or `DVec3` (balls); the RNG is always injected.
pub mod error;
pub mod fraction;
pub mod geometry;
pub mod packing;
pub mod radii;
pub(crate) mod sampling;
pub mod walkmap;

/// Convenient re-exports for common types. Import with `use bubblebath::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::fraction::{packing_fraction, radii_packing_fraction, walkmap_packing_fraction};
    pub use crate::geometry::{
        inside_boundaries, minimum_image, overlaps, overlaps_any, volume, walkable,
        walkable_periodic, Point, Sphere,
    };
    pub use crate::packing::events::{
        EventSink, FnSink, MultiSink, PackEvent, PackEventKind, VecSink,
    };
    pub use crate::packing::runner::Packer;
    pub use crate::packing::{
        bubblebath, bubblebath_from_distribution, bubblebath_from_distribution_in_place,
        bubblebath_from_distribution_in_place_with_events, bubblebath_in_place,
        bubblebath_in_place_with_events, PackOptions, PackReport,
    };
    pub use crate::radii::{
        generate_radii, generate_radii_with_events, ConstantRadius, DiscreteRadius,
        RadiiOptions, RadiusDistribution, RadiusSource, UniformRadius,
    };
    pub use crate::walkmap::{walkmap, Boundaries, Walkmap};
}
