//! Boolean occupancy grids ("walkmaps") rasterized from a packing.
//!
//! Axis `i` is split into `floor(extent[i] / resolution)` cells of size `resolution`, sampled
//! at their centers `(k + 0.5) * resolution`. A cell is walkable (`true`) when its center
//! keeps at least `probe_radius` clearance from every sphere surface. Cells are stored flat
//! with axis 0 varying fastest.
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::geometry::{minimum_image, validate_extent, walkable, walkable_periodic, Point, Sphere};

/// How spheres interact with the domain edges when rasterizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Boundaries {
    /// Parts of spheres outside the domain are cut off.
    #[default]
    Cut,
    /// The domain is periodic; spheres wrap around to the opposite edge.
    Wrap,
}

impl FromStr for Boundaries {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cut" => Ok(Boundaries::Cut),
            "wrap" => Ok(Boundaries::Wrap),
            other => Err(Error::invalid(format!(
                "boundaries must be \"cut\" or \"wrap\", got {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Boundaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Boundaries::Cut => "cut",
            Boundaries::Wrap => "wrap",
        })
    }
}

/// A D-dimensional walkability grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Walkmap<P: Point> {
    extent: P,
    resolution: f64,
    shape: Vec<usize>,
    strides: Vec<usize>,
    cells: Vec<bool>,
}

impl<P: Point> Walkmap<P> {
    /// A grid over `extent` with every cell walkable.
    ///
    /// Fails when a per-axis count or the total cell count does not fit in memory.
    fn open(extent: P, resolution: f64) -> Result<Self> {
        let too_large = || {
            Error::invalid(format!(
                "walkmap of extent {extent:?} at resolution {resolution} has too many cells"
            ))
        };
        let mut shape = Vec::with_capacity(P::DIM);
        let mut strides = Vec::with_capacity(P::DIM);
        let mut stride: usize = 1;
        for i in 0..P::DIM {
            let n = (extent.axis(i) / resolution).floor();
            if !(n < isize::MAX as f64) {
                return Err(too_large());
            }
            let n = n as usize;
            shape.push(n);
            strides.push(stride);
            stride = stride.checked_mul(n).ok_or_else(too_large)?;
        }
        if stride > isize::MAX as usize {
            return Err(too_large());
        }
        let mut cells = Vec::new();
        cells.try_reserve_exact(stride).map_err(|_| too_large())?;
        cells.resize(stride, true);
        Ok(Self {
            extent,
            resolution,
            shape,
            strides,
            cells,
        })
    }

    /// Number of cells along each axis.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn extent(&self) -> P {
        self.extent
    }

    /// Flat cell storage, axis 0 fastest.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    fn flat_index(&self, index: &[usize]) -> Option<usize> {
        if index.len() != P::DIM {
            return None;
        }
        let mut flat = 0;
        for ((&k, &n), &stride) in index.iter().zip(&self.shape).zip(&self.strides) {
            if k >= n {
                return None;
            }
            flat += k * stride;
        }
        Some(flat)
    }

    /// Walkability of the cell at `index`, or `None` if out of range.
    pub fn get(&self, index: &[usize]) -> Option<bool> {
        self.flat_index(index).map(|i| self.cells[i])
    }

    /// Center of the cell at `index`, or `None` if out of range.
    pub fn cell_center(&self, index: &[usize]) -> Option<P> {
        self.flat_index(index)?;
        Some(P::from_fn(|i| (index[i] as f64 + 0.5) * self.resolution))
    }

    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.len() - self.walkable_count()
    }

    /// Occupied share of the grid; see [`crate::fraction::walkmap_packing_fraction`].
    pub fn packing_fraction(&self) -> f64 {
        crate::fraction::walkmap_packing_fraction(self)
    }

    /// Marks every cell whose center is not walkable with respect to `sphere`.
    fn stamp(&mut self, sphere: &Sphere<P>, probe_radius: f64, boundaries: Boundaries) {
        let reach = probe_radius + sphere.radius();
        let candidates: Vec<Vec<usize>> = (0..P::DIM)
            .map(|i| self.axis_candidates(i, sphere.position().axis(i), reach, boundaries))
            .collect();

        let extent = self.extent;
        let resolution = self.resolution;
        let strides = self.strides.clone();
        let cells = &mut self.cells;
        for_each_index(&candidates, |index| {
            let flat: usize = index.iter().zip(&strides).map(|(k, s)| k * s).sum();
            if !cells[flat] {
                return;
            }
            let center = P::from_fn(|i| (index[i] as f64 + 0.5) * resolution);
            let clear = match boundaries {
                Boundaries::Cut => walkable(center, probe_radius, sphere),
                Boundaries::Wrap => walkable_periodic(center, probe_radius, sphere, extent),
            };
            if !clear {
                cells[flat] = false;
            }
        });
    }

    /// Cell indices along `axis` whose centers lie within `reach` of coordinate `c`.
    fn axis_candidates(&self, axis: usize, c: f64, reach: f64, boundaries: Boundaries) -> Vec<usize> {
        let n = self.shape[axis];
        let res = self.resolution;
        match boundaries {
            Boundaries::Cut => {
                let lo = ((c - reach) / res - 0.5).floor().max(0.0) as usize;
                let hi = ((c + reach) / res - 0.5).ceil();
                if hi < 0.0 {
                    return Vec::new();
                }
                let hi = (hi as usize).min(n.saturating_sub(1));
                if n == 0 || lo > hi {
                    return Vec::new();
                }
                (lo..=hi).collect()
            }
            Boundaries::Wrap => {
                let period = self.extent.axis(axis);
                (0..n)
                    .filter(|&k| {
                        let delta = minimum_image((k as f64 + 0.5) * res - c, period);
                        delta.abs() <= reach
                    })
                    .collect()
            }
        }
    }
}

/// Calls `f` with every combination of one entry per list (axis 0 fastest).
fn for_each_index(lists: &[Vec<usize>], mut f: impl FnMut(&[usize])) {
    if lists.iter().any(Vec::is_empty) {
        return;
    }
    let mut cursor = vec![0usize; lists.len()];
    let mut index: Vec<usize> = lists.iter().map(|l| l[0]).collect();
    'outer: loop {
        f(&index);
        for axis in 0..lists.len() {
            cursor[axis] += 1;
            if cursor[axis] < lists[axis].len() {
                index[axis] = lists[axis][cursor[axis]];
                continue 'outer;
            }
            cursor[axis] = 0;
            index[axis] = lists[axis][0];
        }
        return;
    }
}

/// Rasterize `spheres` into a walkmap of `extent` at `resolution`.
///
/// A cell is walkable iff its center is at least `probe_radius` away from every sphere
/// surface, measured directly (`Cut`) or with the minimum-image distance (`Wrap`).
pub fn walkmap<P: Point>(
    spheres: &[Sphere<P>],
    extent: P,
    resolution: f64,
    probe_radius: f64,
    boundaries: Boundaries,
) -> Result<Walkmap<P>> {
    validate_extent(extent)?;
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(Error::invalid(format!(
            "resolution must be a finite number > 0, got {resolution}"
        )));
    }
    if !probe_radius.is_finite() || probe_radius < 0.0 {
        return Err(Error::invalid(format!(
            "probe_radius must be a finite number >= 0, got {probe_radius}"
        )));
    }

    let mut map = Walkmap::open(extent, resolution)?;
    if map.is_empty() {
        return Ok(map);
    }
    for sphere in spheres {
        map.stamp(sphere, probe_radius, boundaries);
    }
    Ok(map)
}
