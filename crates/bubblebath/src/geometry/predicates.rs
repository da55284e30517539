//! Geometric predicates shared by the packing engine and the walkmap rasterizer.
//!
//! Overlap is strict (touching spheres do not overlap) while walkability is non-strict
//! (a point exactly at the exclusion distance is walkable).
use crate::geometry::{Point, Sphere};

/// True iff two spheres overlap, i.e. their centers are closer than `r1 + r2`.
#[inline]
pub fn overlaps<P: Point>(p1: P, r1: f64, p2: P, r2: f64) -> bool {
    p1.distance_to(p2) < r1 + r2
}

/// True iff a sphere at `p` with radius `r` overlaps any of `spheres`.
#[inline]
pub fn overlaps_any<P: Point>(p: P, r: f64, spheres: &[Sphere<P>]) -> bool {
    spheres
        .iter()
        .any(|s| overlaps(p, r, s.position(), s.radius()))
}

/// True iff a sphere at `p` with radius `r` lies within `[0, extent]` on every axis.
#[inline]
pub fn inside_boundaries<P: Point>(p: P, r: f64, extent: P) -> bool {
    (0..P::DIM).all(|i| {
        let c = p.axis(i);
        r <= c && c <= extent.axis(i) - r
    })
}

/// True iff `p` is at least `probe_radius + sphere.radius()` away from the sphere center.
#[inline]
pub fn walkable<P: Point>(p: P, probe_radius: f64, sphere: &Sphere<P>) -> bool {
    p.distance_to(sphere.position()) >= probe_radius + sphere.radius()
}

/// Periodic variant of [`walkable`] using the minimum-image distance in a box of `extent`.
#[inline]
pub fn walkable_periodic<P: Point>(
    p: P,
    probe_radius: f64,
    sphere: &Sphere<P>,
    extent: P,
) -> bool {
    let offset = P::from_fn(|i| {
        minimum_image(p.axis(i) - sphere.position().axis(i), extent.axis(i))
    });
    offset.distance_to(P::from_fn(|_| 0.0)) >= probe_radius + sphere.radius()
}

/// Wraps a signed per-axis offset into `(-period/2, period/2]`.
#[inline]
pub fn minimum_image(delta: f64, period: f64) -> f64 {
    let half = period * 0.5;
    let wrapped = (delta + half).rem_euclid(period) - half;
    if wrapped == -half {
        half
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use glam::{DVec2, DVec3};

    use super::*;

    fn sphere2(x: f64, y: f64, r: f64) -> Sphere<DVec2> {
        Sphere::new(DVec2::new(x, y), r).unwrap()
    }

    #[test]
    fn touching_spheres_do_not_overlap() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(2.0, 0.0);
        assert!(!overlaps(a, 1.0, b, 1.0));
        assert!(overlaps(a, 1.0, b, 1.0 + 1e-9));
        assert!(overlaps(a, 1.5, DVec2::new(1.0, 1.0), 0.1));
    }

    #[test]
    fn overlaps_any_checks_every_member() {
        let spheres = vec![sphere2(1.0, 1.0, 0.5), sphere2(8.0, 8.0, 1.0)];
        assert!(overlaps_any(DVec2::new(7.5, 8.0), 0.1, &spheres));
        assert!(!overlaps_any(DVec2::new(5.0, 5.0), 1.0, &spheres));
        assert!(!overlaps_any(DVec2::new(5.0, 5.0), 1.0, &[]));
    }

    #[test]
    fn inside_boundaries_is_inclusive() {
        let extent = DVec3::new(10.0, 10.0, 10.0);
        assert!(inside_boundaries(DVec3::splat(5.0), 5.0, extent));
        assert!(inside_boundaries(DVec3::new(1.0, 9.0, 5.0), 1.0, extent));
        assert!(!inside_boundaries(DVec3::new(0.99, 5.0, 5.0), 1.0, extent));
        assert!(!inside_boundaries(DVec3::new(5.0, 5.0, 9.01), 1.0, extent));
        assert!(!inside_boundaries(DVec3::splat(5.0), 5.01, extent));
    }

    #[test]
    fn walkable_is_non_strict() {
        let s = sphere2(5.0, 5.0, 1.0);
        assert!(walkable(DVec2::new(7.0, 5.0), 1.0, &s));
        assert!(!walkable(DVec2::new(6.9, 5.0), 1.0, &s));
        assert!(walkable(DVec2::new(6.0, 5.0), 0.0, &s));
        assert!(!walkable(DVec2::new(5.5, 5.0), 0.0, &s));
    }

    #[test]
    fn minimum_image_wraps_into_half_open_interval() {
        assert_eq!(minimum_image(0.0, 10.0), 0.0);
        assert_eq!(minimum_image(3.0, 10.0), 3.0);
        assert_eq!(minimum_image(-3.0, 10.0), -3.0);
        assert!((minimum_image(9.0, 10.0) - -1.0).abs() < 1e-12);
        assert!((minimum_image(-9.0, 10.0) - 1.0).abs() < 1e-12);
        assert_eq!(minimum_image(5.0, 10.0), 5.0);
        assert_eq!(minimum_image(-5.0, 10.0), 5.0);
        assert!((minimum_image(23.0, 10.0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn walkable_periodic_sees_across_edges() {
        let extent = DVec2::new(10.0, 10.0);
        let s = sphere2(0.5, 5.0, 1.0);
        let p = DVec2::new(9.8, 5.0);
        assert!(walkable(p, 0.0, &s));
        assert!(!walkable_periodic(p, 0.0, &s, extent));
        assert!(walkable_periodic(DVec2::new(5.0, 5.0), 0.0, &s, extent));
    }
}
