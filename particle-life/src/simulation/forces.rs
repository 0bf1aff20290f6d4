//! Pairwise distances and particle-life forces
//!
//! Direct O(N^2) evaluation over all ordered pairs. The distance matrix is
//! computed once per step and shared by both directions of a pair, so for a
//! symmetric strength the two contributions are exactly equal and opposite.
//!
//! With the `parallel` feature the outer loop (one net force per particle)
//! runs on rayon. Each particle's sum is still taken over `b` in index order
//! by a single worker, so the result does not depend on scheduling.

use nalgebra::DMatrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::simulation::interaction::InteractionRules;
use crate::simulation::states::{NVec2, ParticleSet};

/// Euclidean distance between every pair of positions.
/// Symmetric with an exactly zero diagonal.
pub fn pairwise_distances(positions: &[NVec2]) -> DMatrix<f64> {
    let n = positions.len();
    let mut d = DMatrix::zeros(n, n);

    // Fill the upper triangle and mirror it
    for a in 0..n {
        for b in (a + 1)..n {
            let r = (positions[b] - positions[a]).norm();
            d[(a, b)] = r;
            d[(b, a)] = r;
        }
    }
    d
}

/// Force on a particle of type `ta` at `xa` due to one of type `tb` at `xb`.
///
/// The direction always points from a toward b; the signed magnitude decides
/// between attraction (+) and repulsion (-). Coincident particles
/// (`distance == 0`) have no direction and contribute nothing.
#[inline]
pub fn pair_force(
    rules: &InteractionRules,
    xa: NVec2,
    xb: NVec2,
    ta: usize,
    tb: usize,
    distance: f64,
) -> NVec2 {
    let magnitude = rules.calculate_force_magnitude(rules.strength(ta, tb), distance);
    if magnitude == 0.0 || distance == 0.0 {
        return NVec2::zeros();
    }
    let direction = (xb - xa) / distance;
    magnitude * direction
}

/// Net force on particle `a`, summed over every other particle in index order.
fn net_force_on(
    a: usize,
    rules: &InteractionRules,
    particles: &ParticleSet,
    distances: &DMatrix<f64>,
) -> NVec2 {
    let xa = particles.positions[a];
    let ta = particles.types[a];

    let mut f = NVec2::zeros();
    for (b, (&xb, &tb)) in particles.positions.iter().zip(&particles.types).enumerate() {
        if b == a {
            continue; // no self-interaction
        }
        f += pair_force(rules, xa, xb, ta, tb, distances[(a, b)]);
    }
    f
}

/// Write the net force on every particle into `out`.
///
/// `distances` must come from [`pairwise_distances`] on the same positions
/// and `out` must have one slot per particle.
pub fn accumulate_forces(
    rules: &InteractionRules,
    particles: &ParticleSet,
    distances: &DMatrix<f64>,
    out: &mut [NVec2],
) {
    assert_eq!(out.len(), particles.len(), "force buffer length");
    assert_eq!(distances.shape(), (particles.len(), particles.len()), "distance matrix shape");

    #[cfg(not(feature = "parallel"))]
    let iterator = out.iter_mut().enumerate();

    #[cfg(feature = "parallel")]
    let iterator = out.par_iter_mut().enumerate();

    iterator.for_each(|(a, f)| {
        *f = net_force_on(a, rules, particles, distances);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(xs: &[(f64, f64)], types: &[usize]) -> ParticleSet {
        ParticleSet::new(
            xs.iter().map(|&(x, y)| NVec2::new(x, y)).collect(),
            types.to_vec(),
        )
        .unwrap()
    }

    fn forces(rules: &InteractionRules, particles: &ParticleSet) -> Vec<NVec2> {
        let d = pairwise_distances(particles.positions());
        let mut out = vec![NVec2::zeros(); particles.len()];
        accumulate_forces(rules, particles, &d, &mut out);
        out
    }

    #[test]
    fn distances_are_symmetric_with_zero_diagonal() {
        let p = set(&[(0.0, 0.0), (3.0, 4.0), (-1.0, 2.5), (0.3, -7.0)], &[0, 0, 0, 0]);
        let d = pairwise_distances(p.positions());

        assert!((d[(0, 1)] - 5.0).abs() < 1e-12);
        for a in 0..4 {
            assert_eq!(d[(a, a)], 0.0);
            for b in 0..4 {
                assert_eq!(d[(a, b)], d[(b, a)]);
            }
        }
    }

    #[test]
    fn repulsion_pushes_apart() {
        // default matrix: types 0 and 1 repel
        let rules = InteractionRules::new(2, 1.0, 0.0).unwrap();
        let p = set(&[(0.0, 0.0), (0.0, 0.25)], &[0, 1]);
        let f = forces(&rules, &p);

        assert!((f[0] - NVec2::new(0.0, -0.75)).norm() < 1e-12);
        assert!((f[1] - NVec2::new(0.0, 0.75)).norm() < 1e-12);
    }

    #[test]
    fn asymmetric_strength_breaks_reciprocity() {
        // 0 chases 1, 1 ignores 0
        let mut rules = InteractionRules::new(2, 1.0, 0.0).unwrap();
        rules.set_strength(0, 1, 1.0).unwrap();
        rules.set_strength(1, 0, 0.0).unwrap();
        let p = set(&[(0.0, 0.0), (0.5, 0.0)], &[0, 1]);
        let f = forces(&rules, &p);

        assert!((f[0] - NVec2::new(0.5, 0.0)).norm() < 1e-12);
        assert_eq!(f[1], NVec2::zeros());
    }

    #[test]
    fn coincident_particles_contribute_nothing() {
        let rules = InteractionRules::new(1, 1.0, 0.0).unwrap();
        let p = set(&[(0.2, 0.2), (0.2, 0.2)], &[0, 0]);
        let f = forces(&rules, &p);

        assert!(f.iter().all(|v| v.iter().all(|c| c.is_finite())));
        assert_eq!(f[0], NVec2::zeros());
        assert_eq!(f[1], NVec2::zeros());
    }

    #[test]
    fn contributions_superpose() {
        // particle 0 sits between two attractors at equal distance
        let rules = InteractionRules::new(1, 2.0, 0.0).unwrap();
        let p = set(&[(0.0, 0.0), (1.0, 0.0), (-1.0, 0.0)], &[0, 0, 0]);
        let f = forces(&rules, &p);

        assert!(f[0].norm() < 1e-12);
        // particle 1: 0.5 toward 0 plus 0.0 from 2 (distance 2.0 is out of range)
        assert!((f[1] - NVec2::new(-0.5, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn matches_ordered_serial_sum() {
        // asymmetric matrix so both directions of a pair differ
        let mut rules = InteractionRules::new(3, 1.2, 0.0).unwrap();
        rules.set_strength(0, 1, 0.37).unwrap();
        rules.set_strength(2, 0, -0.61).unwrap();

        let xs: Vec<(f64, f64)> = (0..200)
            .map(|i| {
                let i_f = i as f64;
                ((i_f * 0.37).sin() * 3.0, (i_f * 0.13).cos() * 3.0)
            })
            .collect();
        let types: Vec<usize> = (0..200).map(|i| (i * 7) % 3).collect();
        let p = set(&xs, &types);

        let d = pairwise_distances(p.positions());
        let reference: Vec<NVec2> = (0..p.len())
            .map(|a| {
                let mut f = NVec2::zeros();
                for b in 0..p.len() {
                    if b != a {
                        f += pair_force(
                            &rules,
                            p.positions()[a],
                            p.positions()[b],
                            p.types()[a],
                            p.types()[b],
                            d[(a, b)],
                        );
                    }
                }
                f
            })
            .collect();

        // bit-identical, with or without the `parallel` feature
        assert_eq!(forces(&rules, &p), reference);
    }
}
