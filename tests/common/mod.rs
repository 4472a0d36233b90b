#![allow(dead_code)]

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded generator so failures reproduce.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Uniform sample from the disk `|z| ≤ radius`.
pub fn in_disk(rng: &mut StdRng, radius: f64) -> Complex64 {
    let r = radius * rng.gen_range(0.0_f64..1.0).sqrt();
    let theta = rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI);
    Complex64::from_polar(r, theta)
}

/// Uniform sample from the annulus `inner ≤ |z| ≤ outer`.
pub fn in_annulus(rng: &mut StdRng, inner: f64, outer: f64) -> Complex64 {
    let r = rng.gen_range(inner..outer);
    let theta = rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI);
    Complex64::from_polar(r, theta)
}

/// `|a - b| / max(|a|, |b|, floor)`.
pub fn rel_diff(a: Complex64, b: Complex64, floor: f64) -> f64 {
    (a - b).norm() / a.norm().max(b.norm()).max(floor)
}
