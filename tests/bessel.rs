mod common;

use approx::assert_relative_eq;
use complex_airy::{besseli_seq, besselk_seq, Accuracy, Error, Scaling};
use num_complex::Complex64;
use rand::Rng;
use std::f64::consts::PI;

use common::{in_annulus, in_disk, rel_diff, rng};

fn re(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

#[test]
fn known_real_axis_values() {
    let i = besseli_seq(0.0, re(1.0), 3, Scaling::Unscaled).unwrap();
    assert_relative_eq!(i.values[0].re, 1.2660658777520084, max_relative = 1e-14);
    assert_relative_eq!(i.values[1].re, 0.5651591039924851, max_relative = 1e-14);
    assert_relative_eq!(i.values[2].re, 0.1357476697670383, max_relative = 1e-13);

    let k = besselk_seq(0.0, re(1.0), 2, Scaling::Unscaled).unwrap();
    assert_relative_eq!(k.values[0].re, 0.42102443824070834, max_relative = 1e-14);
    assert_relative_eq!(k.values[1].re, 0.6019072301972346, max_relative = 1e-14);

    let k = besselk_seq(0.0, re(2.0), 2, Scaling::Unscaled).unwrap();
    assert_relative_eq!(k.values[0].re, 0.11389387274953344, max_relative = 1e-14);
    assert_relative_eq!(k.values[1].re, 0.13986588181652243, max_relative = 1e-14);
    assert_eq!(k.status, Accuracy::Normal);
    assert_eq!(k.underflow_count, 0);
}

#[test]
fn half_order_closed_forms_in_every_quadrant() {
    let mut r = rng(41);
    for _ in 0..200 {
        let z = in_annulus(&mut r, 0.1, 30.0);
        if z.im == 0.0 {
            continue;
        }
        // K_{1/2}(z) = √(π/2z) e^{-z},  I_{1/2}(z) = √(2/πz) sinh z
        let k_want = (re(PI) / (z * 2.0)).sqrt() * (-z).exp();
        let i_want = (re(2.0) / (z * PI)).sqrt() * z.sinh();
        let k = besselk_seq(0.5, z, 1, Scaling::Unscaled).unwrap();
        let i = besseli_seq(0.5, z, 1, Scaling::Unscaled).unwrap();
        assert!(rel_diff(k.values[0], k_want, 1e-300) < 1e-12, "K at z = {z}");
        // I_{1/2} has zeros on the imaginary axis; measure against its envelope
        let envelope = (re(2.0) / (z * PI)).sqrt().norm() * z.re.abs().cosh();
        assert!(rel_diff(i.values[0], i_want, envelope) < 1e-12, "I at z = {z}");
    }
}

#[test]
fn wronskian_in_right_half_plane() {
    // I_ν K_{ν+1} + I_{ν+1} K_ν = 1/z; the scaled product carries e^{i Im z}
    let mut r = rng(43);
    for _ in 0..300 {
        let mut z = in_annulus(&mut r, 0.05, 200.0);
        z.re = z.re.abs();
        let nu = r.gen_range(0.0..3.0);
        let i = besseli_seq(nu, z, 2, Scaling::Exponential).unwrap();
        let k = besselk_seq(nu, z, 2, Scaling::Exponential).unwrap();
        let w = i.values[0] * k.values[1] + i.values[1] * k.values[0];
        let want = Complex64::from_polar(1.0, z.im) / z;
        assert!(rel_diff(w, want, 1e-300) < 1e-11, "nu = {nu}, z = {z}");
    }
}

#[test]
fn wronskian_in_left_half_plane() {
    let mut r = rng(47);
    for _ in 0..200 {
        let mut z = in_annulus(&mut r, 0.2, 4.0);
        z.re = -z.re.abs();
        if z.im == 0.0 {
            continue;
        }
        let nu = r.gen_range(0.0..2.0);
        let i = besseli_seq(nu, z, 2, Scaling::Unscaled).unwrap();
        let k = besselk_seq(nu, z, 2, Scaling::Unscaled).unwrap();
        let t0 = i.values[0] * k.values[1];
        let t1 = i.values[1] * k.values[0];
        let want = re(1.0) / z;
        let scale = t0.norm().max(t1.norm()).max(want.norm());
        assert!((t0 + t1 - want).norm() < 1e-11 * scale, "nu = {nu}, z = {z}");
    }
}

#[test]
fn k_recurrence_over_a_sequence() {
    // K_{ν+1} = K_{ν-1} + (2ν/z) K_ν
    let mut r = rng(53);
    for _ in 0..200 {
        let z = in_annulus(&mut r, 0.1, 200.0);
        if z.im == 0.0 && z.re < 0.0 {
            continue;
        }
        let nu = r.gen_range(0.0..3.0);
        let scaling = if z.re > 0.0 {
            Scaling::Exponential
        } else {
            Scaling::Unscaled
        };
        if scaling == Scaling::Unscaled && z.norm() > 30.0 {
            continue;
        }
        let k = besselk_seq(nu, z, 6, scaling).unwrap();
        assert_eq!(k.underflow_count, 0);
        for m in 1..5 {
            let lhs = k.values[m + 1];
            let rhs = k.values[m - 1] + re(2.0 * (nu + m as f64)) / z * k.values[m];
            assert!(rel_diff(lhs, rhs, 1e-300) < 1e-11, "nu = {nu}, z = {z}, m = {m}");
        }
    }
}

#[test]
fn conjugate_symmetry_across_the_cut() {
    let mut r = rng(59);
    for _ in 0..200 {
        let z = in_disk(&mut r, 25.0);
        if z.im == 0.0 || z.norm() < 1e-3 {
            continue;
        }
        let nu = r.gen_range(0.0..2.5);
        for f in [besseli_seq::<f64>, besselk_seq::<f64>] {
            let a = f(nu, z, 3, Scaling::Unscaled).unwrap();
            let b = f(nu, z.conj(), 3, Scaling::Unscaled).unwrap();
            for (x, y) in a.values.iter().zip(&b.values) {
                assert!(rel_diff(*x, y.conj(), 1e-300) < 1e-12, "nu = {nu}, z = {z}");
            }
        }
    }
}

#[test]
fn single_order_matches_head_of_longer_run() {
    let mut r = rng(61);
    for _ in 0..200 {
        let z = in_annulus(&mut r, 0.1, 200.0);
        let nu = r.gen_range(0.0..4.0);
        let i1 = besseli_seq(nu, z, 1, Scaling::Exponential).unwrap();
        let i5 = besseli_seq(nu, z, 5, Scaling::Exponential).unwrap();
        assert!(rel_diff(i1.values[0], i5.values[0], 1e-300) < 1e-11, "I: nu = {nu}, z = {z}");

        let k1 = besselk_seq(nu, z, 1, Scaling::Exponential).unwrap();
        let k5 = besselk_seq(nu, z, 5, Scaling::Exponential).unwrap();
        assert!(rel_diff(k1.values[0], k5.values[0], 1e-300) < 1e-11, "K: nu = {nu}, z = {z}");
    }
}

#[test]
fn underflow_count_is_bounded_and_marks_zeros() {
    let mut r = rng(67);
    for _ in 0..200 {
        let z = in_annulus(&mut r, 0.01, 200.0);
        let nu = r.gen_range(0.0..10.0);
        let n = r.gen_range(1..8);
        for scaling in [Scaling::Unscaled, Scaling::Exponential] {
            if let Ok(k) = besselk_seq(nu, z, n, scaling) {
                assert!(k.underflow_count <= n);
                assert_eq!(k.values.len(), n);
                let zeros = k.values.iter().filter(|v| v.norm() == 0.0).count();
                assert!(zeros >= k.underflow_count);
                if z.re >= 0.0 {
                    assert!(k.values[..k.underflow_count].iter().all(|v| v.norm() == 0.0));
                }
            }
            if let Ok(i) = besseli_seq(nu, z, n, scaling) {
                assert!(i.underflow_count <= n);
                assert_eq!(i.values.len(), n);
                assert!(i.values[n - i.underflow_count..].iter().all(|v| v.norm() == 0.0));
            }
        }
    }
}

#[test]
fn decaying_k_underflows_unscaled_but_not_scaled() {
    let z = re(800.0);
    let u = besselk_seq(0.0, z, 3, Scaling::Unscaled).unwrap();
    assert_eq!(u.underflow_count, 3);
    assert!(u.values.iter().all(|v| v.norm() == 0.0));

    let s = besselk_seq(0.0, z, 3, Scaling::Exponential).unwrap();
    assert_eq!(s.underflow_count, 0);
    // e^z K_0(z) ≈ √(π/2z) (1 - 1/8z)
    let leading = (PI / 1600.0).sqrt() * (1.0 - 1.0 / 6400.0);
    assert_relative_eq!(s.values[0].re, leading, max_relative = 1e-6);
}

#[test]
fn tiny_argument_i_underflows_trailing_orders() {
    let i = besseli_seq(0.0, re(1e-200), 4, Scaling::Unscaled).unwrap();
    assert_relative_eq!(i.values[0].re, 1.0, max_relative = 1e-15);
    assert!(i.underflow_count >= 2);
    assert!(i.values[4 - i.underflow_count..].iter().all(|v| v.norm() == 0.0));
}

#[test]
fn input_errors() {
    let z = Complex64::new(1.0, 1.0);
    assert_eq!(besseli_seq(-0.5, z, 2, Scaling::Unscaled), Err(Error::NegativeOrder));
    assert_eq!(besseli_seq(0.5, z, 0, Scaling::Unscaled), Err(Error::EmptySequence));
    assert_eq!(
        besselk_seq(0.5, re(0.0), 2, Scaling::Exponential),
        Err(Error::ZeroArgument)
    );
    assert_eq!(besselk_seq(100.0, z, 1, Scaling::Unscaled), Err(Error::OrderTooLarge));
    assert_eq!(
        besseli_seq(0.0, re(2.0e9), 1, Scaling::Exponential),
        Err(Error::TotalPrecisionLoss)
    );
    assert_eq!(besselk_seq(0.0, re(1e-310), 1, Scaling::Unscaled), Err(Error::Overflow));
}
