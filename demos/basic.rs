use complex_airy::*;
use num_complex::Complex;

fn main() {
    let z = Complex::new(1.0_f64, 2.0);

    // -- Airy functions --
    println!("=== Airy functions (f64) ===");
    let a = ai(z).unwrap();
    println!("Ai({z}) = {a}");

    let d = ai_prime(z).unwrap();
    println!("Ai'({z}) = {d}");

    for x in [-5.0, -1.0, 0.0, 1.0, 5.0] {
        let zx = Complex::new(x, 0.0);
        println!("Ai({x:>4}) = {:.15}", ai(zx).unwrap().re);
    }

    // -- Scaled computation --
    println!("\n=== Scaled Airy ===");
    let far = Complex::new(400.0, 50.0);
    let unscaled = airy(far, AiryDerivative::Value, Scaling::Unscaled).unwrap();
    println!("Ai({far}) = {}  (underflow_count: {})", unscaled.value, unscaled.underflow_count);
    let scaled = airy(far, AiryDerivative::Value, Scaling::Exponential).unwrap();
    println!("exp(zeta)*Ai({far}) = {}  (status: {:?})", scaled.value, scaled.status);

    // -- Sequence computation --
    println!("\n=== Sequence: K_1/3, K_4/3, K_7/3 ===");
    let seq = besselk_seq(1.0 / 3.0, z, 3, Scaling::Unscaled).unwrap();
    for (j, val) in seq.values.iter().enumerate() {
        println!("  K_{j}+1/3({z}) = {val}");
    }
    println!("  underflow_count: {}", seq.underflow_count);
    println!("  status: {:?}", seq.status);

    println!("\n=== Sequence: I_0, I_1, I_2 in the left half plane ===");
    let w = -z;
    let seq = besseli_seq(0.0, w, 3, Scaling::Unscaled).unwrap();
    for (j, val) in seq.values.iter().enumerate() {
        println!("  I_{j}({w}) = {val}");
    }

    // -- Errors --
    println!("\n=== Errors ===");
    match besselk_seq(0.0, Complex::new(0.0, 0.0), 1, Scaling::Unscaled) {
        Ok(r) => println!("unexpected: {:?}", r.values),
        Err(e) => println!("K_0(0): {e}"),
    }

    // -- f32 support --
    println!("\n=== f32 support ===");
    let z32 = Complex::new(1.0_f32, 2.0);
    let a32 = ai(z32).unwrap();
    println!("Ai({z32}) = {a32} (f32)");
}
