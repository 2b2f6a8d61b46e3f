//! In-place FFT over complex sequences.
//!
//! Classic recursive radix-2 decimation-in-time Cooley–Tukey. The inverse
//! transform reuses the forward one through the conjugation trick instead of
//! carrying a second butterfly.

use num_complex::Complex;
use std::f64::consts::PI;

/// Forward FFT, in place.
///
/// The length of `x` must be a power of two (and at least 1); the caller is
/// responsible for padding or truncating beforehand. The engine holds no
/// state and is safe to call from any thread.
pub fn fft(x: &mut [Complex<f64>]) {
    debug_assert!(
        x.len().is_power_of_two(),
        "fft length must be a power of two, got {}",
        x.len()
    );

    let n = x.len();
    if n <= 1 {
        return;
    }

    // divide
    let mut even: Vec<Complex<f64>> = x.iter().copied().step_by(2).collect();
    let mut odd: Vec<Complex<f64>> = x.iter().copied().skip(1).step_by(2).collect();

    // conquer
    fft(&mut even);
    fft(&mut odd);

    // combine
    for k in 0..n / 2 {
        let twiddle = Complex::from_polar(1.0, -2.0 * PI * k as f64 / n as f64) * odd[k];
        x[k] = even[k] + twiddle;
        x[k + n / 2] = even[k] - twiddle;
    }
}

/// Inverse FFT, in place: conjugate, forward transform, conjugate, scale by 1/N.
///
/// Same power-of-two precondition as [`fft`].
pub fn inverse_fft(x: &mut [Complex<f64>]) {
    for v in x.iter_mut() {
        *v = v.conj();
    }

    fft(x);

    let n = x.len() as f64;
    for v in x.iter_mut() {
        *v = v.conj() / n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::Rng;

    fn assert_sequences_close(a: &[Complex<f64>], b: &[Complex<f64>], epsilon: f64) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_relative_eq!(x.re, y.re, epsilon = epsilon, max_relative = epsilon);
            assert_relative_eq!(x.im, y.im, epsilon = epsilon, max_relative = epsilon);
        }
    }

    #[test]
    fn roundtrip_reconstructs_input_for_all_supported_lengths() {
        let mut rng = rand::rng();
        let mut len = 1;
        while len <= 4096 {
            let original: Vec<Complex<f64>> = (0..len)
                .map(|_| Complex::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0)))
                .collect();

            let mut buffer = original.clone();
            fft(&mut buffer);
            inverse_fft(&mut buffer);

            assert_sequences_close(&buffer, &original, 1e-9);
            len *= 2;
        }
    }

    #[test]
    fn zero_input_transforms_to_zero() {
        let mut len = 1;
        while len <= 4096 {
            let mut buffer = vec![Complex::new(0.0, 0.0); len];
            fft(&mut buffer);
            assert!(buffer.iter().all(|c| c.re == 0.0 && c.im == 0.0));
            len *= 2;
        }
    }

    #[test]
    fn transform_preserves_length() {
        for len in [1usize, 2, 64, 1024] {
            let mut buffer = vec![Complex::new(0.5, 0.0); len];
            fft(&mut buffer);
            assert_eq!(buffer.len(), len);
            inverse_fft(&mut buffer);
            assert_eq!(buffer.len(), len);
        }
    }

    #[test]
    fn impulse_has_flat_spectrum() {
        let mut buffer = vec![Complex::new(0.0, 0.0); 64];
        buffer[0] = Complex::new(1.0, 0.0);
        fft(&mut buffer);
        for bin in &buffer {
            assert_relative_eq!(bin.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn pure_sinusoid_concentrates_in_one_bin_pair() {
        const N: usize = 1024;
        const BIN: usize = 37;

        let mut buffer: Vec<Complex<f64>> = (0..N)
            .map(|i| {
                let phase = 2.0 * PI * BIN as f64 * i as f64 / N as f64;
                Complex::new(phase.sin(), 0.0)
            })
            .collect();
        fft(&mut buffer);

        // A real sinusoid lands in the bin and its conjugate mirror, N/2 each.
        assert_relative_eq!(buffer[BIN].norm(), N as f64 / 2.0, epsilon = 1e-6);
        assert_relative_eq!(buffer[N - BIN].norm(), N as f64 / 2.0, epsilon = 1e-6);
        for (i, bin) in buffer.iter().enumerate() {
            if i != BIN && i != N - BIN {
                assert!(bin.norm() < 1e-6, "unexpected energy in bin {i}");
            }
        }
    }
}
