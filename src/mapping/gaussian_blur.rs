//! Smoothing operators for the wall-proximity field
//!
//! Both operators are separable: one horizontal and one vertical 1-D pass
//! with a normalized kernel of `2 * radius + 1` taps. Borders are
//! reflected without repeating the edge sample (`dcb|abcd|cba`).

use nalgebra::DMatrix;

use crate::common::Smoothing;

/// Gaussian blur whose standard deviation is derived from the kernel size
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianBlur;

impl GaussianBlur {
    /// `0.3 * ((ksize - 1) * 0.5 - 1) + 0.8`
    pub fn sigma_for_radius(radius: usize) -> f64 {
        let ksize = (2 * radius + 1) as f64;
        0.3 * ((ksize - 1.0) * 0.5 - 1.0) + 0.8
    }

    pub fn kernel(radius: usize) -> Vec<f64> {
        let sigma = Self::sigma_for_radius(radius);
        let r = radius as f64;
        let taps: Vec<f64> = (0..=2 * radius)
            .map(|i| {
                let d = i as f64 - r;
                (-(d * d) / (2.0 * sigma * sigma)).exp()
            })
            .collect();
        normalize(taps)
    }
}

impl Smoothing for GaussianBlur {
    fn blur(&self, mask: &DMatrix<f64>, radius: usize) -> DMatrix<f64> {
        if radius == 0 {
            return mask.clone();
        }
        convolve_separable(mask, &Self::kernel(radius))
    }
}

/// Mean filter over a square window
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxBlur;

impl Smoothing for BoxBlur {
    fn blur(&self, mask: &DMatrix<f64>, radius: usize) -> DMatrix<f64> {
        if radius == 0 {
            return mask.clone();
        }
        convolve_separable(mask, &normalize(vec![1.0; 2 * radius + 1]))
    }
}

fn normalize(taps: Vec<f64>) -> Vec<f64> {
    let sum: f64 = taps.iter().sum();
    taps.into_iter().map(|t| t / sum).collect()
}

/// Map an out-of-range index back into `0..n` by mirroring about the
/// first and last sample
fn reflect_101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let n = n as isize;
    let period = 2 * (n - 1);
    let i = i.rem_euclid(period);
    (if i >= n { period - i } else { i }) as usize
}

fn convolve_separable(src: &DMatrix<f64>, kernel: &[f64]) -> DMatrix<f64> {
    let (rows, cols) = src.shape();
    let radius = (kernel.len() / 2) as isize;

    let horizontal = DMatrix::from_fn(rows, cols, |r, c| {
        kernel
            .iter()
            .enumerate()
            .map(|(k, w)| w * src[(r, reflect_101(c as isize + k as isize - radius, cols))])
            .sum::<f64>()
    });

    DMatrix::from_fn(rows, cols, |r, c| {
        kernel
            .iter()
            .enumerate()
            .map(|(k, w)| w * horizontal[(reflect_101(r as isize + k as isize - radius, rows), c)])
            .sum::<f64>()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn single_wall(size: usize) -> DMatrix<f64> {
        let mut mask = DMatrix::zeros(size, size);
        mask[(size / 2, size / 2)] = 1.0;
        mask
    }

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(3, 5), 3);
        assert_eq!(reflect_101(-4, 1), 0);
    }

    #[test]
    fn test_kernel_is_normalized_and_symmetric() {
        for radius in 1..6 {
            let k = GaussianBlur::kernel(radius);
            assert_eq!(k.len(), 2 * radius + 1);
            assert_relative_eq!(k.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
            for i in 0..k.len() {
                assert_relative_eq!(k[i], k[k.len() - 1 - i], epsilon = 1e-15);
            }
            assert!(k[radius] > k[0]);
        }
    }

    #[test]
    fn test_sigma_matches_kernel_size_rule() {
        assert_relative_eq!(GaussianBlur::sigma_for_radius(5), 2.0, epsilon = 1e-12);
        assert_relative_eq!(GaussianBlur::sigma_for_radius(1), 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_radius_zero_is_identity() {
        let mask = single_wall(5);
        assert_eq!(GaussianBlur.blur(&mask, 0), mask);
        assert_eq!(BoxBlur.blur(&mask, 0), mask);
    }

    #[test]
    fn test_constant_fields_are_preserved() {
        let ones = DMatrix::from_element(4, 7, 1.0);
        let blurred = GaussianBlur.blur(&ones, 3);
        assert!(blurred.iter().all(|&v| (v - 1.0).abs() < 1e-12));
        let zeros = DMatrix::<f64>::zeros(4, 7);
        assert!(BoxBlur.blur(&zeros, 2).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_interior_mass_is_conserved() {
        let blurred = GaussianBlur.blur(&single_wall(15), 3);
        assert_relative_eq!(blurred.sum(), 1.0, epsilon = 1e-12);
        let boxed = BoxBlur.blur(&single_wall(15), 2);
        assert_relative_eq!(boxed.sum(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(boxed[(7, 7)], 1.0 / 25.0, epsilon = 1e-12);
    }

    #[test]
    fn test_influence_decays_with_distance() {
        let blurred = GaussianBlur.blur(&single_wall(11), 3);
        let along_row: Vec<f64> = (5..9).map(|c| blurred[(5, c)]).collect();
        for pair in along_row.windows(2) {
            assert!(pair[0] > pair[1]);
        }
        assert_eq!(blurred[(5, 10)], 0.0);
    }
}
