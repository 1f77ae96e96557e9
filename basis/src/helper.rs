#![allow(unused)]
use nalgebra::Vector3;
use rayon::prelude::*;

// Simpson's rule integration
pub(crate) fn simpson_integration<F>(f: F, a: f64, b: f64, n: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    let n = if n % 2 == 0 { n } else { n + 1 };
    let h = (b - a) / n as f64;

    let mut sum = f(a) + f(b);
    for i in 1..n {
        let x = a + i as f64 * h;
        sum += if i % 2 == 0 { 2.0 * f(x) } else { 4.0 * f(x) };
    }
    sum * h / 3.0
}

// Helper function to determine Simpson's weight for a given index and max index
fn simpson_weight(i: usize, n: usize) -> f64 {
    if i == 0 || i == n {
        1.0
    } else if i % 2 == 1 {
        4.0
    } else {
        2.0
    }
}

/// Parallel Simpson's rule integration in 3D over the box [a, b].
/// Subdivision counts are rounded up to even numbers.
pub(crate) fn simpson_integration_3d<F>(
    f: F,
    a: Vector3<f64>,
    b: Vector3<f64>,
    nx: usize,
    ny: usize,
    nz: usize,
) -> f64
where
    F: Fn(f64, f64, f64) -> f64 + Sync,
{
    let nx = if nx % 2 == 0 { nx } else { nx + 1 };
    let ny = if ny % 2 == 0 { ny } else { ny + 1 };
    let nz = if nz % 2 == 0 { nz } else { nz + 1 };

    let hx = (b.x - a.x) / nx as f64;
    let hy = (b.y - a.y) / ny as f64;
    let hz = (b.z - a.z) / nz as f64;

    let sum: f64 = (0..=nx)
        .into_par_iter()
        .map(|i| {
            let x = a.x + i as f64 * hx;
            let wx = simpson_weight(i, nx);
            (0..=ny)
                .map(|j| {
                    let y = a.y + j as f64 * hy;
                    let wy = simpson_weight(j, ny);
                    (0..=nz)
                        .map(|k| {
                            let z = a.z + k as f64 * hz;
                            wx * wy * simpson_weight(k, nz) * f(x, y, z)
                        })
                        .sum::<f64>()
                })
                .sum::<f64>()
        })
        .sum();

    sum * (hx * hy * hz) / 27.0
}

/// Central-difference gradient of `f` at `r`.
pub(crate) fn numerical_gradient<F>(f: F, r: &Vector3<f64>, h: f64) -> Vector3<f64>
where
    F: Fn(&Vector3<f64>) -> f64,
{
    let mut grad = Vector3::zeros();
    for d in 0..3 {
        let mut rp = *r;
        let mut rm = *r;
        rp[d] += h;
        rm[d] -= h;
        grad[d] = (f(&rp) - f(&rm)) / (2.0 * h);
    }
    grad
}

/// Central-difference Laplacian of `f` at `r`.
pub(crate) fn numerical_laplacian<F>(f: F, r: &Vector3<f64>, h: f64) -> f64
where
    F: Fn(&Vector3<f64>) -> f64,
{
    let f0 = f(r);
    (0..3)
        .map(|d| {
            let mut rp = *r;
            let mut rm = *r;
            rp[d] += h;
            rm[d] -= h;
            (f(&rp) - 2.0 * f0 + f(&rm)) / (h * h)
        })
        .sum()
}
