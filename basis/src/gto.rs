#![allow(non_snake_case)]
extern crate nalgebra as na;

use crate::basis::Basis;
use na::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

#[derive(Debug, Serialize, Deserialize, Copy, Clone)]
pub struct GTO1d {
    pub alpha: f64,
    pub l: i32,
    pub center: f64,
    pub norm: f64,
}

fn factorial(n: i32) -> f64 {
    (1..=n).fold(1.0, |acc, x| acc * x as f64)
}

impl GTO1d {
    pub fn new(alpha: f64, l: i32, center: f64) -> Self {
        let norm = GTO1d::compute_norm(alpha, l);
        Self {
            alpha,
            l,
            center,
            norm,
        }
    }

    fn compute_norm(alpha: f64, l: i32) -> f64 {
        // N^2 = (2^(3l) * l! * alpha^l * sqrt(2 alpha / pi)) / (2l)!
        let numerator = 2.0_f64.powi(3 * l) * factorial(l) * alpha.powi(l);
        let factor = (2.0 * alpha / PI).sqrt();
        (numerator * factor / factorial(2 * l)).sqrt()
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let x = x - self.center;
        self.norm * x.powi(self.l) * (-self.alpha * x.powi(2)).exp()
    }

    pub fn derivative(&self, x: f64) -> f64 {
        self.value_and_derivatives(x).1
    }

    pub fn second_derivative(&self, x: f64) -> f64 {
        self.value_and_derivatives(x).2
    }

    /// Value, first and second derivative at `x`, sharing one exponential.
    pub fn value_and_derivatives(&self, x: f64) -> (f64, f64, f64) {
        let x = x - self.center;
        let l = self.l;
        let a = self.alpha;
        let gauss = self.norm * (-a * x * x).exp();
        let xl = x.powi(l);

        let lower1 = if l > 0 { l as f64 * x.powi(l - 1) } else { 0.0 };
        let lower2 = if l > 1 {
            (l * (l - 1)) as f64 * x.powi(l - 2)
        } else {
            0.0
        };

        let value = xl * gauss;
        let first = (lower1 - 2.0 * a * x * xl) * gauss;
        let second = (lower2 - 2.0 * a * (2 * l + 1) as f64 * xl + 4.0 * a * a * x * x * xl) * gauss;
        (value, first, second)
    }

    pub fn Eab(i: i32, j: i32, t: i32, Qx: f64, a: f64, b: f64) -> f64 {
        let p = a + b;
        let q = a * b / p;

        if t < 0 || t > i + j || i < 0 || j < 0 {
            0.0
        } else if i == 0 && j == 0 && t == 0 {
            (-q * Qx.powi(2)).exp()
        } else if j == 0 {
            GTO1d::Eab(i - 1, j, t - 1, Qx, a, b) / (2.0 * p)
                - GTO1d::Eab(i - 1, j, t, Qx, a, b) * q * Qx / a
                + GTO1d::Eab(i - 1, j, t + 1, Qx, a, b) * ((t + 1) as f64)
        } else {
            GTO1d::Eab(i, j - 1, t - 1, Qx, a, b) / (2.0 * p)
                + GTO1d::Eab(i, j - 1, t, Qx, a, b) * q * Qx / b
                + GTO1d::Eab(i, j - 1, t + 1, Qx, a, b) * ((t + 1) as f64)
        }
    }

    // overlap integral
    pub fn Sab(a: &GTO1d, b: &GTO1d) -> f64 {
        let p = a.alpha + b.alpha;
        let Qx = a.center - b.center;
        GTO1d::Eab(a.l, b.l, 0, Qx, a.alpha, b.alpha) * (PI / p).sqrt() * a.norm * b.norm
    }
}

/// Normalized Cartesian Gaussian primitive `x^i y^j z^k exp(-alpha r^2)`.
#[derive(Debug, Serialize, Deserialize, Copy, Clone)]
pub struct GTO {
    pub alpha: f64,
    pub l_xyz: Vector3<i32>,
    pub center: Vector3<f64>,
    pub norm: f64,
    pub gto1d: [GTO1d; 3],
}

impl GTO {
    pub fn new(alpha: f64, l_xyz: Vector3<i32>, center: Vector3<f64>) -> Self {
        let gto1d = [
            GTO1d::new(alpha, l_xyz.x, center.x),
            GTO1d::new(alpha, l_xyz.y, center.y),
            GTO1d::new(alpha, l_xyz.z, center.z),
        ];
        let norm = gto1d[0].norm * gto1d[1].norm * gto1d[2].norm;
        Self {
            alpha,
            l_xyz,
            center,
            norm,
            gto1d,
        }
    }

    pub fn gradient(&self, r: &Vector3<f64>) -> Vector3<f64> {
        let [_, gx, gy, gz, _] = self.vgl(r);
        Vector3::new(gx, gy, gz)
    }

    pub fn laplacian(&self, r: &Vector3<f64>) -> f64 {
        let laplacian_x = self.gto1d[0].second_derivative(r.x);
        let laplacian_y = self.gto1d[1].second_derivative(r.y);
        let laplacian_z = self.gto1d[2].second_derivative(r.z);

        laplacian_x * self.gto1d[1].evaluate(r.y) * self.gto1d[2].evaluate(r.z)
            + self.gto1d[0].evaluate(r.x) * laplacian_y * self.gto1d[2].evaluate(r.z)
            + self.gto1d[0].evaluate(r.x) * self.gto1d[1].evaluate(r.y) * laplacian_z
    }
}

impl Basis for GTO {
    fn evaluate(&self, r: &Vector3<f64>) -> f64 {
        self.gto1d[0].evaluate(r.x) * self.gto1d[1].evaluate(r.y) * self.gto1d[2].evaluate(r.z)
    }

    fn vgl(&self, r: &Vector3<f64>) -> [f64; 5] {
        let (vx, dx, ddx) = self.gto1d[0].value_and_derivatives(r.x);
        let (vy, dy, ddy) = self.gto1d[1].value_and_derivatives(r.y);
        let (vz, dz, ddz) = self.gto1d[2].value_and_derivatives(r.z);

        [
            vx * vy * vz,
            dx * vy * vz,
            vx * dy * vz,
            vx * vy * dz,
            ddx * vy * vz + vx * ddy * vz + vx * vy * ddz,
        ]
    }

    fn Sab(a: &GTO, b: &GTO) -> f64 {
        GTO1d::Sab(&a.gto1d[0], &b.gto1d[0])
            * GTO1d::Sab(&a.gto1d[1], &b.gto1d[1])
            * GTO1d::Sab(&a.gto1d[2], &b.gto1d[2])
    }
}
