#[cfg(test)]
mod tests {
    use crate::basis::{AoBasis, Basis, Shell};
    use crate::cgto::ContractedGTO;
    use crate::gto::{GTO1d, GTO};
    use crate::helper::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use rand_distr::Normal;

    #[test]
    fn test_gto1d_normalization() {
        let gto = GTO1d::new(1.0, 2, 1.0);
        let integral = simpson_integration(|x: f64| gto.evaluate(x).powi(2), -10.0, 10.0, 10_000);
        let diff = (integral - 1.0).abs();
        assert!(diff < 1e-5, "Integral is not close to 1: got {}", integral);
    }

    #[test]
    fn test_gto1d_overlap() {
        let gto1 = GTO1d::new(1.2, 1, 1.0);
        let gto2 = GTO1d::new(0.8, 1, 3.0);
        let integrand = |x: f64| gto1.evaluate(x) * gto2.evaluate(x);

        let integral = simpson_integration(integrand, -10.0, 10.0, 10_000);
        let overlap = GTO1d::Sab(&gto1, &gto2);
        assert!(
            (integral - overlap).abs() < 1e-5,
            "Overlap is not close to integral: got {}",
            overlap
        );
    }

    #[test]
    fn test_gto1d_derivatives() {
        let h = 1e-4;
        for l in 0..4 {
            let gto = GTO1d::new(0.9, l, 0.3);
            for &x in &[-1.3, -0.2, 0.0, 0.45, 1.7] {
                let fd1 = (gto.evaluate(x + h) - gto.evaluate(x - h)) / (2.0 * h);
                let fd2 =
                    (gto.evaluate(x + h) - 2.0 * gto.evaluate(x) + gto.evaluate(x - h)) / (h * h);
                assert_relative_eq!(gto.derivative(x), fd1, epsilon = 1e-6);
                assert_relative_eq!(gto.second_derivative(x), fd2, epsilon = 1e-5);

                let (v, d1, d2) = gto.value_and_derivatives(x);
                assert_relative_eq!(v, gto.evaluate(x), epsilon = 1e-14);
                assert_relative_eq!(d1, gto.derivative(x), epsilon = 1e-14);
                assert_relative_eq!(d2, gto.second_derivative(x), epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_gto_normalization() {
        let gto = GTO::new(1.0, Vector3::new(1, 1, 1), Vector3::new(0.0, 0.0, 0.0));
        let integrand = |x, y, z| gto.evaluate(&Vector3::new(x, y, z)).powi(2);

        let lower = Vector3::new(-10.0, -10.0, -10.0);
        let upper = Vector3::new(10.0, 10.0, 10.0);
        let integral = simpson_integration_3d(integrand, lower, upper, 100, 100, 100);
        let diff = (integral - 1.0).abs();
        assert!(diff < 1e-5, "Integral is not close to 1: got {}", integral);
    }

    #[test]
    fn test_gto_vgl_against_finite_differences() {
        let h = 1e-4;
        let mut rng = rand::thread_rng();
        let dist = Normal::new(0.0, 1.0).unwrap();
        let shapes = [
            Vector3::new(0, 0, 0),
            Vector3::new(1, 0, 0),
            Vector3::new(0, 1, 1),
            Vector3::new(2, 0, 1),
        ];

        for l_xyz in shapes {
            let gto = GTO::new(0.7, l_xyz, Vector3::new(0.1, -0.4, 0.2));
            let r = Vector3::<f64>::from_distribution(&dist, &mut rng);

            let vgl = gto.vgl(&r);
            let numerical_grad = numerical_gradient(|p| gto.evaluate(p), &r, h);
            let numerical_lap = numerical_laplacian(|p| gto.evaluate(p), &r, h);

            assert_relative_eq!(vgl[0], gto.evaluate(&r), epsilon = 1e-12);
            assert_relative_eq!(vgl[1], numerical_grad.x, epsilon = 1e-6);
            assert_relative_eq!(vgl[2], numerical_grad.y, epsilon = 1e-6);
            assert_relative_eq!(vgl[3], numerical_grad.z, epsilon = 1e-6);
            assert_relative_eq!(vgl[4], numerical_lap, epsilon = 1e-4);
            assert_relative_eq!(vgl[4], gto.laplacian(&r), epsilon = 1e-10);
            assert_relative_eq!(gto.gradient(&r).x, vgl[1], epsilon = 1e-14);
        }
    }

    #[test]
    fn test_gto_overlap() {
        let gto1 = GTO::new(1.2, Vector3::new(1, 1, 1), Vector3::new(0.0, 0.0, 0.0));
        let gto2 = GTO::new(0.8, Vector3::new(1, 1, 1), Vector3::new(3.0, 3.0, 3.0));
        let integrand =
            |x, y, z| gto1.evaluate(&Vector3::new(x, y, z)) * gto2.evaluate(&Vector3::new(x, y, z));

        let lower = Vector3::new(-10.0, -10.0, -10.0);
        let upper = Vector3::new(10.0, 10.0, 10.0);
        let integral = simpson_integration_3d(integrand, lower, upper, 100, 100, 100);
        let overlap = GTO::Sab(&gto1, &gto2);
        assert!(
            (integral - overlap).abs() < 1e-5,
            "Overlap is not close to integral: got {}",
            overlap
        );
    }

    #[test]
    fn test_contracted_normalization() {
        // oxygen 2p of STO-3G
        let cgto = ContractedGTO::new(
            Vector3::zeros(),
            Vector3::new(0, 0, 1),
            &[5.0331513, 1.1695961, 0.3803890],
            &[0.15591627, 0.60768372, 0.39195739],
        );
        assert_relative_eq!(ContractedGTO::Sab(&cgto, &cgto), 1.0, epsilon = 1e-12);
        assert_eq!(cgto.angular_momentum(), 1);

        let integrand = |x, y, z| cgto.evaluate(&Vector3::new(x, y, z)).powi(2);
        let lower = Vector3::new(-8.0, -8.0, -8.0);
        let upper = Vector3::new(8.0, 8.0, 8.0);
        let integral = simpson_integration_3d(integrand, lower, upper, 120, 120, 120);
        assert_relative_eq!(integral, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_hydrogen_sto3g_vgl_reference() {
        let center = Vector3::new(0.0, 1.4309, -0.8867);
        let shells = vec![Shell {
            nucleus: 0,
            l: 0,
            exponents: vec![3.42525091, 0.62391373, 0.16885540],
            coefficients: vec![0.15432897, 0.53532814, 0.44463454],
        }];
        let basis = AoBasis::from_shells("G", &shells, &[center]).unwrap();
        let vgl = basis.functions[0].vgl(&Vector3::new(0.3, 1.0, -0.5));

        let expected = [
            0.3476597741342738,
            -0.2174167847061368,
            0.3122829750995812,
            -0.2802502354862104,
            -0.7464498862422169,
        ];
        for (got, want) in vgl.iter().zip(expected.iter()) {
            assert_relative_eq!(*got, *want, epsilon = 1e-10);
        }
    }
}
