//! Stellar quantities commonly pushed through the grid search.

/// Stefan–Boltzmann constant (W m^-2 K^-4).
pub const STEFAN_BOLTZMANN: f64 = 5.670367e-8;

/// Nominal solar luminosity (W).
pub const SOLAR_LUMINOSITY: f64 = 3.828e26;

/// Stellar radius (m) from `[luminosity (W), effective temperature (K)]`:
/// `R = sqrt(L / (4π σ T^4))`.
///
/// Returns NaN for any other input length; the grid search ignores NaN
/// deviations.
pub fn stellar_radius(inputs: &[f64]) -> f64 {
    match inputs {
        [luminosity, teff] => {
            (luminosity / (4.0 * std::f64::consts::PI * STEFAN_BOLTZMANN * teff.powi(4))).sqrt()
        }
        _ => f64::NAN,
    }
}

/// Age (years) from the chromospheric activity index `log R'HK`.
pub fn chromospheric_activity_age(log_rhk: f64) -> f64 {
    10f64.powf(-38.053 - 17.912 * log_rhk - 1.6675 * log_rhk * log_rhk)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagate::{GridSearch, scalar_search};

    #[test]
    fn solar_radius_from_luminosity_and_temperature() {
        let r = stellar_radius(&[SOLAR_LUMINOSITY, 5772.0]);
        assert!((r - 6.957e8).abs() / 6.957e8 < 0.01, "r={r}");
        assert!(stellar_radius(&[1.0]).is_nan());
    }

    #[test]
    fn activity_age_follows_the_calibration() {
        let age = chromospheric_activity_age(-5.0);
        let expected = 10f64.powf(-38.053 + 17.912 * 5.0 - 1.6675 * 25.0);
        assert!((age - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn activity_age_envelope_brackets_nominal() {
        let search = scalar_search(-6.0165, (-0.0821, 0.0801), chromospheric_activity_age).unwrap();
        let p = search.propagate(100).unwrap();
        assert!(p.min_deviation < 0.0 && p.max_deviation > 0.0);
        assert!((p.nominal - chromospheric_activity_age(-6.0165)).abs() < 1e-6 * p.nominal);
    }

    #[test]
    fn radius_envelope_grows_with_luminosity_and_shrinks_with_temperature() {
        let l = 379.3 * SOLAR_LUMINOSITY;
        let search = GridSearch::new(
            vec![l, 4780.0],
            vec![(-0.1 * l, 0.1 * l), (-85.0, 85.0)],
            stellar_radius,
        )
        .unwrap();
        let p = search.propagate(20).unwrap();

        let hi = stellar_radius(&[1.1 * l, 4695.0]) - p.nominal;
        let lo = stellar_radius(&[0.9 * l, 4865.0]) - p.nominal;
        assert!((p.max_deviation - hi).abs() / hi < 1e-9);
        assert!((p.min_deviation - lo).abs() / lo.abs() < 1e-9);
    }
}
