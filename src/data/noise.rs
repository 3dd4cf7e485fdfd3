//! Seeded photometric noise for synthetic lightcurves.
//!
//! The same seed and sigma always produce the same noisy curve, so exported
//! synthetic observations are reproducible.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::domain::{Lightcurve, NoiseConfig};
use crate::error::AppError;

/// Return a copy of `curve` with independent Gaussian noise added to every flux value.
///
/// The result is not re-normalized.
pub fn add_photometric_noise(curve: &Lightcurve, noise: NoiseConfig) -> Result<Lightcurve, AppError> {
    if !(noise.sigma.is_finite() && noise.sigma >= 0.0) {
        return Err(AppError::invalid(format!(
            "Noise sigma must be finite and >= 0 (got {}).",
            noise.sigma
        )));
    }

    let mut rng = StdRng::seed_from_u64(noise.seed);
    let normal = Normal::new(0.0, noise.sigma)
        .map_err(|e| AppError::invalid(format!("Noise distribution error: {e}")))?;

    let flux = curve.flux.iter().map(|f| f + normal.sample(&mut rng)).collect();
    Ok(Lightcurve {
        axis: curve.axis.clone(),
        flux,
    })
}
