//! Brightness laws for the stellar disc, planetary core and dust tail, and the
//! per-pixel composite.
//!
//! Degenerate configurations (zero radius, zero band height, overflowing
//! exponentials) can produce NaN from these equations. NaN is masked to `0.0`
//! where it arises; it never leaves this module.

use super::geometry::{Geometry, disc_indicator};

/// Quadratic limb-darkening law `I0 * (1 - a(1-mu) - b(1-mu)^2)`, `mu = sqrt(1 - d^2)`.
///
/// Zero off the disc.
pub fn stellar_intensity(g: &Geometry, distance_ratio: f64) -> f64 {
    if !disc_indicator(distance_ratio) {
        return 0.0;
    }
    let one_minus_mu = 1.0 - (1.0 - distance_ratio * distance_ratio).sqrt();
    let ratio = 1.0
        - g.limb_darkening_a * one_minus_mu
        - g.limb_darkening_b * one_minus_mu * one_minus_mu;
    g.initial_intensity * ratio
}

/// Logarithmic falloff towards the core centre.
pub fn core_intensity(g: &Geometry, stellar: f64, distance_to_core: f64) -> f64 {
    let scale = stellar / (g.planetary_radius + 1.0).ln();
    mask_nan(scale * (distance_to_core + 1.0).ln())
}

/// Tail brightness: exponential decay along the tail combined in quadrature
/// with a logarithmic falloff across it, capped at the local stellar intensity.
pub fn tail_intensity(
    g: &Geometry,
    stellar: f64,
    planet_x: f64,
    lower_y: f64,
    pixel_x: f64,
    pixel_y: f64,
) -> f64 {
    let tau = g.decay_constant;
    let head = (-planet_x / tau).exp();
    let along = ((-pixel_x / tau).exp() - head)
        / ((-(planet_x - g.tail_length) / tau).exp() - head);

    let half_width = (g.planet_y - lower_y).abs();
    let offset = (g.planet_y - pixel_y).abs();
    let across = (offset + 1.0).ln() / (half_width + 1.0).ln();

    // `hypot` and `f64::min` both discard NaN; a NaN here must reach `mask_nan`.
    let combined = (along * along + across * across).sqrt();
    let combined = if combined > 1.0 { 1.0 } else { combined };
    mask_nan(stellar * combined)
}

/// Composite intensity of one pixel at one planet position.
///
/// `stellar * anti_disc + core * core_intensity + tail * tail_intensity^2`.
/// The tail term is the tail intensity squared.
pub fn pixel_intensity(g: &Geometry, planet_x: f64, pixel_x: f64, pixel_y: f64) -> f64 {
    let distance_ratio = (g.star_y - pixel_y).hypot(g.star_x - pixel_x) / g.stellar_radius;
    // Measured from the planet's horizontal position on the stellar centre line,
    // not from `(planet_x, planet_y)`.
    let distance_to_core = (g.star_y - pixel_y).hypot(planet_x - pixel_x);
    let (lower_y, upper_y) = g.tail_band();

    let stellar = stellar_intensity(g, distance_ratio);

    let mut total = 0.0;
    if g.anti_disc_indicator(planet_x, pixel_x, pixel_y, lower_y, upper_y) {
        total += stellar;
    }
    if g.core_indicator(planet_x, pixel_x, pixel_y) {
        total += core_intensity(g, stellar, distance_to_core);
    }
    if g.tail_indicator(planet_x, pixel_x, pixel_y, lower_y, upper_y) {
        let tail = tail_intensity(g, stellar, planet_x, lower_y, pixel_x, pixel_y);
        total += tail * tail;
    }
    total
}

fn mask_nan(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value }
}
