//! Hard-edged boundary tests for the stellar disc, planetary core and dust tail.
//!
//! Every predicate is a plain boolean indicator over one pixel at one planet
//! position. Intensities are only evaluated where the matching indicator holds
//! (see `intensity`).
//!
//! The core tests are reproduced exactly as the published lightcurves were
//! computed, including two axis quirks:
//!
//! - `core_indicator` bounds the pixel's *vertical* coordinate by the planet's
//!   *horizontal* position (`planet_x <= pixel_y <= planet_x + radius`).
//! - `anti_disc_indicator` re-derives its own core test with the axes swapped
//!   relative to `core_indicator`, so it can suppress stellar flux at pixels
//!   that neither `core_indicator` nor `tail_indicator` claims, and vice versa.
//!
//! Changing either quirk changes every curve shape; both are pinned by tests.

/// Derived geometry of one model configuration.
///
/// Produced by the variant `derive` functions; never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Stellar radius in model length units (1 for the orbital model, pixels for the grid model).
    pub stellar_radius: f64,
    pub star_x: f64,
    pub star_y: f64,
    pub planetary_radius: f64,
    pub tail_length: f64,
    pub decay_constant: f64,
    /// Vertical position of the transit line (`star_y + impact_parameter`).
    pub planet_y: f64,
    pub initial_intensity: f64,
    pub limb_darkening_a: f64,
    pub limb_darkening_b: f64,
}

impl Geometry {
    /// Vertical band `(lower, upper)` occupied by the tail: one planetary radius
    /// either side of the stellar centre line.
    pub fn tail_band(&self) -> (f64, f64) {
        (
            self.star_y - self.planetary_radius,
            self.star_y + self.planetary_radius,
        )
    }

    /// Pixel lies behind the tail: `planet_x - L <= pixel_x < planet_x` and
    /// strictly inside the vertical band.
    pub fn tail_indicator(
        &self,
        planet_x: f64,
        pixel_x: f64,
        pixel_y: f64,
        lower_y: f64,
        upper_y: f64,
    ) -> bool {
        in_tail(planet_x, self.tail_length, pixel_x, pixel_y, lower_y, upper_y)
    }

    /// Pixel lies behind the planetary core.
    pub fn core_indicator(&self, planet_x: f64, pixel_x: f64, pixel_y: f64) -> bool {
        let distance = (self.planet_y - pixel_y).hypot(planet_x - pixel_x);
        distance < self.planetary_radius
            && planet_x <= pixel_y
            && pixel_y <= planet_x + self.planetary_radius
    }

    /// `false` where the stellar term must be suppressed because the tail or
    /// the core covers the pixel.
    ///
    /// NOTE: the core test here uses swapped axes relative to `core_indicator`
    /// (distance `hypot(planet_y - pixel_x, planet_x - pixel_y)`, range on
    /// `pixel_x`). Keep the two in sync only if the published curves change.
    pub fn anti_disc_indicator(
        &self,
        planet_x: f64,
        pixel_x: f64,
        pixel_y: f64,
        lower_y: f64,
        upper_y: f64,
    ) -> bool {
        if in_tail(planet_x, self.tail_length, pixel_x, pixel_y, lower_y, upper_y) {
            return false;
        }
        let swapped_distance = (self.planet_y - pixel_x).hypot(planet_x - pixel_y);
        let in_swapped_core = swapped_distance < self.planetary_radius
            && planet_x <= pixel_x
            && pixel_x <= planet_x + self.planetary_radius;
        !in_swapped_core
    }
}

/// Pixel lies on the stellar disc (`distance_ratio` is distance / stellar radius).
pub fn disc_indicator(distance_ratio: f64) -> bool {
    distance_ratio < 1.0
}

fn in_tail(
    planet_x: f64,
    tail_length: f64,
    pixel_x: f64,
    pixel_y: f64,
    lower_y: f64,
    upper_y: f64,
) -> bool {
    planet_x > pixel_x
        && pixel_x >= planet_x - tail_length
        && lower_y < pixel_y
        && pixel_y < upper_y
}

#[cfg(test)]
pub(crate) fn unit_geometry(planetary_radius: f64, tail_length: f64) -> Geometry {
    Geometry {
        stellar_radius: 1.0,
        star_x: 0.0,
        star_y: 0.0,
        planetary_radius,
        tail_length,
        decay_constant: -45.0,
        planet_y: 0.0,
        initial_intensity: 160.0,
        limb_darkening_a: 0.3,
        limb_darkening_b: 0.1,
    }
}
