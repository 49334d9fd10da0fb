//! Final pass over fused records.
//!
//! JSON has no NaN or infinity literal, so every non-finite float is turned
//! into an explicit null before serialization. Finite values pass through
//! untouched.

use env_health_index_models::{
    AirComponent, Components, ConfidenceRating, FusedIndex, GreenspaceComponent, NoiseComponent,
};

/// In-place replacement of non-finite floats.
pub trait Sanitize {
    /// Replaces every non-finite float reachable from `self`.
    fn sanitize(&mut self);
}

/// Returns `value` when finite, `None` otherwise.
#[must_use]
pub fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn clean(fields: &mut [&mut Option<f64>]) {
    for field in fields {
        **field = finite(**field);
    }
}

impl Sanitize for AirComponent {
    fn sanitize(&mut self) {
        clean(&mut [
            &mut self.score,
            &mut self.risk,
            &mut self.no2_ug_m3,
            &mut self.pm10_ug_m3,
            &mut self.pm25_ug_m3,
        ]);
    }
}

impl Sanitize for NoiseComponent {
    fn sanitize(&mut self) {
        clean(&mut [
            &mut self.score,
            &mut self.risk,
            &mut self.mean_lden_db,
            &mut self.mean_lnight_db,
        ]);
    }
}

impl Sanitize for GreenspaceComponent {
    fn sanitize(&mut self) {
        clean(&mut [
            &mut self.score,
            &mut self.risk,
            &mut self.total_greenspace_m2,
            &mut self.mean_distance_m,
            &mut self.p75_distance_m,
            &mut self.per_postcode_m2,
        ]);
    }
}

impl Sanitize for ConfidenceRating {
    fn sanitize(&mut self) {
        if !self.weight.is_finite() {
            self.weight = 0.0;
        }
    }
}

impl<T: Sanitize> Sanitize for Option<T> {
    fn sanitize(&mut self) {
        if let Some(inner) = self {
            inner.sanitize();
        }
    }
}

impl Sanitize for Components {
    fn sanitize(&mut self) {
        self.air.sanitize();
        self.noise.sanitize();
        self.greenspace.sanitize();
    }
}

impl Sanitize for FusedIndex {
    fn sanitize(&mut self) {
        self.score_overall = finite(self.score_overall);
        self.confidence.sanitize();
        self.components.sanitize();
    }
}

impl<T: Sanitize> Sanitize for [T] {
    fn sanitize(&mut self) {
        for item in self {
            item.sanitize();
        }
    }
}
