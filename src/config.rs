use serde::Deserialize;

/// Padding applied to the farthest centroid-to-centre distance when deriving
/// the catchment radius.
pub fn default_radius_padding() -> f64 {
    1.25
}

/// Minimum catchment radius in meters, so coincident centres still yield a
/// usable sampling region.
pub fn default_min_radius_m() -> f64 {
    2000.0
}

/// Rejection-sampling attempt budget, as a multiple of the requested count.
pub fn default_attempt_multiplier() -> u64 {
    100
}

/// Tuning knobs for the population sampler.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "default_radius_padding")]
    pub radius_padding: f64,
    #[serde(default = "default_min_radius_m")]
    pub min_radius_m: f64,
    #[serde(default = "default_attempt_multiplier")]
    pub attempt_multiplier: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            radius_padding: default_radius_padding(),
            min_radius_m: default_min_radius_m(),
            attempt_multiplier: default_attempt_multiplier(),
        }
    }
}
