use rand::Rng;
use tracing::{info, warn};

use crate::config::SimulationConfig;
use crate::error::AllotError;
use crate::geo::{self, GeoPoint};
use crate::models::{Category, Centre, Student};

/// The circular region students are drawn from: centred on the centroid of
/// all centres, radius padded past the farthest centre and floored so that
/// coincident centres still produce a region worth sampling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Catchment {
    pub center: GeoPoint,
    pub radius_m: f64,
}

pub fn catchment_for(
    centres: &[Centre],
    config: &SimulationConfig,
) -> Result<Catchment, AllotError> {
    if centres.is_empty() {
        return Err(AllotError::NoCatchment);
    }

    let points: Vec<GeoPoint> = centres
        .iter()
        .map(|c| GeoPoint::new(c.lat, c.lon))
        .collect();
    let center = geo::centroid(&points)?;

    let farthest = points
        .iter()
        .map(|p| geo::planar_distance_m(center, *p))
        .fold(0.0_f64, f64::max);

    let radius_m = (farthest * config.radius_padding).max(config.min_radius_m);
    Ok(Catchment { center, radius_m })
}

/// Cumulative-threshold category dispatch. The partition is an explicit,
/// ordered `(threshold, category)` table; a draw `r ∈ [0,1)` lands in the
/// first bucket whose threshold exceeds it, so ties go to the earliest bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryMix {
    cumulative: Vec<(f64, Category)>,
}

impl CategoryMix {
    /// Build a mix from `(category, weight)` pairs. Weights must be finite
    /// and non-negative with a positive sum; they are normalised internally.
    /// Mixes often arrive from deserialized configuration, so a bad one is a
    /// reported error, not a panic.
    pub fn new(weights: &[(Category, f64)]) -> Result<Self, AllotError> {
        if weights.is_empty() {
            return Err(AllotError::EmptyInput("category mix weights"));
        }
        if weights.iter().any(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(AllotError::Precondition(
                "category weights must be finite and non-negative",
            ));
        }
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return Err(AllotError::Precondition(
                "category weights must sum to a positive value",
            ));
        }

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut running = 0.0;
        for (category, weight) in weights {
            running += weight / total;
            cumulative.push((running, *category));
        }
        // guard against accumulated float error on the final bucket
        if let Some(last) = cumulative.last_mut() {
            last.0 = 1.0;
        }
        Ok(CategoryMix { cumulative })
    }

    /// The ordered cumulative partition.
    pub fn buckets(&self) -> &[(f64, Category)] {
        &self.cumulative
    }

    /// Resolve a uniform draw to a category by ordered scan.
    pub fn pick(&self, r: f64) -> Category {
        for (threshold, category) in &self.cumulative {
            if r < *threshold {
                return *category;
            }
        }
        self.cumulative[self.cumulative.len() - 1].1
    }
}

impl Default for CategoryMix {
    /// 5% pwd, 15% female, 80% general.
    fn default() -> Self {
        CategoryMix {
            cumulative: vec![
                (0.05, Category::Pwd),
                (0.20, Category::Female),
                (1.0, Category::General),
            ],
        }
    }
}

/// Why a sampling run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleTermination {
    /// Exactly the requested count was produced.
    TargetReached,
    /// The attempt budget ran out first; the population is short but valid.
    AttemptBudgetExhausted,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SampleOutcome {
    pub students: Vec<Student>,
    pub attempts: u64,
    pub termination: SampleTermination,
    pub catchment: Catchment,
}

/// Rejection-sample `count` students inside the catchment derived from
/// `centres`.
///
/// Candidates are drawn uniformly in the bounding box around the catchment
/// circle and kept only when their distance to the centroid is within the
/// radius. Sampling stops once `count` students are accepted or after
/// `attempt_multiplier × count` total draws, whichever comes first; the
/// attempt bound trades an exact count for guaranteed termination when the
/// box-to-circle area ratio degenerates (clamped near-polar catchments).
///
/// Student ids restart at `student_1` on every call.
pub fn generate<R: Rng>(
    centres: &[Centre],
    count: usize,
    mix: &CategoryMix,
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<SampleOutcome, AllotError> {
    let catchment = catchment_for(centres, config)?;

    let (lat_offset, lon_offset) =
        geo::degree_offset_for_radius(catchment.radius_m, catchment.center.lat);
    let min_lat = catchment.center.lat - lat_offset;
    let max_lat = catchment.center.lat + lat_offset;
    let min_lon = catchment.center.lon - lon_offset;
    let max_lon = catchment.center.lon + lon_offset;

    let attempt_budget = config.attempt_multiplier.saturating_mul(count as u64);
    let mut students = Vec::with_capacity(count);
    let mut attempts = 0_u64;

    while students.len() < count && attempts < attempt_budget {
        attempts += 1;

        let candidate = GeoPoint::new(
            rng.gen_range(min_lat..max_lat),
            rng.gen_range(min_lon..max_lon),
        );
        if geo::planar_distance_m(catchment.center, candidate) > catchment.radius_m {
            continue;
        }

        let category = mix.pick(rng.gen::<f64>());
        students.push(Student {
            id: format!("student_{}", students.len() + 1),
            lat: candidate.lat,
            lon: candidate.lon,
            category,
        });
    }

    let termination = if students.len() == count {
        SampleTermination::TargetReached
    } else {
        SampleTermination::AttemptBudgetExhausted
    };

    match termination {
        SampleTermination::TargetReached => info!(
            generated = students.len(),
            attempts,
            radius_m = catchment.radius_m,
            "population sampled"
        ),
        SampleTermination::AttemptBudgetExhausted => warn!(
            generated = students.len(),
            requested = count,
            attempts,
            radius_m = catchment.radius_m,
            "attempt budget exhausted, returning short population"
        ),
    }

    Ok(SampleOutcome {
        students,
        attempts,
        termination,
        catchment,
    })
}
