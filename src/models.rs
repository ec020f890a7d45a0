use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An exam centre placed by the operator. Immutable once created; removed
/// only by the bulk clear on the owning session. Insertion order is
/// significant downstream (it drives the renderer's colour assignment), so
/// centres always travel in `Vec`s, never sets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Centre {
    #[serde(rename = "centre_id")]
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub max_capacity: u32,
    #[serde(default)]
    pub has_wheelchair_access: bool,
    #[serde(default)]
    pub is_female_only: bool,
}

/// Category bucket for a synthetic student.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pwd,
    Female,
    // older backend builds label this bucket "male"
    #[serde(alias = "male")]
    General,
}

/// A synthetic student produced by the sampler. The whole population is
/// replaced wholesale on every simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "student_id")]
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub category: Category,
}

/// Sparse student-to-centre mapping from the backend allotment. A student
/// absent from the map is unassigned.
pub type AssignmentMap = HashMap<String, String>;

/// Dense per-student, per-centre travel times in seconds. Optional
/// diagnostics; cells may be missing, or carry a sentinel for "no route".
pub type TravelMatrix = HashMap<String, HashMap<String, f64>>;
