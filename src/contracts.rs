//! Wire contracts for the backend calls. Transport, retries, and rendering
//! stay with the collaborators; the core only defines the shapes it sends and
//! the shapes it expects back.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::AllotError;
use crate::models::{AssignmentMap, Centre, Student, TravelMatrix};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildGraphRequest {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
    pub centres: Vec<Centre>,
    pub graph_detail: String,
}

/// Per-phase timings the backend reports alongside a graph build.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphTiming {
    pub fetch_overpass_ms: u64,
    pub build_graph_ms: u64,
    pub build_kdtree_ms: u64,
    pub dijkstra_precompute_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildGraphResponse {
    pub nodes_count: u64,
    pub edges_count: u64,
    #[serde(default)]
    pub timing: Option<GraphTiming>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllotmentRequest {
    pub students: Vec<Student>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllotmentTiming {
    pub total_ms: u64,
    pub snap_students_ms: u64,
    pub allotment_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllotmentResponse {
    pub assignments: AssignmentMap,
    #[serde(default)]
    pub debug_distances: Option<TravelMatrix>,
    #[serde(default)]
    pub timing: Option<AllotmentTiming>,
}

/// Endpoint coordinates for a shortest-path request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathQuery {
    pub student_lat: f64,
    pub student_lon: f64,
    pub centre_lat: f64,
    pub centre_lon: f64,
}

impl PathQuery {
    /// Render as the GET query string the path endpoint expects.
    pub fn query_string(&self) -> String {
        format!(
            "student_lat={}&student_lon={}&centre_lat={}&centre_lon={}",
            self.student_lat, self.student_lon, self.centre_lat, self.centre_lon
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathResponse {
    /// Ordered `[lat, lon]` points along the route.
    pub path: Vec<[f64; 2]>,
}

/// The diagnostics export is an opaque report document; the core hands it to
/// the caller without interpreting it.
pub type DiagnosticsReport = serde_json::Value;

/// Unwrap the backend's `status`/`message` envelope.
///
/// A `"success"` envelope yields the payload fields deserialized as `T`;
/// anything else becomes a [`AllotError::Backend`] carrying the backend's
/// message, so transport failures and non-success statuses surface uniformly.
pub fn parse_response<T: DeserializeOwned>(body: &str) -> Result<T, AllotError> {
    let envelope: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| AllotError::Backend(format!("malformed response body: {e}")))?;

    let succeeded = envelope.get("status").and_then(|s| s.as_str()) == Some("success");
    if !succeeded {
        let message = envelope
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("backend reported failure without a message")
            .to_string();
        return Err(AllotError::Backend(message));
    }

    serde_json::from_value(envelope)
        .map_err(|e| AllotError::Backend(format!("unexpected response shape: {e}")))
}
