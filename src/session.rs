use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::contracts::{
    AllotmentRequest, AllotmentResponse, BuildGraphRequest, BuildGraphResponse, PathQuery,
};
use crate::error::AllotError;
use crate::merge::{self, StudentView};
use crate::models::{AssignmentMap, Centre, Student, TravelMatrix};
use crate::sampler::{self, CategoryMix, SampleOutcome};
use crate::workflow::{Operation, RequestTracker, WorkflowState};

/// The single owned session: centres, the current synthetic population, the
/// adopted allotment, and the workflow record gating backend calls.
///
/// All collections are replaced wholesale, never partially mutated, and only
/// by the successful completion of an external call or an explicit clear.
/// Backend responses are applied through sequence numbers handed out at
/// request time; a superseded response is discarded without side effects.
#[derive(Clone, Debug)]
pub struct Session {
    config: SimulationConfig,
    mix: CategoryMix,
    centres: Vec<Centre>,
    students: Vec<Student>,
    assignments: AssignmentMap,
    travel_matrix: Option<TravelMatrix>,
    workflow: WorkflowState,
    tracker: RequestTracker,
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session::with_config(SimulationConfig::default(), CategoryMix::default())
    }

    pub fn with_config(config: SimulationConfig, mix: CategoryMix) -> Self {
        Session {
            config,
            mix,
            centres: Vec::new(),
            students: Vec::new(),
            assignments: AssignmentMap::new(),
            travel_matrix: None,
            workflow: WorkflowState::new(),
            tracker: RequestTracker::new(),
        }
    }

    // ---- state exposed to the rendering layer ----

    /// Centres in insertion order; the renderer keys colours off this order.
    pub fn centres(&self) -> &[Centre] {
        &self.centres
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn assignments(&self) -> &AssignmentMap {
        &self.assignments
    }

    pub fn travel_matrix(&self) -> Option<&TravelMatrix> {
        self.travel_matrix.as_ref()
    }

    pub fn workflow(&self) -> &WorkflowState {
        &self.workflow
    }

    // ---- centre management ----

    pub fn add_centre(&mut self, lat: f64, lon: f64, max_capacity: u32) -> &Centre {
        self.add_centre_with_capabilities(lat, lon, max_capacity, false, false)
    }

    pub fn add_centre_with_capabilities(
        &mut self,
        lat: f64,
        lon: f64,
        max_capacity: u32,
        has_wheelchair_access: bool,
        is_female_only: bool,
    ) -> &Centre {
        let id = format!("centre_{}", self.centres.len() + 1);
        info!(centre_id = %id, lat, lon, max_capacity, "centre added");
        self.centres.push(Centre {
            id,
            lat,
            lon,
            max_capacity,
            has_wheelchair_access,
            is_female_only,
        });
        self.workflow.record_centres_defined(true);
        self.centres.last().unwrap()
    }

    /// Remove every centre and cascade: students, assignments, and
    /// diagnostics all reference the cleared set and are discarded with it.
    pub fn clear_centres(&mut self) {
        self.centres.clear();
        self.students.clear();
        self.assignments.clear();
        self.travel_matrix = None;
        self.tracker.invalidate(Operation::BuildGraph);
        self.tracker.invalidate(Operation::RunAllotment);
        self.tracker.invalidate(Operation::GetPath);
        self.tracker.invalidate(Operation::ExportDiagnostics);
        self.workflow.reset();
        info!("centres cleared, session reset");
    }

    // ---- graph build ----

    /// Start a graph build over the given viewport. Returns the request
    /// sequence number and the wire payload for the caller to send.
    pub fn begin_build_graph(
        &mut self,
        min_lat: f64,
        min_lon: f64,
        max_lat: f64,
        max_lon: f64,
        graph_detail: &str,
    ) -> Result<(u64, BuildGraphRequest), AllotError> {
        if !self.workflow.can_build_graph() {
            return Err(AllotError::Precondition(
                "graph build requires at least one centre",
            ));
        }
        let seq = self.tracker.begin(Operation::BuildGraph);
        let request = BuildGraphRequest {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
            centres: self.centres.clone(),
            graph_detail: graph_detail.to_string(),
        };
        Ok((seq, request))
    }

    /// Apply a successful graph-build response. Returns `false` when the
    /// response was superseded and therefore discarded.
    pub fn apply_graph_built(
        &mut self,
        seq: u64,
        response: &BuildGraphResponse,
    ) -> Result<bool, AllotError> {
        if let Err(stale) = self.tracker.accept(Operation::BuildGraph, seq) {
            debug!(error = %stale, "discarding superseded graph-build response");
            return Ok(false);
        }
        self.workflow.record_graph_built()?;
        info!(
            nodes = response.nodes_count,
            edges = response.edges_count,
            "graph built"
        );
        Ok(true)
    }

    // ---- population simulation ----

    /// Generate a fresh population inside the catchment and adopt it,
    /// replacing the previous one wholesale. Any allotment computed for the
    /// old population is invalidated.
    pub fn simulate_students<R: Rng>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<SampleOutcome, AllotError> {
        let outcome = sampler::generate(&self.centres, count, &self.mix, &self.config, rng)?;
        self.students = outcome.students.clone();
        self.assignments.clear();
        self.travel_matrix = None;
        // in-flight allotment and path requests were computed against the
        // replaced population; their responses must be discarded even though
        // the regenerated ids collide (`student_1` restarts every run)
        self.tracker.invalidate(Operation::RunAllotment);
        self.tracker.invalidate(Operation::GetPath);
        self.workflow.record_students_ready()?;
        Ok(outcome)
    }

    // ---- allotment ----

    pub fn begin_allotment(&mut self) -> Result<(u64, AllotmentRequest), AllotError> {
        if !self.workflow.can_run_allotment() {
            return Err(AllotError::Precondition(
                "allotment requires a built graph and a simulated population",
            ));
        }
        let seq = self.tracker.begin(Operation::RunAllotment);
        let request = AllotmentRequest {
            students: self.students.clone(),
        };
        Ok((seq, request))
    }

    /// Validate and adopt a successful allotment response.
    ///
    /// Every assignment must reference a current student and centre; a
    /// dangling reference aborts without adopting anything. Diagnostics are
    /// best-effort: matrix rows and cells referencing unknown entities are
    /// dropped with a warning. Returns `false` for a superseded response.
    pub fn apply_allotment(
        &mut self,
        seq: u64,
        response: AllotmentResponse,
    ) -> Result<bool, AllotError> {
        if let Err(stale) = self.tracker.accept(Operation::RunAllotment, seq) {
            debug!(error = %stale, "discarding superseded allotment response");
            return Ok(false);
        }
        if !self.workflow.can_run_allotment() {
            return Err(AllotError::Precondition(
                "allotment requires a built graph and a simulated population",
            ));
        }

        for (student_id, centre_id) in &response.assignments {
            if !self.students.iter().any(|s| &s.id == student_id) {
                return Err(AllotError::DanglingReference {
                    kind: "student",
                    id: student_id.clone(),
                    referrer: "allotment response".to_string(),
                });
            }
            if !self.centres.iter().any(|c| &c.id == centre_id) {
                return Err(AllotError::DanglingReference {
                    kind: "centre",
                    id: centre_id.clone(),
                    referrer: format!("assignment for {student_id}"),
                });
            }
        }

        let travel_matrix = response
            .debug_distances
            .map(|matrix| self.sanitize_matrix(matrix));

        self.assignments = response.assignments;
        self.travel_matrix = travel_matrix;
        self.workflow.record_allotment_ready()?;
        info!(assigned = self.assignments.len(), "allotment adopted");
        Ok(true)
    }

    fn sanitize_matrix(&self, matrix: TravelMatrix) -> TravelMatrix {
        let mut dropped_rows = 0_usize;
        let mut dropped_cells = 0_usize;

        let sanitized: TravelMatrix = matrix
            .into_iter()
            .filter(|(student_id, _)| {
                let known = self.students.iter().any(|s| &s.id == student_id);
                if !known {
                    dropped_rows += 1;
                }
                known
            })
            .map(|(student_id, row)| {
                let kept: std::collections::HashMap<String, f64> = row
                    .into_iter()
                    .filter(|(centre_id, _)| {
                        let known = self.centres.iter().any(|c| &c.id == centre_id);
                        if !known {
                            dropped_cells += 1;
                        }
                        known
                    })
                    .collect();
                (student_id, kept)
            })
            .collect();

        if dropped_rows > 0 || dropped_cells > 0 {
            warn!(
                dropped_rows,
                dropped_cells, "travel matrix referenced unknown entities, cells dropped"
            );
        }
        sanitized
    }

    // ---- derived views ----

    /// Per-student view models for the rendering layer, in population order.
    pub fn student_views(&self) -> Result<Vec<StudentView>, AllotError> {
        merge::merge(
            &self.students,
            &self.centres,
            &self.assignments,
            self.travel_matrix.as_ref(),
        )
    }

    pub fn can_show_path(&self, student_id: &str) -> bool {
        self.workflow.can_show_path() && self.assignments.contains_key(student_id)
    }

    /// Build the path request for a student and their assigned centre.
    pub fn begin_path_query(&mut self, student_id: &str) -> Result<(u64, PathQuery), AllotError> {
        if !self.workflow.can_show_path() {
            return Err(AllotError::Precondition(
                "path display requires a completed allotment",
            ));
        }
        let student = self
            .students
            .iter()
            .find(|s| s.id == student_id)
            .ok_or_else(|| AllotError::DanglingReference {
                kind: "student",
                id: student_id.to_string(),
                referrer: "path query".to_string(),
            })?;
        let centre_id = self.assignments.get(student_id).ok_or(AllotError::Precondition(
            "path display requires an assignment for the student",
        ))?;
        let centre = self
            .centres
            .iter()
            .find(|c| &c.id == centre_id)
            .ok_or_else(|| AllotError::DanglingReference {
                kind: "centre",
                id: centre_id.clone(),
                referrer: format!("assignment for {student_id}"),
            })?;

        let query = PathQuery {
            student_lat: student.lat,
            student_lon: student.lon,
            centre_lat: centre.lat,
            centre_lon: centre.lon,
        };
        Ok((self.tracker.begin(Operation::GetPath), query))
    }

    /// Start a diagnostics export; only meaningful once an allotment exists.
    pub fn begin_export_diagnostics(&mut self) -> Result<u64, AllotError> {
        if !self.workflow.allotment_ready() {
            return Err(AllotError::Precondition(
                "diagnostics export requires a completed allotment",
            ));
        }
        Ok(self.tracker.begin(Operation::ExportDiagnostics))
    }
}
