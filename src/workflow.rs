use std::collections::HashMap;

use crate::error::AllotError;

/// Workflow milestones for the current session data set.
///
/// `graph_built` and `students_ready` are independent: either can be reached
/// first, and both are required before an allotment run. Milestones flip only
/// on the successful completion of the corresponding call; failures leave the
/// record untouched. Clearing centres resets everything.
///
/// Invariant: `allotment_ready ⇒ graph_built ∧ students_ready`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkflowState {
    centres_defined: bool,
    graph_built: bool,
    students_ready: bool,
    allotment_ready: bool,
}

impl WorkflowState {
    pub fn new() -> Self {
        WorkflowState::default()
    }

    // ---- guard predicates exposed to callers ----

    pub fn can_build_graph(&self) -> bool {
        self.centres_defined
    }

    /// The graph need not exist yet to simulate a population.
    pub fn can_simulate(&self) -> bool {
        self.centres_defined
    }

    pub fn can_run_allotment(&self) -> bool {
        self.graph_built && self.students_ready
    }

    /// Session-level path display additionally requires the specific student
    /// to hold an assignment.
    pub fn can_show_path(&self) -> bool {
        self.allotment_ready
    }

    pub fn graph_built(&self) -> bool {
        self.graph_built
    }

    pub fn students_ready(&self) -> bool {
        self.students_ready
    }

    pub fn allotment_ready(&self) -> bool {
        self.allotment_ready
    }

    // ---- success-only transitions ----

    pub fn record_centres_defined(&mut self, any: bool) {
        self.centres_defined = any;
    }

    pub fn record_graph_built(&mut self) -> Result<(), AllotError> {
        if !self.can_build_graph() {
            return Err(AllotError::Precondition(
                "graph build requires at least one centre",
            ));
        }
        self.graph_built = true;
        Ok(())
    }

    pub fn record_students_ready(&mut self) -> Result<(), AllotError> {
        if !self.can_simulate() {
            return Err(AllotError::Precondition(
                "simulation requires at least one centre",
            ));
        }
        self.students_ready = true;
        // a fresh population invalidates any allotment computed for the old one
        self.allotment_ready = false;
        Ok(())
    }

    pub fn record_allotment_ready(&mut self) -> Result<(), AllotError> {
        if !self.can_run_allotment() {
            return Err(AllotError::Precondition(
                "allotment requires a built graph and a simulated population",
            ));
        }
        self.allotment_ready = true;
        Ok(())
    }

    /// Cascade reset: all downstream milestones are lost with the centres.
    pub fn reset(&mut self) {
        *self = WorkflowState::default();
    }
}

/// Backend operations tracked for request supersession.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    BuildGraph,
    RunAllotment,
    GetPath,
    ExportDiagnostics,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::BuildGraph => "build-graph",
            Operation::RunAllotment => "run-allotment",
            Operation::GetPath => "get-path",
            Operation::ExportDiagnostics => "export-diagnostics",
        }
    }
}

/// Monotonic sequence numbers per operation, so that when a second request
/// for the same operation starts before the first response lands, only the
/// last-initiated request's result is ever applied.
#[derive(Clone, Debug, Default)]
pub struct RequestTracker {
    next_seq: u64,
    latest: HashMap<Operation, u64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        RequestTracker::default()
    }

    /// Register a new in-flight request and return its sequence number.
    pub fn begin(&mut self, op: Operation) -> u64 {
        self.next_seq += 1;
        self.latest.insert(op, self.next_seq);
        self.next_seq
    }

    pub fn is_current(&self, op: Operation, seq: u64) -> bool {
        self.latest.get(&op) == Some(&seq)
    }

    /// Mark any in-flight request for `op` as superseded without starting a
    /// new one. The data set the request was computed against is gone, so its
    /// response must never be applied; the fresh sequence number recorded
    /// here is handed to no caller and therefore matches nothing.
    pub fn invalidate(&mut self, op: Operation) {
        if self.latest.contains_key(&op) {
            self.next_seq += 1;
            self.latest.insert(op, self.next_seq);
        }
    }

    /// Check a completed request against the latest issued for its operation.
    pub fn accept(&self, op: Operation, seq: u64) -> Result<(), AllotError> {
        let latest = self.latest.get(&op).copied().unwrap_or(0);
        if latest != 0 && seq == latest {
            Ok(())
        } else {
            Err(AllotError::StaleResponse {
                operation: op.name(),
                seq,
                latest,
            })
        }
    }
}
