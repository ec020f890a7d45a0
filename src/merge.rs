use tracing::warn;

use crate::error::AllotError;
use crate::models::{AssignmentMap, Category, Centre, Student, TravelMatrix};

/// Travel times at or beyond this many seconds mean "no route exists". Some
/// backend builds emit an infinity sentinel instead; both representations
/// classify identically.
pub const UNREACHABLE_THRESHOLD_SECS: f64 = 9_000_000.0;

/// Outcome of the assignment lookup for one student.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssignmentStatus {
    Assigned(String),
    Unassigned,
}

/// Classification of one student/centre travel-time cell.
///
/// `Missing` (the backend never computed the cell) is deliberately distinct
/// from `Unreachable` (the backend computed it and found no route); solvers
/// legitimately emit either form and the caller must not conflate them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reachability {
    Known(f64),
    Unreachable,
    Missing,
}

/// One row of per-centre travel detail on a student view.
#[derive(Clone, Debug, PartialEq)]
pub struct CentreTravel {
    pub centre_id: String,
    pub reachability: Reachability,
}

/// Per-student merge of assignment and diagnostics, in input student order.
#[derive(Clone, Debug, PartialEq)]
pub struct StudentView {
    pub student_id: String,
    pub category: Category,
    pub status: AssignmentStatus,
    /// One entry per currently known centre, in centre order. Empty when the
    /// diagnostics matrix was absent.
    pub travel: Vec<CentreTravel>,
}

/// Classify a raw travel-time value.
pub fn classify_travel_secs(secs: f64) -> Reachability {
    if !secs.is_finite() || secs >= UNREACHABLE_THRESHOLD_SECS {
        Reachability::Unreachable
    } else {
        Reachability::Known(secs)
    }
}

/// Combine the sparse assignment map and the optional dense travel matrix
/// into one view model per student, preserving student input order so the
/// rendering layer can update nodes in place.
///
/// A dangling assignment reference corrupts the primary signal and aborts the
/// merge; diagnostics are best-effort, so matrix cells that reference unknown
/// centres are skipped with a warning and an absent matrix degrades to
/// assignment-only views.
pub fn merge(
    students: &[Student],
    centres: &[Centre],
    assignments: &AssignmentMap,
    travel_matrix: Option<&TravelMatrix>,
) -> Result<Vec<StudentView>, AllotError> {
    let mut views = Vec::with_capacity(students.len());

    for student in students {
        let status = match assignments.get(&student.id) {
            Some(centre_id) => {
                if !centres.iter().any(|c| &c.id == centre_id) {
                    return Err(AllotError::DanglingReference {
                        kind: "centre",
                        id: centre_id.clone(),
                        referrer: format!("assignment for {}", student.id),
                    });
                }
                AssignmentStatus::Assigned(centre_id.clone())
            }
            None => AssignmentStatus::Unassigned,
        };

        let travel = match travel_matrix {
            Some(matrix) => {
                let row = matrix.get(&student.id);
                if let Some(row) = row {
                    let unknown = row
                        .keys()
                        .filter(|id| !centres.iter().any(|c| &c.id == *id))
                        .count();
                    if unknown > 0 {
                        warn!(
                            student_id = %student.id,
                            skipped_cells = unknown,
                            "travel matrix references unknown centres, skipping cells"
                        );
                    }
                }
                centres
                    .iter()
                    .map(|centre| CentreTravel {
                        centre_id: centre.id.clone(),
                        reachability: row
                            .and_then(|r| r.get(&centre.id))
                            .map(|secs| classify_travel_secs(*secs))
                            .unwrap_or(Reachability::Missing),
                    })
                    .collect()
            }
            None => Vec::new(),
        };

        views.push(StudentView {
            student_id: student.id.clone(),
            category: student.category,
            status,
            travel,
        });
    }

    Ok(views)
}
