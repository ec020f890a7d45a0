use crate::merge::{AssignmentStatus, Reachability, StudentView};
use crate::models::{Category, Student};

/// Population breakdown by category, for the stats panel and the
/// diagnostics export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub pwd: usize,
    pub female: usize,
    pub general: usize,
}

pub fn category_counts(students: &[Student]) -> CategoryCounts {
    let mut counts = CategoryCounts::default();
    for student in students {
        match student.category {
            Category::Pwd => counts.pwd += 1,
            Category::Female => counts.female += 1,
            Category::General => counts.general += 1,
        }
    }
    counts
}

/// Assigned / unassigned split over a merged view set.
pub fn assignment_counts(views: &[StudentView]) -> (usize, usize) {
    let assigned = views
        .iter()
        .filter(|v| matches!(v.status, AssignmentStatus::Assigned(_)))
        .count();
    (assigned, views.len() - assigned)
}

/// Travel-cell classification totals over a merged view set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReachabilitySummary {
    pub known: usize,
    pub unreachable: usize,
    pub missing: usize,
}

pub fn reachability_summary(views: &[StudentView]) -> ReachabilitySummary {
    let mut summary = ReachabilitySummary::default();
    for view in views {
        for cell in &view.travel {
            match cell.reachability {
                Reachability::Known(_) => summary.known += 1,
                Reachability::Unreachable => summary.unreachable += 1,
                Reachability::Missing => summary.missing += 1,
            }
        }
    }
    summary
}
