use std::collections::HashMap;

use allotcore::error::AllotError;
use allotcore::merge::{
    classify_travel_secs, merge, AssignmentStatus, Reachability, UNREACHABLE_THRESHOLD_SECS,
};
use allotcore::models::{AssignmentMap, Category, Centre, Student, TravelMatrix};

fn centre(id: &str) -> Centre {
    Centre {
        id: id.to_string(),
        lat: 26.27,
        lon: 73.03,
        max_capacity: 100,
        has_wheelchair_access: false,
        is_female_only: false,
    }
}

fn student(id: &str) -> Student {
    Student {
        id: id.to_string(),
        lat: 26.28,
        lon: 73.04,
        category: Category::General,
    }
}

#[test]
fn threshold_value_classifies_as_unreachable() {
    assert_eq!(
        classify_travel_secs(UNREACHABLE_THRESHOLD_SECS),
        Reachability::Unreachable,
        "exactly 9,000,000 is unreachable"
    );
    assert_eq!(
        classify_travel_secs(8_999_999.0),
        Reachability::Known(8_999_999.0)
    );
    assert_eq!(classify_travel_secs(f64::INFINITY), Reachability::Unreachable);
    assert_eq!(classify_travel_secs(f64::NAN), Reachability::Unreachable);
    assert_eq!(classify_travel_secs(321.5), Reachability::Known(321.5));
}

#[test]
fn statuses_follow_the_assignment_map_in_student_order() {
    let students = vec![student("student_1"), student("student_2"), student("student_3")];
    let centres = vec![centre("centre_1")];
    let mut assignments = AssignmentMap::new();
    assignments.insert("student_1".to_string(), "centre_1".to_string());
    assignments.insert("student_3".to_string(), "centre_1".to_string());

    let views = merge(&students, &centres, &assignments, None).expect("merge succeeds");

    assert_eq!(views.len(), 3);
    assert_eq!(views[0].student_id, "student_1");
    assert_eq!(
        views[0].status,
        AssignmentStatus::Assigned("centre_1".to_string())
    );
    assert_eq!(views[1].status, AssignmentStatus::Unassigned);
    assert_eq!(
        views[2].status,
        AssignmentStatus::Assigned("centre_1".to_string())
    );
}

#[test]
fn absent_matrix_degrades_to_assignment_only_views() {
    let students = vec![student("student_1")];
    let centres = vec![centre("centre_1"), centre("centre_2")];
    let views = merge(&students, &centres, &AssignmentMap::new(), None).unwrap();
    assert!(
        views[0].travel.is_empty(),
        "no matrix means no per-centre detail rows"
    );
}

#[test]
fn travel_rows_cover_every_known_centre_in_order() {
    let students = vec![student("student_1")];
    let centres = vec![centre("centre_1"), centre("centre_2"), centre("centre_3")];
    let mut assignments = AssignmentMap::new();
    assignments.insert("student_1".to_string(), "centre_2".to_string());

    let mut row = HashMap::new();
    row.insert("centre_1".to_string(), 600.0);
    row.insert("centre_2".to_string(), 9_000_000.0);
    // centre_3 never computed
    let mut matrix = TravelMatrix::new();
    matrix.insert("student_1".to_string(), row);

    let views = merge(&students, &centres, &assignments, Some(&matrix)).unwrap();
    let travel = &views[0].travel;

    assert_eq!(travel.len(), 3, "one row per known centre, not only the assigned one");
    assert_eq!(travel[0].centre_id, "centre_1");
    assert_eq!(travel[0].reachability, Reachability::Known(600.0));
    assert_eq!(travel[1].reachability, Reachability::Unreachable);
    assert_eq!(
        travel[2].reachability,
        Reachability::Missing,
        "an omitted cell is Missing, not Unreachable"
    );
}

#[test]
fn student_without_a_matrix_row_gets_all_missing() {
    let students = vec![student("student_1")];
    let centres = vec![centre("centre_1"), centre("centre_2")];
    let matrix = TravelMatrix::new();

    let views = merge(&students, &centres, &AssignmentMap::new(), Some(&matrix)).unwrap();
    assert!(views[0]
        .travel
        .iter()
        .all(|cell| cell.reachability == Reachability::Missing));
}

#[test]
fn malformed_matrix_cells_are_skipped_not_fatal() {
    let students = vec![student("student_1")];
    let centres = vec![centre("centre_1")];

    let mut row = HashMap::new();
    row.insert("centre_1".to_string(), 120.0);
    row.insert("centre_ghost".to_string(), 42.0);
    let mut matrix = TravelMatrix::new();
    matrix.insert("student_1".to_string(), row);

    let views = merge(&students, &centres, &AssignmentMap::new(), Some(&matrix))
        .expect("diagnostics are best-effort");
    assert_eq!(views[0].travel.len(), 1);
    assert_eq!(views[0].travel[0].reachability, Reachability::Known(120.0));
}

#[test]
fn dangling_assignment_reference_is_a_hard_error() {
    let students = vec![student("student_1")];
    let centres = vec![centre("centre_1")];
    let mut assignments = AssignmentMap::new();
    assignments.insert("student_1".to_string(), "centre_gone".to_string());

    let result = merge(&students, &centres, &assignments, None);
    assert!(
        matches!(
            result,
            Err(AllotError::DanglingReference { kind: "centre", .. })
        ),
        "expected DanglingReference, got {result:?}"
    );
}

#[test]
fn merge_is_idempotent() {
    let students = vec![student("student_1"), student("student_2")];
    let centres = vec![centre("centre_1"), centre("centre_2")];
    let mut assignments = AssignmentMap::new();
    assignments.insert("student_2".to_string(), "centre_1".to_string());

    let mut row = HashMap::new();
    row.insert("centre_1".to_string(), 300.0);
    row.insert("centre_2".to_string(), f64::INFINITY);
    let mut matrix = TravelMatrix::new();
    matrix.insert("student_2".to_string(), row);

    let first = merge(&students, &centres, &assignments, Some(&matrix)).unwrap();
    let second = merge(&students, &centres, &assignments, Some(&matrix)).unwrap();
    assert_eq!(first, second, "identical inputs must yield identical views");
}
