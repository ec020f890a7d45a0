use std::collections::HashMap;

use allotcore::merge::{merge, Reachability};
use allotcore::models::{AssignmentMap, Category, Centre, Student, TravelMatrix};
use allotcore::statistics::{assignment_counts, category_counts, reachability_summary};

fn student(id: &str, category: Category) -> Student {
    Student {
        id: id.to_string(),
        lat: 26.3,
        lon: 73.0,
        category,
    }
}

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

#[test]
fn category_counts_partition_the_population() {
    let students = vec![
        student("student_1", Category::Pwd),
        student("student_2", Category::Female),
        student("student_3", Category::General),
        student("student_4", Category::General),
        student("student_5", Category::Female),
    ];
    let counts = category_counts(&students);
    assert_eq!(counts.pwd, 1);
    assert_eq!(counts.female, 2);
    assert_eq!(counts.general, 2);
}

#[test]
fn empty_population_counts_to_zero() {
    let counts = category_counts(&[]);
    assert_eq!((counts.pwd, counts.female, counts.general), (0, 0, 0));
}

#[test]
fn summaries_reflect_the_merged_views() {
    let students = vec![
        student("student_1", Category::General),
        student("student_2", Category::General),
    ];
    let centres = vec![centre("centre_1"), centre("centre_2")];
    let mut assignments = AssignmentMap::new();
    assignments.insert("student_1".to_string(), "centre_1".to_string());

    let mut matrix = TravelMatrix::new();
    let mut row = HashMap::new();
    row.insert("centre_1".to_string(), 300.0);
    row.insert("centre_2".to_string(), 9_500_000.0);
    matrix.insert("student_1".to_string(), row);
    // student_2 has no row at all

    let views = merge(&students, &centres, &assignments, Some(&matrix)).unwrap();

    let (assigned, unassigned) = assignment_counts(&views);
    assert_eq!((assigned, unassigned), (1, 1));

    let summary = reachability_summary(&views);
    assert_eq!(summary.known, 1);
    assert_eq!(summary.unreachable, 1);
    assert_eq!(summary.missing, 2, "student_2 is missing both centres");

    let cell = views[0]
        .travel
        .iter()
        .find(|c| c.centre_id == "centre_2")
        .unwrap();
    assert_eq!(cell.reachability, Reachability::Unreachable);
}
