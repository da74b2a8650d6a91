use courseline_tool::CourseLineRow;
use courseline_tool::roster::{auto_assign_classroom, next_course_line_id};

fn row(course_line_id: &str, weekday: u8, time: &str) -> CourseLineRow {
    CourseLineRow {
        course_line_id: course_line_id.to_string(),
        course_name: "Evening English".to_string(),
        curriculum_id: "CUR-A".to_string(),
        weekday,
        time: time.to_string(),
        classroom: "A".to_string(),
        teacher_id: "T01".to_string(),
        start_date: "2026-02-02".to_string(),
        start_sequence: 1,
        status: "Active".to_string(),
        note: String::new(),
    }
}

#[test]
fn first_course_line_id_is_c001() {
    assert_eq!(next_course_line_id(&[]), "C001");
}

#[test]
fn next_id_increments_the_highest_suffix() {
    let rows = vec![row("C001", 1, "19:00"), row("C007", 2, "10:00")];
    assert_eq!(next_course_line_id(&rows), "C008");
}

#[test]
fn non_conforming_ids_are_ignored() {
    let rows = vec![row("LEGACY-1", 1, "19:00"), row("C002", 2, "10:00")];
    assert_eq!(next_course_line_id(&rows), "C003");

    let only_legacy = vec![row("LEGACY-1", 1, "19:00")];
    assert_eq!(next_course_line_id(&only_legacy), "C001");
}

#[test]
fn id_keeps_three_digit_padding_past_99() {
    let rows = vec![row("C099", 1, "19:00")];
    assert_eq!(next_course_line_id(&rows), "C100");
}

#[test]
fn classroom_advances_per_conflicting_slot() {
    let mut rows = Vec::new();
    assert_eq!(auto_assign_classroom(&rows, 1, "19:00"), "A");

    rows.push(row("C001", 1, "19:00"));
    assert_eq!(auto_assign_classroom(&rows, 1, "19:00"), "B");

    rows.push(row("C002", 1, "19:00"));
    assert_eq!(auto_assign_classroom(&rows, 1, "19:00"), "C");
}

#[test]
fn classroom_counts_only_exact_weekday_and_time() {
    let rows = vec![row("C001", 1, "19:00")];
    assert_eq!(auto_assign_classroom(&rows, 1, "18:00"), "A");
    assert_eq!(auto_assign_classroom(&rows, 2, "19:00"), "A");
}
