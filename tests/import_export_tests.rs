use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use courseline_tool::persistence::{CourseLineRow, LessonLogEntry};
use courseline_tool::{CsvScheduleStore, Lesson, LessonStatus, ScheduleStore, dedup_by_slot_id};
use std::fs;
use tempfile::TempDir;
use uuid::Uuid;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn stamp() -> NaiveDateTime {
    d(2026, 2, 1).and_hms_opt(12, 0, 0).unwrap()
}

fn lesson(date: NaiveDate, unit_code: &str) -> Lesson {
    Lesson {
        slot_id: Uuid::new_v4(),
        course_line_id: "C001".to_string(),
        course_name: "Evening English".to_string(),
        curriculum_id: "CUR-A".to_string(),
        curriculum_name: "General English".to_string(),
        level_id: "LV2".to_string(),
        date,
        weekday: "Mon".to_string(),
        time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        classroom: "A".to_string(),
        teacher_id: "T01".to_string(),
        unit_code: unit_code.to_string(),
        unit_label: format!("Label {unit_code}"),
        book_full_name: format!("Book {unit_code}"),
        status: LessonStatus::Normal,
        note: String::new(),
        created_at: stamp(),
        updated_at: stamp(),
    }
}

fn course_line_row(course_line_id: &str) -> CourseLineRow {
    CourseLineRow {
        course_line_id: course_line_id.to_string(),
        course_name: "Evening English".to_string(),
        curriculum_id: "CUR-A".to_string(),
        weekday: 1,
        time: "19:00".to_string(),
        classroom: "A".to_string(),
        teacher_id: "T01".to_string(),
        start_date: "2026-02-02".to_string(),
        start_sequence: 1,
        status: "Active".to_string(),
        note: String::new(),
    }
}

#[test]
fn replace_then_load_round_trips_the_schedule() {
    let dir = TempDir::new().expect("create temp dir");
    let store = CsvScheduleStore::new(dir.path());

    let lessons = vec![lesson(d(2026, 2, 2), "U1"), lesson(d(2026, 2, 9), "U2")];
    store.replace_schedule(&lessons).unwrap();

    let loaded = store.load_schedule().unwrap();
    assert_eq!(loaded, lessons);
}

#[test]
fn missing_schedule_file_loads_as_empty() {
    let dir = TempDir::new().expect("create temp dir");
    let store = CsvScheduleStore::new(dir.path());
    assert!(store.load_schedule().unwrap().is_empty());
}

#[test]
fn missing_course_lines_file_is_an_error() {
    let dir = TempDir::new().expect("create temp dir");
    let store = CsvScheduleStore::new(dir.path());
    assert!(store.load_course_lines().is_err());
}

#[test]
fn append_to_missing_schedule_creates_the_file() {
    let dir = TempDir::new().expect("create temp dir");
    let store = CsvScheduleStore::new(dir.path());

    let lessons = vec![lesson(d(2026, 2, 2), "U1")];
    store.append_schedule(&lessons).unwrap();
    assert_eq!(store.load_schedule().unwrap(), lessons);
}

#[test]
fn append_preserves_existing_rows() {
    let dir = TempDir::new().expect("create temp dir");
    let store = CsvScheduleStore::new(dir.path());

    let first = vec![lesson(d(2026, 2, 2), "U1")];
    store.replace_schedule(&first).unwrap();
    let second = vec![lesson(d(2026, 2, 9), "U2")];
    store.append_schedule(&second).unwrap();

    let loaded = store.load_schedule().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0], first[0]);
    assert_eq!(loaded[1], second[0]);
}

#[test]
fn replace_clears_previous_rows() {
    let dir = TempDir::new().expect("create temp dir");
    let store = CsvScheduleStore::new(dir.path());

    store
        .replace_schedule(&[lesson(d(2026, 2, 2), "U1"), lesson(d(2026, 2, 9), "U2")])
        .unwrap();
    let replacement = vec![lesson(d(2026, 3, 2), "U3")];
    store.replace_schedule(&replacement).unwrap();
    assert_eq!(store.load_schedule().unwrap(), replacement);
}

#[test]
fn append_course_line_honors_foreign_column_order() {
    let dir = TempDir::new().expect("create temp dir");
    let store = CsvScheduleStore::new(dir.path());

    // A store whose header order differs from ours and carries a column we
    // do not know about.
    let header = "course_name,course_line_id,curriculum_id,weekday,time,classroom,teacher_id,start_date,start_sequence,status,note,extra";
    let existing = "Evening English,C001,CUR-A,1,19:00,A,T01,2026-02-02,1,Active,,legacy";
    fs::write(
        dir.path().join("course_lines.csv"),
        format!("{header}\n{existing}\n"),
    )
    .unwrap();

    store.append_course_line(&course_line_row("C002")).unwrap();

    let mut reader = csv::Reader::from_path(dir.path().join("course_lines.csv")).unwrap();
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
    let appended = &records[1];
    assert_eq!(&appended[0], "Evening English");
    assert_eq!(&appended[1], "C002");
    assert_eq!(&appended[3], "1");
    assert_eq!(&appended[4], "19:00");
    // Unknown destination column stays blank.
    assert_eq!(&appended[11], "");

    let rows = store.load_course_lines().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1], course_line_row("C002"));
}

#[test]
fn append_course_line_creates_file_with_headers() {
    let dir = TempDir::new().expect("create temp dir");
    let store = CsvScheduleStore::new(dir.path());

    store.append_course_line(&course_line_row("C001")).unwrap();
    store.append_course_line(&course_line_row("C002")).unwrap();

    let rows = store.load_course_lines().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].course_line_id, "C001");
    assert_eq!(rows[1].course_line_id, "C002");
}

#[test]
fn duplicate_appends_are_resolved_first_wins_on_read() {
    let dir = TempDir::new().expect("create temp dir");
    let store = CsvScheduleStore::new(dir.path());

    // Appending never rewrites existing rows, so a re-appended slot id lands
    // twice in the file; readers resolve it with first-occurrence-wins.
    let original = lesson(d(2026, 2, 2), "U1");
    store.append_schedule(std::slice::from_ref(&original)).unwrap();
    let mut rewrite = original.clone();
    rewrite.unit_code = "U9".to_string();
    store.append_schedule(&[rewrite]).unwrap();

    let loaded = store.load_schedule().unwrap();
    assert_eq!(loaded.len(), 2);
    let resolved = dedup_by_slot_id(loaded);
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].unit_code, "U1");
}

#[test]
fn lesson_log_appends_accumulate() {
    let dir = TempDir::new().expect("create temp dir");
    let store = CsvScheduleStore::new(dir.path());

    let entry = LessonLogEntry {
        slot_id: Uuid::new_v4().to_string(),
        teacher_id: "T01".to_string(),
        date: "2026-02-02".to_string(),
        unit_covered: "U1".to_string(),
        note: "good progress".to_string(),
        created_at: "2026-02-02 20:30:00".to_string(),
    };
    store.append_lesson_log(&entry).unwrap();
    store.append_lesson_log(&entry).unwrap();

    let mut reader = csv::Reader::from_path(dir.path().join("lesson_log.csv")).unwrap();
    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 2);
}

#[test]
fn schedule_file_uses_plain_text_dates_and_times() {
    let dir = TempDir::new().expect("create temp dir");
    let store = CsvScheduleStore::new(dir.path());

    store.replace_schedule(&[lesson(d(2026, 2, 2), "U1")]).unwrap();
    let text = fs::read_to_string(dir.path().join("schedule.csv")).unwrap();
    assert!(text.contains("2026-02-02"));
    assert!(text.contains("19:00"));
    assert!(text.contains("normal"));
}
