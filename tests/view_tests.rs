use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use courseline_tool::view::{LessonFilter, ViewMode, ViewState, difficulty_from_level, month_grid};
use courseline_tool::{Lesson, LessonStatus};
use uuid::Uuid;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn stamp() -> NaiveDateTime {
    d(2026, 2, 1).and_hms_opt(12, 0, 0).unwrap()
}

fn lesson(date: NaiveDate, time: (u32, u32), course: &str, teacher: &str, level: &str) -> Lesson {
    Lesson {
        slot_id: Uuid::new_v4(),
        course_line_id: "C001".to_string(),
        course_name: course.to_string(),
        curriculum_id: "CUR-A".to_string(),
        curriculum_name: "General English".to_string(),
        level_id: level.to_string(),
        date,
        weekday: "Mon".to_string(),
        time: NaiveTime::from_hms_opt(time.0, time.1, 0).unwrap(),
        classroom: "A".to_string(),
        teacher_id: teacher.to_string(),
        unit_code: "U1".to_string(),
        unit_label: "Label U1".to_string(),
        book_full_name: "Book U1".to_string(),
        status: LessonStatus::Normal,
        note: String::new(),
        created_at: stamp(),
        updated_at: stamp(),
    }
}

#[test]
fn month_view_covers_whole_calendar_month() {
    let state = ViewState::new(ViewMode::Month, d(2026, 2, 15));
    assert_eq!(state.visible_range(), (d(2026, 2, 1), d(2026, 2, 28)));
}

#[test]
fn week_view_is_monday_based() {
    // 2026-02-11 is a Wednesday.
    let state = ViewState::new(ViewMode::Week, d(2026, 2, 11));
    assert_eq!(state.visible_range(), (d(2026, 2, 9), d(2026, 2, 15)));
}

#[test]
fn day_view_is_a_single_date() {
    let state = ViewState::new(ViewMode::Day, d(2026, 2, 11));
    assert_eq!(state.visible_range(), (d(2026, 2, 11), d(2026, 2, 11)));
}

#[test]
fn month_stepping_crosses_year_boundaries() {
    let mut state = ViewState::new(ViewMode::Month, d(2026, 1, 20));
    state.step_back();
    assert_eq!(state.anchor, d(2025, 12, 1));
    state.step_forward();
    assert_eq!(state.anchor, d(2026, 1, 1));
    state.step_forward();
    assert_eq!(state.anchor, d(2026, 2, 1));
}

#[test]
fn week_and_day_stepping_move_by_fixed_amounts() {
    let mut week = ViewState::new(ViewMode::Week, d(2026, 2, 11));
    week.step_forward();
    assert_eq!(week.anchor, d(2026, 2, 18));

    let mut day = ViewState::new(ViewMode::Day, d(2026, 3, 1));
    day.step_back();
    assert_eq!(day.anchor, d(2026, 2, 28));
}

#[test]
fn filter_narrows_by_course_teacher_and_level() {
    let a = lesson(d(2026, 2, 2), (9, 0), "Morning English", "T01", "LV2");
    let b = lesson(d(2026, 2, 2), (19, 0), "Evening English", "T02", "LV3");

    let mut filter = LessonFilter::default();
    assert!(filter.matches(&a) && filter.matches(&b));

    filter.course_name = Some("Evening English".to_string());
    assert!(!filter.matches(&a));
    assert!(filter.matches(&b));

    filter.course_name = None;
    filter.teacher_id = Some("T01".to_string());
    assert!(filter.matches(&a));
    assert!(!filter.matches(&b));

    filter.teacher_id = None;
    filter.level = Some(3);
    assert!(!filter.matches(&a));
    assert!(filter.matches(&b));
}

#[test]
fn difficulty_extracts_first_digit_run() {
    assert_eq!(difficulty_from_level("LV3"), Some(3));
    assert_eq!(difficulty_from_level("level-12"), Some(12));
    assert_eq!(difficulty_from_level("beginner"), None);
    assert_eq!(difficulty_from_level(""), None);
}

#[test]
fn lessons_in_view_filters_and_sorts() {
    let outside = lesson(d(2026, 3, 2), (9, 0), "Morning English", "T01", "LV2");
    let late = lesson(d(2026, 2, 9), (19, 0), "Morning English", "T01", "LV2");
    let early = lesson(d(2026, 2, 9), (9, 0), "Morning English", "T01", "LV2");
    let other_teacher = lesson(d(2026, 2, 9), (10, 0), "Morning English", "T02", "LV2");
    let lessons = vec![outside.clone(), late.clone(), early.clone(), other_teacher];

    let mut state = ViewState::new(ViewMode::Month, d(2026, 2, 1));
    state.filter.teacher_id = Some("T01".to_string());

    let visible = state.lessons_in_view(&lessons);
    assert_eq!(visible.len(), 2);
    assert_eq!(visible[0], &early);
    assert_eq!(visible[1], &late);
}

#[test]
fn month_grid_is_monday_first_and_six_weeks() {
    // February 2026 starts on a Sunday and has 28 days.
    let grid = month_grid(2026, 2);
    assert_eq!(grid.len(), 6);
    assert_eq!(grid[0], [0, 0, 0, 0, 0, 0, 1]);
    assert_eq!(grid[1], [2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(grid[4], [23, 24, 25, 26, 27, 28, 0]);
    assert_eq!(grid[5], [0; 7]);
}

#[test]
fn month_grid_handles_month_ending_midweek() {
    // June 2026: starts Monday, 30 days, ends on a Tuesday.
    let grid = month_grid(2026, 6);
    assert_eq!(grid[0], [1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(grid[4], [29, 30, 0, 0, 0, 0, 0]);
}
