use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    #[default]
    Normal,
    Cancelled,
}

impl LessonStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LessonStatus::Normal => "normal",
            LessonStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<LessonStatus> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(LessonStatus::Normal),
            "cancelled" => Some(LessonStatus::Cancelled),
            _ => None,
        }
    }
}

/// One generated, dated meeting. Immutable once created: the generator never
/// edits lessons after emitting them; cancellations and reschedules are an
/// external collaborator's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub slot_id: Uuid,
    pub course_line_id: String,
    pub course_name: String,
    pub curriculum_id: String,
    pub curriculum_name: String,
    pub level_id: String,
    pub date: NaiveDate,
    pub weekday: String,
    pub time: NaiveTime,
    pub classroom: String,
    pub teacher_id: String,
    pub unit_code: String,
    pub unit_label: String,
    pub book_full_name: String,
    pub status: LessonStatus,
    pub note: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Drop lessons whose slot id was already seen; first occurrence wins. Used
/// by readers that merge replace- and append-mode writes.
pub fn dedup_by_slot_id(lessons: Vec<Lesson>) -> Vec<Lesson> {
    let mut seen = HashSet::new();
    lessons
        .into_iter()
        .filter(|lesson| seen.insert(lesson.slot_id))
        .collect()
}
