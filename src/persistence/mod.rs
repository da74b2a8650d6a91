use crate::lesson::Lesson;
use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum PersistenceError {
    Io(io::Error),
    Csv(csv::Error),
    Serialization(SerdeJsonError),
    #[cfg(feature = "sqlite")]
    Sqlite(rusqlite::Error),
    InvalidData(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistenceError::Io(err) => write!(f, "io error: {err}"),
            PersistenceError::Csv(err) => write!(f, "csv error: {err}"),
            PersistenceError::Serialization(err) => write!(f, "serialization error: {err}"),
            #[cfg(feature = "sqlite")]
            PersistenceError::Sqlite(err) => write!(f, "sqlite error: {err}"),
            PersistenceError::InvalidData(msg) => write!(f, "invalid data: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<io::Error> for PersistenceError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for PersistenceError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<SerdeJsonError> for PersistenceError {
    fn from(value: SerdeJsonError) -> Self {
        Self::Serialization(value)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// One flat course-line row exactly as the store holds it: one row per
/// weekly slot, strings unparsed. The typed one-to-many shape is
/// reconstructed by `CourseLine::from_rows`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseLineRow {
    pub course_line_id: String,
    pub course_name: String,
    pub curriculum_id: String,
    pub weekday: u8,
    pub time: String,
    pub classroom: String,
    pub teacher_id: String,
    pub start_date: String,
    pub start_sequence: u32,
    pub status: String,
    #[serde(default)]
    pub note: String,
}

/// One flat curriculum unit row; `CurriculumCatalog::from_rows` groups and
/// sorts these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRow {
    pub curriculum_id: String,
    pub curriculum_name: String,
    pub level_id: String,
    pub sequence: u32,
    pub unit_code: String,
    pub unit_label: String,
    pub book_full_name: String,
}

/// Append-only instructor feedback row for a taught lesson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LessonLogEntry {
    pub slot_id: String,
    pub teacher_id: String,
    pub date: String,
    pub unit_covered: String,
    #[serde(default)]
    pub note: String,
    pub created_at: String,
}

/// Storage boundary for the scheduler. The generator performs no I/O of its
/// own; store failures propagate through these methods untouched.
pub trait ScheduleStore {
    fn load_course_lines(&self) -> PersistenceResult<Vec<CourseLineRow>>;
    fn load_curriculum(&self) -> PersistenceResult<Vec<UnitRow>>;
    fn load_schedule(&self) -> PersistenceResult<Vec<Lesson>>;
    /// Clear the destination and write the full lesson set.
    fn replace_schedule(&self, lessons: &[Lesson]) -> PersistenceResult<()>;
    /// Append without touching existing rows, matching the destination's
    /// existing column order.
    fn append_schedule(&self, lessons: &[Lesson]) -> PersistenceResult<()>;
    fn append_course_line(&self, row: &CourseLineRow) -> PersistenceResult<()>;
    fn append_lesson_log(&self, entry: &LessonLogEntry) -> PersistenceResult<()>;
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::CsvScheduleStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteScheduleStore;
