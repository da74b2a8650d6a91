pub mod calendar;
pub mod course;
pub mod curriculum;
pub mod generator;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod lesson;
pub mod persistence;
pub mod roster;
pub mod view;

pub use course::{CourseLine, CourseLineError, CourseStatus, TimeSlot};
pub use curriculum::{Curriculum, CurriculumCatalog, Unit};
pub use generator::{generate, generate_all};
pub use lesson::{Lesson, LessonStatus, dedup_by_slot_id};
pub use persistence::file::CsvScheduleStore;
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteScheduleStore;
pub use persistence::{
    CourseLineRow, LessonLogEntry, PersistenceError, PersistenceResult, ScheduleStore, UnitRow,
};
pub use view::{LessonFilter, ViewMode, ViewState};
