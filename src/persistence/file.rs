use super::{
    CourseLineRow, LessonLogEntry, PersistenceError, PersistenceResult, ScheduleStore, UnitRow,
};
use crate::lesson::{Lesson, LessonStatus};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const COURSE_LINES_FILE: &str = "course_lines.csv";
pub const CURRICULUM_FILE: &str = "curriculum.csv";
pub const SCHEDULE_FILE: &str = "schedule.csv";
pub const LESSON_LOG_FILE: &str = "lesson_log.csv";

/// Directory-of-CSV-files store, one file per worksheet of the original
/// spreadsheet layout.
pub struct CsvScheduleStore {
    dir: PathBuf,
}

impl CsvScheduleStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn load_rows<T: DeserializeOwned>(&self, name: &str) -> PersistenceResult<Vec<T>> {
        let mut reader = csv::Reader::from_path(self.path(name))?;
        let mut rows = Vec::new();
        for record in reader.deserialize::<T>() {
            rows.push(record?);
        }
        Ok(rows)
    }
}

impl ScheduleStore for CsvScheduleStore {
    fn load_course_lines(&self) -> PersistenceResult<Vec<CourseLineRow>> {
        self.load_rows(COURSE_LINES_FILE)
    }

    fn load_curriculum(&self) -> PersistenceResult<Vec<UnitRow>> {
        self.load_rows(CURRICULUM_FILE)
    }

    fn load_schedule(&self) -> PersistenceResult<Vec<Lesson>> {
        let path = self.path(SCHEDULE_FILE);
        if !path.exists() {
            // No schedule yet is a normal state, not a store failure.
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(path)?;
        let mut lessons = Vec::new();
        for record in reader.deserialize::<LessonCsvRecord>() {
            lessons.push(record?.into_lesson()?);
        }
        Ok(lessons)
    }

    fn replace_schedule(&self, lessons: &[Lesson]) -> PersistenceResult<()> {
        let file = File::create(self.path(SCHEDULE_FILE))?;
        let mut writer = csv::Writer::from_writer(file);
        for lesson in lessons {
            writer.serialize(LessonCsvRecord::from(lesson))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn append_schedule(&self, lessons: &[Lesson]) -> PersistenceResult<()> {
        if lessons.is_empty() {
            return Ok(());
        }
        let path = self.path(SCHEDULE_FILE);
        let Some(headers) = read_headers(&path)? else {
            return self.replace_schedule(lessons);
        };
        let file = OpenOptions::new().append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        for lesson in lessons {
            let record = LessonCsvRecord::from(lesson);
            writer.write_record(project_fields(&record, &headers)?)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn append_course_line(&self, row: &CourseLineRow) -> PersistenceResult<()> {
        append_row(&self.path(COURSE_LINES_FILE), row)
    }

    fn append_lesson_log(&self, entry: &LessonLogEntry) -> PersistenceResult<()> {
        append_row(&self.path(LESSON_LOG_FILE), entry)
    }
}

/// Existing header row of a CSV file, `None` when the file is absent or
/// headerless.
fn read_headers(path: &Path) -> PersistenceResult<Option<csv::StringRecord>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        Ok(None)
    } else {
        Ok(Some(headers))
    }
}

/// Project a serializable record onto an existing header order. Headers the
/// record does not know become empty cells, matching the spreadsheet
/// convention for appended rows.
fn project_fields<T: Serialize>(
    record: &T,
    headers: &csv::StringRecord,
) -> PersistenceResult<Vec<String>> {
    let value = serde_json::to_value(record)?;
    Ok(headers
        .iter()
        .map(|name| match value.get(name) {
            Some(serde_json::Value::String(text)) => text.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        })
        .collect())
}

/// Append one record, honoring the file's existing column order; a missing
/// file is created with headers.
fn append_row<T: Serialize>(path: &Path, record: &T) -> PersistenceResult<()> {
    match read_headers(path)? {
        Some(headers) => {
            let file = OpenOptions::new().append(true).open(path)?;
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);
            writer.write_record(project_fields(record, &headers)?)?;
            writer.flush()?;
        }
        None => {
            let file = File::create(path)?;
            let mut writer = csv::Writer::from_writer(file);
            writer.serialize(record)?;
            writer.flush()?;
        }
    }
    Ok(())
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LessonCsvRecord {
    slot_id: String,
    course_line_id: String,
    course_name: String,
    curriculum_id: String,
    curriculum_name: String,
    level_id: String,
    date: String,
    weekday: String,
    time: String,
    classroom: String,
    teacher_id: String,
    unit_code: String,
    unit_label: String,
    book_full_name: String,
    status: String,
    #[serde(default)]
    note: String,
    created_at: String,
    updated_at: String,
}

impl From<&Lesson> for LessonCsvRecord {
    fn from(lesson: &Lesson) -> Self {
        Self {
            slot_id: lesson.slot_id.to_string(),
            course_line_id: lesson.course_line_id.clone(),
            course_name: lesson.course_name.clone(),
            curriculum_id: lesson.curriculum_id.clone(),
            curriculum_name: lesson.curriculum_name.clone(),
            level_id: lesson.level_id.clone(),
            date: format_date(lesson.date),
            weekday: lesson.weekday.clone(),
            time: format_time(lesson.time),
            classroom: lesson.classroom.clone(),
            teacher_id: lesson.teacher_id.clone(),
            unit_code: lesson.unit_code.clone(),
            unit_label: lesson.unit_label.clone(),
            book_full_name: lesson.book_full_name.clone(),
            status: lesson.status.as_str().to_string(),
            note: lesson.note.clone(),
            created_at: format_datetime(lesson.created_at),
            updated_at: format_datetime(lesson.updated_at),
        }
    }
}

impl LessonCsvRecord {
    fn into_lesson(self) -> PersistenceResult<Lesson> {
        let slot_id = Uuid::parse_str(self.slot_id.trim()).map_err(|e| {
            PersistenceError::InvalidData(format!("invalid slot id '{}': {e}", self.slot_id))
        })?;
        let status = LessonStatus::parse(&self.status).ok_or_else(|| {
            PersistenceError::InvalidData(format!("invalid lesson status '{}'", self.status))
        })?;
        Ok(Lesson {
            slot_id,
            course_line_id: self.course_line_id,
            course_name: self.course_name,
            curriculum_id: self.curriculum_id,
            curriculum_name: self.curriculum_name,
            level_id: self.level_id,
            date: parse_date(&self.date)?,
            weekday: self.weekday,
            time: parse_time(&self.time)?,
            classroom: self.classroom,
            teacher_id: self.teacher_id,
            unit_code: self.unit_code,
            unit_label: self.unit_label,
            book_full_name: self.book_full_name,
            status,
            note: self.note,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(input: &str) -> PersistenceResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| PersistenceError::InvalidData(format!("invalid date '{input}': {e}")))
}

fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

fn parse_time(input: &str) -> PersistenceResult<NaiveTime> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|e| PersistenceError::InvalidData(format!("invalid time '{input}': {e}")))
}

fn format_datetime(datetime: NaiveDateTime) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn parse_datetime(input: &str) -> PersistenceResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input.trim(), "%Y-%m-%d %H:%M:%S")
        .map_err(|e| PersistenceError::InvalidData(format!("invalid timestamp '{input}': {e}")))
}
