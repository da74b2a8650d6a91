use super::{CourseLineRow, LessonLogEntry, PersistenceResult, ScheduleStore, UnitRow};
use crate::lesson::Lesson;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed store. Rows are kept as JSON blobs so the schema tracks the
/// serde shape of the row types rather than duplicating it in DDL.
pub struct SqliteScheduleStore {
    conn: Mutex<Connection>,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS course_lines (
    row_json TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS curriculum_units (
    row_json TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS lessons (
    slot_id TEXT PRIMARY KEY,
    lesson_json TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS lesson_log (
    entry_json TEXT NOT NULL
);
";

impl SqliteScheduleStore {
    pub fn open<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// In-memory store, used by tests.
    pub fn in_memory() -> PersistenceResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> PersistenceResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn load_json_column<T: serde::de::DeserializeOwned>(
        &self,
        query: &str,
    ) -> PersistenceResult<Vec<T>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(query)?;
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let json: String = row.get(0)?;
            out.push(serde_json::from_str(&json)?);
        }
        Ok(out)
    }

    /// Seed the course line table wholesale, e.g. when importing a CSV export.
    pub fn replace_course_lines(&self, rows: &[CourseLineRow]) -> PersistenceResult<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM course_lines", [])?;
        for row in rows {
            tx.execute(
                "INSERT INTO course_lines (row_json) VALUES (?1)",
                [serde_json::to_string(row)?],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn load_lesson_log(&self) -> PersistenceResult<Vec<LessonLogEntry>> {
        self.load_json_column("SELECT entry_json FROM lesson_log ORDER BY rowid")
    }

    pub fn replace_curriculum(&self, rows: &[UnitRow]) -> PersistenceResult<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM curriculum_units", [])?;
        for row in rows {
            tx.execute(
                "INSERT INTO curriculum_units (row_json) VALUES (?1)",
                [serde_json::to_string(row)?],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

impl ScheduleStore for SqliteScheduleStore {
    fn load_course_lines(&self) -> PersistenceResult<Vec<CourseLineRow>> {
        self.load_json_column("SELECT row_json FROM course_lines ORDER BY rowid")
    }

    fn load_curriculum(&self) -> PersistenceResult<Vec<UnitRow>> {
        self.load_json_column("SELECT row_json FROM curriculum_units ORDER BY rowid")
    }

    fn load_schedule(&self) -> PersistenceResult<Vec<Lesson>> {
        self.load_json_column("SELECT lesson_json FROM lessons ORDER BY rowid")
    }

    fn replace_schedule(&self, lessons: &[Lesson]) -> PersistenceResult<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM lessons", [])?;
        for lesson in lessons {
            tx.execute(
                "INSERT INTO lessons (slot_id, lesson_json) VALUES (?1, ?2)",
                rusqlite::params![lesson.slot_id.to_string(), serde_json::to_string(lesson)?],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn append_schedule(&self, lessons: &[Lesson]) -> PersistenceResult<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        for lesson in lessons {
            // First occurrence of a slot id wins.
            tx.execute(
                "INSERT OR IGNORE INTO lessons (slot_id, lesson_json) VALUES (?1, ?2)",
                rusqlite::params![lesson.slot_id.to_string(), serde_json::to_string(lesson)?],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn append_course_line(&self, row: &CourseLineRow) -> PersistenceResult<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO course_lines (row_json) VALUES (?1)",
            [serde_json::to_string(row)?],
        )?;
        Ok(())
    }

    fn append_lesson_log(&self, entry: &LessonLogEntry) -> PersistenceResult<()> {
        let conn = self.lock();
        conn.execute(
            "INSERT INTO lesson_log (entry_json) VALUES (?1)",
            [serde_json::to_string(entry)?],
        )?;
        Ok(())
    }
}
