use crate::calendar;
use crate::course::{self, CourseLine, CourseStatus, TimeSlot};
use crate::curriculum::CurriculumCatalog;
use crate::lesson::{Lesson, LessonStatus};
use crate::persistence::CourseLineRow;
use chrono::{Datelike, NaiveDate, Utc};
use rayon::prelude::*;
use tracing::{info, warn};
use uuid::Uuid;

struct PooledSlot<'a> {
    date: NaiveDate,
    slot: &'a TimeSlot,
}

/// Generate the dated lesson sequence for one course line.
///
/// All of the line's weekly slots are expanded into one pool of dates, the
/// pool is sorted by (date, time), and curriculum units are assigned to the
/// sorted pool in a single pass. The ordering step is what makes multiple
/// weekly meetings share one progression instead of cycling independently.
///
/// Degenerate inputs (no slots, unknown curriculum, empty curriculum) yield
/// an empty vec rather than an error; a bad course line must not abort a
/// batch of siblings.
pub fn generate(line: &CourseLine, catalog: &CurriculumCatalog, weeks: u32) -> Vec<Lesson> {
    if line.slots.is_empty() {
        return Vec::new();
    }
    let Some(curriculum) = catalog.get(&line.curriculum_id) else {
        warn!(
            course_line = %line.id,
            curriculum = %line.curriculum_id,
            "unknown curriculum, skipping course line"
        );
        return Vec::new();
    };
    if curriculum.is_empty() {
        warn!(
            course_line = %line.id,
            curriculum = %line.curriculum_id,
            "curriculum has no units, skipping course line"
        );
        return Vec::new();
    }

    let mut pool = Vec::with_capacity(line.slots.len() * weeks as usize);
    for slot in &line.slots {
        let first = calendar::first_on_or_after(slot.start_date, slot.weekday);
        for date in calendar::weekly_occurrences(first, weeks) {
            pool.push(PooledSlot { date, slot });
        }
    }
    // Order first, then fill: the shared-progress invariant.
    pool.sort_by_key(|entry| (entry.date, entry.slot.time));

    let stamp = Utc::now().naive_utc();
    let mut cursor = line.start_sequence.saturating_sub(1) as usize;
    let mut lessons = Vec::with_capacity(pool.len());
    for entry in pool {
        let Some(unit) = curriculum.unit_at(cursor) else {
            break;
        };
        lessons.push(Lesson {
            slot_id: Uuid::new_v4(),
            course_line_id: line.id.clone(),
            course_name: line.name.clone(),
            curriculum_id: curriculum.id.clone(),
            curriculum_name: curriculum.name.clone(),
            level_id: curriculum.level_id.clone(),
            date: entry.date,
            weekday: calendar::weekday_label(entry.date.weekday()).to_string(),
            time: entry.slot.time,
            classroom: entry.slot.classroom.clone(),
            teacher_id: entry.slot.teacher_id.clone(),
            unit_code: unit.code.clone(),
            unit_label: unit.label.clone(),
            book_full_name: unit.full_name.clone(),
            status: LessonStatus::Normal,
            note: String::new(),
            created_at: stamp,
            updated_at: stamp,
        });
        cursor += 1;
    }
    lessons
}

/// Generate lessons for every active course line in a flat row set.
///
/// Rows are grouped by course line id before generation so that the slots of
/// one line are scheduled together; generating per row would silently revert
/// to independent per-weekday progressions. Groups are independent snapshots,
/// so they run on the rayon pool. A group that fails reconstruction is logged
/// and skipped without aborting its siblings. The final sort is presentation
/// order only and does not affect per-line curriculum assignment.
pub fn generate_all(
    rows: &[CourseLineRow],
    catalog: &CurriculumCatalog,
    weeks: u32,
) -> Vec<Lesson> {
    let active: Vec<CourseLineRow> = rows
        .iter()
        .filter(|row| CourseStatus::parse(&row.status).is_active())
        .cloned()
        .collect();
    let groups = course::group_rows(&active);

    let per_group: Vec<Vec<Lesson>> = groups
        .par_iter()
        .map(|group| match CourseLine::from_rows(group) {
            Ok(line) => generate(&line, catalog, weeks),
            Err(err) => {
                warn!(error = %err, "skipping malformed course line group");
                Vec::new()
            }
        })
        .collect();

    let mut lessons: Vec<Lesson> = per_group.into_iter().flatten().collect();
    lessons.sort_by_key(|lesson| (lesson.date, lesson.time));
    info!(
        groups = groups.len(),
        lessons = lessons.len(),
        weeks,
        "generated master schedule"
    );
    lessons
}
