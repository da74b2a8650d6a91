use crate::calendar;
use crate::persistence::CourseLineRow;
use chrono::{NaiveDate, NaiveTime, Weekday};
use std::fmt;

/// One weekly recurrence pattern belonging to a course line.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSlot {
    pub weekday: Weekday,
    pub time: NaiveTime,
    pub classroom: String,
    pub teacher_id: String,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseStatus {
    Active,
    Inactive,
}

impl CourseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CourseStatus::Active => "Active",
            CourseStatus::Inactive => "Inactive",
        }
    }

    /// Unknown strings are Inactive so they are never scheduled by accident.
    pub fn parse(value: &str) -> CourseStatus {
        if value.trim().eq_ignore_ascii_case("active") {
            CourseStatus::Active
        } else {
            CourseStatus::Inactive
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, CourseStatus::Active)
    }
}

/// A named recurring offering: one curriculum, one start sequence, one or
/// more weekly meeting slots.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseLine {
    pub id: String,
    pub name: String,
    pub curriculum_id: String,
    pub start_sequence: u32,
    pub status: CourseStatus,
    pub note: String,
    pub slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CourseLineError {
    EmptyGroup,
    MismatchedGroup {
        course_line_id: String,
        field: &'static str,
    },
    InvalidWeekday {
        course_line_id: String,
        value: u8,
    },
    InvalidTime {
        course_line_id: String,
        value: String,
    },
    InvalidDate {
        course_line_id: String,
        value: String,
    },
}

impl fmt::Display for CourseLineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseLineError::EmptyGroup => write!(f, "course line group has no rows"),
            CourseLineError::MismatchedGroup {
                course_line_id,
                field,
            } => write!(
                f,
                "rows for course line '{course_line_id}' disagree on {field}"
            ),
            CourseLineError::InvalidWeekday {
                course_line_id,
                value,
            } => write!(
                f,
                "course line '{course_line_id}' has weekday {value}, expected 1-7"
            ),
            CourseLineError::InvalidTime {
                course_line_id,
                value,
            } => write!(
                f,
                "course line '{course_line_id}' has invalid time '{value}'"
            ),
            CourseLineError::InvalidDate {
                course_line_id,
                value,
            } => write!(
                f,
                "course line '{course_line_id}' has invalid start date '{value}'"
            ),
        }
    }
}

impl std::error::Error for CourseLineError {}

impl CourseLine {
    /// Reconstruct the one-line-many-slots shape from flat storage rows.
    ///
    /// All rows in a group must agree on course name, curriculum id and start
    /// sequence; a mismatch is a construction error, not a silent
    /// first-row-wins. A start sequence of 0 normalizes to 1.
    pub fn from_rows(rows: &[CourseLineRow]) -> Result<CourseLine, CourseLineError> {
        let Some(base) = rows.first() else {
            return Err(CourseLineError::EmptyGroup);
        };
        let id = base.course_line_id.clone();

        let mut slots = Vec::with_capacity(rows.len());
        for row in rows {
            if row.course_line_id != base.course_line_id {
                return Err(CourseLineError::MismatchedGroup {
                    course_line_id: id,
                    field: "course_line_id",
                });
            }
            if row.course_name != base.course_name {
                return Err(CourseLineError::MismatchedGroup {
                    course_line_id: id,
                    field: "course_name",
                });
            }
            if row.curriculum_id != base.curriculum_id {
                return Err(CourseLineError::MismatchedGroup {
                    course_line_id: id,
                    field: "curriculum_id",
                });
            }
            if row.start_sequence != base.start_sequence {
                return Err(CourseLineError::MismatchedGroup {
                    course_line_id: id,
                    field: "start_sequence",
                });
            }

            let weekday = calendar::weekday_from_number(row.weekday).ok_or(
                CourseLineError::InvalidWeekday {
                    course_line_id: id.clone(),
                    value: row.weekday,
                },
            )?;
            let time = parse_slot_time(&row.time).ok_or_else(|| CourseLineError::InvalidTime {
                course_line_id: id.clone(),
                value: row.time.clone(),
            })?;
            let start_date = NaiveDate::parse_from_str(row.start_date.trim(), "%Y-%m-%d")
                .map_err(|_| CourseLineError::InvalidDate {
                    course_line_id: id.clone(),
                    value: row.start_date.clone(),
                })?;

            slots.push(TimeSlot {
                weekday,
                time,
                classroom: row.classroom.clone(),
                teacher_id: row.teacher_id.clone(),
                start_date,
            });
        }

        Ok(CourseLine {
            id,
            name: base.course_name.clone(),
            curriculum_id: base.curriculum_id.clone(),
            start_sequence: base.start_sequence.max(1),
            status: CourseStatus::parse(&base.status),
            note: base.note.clone(),
            slots,
        })
    }
}

/// Group flat rows by course line id, preserving first-seen order. Weekly
/// slots of one course line arrive as separate rows from the store; grouping
/// them is what lets the generator share curriculum progress across them.
pub fn group_rows(rows: &[CourseLineRow]) -> Vec<Vec<CourseLineRow>> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: Vec<Vec<CourseLineRow>> = Vec::new();
    for row in rows {
        match order.iter().position(|id| *id == row.course_line_id) {
            Some(idx) => groups[idx].push(row.clone()),
            None => {
                order.push(row.course_line_id.clone());
                groups.push(vec![row.clone()]);
            }
        }
    }
    groups
}

pub(crate) fn parse_slot_time(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
}
