use crate::lesson::Lesson;
use chrono::{Datelike, Duration, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Month,
    Week,
    Day,
}

/// Sidebar-style filters applied before a view range is cut.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LessonFilter {
    pub course_name: Option<String>,
    pub teacher_id: Option<String>,
    pub level: Option<u8>,
}

impl LessonFilter {
    pub fn matches(&self, lesson: &Lesson) -> bool {
        if let Some(name) = &self.course_name {
            if lesson.course_name != *name {
                return false;
            }
        }
        if let Some(teacher) = &self.teacher_id {
            if lesson.teacher_id != *teacher {
                return false;
            }
        }
        if let Some(level) = self.level {
            if difficulty_from_level(&lesson.level_id) != Some(level) {
                return false;
            }
        }
        true
    }
}

/// Difficulty level embedded in a level id, e.g. "LV3" -> 3.
pub fn difficulty_from_level(level_id: &str) -> Option<u8> {
    let digits: String = level_id
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Explicit, caller-owned view state: which mode is shown, which date anchors
/// it, and which filters apply. Passed into each render cycle instead of
/// living in ambient globals.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub mode: ViewMode,
    pub anchor: NaiveDate,
    pub filter: LessonFilter,
}

impl ViewState {
    pub fn new(mode: ViewMode, anchor: NaiveDate) -> Self {
        Self {
            mode,
            anchor,
            filter: LessonFilter::default(),
        }
    }

    pub fn step_back(&mut self) {
        self.anchor = match self.mode {
            ViewMode::Month => previous_month_start(self.anchor),
            ViewMode::Week => self.anchor - Duration::days(7),
            ViewMode::Day => self.anchor - Duration::days(1),
        };
    }

    pub fn step_forward(&mut self) {
        self.anchor = match self.mode {
            ViewMode::Month => next_month_start(self.anchor),
            ViewMode::Week => self.anchor + Duration::days(7),
            ViewMode::Day => self.anchor + Duration::days(1),
        };
    }

    /// Inclusive date range covered by the current view: the anchor's month,
    /// its Monday-based week, or the anchor day itself.
    pub fn visible_range(&self) -> (NaiveDate, NaiveDate) {
        match self.mode {
            ViewMode::Month => (month_start(self.anchor), month_end(self.anchor)),
            ViewMode::Week => {
                let monday = self.anchor
                    - Duration::days(i64::from(self.anchor.weekday().num_days_from_monday()));
                (monday, monday + Duration::days(6))
            }
            ViewMode::Day => (self.anchor, self.anchor),
        }
    }

    /// Lessons visible in the current view, filtered and sorted by
    /// (date, time).
    pub fn lessons_in_view<'a>(&self, lessons: &'a [Lesson]) -> Vec<&'a Lesson> {
        let (start, end) = self.visible_range();
        let mut picked: Vec<&Lesson> = lessons
            .iter()
            .filter(|lesson| {
                lesson.date >= start && lesson.date <= end && self.filter.matches(lesson)
            })
            .collect();
        picked.sort_by_key(|lesson| (lesson.date, lesson.time));
        picked
    }
}

/// Month as a Monday-first grid of day numbers, padded with zeros to six
/// weeks so every month renders with the same height.
pub fn month_grid(year: i32, month: u32) -> Vec<[u32; 7]> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    let lead = first.weekday().num_days_from_monday() as usize;
    let days_in_month = month_end(first).day();

    let mut grid = Vec::with_capacity(6);
    let mut week = [0u32; 7];
    let mut column = lead;
    for day in 1..=days_in_month {
        week[column] = day;
        column += 1;
        if column == 7 {
            grid.push(week);
            week = [0u32; 7];
            column = 0;
        }
    }
    if column > 0 {
        grid.push(week);
    }
    while grid.len() < 6 {
        grid.push([0u32; 7]);
    }
    grid
}

fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

fn month_end(date: NaiveDate) -> NaiveDate {
    next_month_start(date) - Duration::days(1)
}

fn previous_month_start(date: NaiveDate) -> NaiveDate {
    if date.month() == 1 {
        NaiveDate::from_ymd_opt(date.year() - 1, 12, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() - 1, 1).unwrap()
    }
}

fn next_month_start(date: NaiveDate) -> NaiveDate {
    if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1).unwrap()
    }
}
