use crate::persistence::CourseLineRow;

/// Next course line id in the "C001" series: max existing numeric suffix
/// plus one, "C001" when nothing parses.
pub fn next_course_line_id(existing: &[CourseLineRow]) -> String {
    let max = existing
        .iter()
        .filter_map(|row| row.course_line_id.strip_prefix('C'))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max();
    format!("C{:03}", max.map_or(1, |value| value + 1))
}

/// Classroom letter for a new slot: count the rows already meeting at the
/// same weekday and time and take the next letter. A heuristic with no
/// collision avoidance against historical data; never consulted by the
/// generator itself.
pub fn auto_assign_classroom(existing: &[CourseLineRow], weekday: u8, time: &str) -> String {
    let count = existing
        .iter()
        .filter(|row| row.weekday == weekday && row.time == time)
        .count();
    let letter = (b'A' + (count % 26) as u8) as char;
    letter.to_string()
}
