use chrono::{NaiveDate, Utc};
use courseline_tool::persistence::LessonLogEntry;
use courseline_tool::roster::{auto_assign_classroom, next_course_line_id};
use courseline_tool::{
    CourseLineRow, CsvScheduleStore, CurriculumCatalog, Lesson, ScheduleStore, ViewMode,
    ViewState, generate_all,
};
use std::io::{self, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct CliState {
    store: Option<CsvScheduleStore>,
    rows: Vec<CourseLineRow>,
    catalog: CurriculumCatalog,
    lessons: Vec<Lesson>,
}

impl CliState {
    fn new() -> Self {
        Self {
            store: None,
            rows: Vec::new(),
            catalog: CurriculumCatalog::new(),
            lessons: Vec::new(),
        }
    }
}

fn render_lessons_table(lessons: &[Lesson]) -> String {
    let headers = [
        "date", "wd", "time", "course", "unit", "label", "room", "teacher", "status",
    ];
    let rows: Vec<[String; 9]> = lessons
        .iter()
        .map(|lesson| {
            [
                lesson.date.format("%Y-%m-%d").to_string(),
                lesson.weekday.clone(),
                lesson.time.format("%H:%M").to_string(),
                lesson.course_name.clone(),
                lesson.unit_code.clone(),
                lesson.unit_label.clone(),
                lesson.classroom.clone(),
                lesson.teacher_id.clone(),
                lesson.status.as_str().to_string(),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');

    out.push('|');
    for (i, name) in headers.iter().enumerate() {
        out.push(' ');
        out.push_str(name);
        let pad = widths[i] - name.len();
        if pad > 0 {
            out.push_str(&" ".repeat(pad));
        }
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');

    for row in &rows {
        out.push('|');
        for (ci, cell) in row.iter().enumerate() {
            out.push(' ');
            out.push_str(cell);
            let pad = widths[ci].saturating_sub(cell.len());
            if pad > 0 {
                out.push_str(&" ".repeat(pad));
            }
            out.push(' ');
            out.push('|');
        }
        out.push('\n');
    }

    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  load <dir>                         Load course lines, curriculum and schedule from a CSV directory\n  show                               Show the loaded schedule\n  day <YYYY-MM-DD>                   Show lessons on one date\n  week <YYYY-MM-DD>                  Show lessons in the Monday week containing the date\n  month <YYYY-MM-DD>                 Show lessons in the date's calendar month\n  sync <weeks>                       Regenerate the schedule for all active course lines and save it\n  add <name> <curriculum_id> <teacher_id> <YYYY-MM-DD> <slots>\n                                     Add a course line (slots like 1@19:00,3@19:00)\n  log <slot_id> <unit> [note...]     Record a taught lesson in the lesson log\n  quit|exit                          Exit"
    );
}

fn parse_slot_spec(spec: &str) -> Option<(u8, String)> {
    let (weekday_s, time_s) = spec.split_once('@')?;
    let weekday: u8 = weekday_s.trim().parse().ok()?;
    if !(1..=7).contains(&weekday) {
        return None;
    }
    let time = time_s.trim();
    chrono::NaiveTime::parse_from_str(time, "%H:%M").ok()?;
    Some((weekday, time.to_string()))
}

fn show_view(state: &CliState, mode: ViewMode, anchor: NaiveDate) {
    let view = ViewState::new(mode, anchor);
    let visible: Vec<Lesson> = view
        .lessons_in_view(&state.lessons)
        .into_iter()
        .cloned()
        .collect();
    let (from, to) = view.visible_range();
    if visible.is_empty() {
        println!("No lessons between {from} and {to}.");
    } else {
        println!("{}", render_lessons_table(&visible));
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "courseline_tool=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut state = CliState::new();

    println!("Courseline Tool (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => {
                print_help();
            }
            "quit" | "exit" => break,
            "load" => {
                let dir = match parts.next() {
                    Some(dir) => dir,
                    None => {
                        println!("Usage: load <dir>");
                        continue;
                    }
                };
                let store = CsvScheduleStore::new(dir);
                let rows = match store.load_course_lines() {
                    Ok(rows) => rows,
                    Err(e) => {
                        println!("Error loading course lines: {}", e);
                        continue;
                    }
                };
                let units = match store.load_curriculum() {
                    Ok(units) => units,
                    Err(e) => {
                        println!("Error loading curriculum: {}", e);
                        continue;
                    }
                };
                let lessons = match store.load_schedule() {
                    Ok(lessons) => lessons,
                    Err(e) => {
                        println!("Error loading schedule: {}", e);
                        continue;
                    }
                };
                state.catalog = CurriculumCatalog::from_rows(&units);
                state.rows = rows;
                state.lessons = lessons;
                state.store = Some(store);
                println!(
                    "Loaded {} course line rows, {} curricula, {} lessons.",
                    state.rows.len(),
                    state.catalog.len(),
                    state.lessons.len()
                );
            }
            "show" => {
                if state.lessons.is_empty() {
                    println!("No schedule loaded. Use 'load <dir>' then 'sync <weeks>'.");
                } else {
                    println!("{}", render_lessons_table(&state.lessons));
                }
            }
            "day" | "week" | "month" => {
                match parts.next().map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d")) {
                    Some(Ok(date)) => {
                        let mode = match cmd {
                            "day" => ViewMode::Day,
                            "week" => ViewMode::Week,
                            _ => ViewMode::Month,
                        };
                        show_view(&state, mode, date);
                    }
                    Some(Err(_)) => println!("Invalid date (YYYY-MM-DD)"),
                    None => println!("Usage: {} <YYYY-MM-DD>", cmd),
                }
            }
            "sync" => {
                let weeks: u32 = match parts.next().map(str::parse) {
                    Some(Ok(weeks)) if weeks > 0 => weeks,
                    _ => {
                        println!("Usage: sync <weeks>   (weeks >= 1)");
                        continue;
                    }
                };
                let store = match &state.store {
                    Some(store) => store,
                    None => {
                        println!("No store loaded. Use 'load <dir>' first.");
                        continue;
                    }
                };
                state.lessons = generate_all(&state.rows, &state.catalog, weeks);
                match store.replace_schedule(&state.lessons) {
                    Ok(()) => println!(
                        "Generated and saved {} lessons over {} weeks.",
                        state.lessons.len(),
                        weeks
                    ),
                    Err(e) => println!("Error saving schedule: {}", e),
                }
            }
            "add" => {
                let name = parts.next();
                let curriculum_id = parts.next();
                let teacher_id = parts.next();
                let start_date = parts.next();
                let slots_spec = parts.next();
                let (name, curriculum_id, teacher_id, start_date, slots_spec) =
                    match (name, curriculum_id, teacher_id, start_date, slots_spec) {
                        (Some(a), Some(b), Some(c), Some(d), Some(e)) => (a, b, c, d, e),
                        _ => {
                            println!(
                                "Usage: add <name> <curriculum_id> <teacher_id> <YYYY-MM-DD> <slots>"
                            );
                            continue;
                        }
                    };
                if NaiveDate::parse_from_str(start_date, "%Y-%m-%d").is_err() {
                    println!("Invalid start date (YYYY-MM-DD)");
                    continue;
                }
                let slots: Option<Vec<(u8, String)>> =
                    slots_spec.split(',').map(parse_slot_spec).collect();
                let slots = match slots {
                    Some(slots) if !slots.is_empty() => slots,
                    _ => {
                        println!("Invalid slots (e.g. 1@19:00,3@19:00)");
                        continue;
                    }
                };
                let store = match &state.store {
                    Some(store) => store,
                    None => {
                        println!("No store loaded. Use 'load <dir>' first.");
                        continue;
                    }
                };
                let course_line_id = next_course_line_id(&state.rows);
                let mut failed = false;
                for (weekday, time) in &slots {
                    let classroom = auto_assign_classroom(&state.rows, *weekday, time);
                    let row = CourseLineRow {
                        course_line_id: course_line_id.clone(),
                        course_name: name.to_string(),
                        curriculum_id: curriculum_id.to_string(),
                        weekday: *weekday,
                        time: time.clone(),
                        classroom,
                        teacher_id: teacher_id.to_string(),
                        start_date: start_date.to_string(),
                        start_sequence: 1,
                        status: "Active".to_string(),
                        note: String::new(),
                    };
                    if let Err(e) = store.append_course_line(&row) {
                        println!("Error appending course line: {}", e);
                        failed = true;
                        break;
                    }
                    state.rows.push(row);
                }
                if !failed {
                    println!(
                        "Added course line {} with {} weekly slot(s). Run 'sync <weeks>' to schedule it.",
                        course_line_id,
                        slots.len()
                    );
                }
            }
            "log" => {
                let slot_id = parts.next();
                let unit = parts.next();
                let (slot_id, unit) = match (slot_id, unit) {
                    (Some(slot_id), Some(unit)) => (slot_id, unit),
                    _ => {
                        println!("Usage: log <slot_id> <unit> [note...]");
                        continue;
                    }
                };
                let note = parts.collect::<Vec<_>>().join(" ");
                let store = match &state.store {
                    Some(store) => store,
                    None => {
                        println!("No store loaded. Use 'load <dir>' first.");
                        continue;
                    }
                };
                let lesson = state
                    .lessons
                    .iter()
                    .find(|lesson| lesson.slot_id.to_string() == slot_id);
                let lesson = match lesson {
                    Some(lesson) => lesson,
                    None => {
                        println!("Lesson {} not found in the loaded schedule.", slot_id);
                        continue;
                    }
                };
                let entry = LessonLogEntry {
                    slot_id: slot_id.to_string(),
                    teacher_id: lesson.teacher_id.clone(),
                    date: lesson.date.format("%Y-%m-%d").to_string(),
                    unit_covered: unit.to_string(),
                    note,
                    created_at: Utc::now()
                        .naive_utc()
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string(),
                };
                match store.append_lesson_log(&entry) {
                    Ok(()) => println!("Logged {} for lesson {}.", unit, slot_id),
                    Err(e) => println!("Error appending lesson log: {}", e),
                }
            }
            other => {
                println!("Unknown command '{}'. Type 'help' for commands.", other);
            }
        }
    }
}
