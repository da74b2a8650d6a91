use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, NaiveTime};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::calendar::weekday_from_number;
use crate::curriculum::CurriculumCatalog;
use crate::generator::generate_all;
use crate::lesson::Lesson;
use crate::persistence::CourseLineRow;
use crate::roster::{auto_assign_classroom, next_course_line_id};

/// In-memory planning state served over HTTP: the course line roster, the
/// curriculum catalog, and the most recently generated schedule.
pub struct Planner {
    course_lines: Vec<CourseLineRow>,
    catalog: CurriculumCatalog,
    lessons: Vec<Lesson>,
}

impl Planner {
    pub fn new(course_lines: Vec<CourseLineRow>, catalog: CurriculumCatalog) -> Self {
        Self {
            course_lines,
            catalog,
            lessons: Vec::new(),
        }
    }

    pub fn course_lines(&self) -> &[CourseLineRow] {
        &self.course_lines
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    /// Rebuild the schedule for every active course line over the horizon.
    pub fn regenerate(&mut self, weeks: u32) -> usize {
        self.lessons = generate_all(&self.course_lines, &self.catalog, weeks);
        self.lessons.len()
    }
}

#[derive(Clone)]
pub struct AppState {
    planner: Arc<RwLock<Planner>>,
}

impl AppState {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(RwLock::new(planner)),
        }
    }

    pub fn with_shared(planner: Arc<RwLock<Planner>>) -> Self {
        Self { planner }
    }

    fn planner(&self) -> Arc<RwLock<Planner>> {
        self.planner.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorBody {
                    error: "not_found",
                    message,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/course-lines", get(list_course_lines).post(create_course_line))
        .route("/lessons", get(list_lessons))
        .route("/regenerate", post(regenerate))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, planner: Planner) -> std::io::Result<()> {
    let state = AppState::new(planner);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_course_lines(State(state): State<AppState>) -> Json<Vec<CourseLineRow>> {
    let planner = state.planner();
    let rows = {
        let guard = planner.read();
        guard.course_lines().to_vec()
    };
    Json(rows)
}

#[derive(Debug, Deserialize)]
struct SlotPayload {
    weekday: u8,
    time: String,
}

#[derive(Debug, Deserialize)]
struct CreateCourseLinePayload {
    name: String,
    curriculum_id: String,
    teacher_id: String,
    start_date: NaiveDate,
    #[serde(default = "default_weeks")]
    weeks: u32,
    #[serde(default)]
    note: String,
    slots: Vec<SlotPayload>,
}

#[derive(Debug, Serialize)]
struct CreateCourseLineResponse {
    course_line_id: String,
    lessons: Vec<Lesson>,
}

fn default_weeks() -> u32 {
    4
}

async fn create_course_line(
    State(state): State<AppState>,
    Json(payload): Json<CreateCourseLinePayload>,
) -> Result<(StatusCode, Json<CreateCourseLineResponse>), ApiError> {
    if payload.slots.is_empty() {
        return Err(ApiError::invalid("at least one weekly slot is required"));
    }
    for slot in &payload.slots {
        if weekday_from_number(slot.weekday).is_none() {
            return Err(ApiError::invalid(format!(
                "weekday must be 1-7, got {}",
                slot.weekday
            )));
        }
        if NaiveTime::parse_from_str(slot.time.trim(), "%H:%M").is_err() {
            return Err(ApiError::invalid(format!(
                "time must be HH:MM, got '{}'",
                slot.time
            )));
        }
    }

    let planner = state.planner();
    let (course_line_id, lessons) = {
        let mut guard = planner.write();
        if guard.catalog.get(&payload.curriculum_id).is_none() {
            return Err(ApiError::invalid(format!(
                "unknown curriculum '{}'",
                payload.curriculum_id
            )));
        }
        let course_line_id = next_course_line_id(guard.course_lines());
        let mut new_rows = Vec::with_capacity(payload.slots.len());
        for slot in &payload.slots {
            let time = slot.time.trim().to_string();
            let classroom = auto_assign_classroom(guard.course_lines(), slot.weekday, &time);
            let row = CourseLineRow {
                course_line_id: course_line_id.clone(),
                course_name: payload.name.clone(),
                curriculum_id: payload.curriculum_id.clone(),
                weekday: slot.weekday,
                time,
                classroom,
                teacher_id: payload.teacher_id.clone(),
                start_date: payload.start_date.format("%Y-%m-%d").to_string(),
                start_sequence: 1,
                status: "Active".to_string(),
                note: payload.note.clone(),
            };
            guard.course_lines.push(row.clone());
            new_rows.push(row);
        }
        let generated = generate_all(&new_rows, &guard.catalog, payload.weeks);
        guard.lessons.extend(generated.iter().cloned());
        guard
            .lessons
            .sort_by_key(|lesson| (lesson.date, lesson.time));
        (course_line_id, generated)
    };
    Ok((
        StatusCode::CREATED,
        Json(CreateCourseLineResponse {
            course_line_id,
            lessons,
        }),
    ))
}

#[derive(Debug, Deserialize)]
struct LessonsQuery {
    date: Option<NaiveDate>,
}

async fn list_lessons(
    State(state): State<AppState>,
    Query(query): Query<LessonsQuery>,
) -> Result<Json<Vec<Lesson>>, ApiError> {
    let planner = state.planner();
    let lessons = {
        let guard = planner.read();
        match query.date {
            Some(date) => {
                let matching: Vec<Lesson> = guard
                    .lessons()
                    .iter()
                    .filter(|lesson| lesson.date == date)
                    .cloned()
                    .collect();
                if matching.is_empty() && guard.lessons().is_empty() {
                    return Err(ApiError::not_found(
                        "no schedule generated yet; POST /regenerate first".to_string(),
                    ));
                }
                matching
            }
            None => guard.lessons().to_vec(),
        }
    };
    Ok(Json(lessons))
}

#[derive(Debug, Deserialize)]
struct RegeneratePayload {
    #[serde(default = "default_weeks")]
    weeks: u32,
}

#[derive(Debug, Serialize)]
struct RegenerateSummary {
    weeks: u32,
    lesson_count: usize,
}

async fn regenerate(
    State(state): State<AppState>,
    Json(payload): Json<RegeneratePayload>,
) -> Result<Json<RegenerateSummary>, ApiError> {
    if payload.weeks == 0 {
        return Err(ApiError::invalid("weeks must be at least 1"));
    }
    let planner = state.planner();
    let lesson_count = {
        let mut guard = planner.write();
        guard.regenerate(payload.weeks)
    };
    Ok(Json(RegenerateSummary {
        weeks: payload.weeks,
        lesson_count,
    }))
}
