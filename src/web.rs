use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AppConfig;
use crate::export::roster_to_csv;
use crate::roster::grid::{day_from_json, parse_day};
use crate::roster::{
    Capacity, Employee, GridState, Preference, PreferenceShift, PreferredShift, RosterStore,
    ScheduleGrid, ShiftType,
};
use crate::storage::{RosterFile, RosterRecord, RosterWriter};

/// The single roster owner shared by all request handlers
pub struct AppState {
    pub roster: Mutex<RosterStore>,
    writer: Arc<RosterWriter>,
    revision: AtomicU64,
}

impl AppState {
    pub fn new(roster: RosterStore, storage: RosterFile) -> Self {
        Self {
            roster: Mutex::new(roster),
            writer: Arc::new(RosterWriter::new(storage)),
            revision: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, RosterStore>> {
        self.roster
            .lock()
            .map_err(|_| actix_web::error::ErrorInternalServerError("roster lock poisoned"))
    }

    /// Applies a mutation, then persists a snapshot of the roster off the
    /// worker thread. Rejected mutations change nothing and are not saved.
    async fn mutate<F>(&self, apply: F) -> Result<HttpResponse>
    where
        F: FnOnce(&mut RosterStore) -> bool,
    {
        let (applied, grid_state, snapshot) = {
            let mut roster = self.lock()?;
            let applied = apply(&mut *roster);
            let snapshot = applied.then(|| {
                let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
                (revision, RosterRecord::from_store(&roster))
            });
            (applied, roster.state(), snapshot)
        };

        if let Some((revision, record)) = snapshot {
            let writer = Arc::clone(&self.writer);
            let saved = web::block(move || writer.save(revision, &record)).await?;
            if let Err(e) = saved {
                tracing::error!(error = %e, path = %self.writer.path().display(), "Failed to save roster");
                return Ok(HttpResponse::InternalServerError()
                    .json(serde_json::json!({"error": format!("Failed to save roster: {}", e)})));
            }
        }

        Ok(HttpResponse::Ok().json(MutationResponse {
            applied,
            state: grid_state,
        }))
    }
}

#[derive(Serialize)]
pub struct MutationResponse {
    applied: bool,
    state: GridState,
}

#[derive(Serialize)]
pub struct RosterSnapshot {
    #[serde(flatten)]
    record: RosterRecord,
    state: GridState,
}

// Request fields stay raw JSON and are coerced in the handlers

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmployeeRequest {
    name: Option<Value>,
    scout_data: Option<Value>,
    preferred_shift: Option<Value>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct PreferenceRequest {
    employee: Option<Value>,
    day: Option<Value>,
    shift: Option<Value>,
}

#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CapacityRequest {
    max_day_shifts: Option<Value>,
    max_night_shifts: Option<Value>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct SlotRequest {
    employee: Option<Value>,
}

/// Text of a string or number field; anything else reads as absent
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Absent or null means `any`; an unknown value is rejected
fn preferred_shift(value: Option<&Value>) -> Option<PreferredShift> {
    match value {
        None | Some(Value::Null) => Some(PreferredShift::default()),
        Some(Value::String(s)) => PreferredShift::parse(s),
        Some(_) => None,
    }
}

fn rejected(state: Option<GridState>) -> HttpResponse {
    match state {
        Some(state) => HttpResponse::Ok().json(MutationResponse {
            applied: false,
            state,
        }),
        None => HttpResponse::Ok().json(serde_json::json!({"applied": false})),
    }
}

/// Answers an unreadable JSON body the same way as any other rejected input
fn reject_payload(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, path = req.path(), "Ignoring unreadable request body");
    let state = req
        .app_data::<web::Data<AppState>>()
        .and_then(|app| app.roster.lock().ok().map(|roster| roster.state()));
    InternalError::from_response(err, rejected(state)).into()
}

// Roster snapshot endpoint
async fn get_roster(state: web::Data<AppState>) -> Result<HttpResponse> {
    let roster = state.lock()?;
    Ok(HttpResponse::Ok().json(RosterSnapshot {
        record: RosterRecord::from_store(&roster),
        state: roster.state(),
    }))
}

async fn list_employees(state: web::Data<AppState>) -> Result<HttpResponse> {
    let roster = state.lock()?;
    let employees: &[Employee] = roster.employees();
    Ok(HttpResponse::Ok().json(employees))
}

async fn upsert_employee(
    req: web::Json<EmployeeRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let name = text(req.name.as_ref()).unwrap_or_default();
    let scout_data = text(req.scout_data.as_ref()).unwrap_or_default();
    let preferred = preferred_shift(req.preferred_shift.as_ref());
    state
        .mutate(|roster| match preferred {
            Some(preferred) => roster.upsert_employee(&name, &scout_data, preferred),
            None => false,
        })
        .await
}

async fn remove_employee(
    name: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    state
        .mutate(|roster| {
            roster.remove_employee(&name);
            true
        })
        .await
}

async fn list_preferences(state: web::Data<AppState>) -> Result<HttpResponse> {
    let roster = state.lock()?;
    let preferences: &[Preference] = roster.preferences();
    Ok(HttpResponse::Ok().json(preferences))
}

async fn upsert_preference(
    req: web::Json<PreferenceRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let employee = text(req.employee.as_ref()).unwrap_or_default();
    let day = day_from_json(req.day.as_ref());
    let shift = req
        .shift
        .as_ref()
        .and_then(Value::as_str)
        .and_then(PreferenceShift::parse);
    state
        .mutate(|roster| match (day, shift) {
            (Some(day), Some(shift)) => roster.upsert_preference(&employee, day, shift),
            _ => {
                tracing::debug!(employee = %employee, "Ignoring preference with unreadable day or shift");
                false
            }
        })
        .await
}

async fn remove_preference(
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (employee, day) = path.into_inner();
    let day = parse_day(&day);
    state
        .mutate(|roster| match day {
            Some(day) => {
                roster.remove_preference(&employee, day);
                true
            }
            None => false,
        })
        .await
}

async fn get_capacity(state: web::Data<AppState>) -> Result<HttpResponse> {
    let capacity: Capacity = state.lock()?.capacity();
    Ok(HttpResponse::Ok().json(capacity))
}

async fn set_capacity(
    req: web::Json<CapacityRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let max_day = Capacity::limit_from_json(req.max_day_shifts.as_ref());
    let max_night = Capacity::limit_from_json(req.max_night_shifts.as_ref());
    state
        .mutate(|roster| {
            roster.set_capacity(Some(max_day), Some(max_night));
            true
        })
        .await
}

async fn get_schedule(state: web::Data<AppState>) -> Result<HttpResponse> {
    let roster = state.lock()?;
    let grid: &ScheduleGrid = roster.grid();
    Ok(HttpResponse::Ok().json(grid))
}

async fn generate(state: web::Data<AppState>) -> Result<HttpResponse> {
    state
        .mutate(|roster| {
            roster.generate_schedule();
            true
        })
        .await
}

async fn set_slot(
    path: web::Path<(String, String, String)>,
    req: web::Json<SlotRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let (day, shift, index) = path.into_inner();
    let day = parse_day(&day);
    let shift = ShiftType::parse(&shift);
    let index = index.trim().parse::<usize>().ok();
    // A blank name clears the slot
    let employee = text(req.employee.as_ref())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());
    state
        .mutate(|roster| match (day, shift, index) {
            (Some(day), Some(shift), Some(index)) => roster.set_slot(day, shift, index, employee),
            _ => false,
        })
        .await
}

async fn list_scouts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let roster = state.lock()?;
    Ok(HttpResponse::Ok().json(roster.scouts()))
}

async fn export_schedule(state: web::Data<AppState>) -> Result<HttpResponse> {
    let roster = state.lock()?;
    match roster_to_csv(roster.grid()) {
        Ok(csv) => Ok(HttpResponse::Ok().content_type("text/csv").body(csv)),
        Err(e) => Ok(HttpResponse::InternalServerError()
            .json(serde_json::json!({"error": format!("Failed to export roster: {}", e)}))),
    }
}

/// Registers every roster route. Employee names may contain `/`.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(reject_payload))
        .route("/api/roster", web::get().to(get_roster))
        .route("/api/employees", web::get().to(list_employees))
        .route("/api/employees", web::post().to(upsert_employee))
        .route("/api/employees/{name:.*}", web::delete().to(remove_employee))
        .route("/api/preferences", web::get().to(list_preferences))
        .route("/api/preferences", web::post().to(upsert_preference))
        .route("/api/preferences/{employee:.*}/{day}", web::delete().to(remove_preference))
        .route("/api/capacity", web::get().to(get_capacity))
        .route("/api/capacity", web::put().to(set_capacity))
        .route("/api/schedule", web::get().to(get_schedule))
        .route("/api/schedule/generate", web::post().to(generate))
        .route("/api/schedule/export", web::get().to(export_schedule))
        .route("/api/schedule/{day}/{shift}/{index}", web::put().to(set_slot))
        .route("/api/scouts", web::get().to(list_scouts));
}

pub async fn start_server(config: &AppConfig, roster: RosterStore) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState::new(roster, RosterFile::new(&config.state_file)));

    tracing::info!(addr = %config.server_addr(), state_file = %config.state_file.display(), "Starting web server");
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
