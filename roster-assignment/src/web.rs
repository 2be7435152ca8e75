use std::collections::BTreeMap;

use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{validate_slot_minutes, Shift, DEFAULT_SLOT_MINUTES};
use crate::error::ConfigError;
use crate::parser::{read_roster, validate_panel, validate_requests, PanelRecord, RequestRecord};
use crate::schedule::{allocate_shift, Allocation, CategoryTable, MatchOutcome, WindowMatcher};

/// Settings shared by every request. Runs are stateless: nothing computed
/// by one call is kept for the next.
pub struct AppState {
    pub categories: CategoryTable,
    pub slot_minutes: u32,
}

#[derive(Deserialize)]
pub struct AllocateQuery {
    shift: Option<String>,
    slots: Option<u32>,
    slot_minutes: Option<u32>,
}

#[derive(Serialize)]
pub struct AllocateResponse {
    success: bool,
    shift: Shift,
    slot_minutes: u32,
    allocation: Allocation,
}

#[derive(Deserialize)]
pub struct MatchRequest {
    panel: Vec<PanelRecord>,
    requests: Vec<RequestRecord>,
    slot_minutes: Option<u32>,
    /// Extra or overriding request category -> flag mappings
    #[serde(default)]
    categories: BTreeMap<String, String>,
}

#[derive(Serialize)]
pub struct MatchResponse {
    success: bool,
    slot_minutes: u32,
    outcome: MatchOutcome,
}

#[derive(Serialize)]
pub struct ShiftInfo {
    shift: Shift,
    window: String,
    default_slots: u32,
}

fn bad_request(error: impl ToString) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "success": false,
        "error": error.to_string()
    }))
}

fn resolve_slot_minutes(requested: Option<u32>, state: &AppState) -> Result<u32, ConfigError> {
    validate_slot_minutes(requested.unwrap_or(state.slot_minutes))
}

// Proportional allocation: roster CSV in the body, shift and slot overrides in the query
async fn allocate(
    query: web::Query<AllocateQuery>,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let shift = match query.shift.as_deref().map(str::parse::<Shift>).transpose() {
        Ok(shift) => shift.unwrap_or(Shift::Day),
        Err(e) => return Ok(bad_request(e)),
    };
    let slot_minutes = match resolve_slot_minutes(query.slot_minutes, &state) {
        Ok(minutes) => minutes,
        Err(e) => return Ok(bad_request(e)),
    };

    let roster = match read_roster(body.as_ref()) {
        Ok(roster) => roster,
        Err(e) => return Ok(bad_request(format!("Failed to process CSV: {}", e))),
    };

    let total_slots = query.slots.unwrap_or_else(|| shift.default_slots(slot_minutes));
    let allocation = allocate_shift(&roster, shift, total_slots);
    info!(%shift, total_slots, shortfall = allocation.shortfall, "allocation served");

    Ok(HttpResponse::Ok().json(AllocateResponse {
        success: true,
        shift,
        slot_minutes,
        allocation,
    }))
}

// Window matching: panel and requests as JSON records
async fn match_panel(req: web::Json<MatchRequest>, state: web::Data<AppState>) -> Result<HttpResponse> {
    let req = req.into_inner();
    let slot_minutes = match resolve_slot_minutes(req.slot_minutes, &state) {
        Ok(minutes) => minutes,
        Err(e) => return Ok(bad_request(e)),
    };

    let panel = match validate_panel(req.panel) {
        Ok(panel) => panel,
        Err(e) => return Ok(bad_request(format!("Invalid panel: {}", e))),
    };
    let requests = match validate_requests(req.requests) {
        Ok(requests) => requests,
        Err(e) => return Ok(bad_request(format!("Invalid requests: {}", e))),
    };

    let mut categories = state.categories.clone();
    for (category, flag) in &req.categories {
        categories.insert(category, flag);
    }

    let outcome = WindowMatcher::new(&categories, slot_minutes).match_requests(&panel, &requests);
    info!(
        assigned = outcome.assigned.len(),
        unassigned = outcome.unassigned.len(),
        "match served"
    );

    Ok(HttpResponse::Ok().json(MatchResponse {
        success: true,
        slot_minutes,
        outcome,
    }))
}

// Shift windows and their default slot counts
async fn get_shifts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let shifts: Vec<ShiftInfo> = Shift::ALL
        .iter()
        .map(|&shift| ShiftInfo {
            shift,
            window: shift.window_label(),
            default_slots: shift.default_slots(state.slot_minutes),
        })
        .collect();
    Ok(HttpResponse::Ok().json(shifts))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/allocate", web::post().to(allocate))
        .route("/api/match", web::post().to(match_panel))
        .route("/api/shifts", web::get().to(get_shifts));
}

pub async fn start_server(port: u16, categories: CategoryTable) -> std::io::Result<()> {
    let app_state = web::Data::new(AppState {
        categories,
        slot_minutes: DEFAULT_SLOT_MINUTES,
    });

    info!(port, "starting web server");
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
