//! WASM bindings for tutor-grid.
//!
//! Exposes day layout, slot availability, conflict detection and client-time
//! projection to the browser via `wasm-bindgen`. All complex values cross the
//! boundary as JSON strings: lessons use the camelCase lesson contract,
//! preferences use the same keys as the TOML file.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p tutor-grid-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/pkg/ \
//!   target/wasm32-unknown-unknown/release/tutor_grid_wasm.wasm
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tutor_grid::availability::{is_slot_occupied, slot_occupancy};
use tutor_grid::layout::layout_day;
use tutor_grid::model::{parse_lessons_json, Lesson};
use tutor_grid::{CalendarPreferences, TimeSlot, ZoomTable};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly inputs crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// Slot as sent from JavaScript: `{"day": "2024-06-15", "hour": 9, "minute": 45}`.
#[derive(Deserialize)]
struct SlotInput {
    day: NaiveDate,
    hour: u32,
    minute: u32,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_lessons(json: &str) -> Result<Vec<Lesson>, JsValue> {
    parse_lessons_json(json).map_err(js_err)
}

/// Parse preferences JSON; an empty string means defaults.
fn parse_preferences(json: &str) -> Result<CalendarPreferences, JsValue> {
    if json.trim().is_empty() {
        return Ok(CalendarPreferences::default());
    }
    let prefs: CalendarPreferences = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid preferences JSON: {}", e)))?;
    prefs.validate(&ZoomTable::default()).map_err(js_err)?;
    Ok(prefs)
}

fn parse_slot(json: &str) -> Result<TimeSlot, JsValue> {
    let input: SlotInput = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid slot JSON: {}", e)))?;
    TimeSlot::new(input.day, input.hour, input.minute).map_err(js_err)
}

fn parse_instant(s: &str) -> Result<DateTime<Utc>, JsValue> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Lay out one day's lessons.
///
/// `lessons_json` is a JSON array of lessons already filtered to the day;
/// `preferences_json` is a preferences object (or an empty string for
/// defaults). Returns a JSON array of `{lesson_id, top, height, column,
/// columns, visibility}` in input order.
#[wasm_bindgen(js_name = "layoutDay")]
pub fn layout_day_js(lessons_json: &str, preferences_json: &str) -> Result<String, JsValue> {
    let lessons = parse_lessons(lessons_json)?;
    let prefs = parse_preferences(preferences_json)?;
    let tz = prefs.tutor_timezone().map_err(js_err)?;
    let grid = prefs.time_grid(&ZoomTable::default()).map_err(js_err)?;

    to_json(&layout_day(&lessons, tz, &grid, prefs.overlap))
}

/// Whether a tutor-local slot is occupied.
///
/// `duration_minutes` defaults to 60; `exclude_id` is the lesson being moved.
#[wasm_bindgen(js_name = "isSlotOccupied")]
pub fn is_slot_occupied_js(
    slot_json: &str,
    lessons_json: &str,
    preferences_json: &str,
    duration_minutes: Option<i32>,
    exclude_id: Option<f64>,
) -> Result<bool, JsValue> {
    let slot = parse_slot(slot_json)?;
    let lessons = parse_lessons(lessons_json)?;
    let prefs = parse_preferences(preferences_json)?;
    let tz = prefs.tutor_timezone().map_err(js_err)?;

    Ok(is_slot_occupied(
        &slot,
        duration_minutes.map(i64::from),
        tz,
        &lessons,
        exclude_id.map(|id| id as i64),
    ))
}

/// Free/occupied map for every working-hour slot of the given days.
///
/// `days_json` is a JSON array of `YYYY-MM-DD` strings. Returns a JSON array of
/// `{slot: {day, hour, minute}, occupied}`.
#[wasm_bindgen(js_name = "slotOccupancy")]
pub fn slot_occupancy_js(
    days_json: &str,
    lessons_json: &str,
    preferences_json: &str,
    duration_minutes: Option<i32>,
    exclude_id: Option<f64>,
) -> Result<String, JsValue> {
    let days: Vec<NaiveDate> = serde_json::from_str(days_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid days JSON: {}", e)))?;
    let lessons = parse_lessons(lessons_json)?;
    let prefs = parse_preferences(preferences_json)?;
    let tz = prefs.tutor_timezone().map_err(js_err)?;

    let slots = TimeSlot::grid(&days, prefs.working_hours);
    let statuses = slot_occupancy(
        &slots,
        duration_minutes.map(i64::from),
        tz,
        &lessons,
        exclude_id.map(|id| id as i64),
    );
    to_json(&statuses)
}

/// Every pair of overlapping lessons as `{lesson_a, lesson_b, overlap_minutes}`.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts_js(lessons_json: &str) -> Result<String, JsValue> {
    let lessons = parse_lessons(lessons_json)?;
    to_json(&tutor_grid::find_conflicts(&lessons))
}

/// Format an RFC 3339 instant as `HH:MM` in `timezone`.
///
/// Unknown zones fall back to `fallback_timezone` when given; the result is then
/// `{text, approximate: true}`. Without a fallback an unknown zone is an error.
#[wasm_bindgen(js_name = "projectTime")]
pub fn project_time_js(
    instant: &str,
    timezone: &str,
    fallback_timezone: Option<String>,
) -> Result<String, JsValue> {
    let instant = parse_instant(instant)?;

    let projected = match fallback_timezone {
        Some(name) => {
            let fallback = tutor_grid::timezone::parse_timezone(&name).map_err(js_err)?;
            tutor_grid::project_time_or(instant, timezone, fallback)
        }
        None => tutor_grid::timezone::ProjectedTime {
            text: tutor_grid::project_time(instant, timezone).map_err(js_err)?,
            approximate: false,
        },
    };
    to_json(&projected)
}
