//! # tutor-grid
//!
//! Calendar layout and slot availability for a tutor's lesson schedule.
//!
//! All functions are pure: they take a snapshot of lessons and the caller's
//! preferences and return geometry, verdicts, or display strings. Nothing is
//! cached and nothing is mutated, so day columns can be laid out concurrently.
//!
//! ## Modules
//!
//! - [`time_grid`] — working hours, zoom table, time ↔ pixel mapping
//! - [`layout`] — positioned rectangles for a day's lessons
//! - [`availability`] — free/occupied checks for booking and rescheduling
//! - [`timezone`] — client-local clock strings
//! - [`conflict`] — double-booked lesson pairs
//! - [`calendar`] — day/week ranges and grouping lessons by day
//! - [`slot`] — quantized tutor-local slots
//! - [`dst`] — DST policies for wall-clock → instant resolution
//! - [`model`] — lesson, client and label records
//! - [`preferences`] — user preferences passed into every call
//! - [`error`] — Error types

pub mod availability;
pub mod calendar;
pub mod conflict;
pub mod dst;
pub mod error;
pub mod interval;
pub mod layout;
pub mod model;
pub mod preferences;
pub mod slot;
pub mod time_grid;
pub mod timezone;

pub use availability::{first_free_slot, is_occupied, is_slot_occupied, slot_occupancy};
pub use calendar::{group_by_day, visible_days, ViewMode};
pub use conflict::find_conflicts;
pub use error::GridError;
pub use layout::{layout_day, LessonLayout, OverlapPolicy};
pub use model::{Client, Label, Lesson, LessonId};
pub use preferences::CalendarPreferences;
pub use slot::TimeSlot;
pub use time_grid::{TimeGrid, WorkingHours, ZoomTable};
pub use timezone::{project_time, project_time_or};
