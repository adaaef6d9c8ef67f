//! Time-to-pixel geometry for a single day column.
//!
//! A column spans the working hours; its vertical density is controlled by a
//! discrete zoom level looked up in a [`ZoomTable`].

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::slot::SLOT_MINUTES;

/// Hour bounds of the rendered grid, `[start_hour, end_hour)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWorkingHours")]
pub struct WorkingHours {
    start_hour: u32,
    end_hour: u32,
}

#[derive(Deserialize)]
struct RawWorkingHours {
    start_hour: u32,
    end_hour: u32,
}

impl TryFrom<RawWorkingHours> for WorkingHours {
    type Error = GridError;

    fn try_from(raw: RawWorkingHours) -> Result<Self> {
        WorkingHours::new(raw.start_hour, raw.end_hour)
    }
}

impl WorkingHours {
    /// # Errors
    /// Returns `GridError::InvalidWorkingHours` unless `start_hour < end_hour <= 24`.
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self> {
        if start_hour >= end_hour || end_hour > 24 {
            return Err(GridError::InvalidWorkingHours {
                start: start_hour,
                end: end_hour,
            });
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn hours(&self) -> u32 {
        self.end_hour - self.start_hour
    }

    /// Whether a time of day falls inside `[start_hour, end_hour)`.
    pub fn contains(&self, time: NaiveTime) -> bool {
        let hour = time.hour();
        hour >= self.start_hour && hour < self.end_hour
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 22,
        }
    }
}

/// 1-based zoom level.
pub type ZoomLevel = u8;

/// One row of the zoom table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomStep {
    pub hour_height: f64,
    pub label: String,
}

/// Ordered zoom levels, each denser than the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawZoomTable")]
pub struct ZoomTable {
    steps: Vec<ZoomStep>,
}

#[derive(Deserialize)]
struct RawZoomTable {
    steps: Vec<ZoomStep>,
}

impl TryFrom<RawZoomTable> for ZoomTable {
    type Error = String;

    fn try_from(raw: RawZoomTable) -> std::result::Result<Self, Self::Error> {
        ZoomTable::new(raw.steps).ok_or_else(|| {
            "zoom table must hold 1 to 255 positive, strictly increasing hour heights".to_string()
        })
    }
}

impl ZoomTable {
    /// Level selected when nothing else is configured.
    pub const DEFAULT_LEVEL: ZoomLevel = 3;

    /// Build a table from pixel heights.
    ///
    /// Returns `None` when the heights are empty, not strictly increasing, not
    /// positive, or exceed the number of representable levels.
    pub fn new(steps: Vec<ZoomStep>) -> Option<Self> {
        if steps.is_empty() || steps.len() > ZoomLevel::MAX as usize {
            return None;
        }
        if steps[0].hour_height <= 0.0 {
            return None;
        }
        if steps
            .windows(2)
            .any(|w| w[0].hour_height >= w[1].hour_height)
        {
            return None;
        }
        Some(Self { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn max_level(&self) -> ZoomLevel {
        self.steps.len() as ZoomLevel
    }

    pub fn step(&self, level: ZoomLevel) -> Result<&ZoomStep> {
        if level == 0 {
            return Err(GridError::InvalidZoomLevel(level));
        }
        self.steps
            .get(level as usize - 1)
            .ok_or(GridError::InvalidZoomLevel(level))
    }

    /// Pixel height of one hour at `level`.
    ///
    /// # Errors
    /// Returns `GridError::InvalidZoomLevel` if `level` is not in the table.
    pub fn pixels_per_hour(&self, level: ZoomLevel) -> Result<f64> {
        self.step(level).map(|s| s.hour_height)
    }

    /// Nearest valid level for an arbitrary integer.
    pub fn clamp(&self, level: i64) -> ZoomLevel {
        level.clamp(1, self.max_level() as i64) as ZoomLevel
    }

    pub fn zoom_in(&self, level: ZoomLevel) -> ZoomLevel {
        self.clamp(level as i64 + 1)
    }

    pub fn zoom_out(&self, level: ZoomLevel) -> ZoomLevel {
        self.clamp(level as i64 - 1)
    }
}

impl Default for ZoomTable {
    fn default() -> Self {
        let steps = [
            (40.0, "Compact"),
            (50.0, "Compact-medium"),
            (60.0, "Medium"),
            (70.0, "Medium-large"),
            (80.0, "Large"),
        ]
        .into_iter()
        .map(|(hour_height, label)| ZoomStep {
            hour_height,
            label: label.to_string(),
        })
        .collect();
        Self { steps }
    }
}

/// A quantized row of the grid, usable as a click target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotRow {
    pub time: NaiveTime,
    pub top: f64,
    pub height: f64,
}

/// Geometry of one day column at a fixed zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    working_hours: WorkingHours,
    pixels_per_hour: f64,
}

impl TimeGrid {
    /// # Errors
    /// Returns `GridError::InvalidZoomLevel` if `zoom` is not in `table`.
    pub fn new(working_hours: WorkingHours, zoom: ZoomLevel, table: &ZoomTable) -> Result<Self> {
        Ok(Self {
            working_hours,
            pixels_per_hour: table.pixels_per_hour(zoom)?,
        })
    }

    pub fn working_hours(&self) -> WorkingHours {
        self.working_hours
    }

    pub fn pixels_per_hour(&self) -> f64 {
        self.pixels_per_hour
    }

    /// Vertical offset of `hour:minute` from the top of the grid.
    ///
    /// Negative before the first working hour, beyond [`TimeGrid::total_height`]
    /// after the last one.
    pub fn offset_of(&self, hour: u32, minute: u32) -> f64 {
        (hour as f64 - self.working_hours.start_hour as f64 + minute as f64 / 60.0)
            * self.pixels_per_hour
    }

    /// Same as [`TimeGrid::offset_of`] for minutes since midnight, which may
    /// run past 24h for lessons that cross into the next day.
    pub fn offset_of_minutes(&self, minutes: i64) -> f64 {
        (minutes as f64 / 60.0 - self.working_hours.start_hour as f64) * self.pixels_per_hour
    }

    pub fn total_height(&self) -> f64 {
        self.working_hours.hours() as f64 * self.pixels_per_hour
    }

    /// Time of day at a vertical offset, floored to the slot quantum and
    /// clamped to the last slot of the grid.
    pub fn time_at(&self, offset: f64) -> NaiveTime {
        let slots_per_hour = 60 / SLOT_MINUTES;
        let last_slot = (self.working_hours.hours() * slots_per_hour) as i64 - 1;
        let slot_height = self.pixels_per_hour / slots_per_hour as f64;
        let index = ((offset / slot_height).floor() as i64).clamp(0, last_slot) as u32;

        let minutes = self.working_hours.start_hour * 60 + index * SLOT_MINUTES;
        NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Every quantized row from the first working hour to the last.
    pub fn slot_rows(&self) -> Vec<SlotRow> {
        let height = self.pixels_per_hour * SLOT_MINUTES as f64 / 60.0;
        (self.working_hours.start_hour..self.working_hours.end_hour)
            .flat_map(|hour| (0..60).step_by(SLOT_MINUTES as usize).map(move |m| (hour, m)))
            .filter_map(|(hour, minute)| {
                NaiveTime::from_hms_opt(hour, minute, 0).map(|time| SlotRow {
                    time,
                    top: self.offset_of(hour, minute),
                    height,
                })
            })
            .collect()
    }

    /// Offset of the "now" line, or `None` outside working hours.
    pub fn current_time_offset(&self, now: NaiveTime) -> Option<f64> {
        if !self.working_hours.contains(now) {
            return None;
        }
        Some(self.offset_of(now.hour(), now.minute()))
    }
}
