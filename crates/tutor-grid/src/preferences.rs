//! Calendar preferences owned by the presentation layer.
//!
//! The core keeps no state: callers pass a [`CalendarPreferences`] value into
//! every layout or availability call. The TOML helpers let a front end persist
//! the value wherever it likes.
//!
//! ```toml
//! timezone = "Europe/Moscow"
//! zoom_level = 3
//! show_current_time = true
//! overlap = "side-by-side"
//! view = "week"
//!
//! [working_hours]
//! start_hour = 8
//! end_hour = 22
//! ```

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::calendar::ViewMode;
use crate::error::{GridError, Result};
use crate::layout::OverlapPolicy;
use crate::time_grid::{TimeGrid, WorkingHours, ZoomLevel, ZoomTable};
use crate::timezone::parse_timezone;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarPreferences {
    /// Tutor's IANA timezone; all slots and day columns are in this zone.
    pub timezone: String,
    pub working_hours: WorkingHours,
    pub zoom_level: ZoomLevel,
    pub show_current_time: bool,
    pub overlap: OverlapPolicy,
    pub view: ViewMode,
}

impl Default for CalendarPreferences {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
            working_hours: WorkingHours::default(),
            zoom_level: ZoomTable::DEFAULT_LEVEL,
            show_current_time: true,
            overlap: OverlapPolicy::default(),
            view: ViewMode::default(),
        }
    }
}

impl CalendarPreferences {
    /// Parse and validate preferences against the default zoom table.
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    /// `InvalidPreferences` for malformed TOML or bad working hours,
    /// `InvalidZoomLevel` and `UnknownTimezone` for values that parse but are
    /// not usable.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let prefs: Self =
            toml::from_str(text).map_err(|e| GridError::InvalidPreferences(e.to_string()))?;
        prefs.validate(&ZoomTable::default())?;
        Ok(prefs)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GridError::InvalidPreferences(e.to_string()))
    }

    pub fn validate(&self, table: &ZoomTable) -> Result<()> {
        table.pixels_per_hour(self.zoom_level)?;
        self.tutor_timezone()?;
        Ok(())
    }

    pub fn tutor_timezone(&self) -> Result<Tz> {
        parse_timezone(&self.timezone)
    }

    pub fn time_grid(&self, table: &ZoomTable) -> Result<TimeGrid> {
        TimeGrid::new(self.working_hours, self.zoom_level, table)
    }

    /// Offset of the "now" line for `now`, seen on the tutor's wall clock.
    ///
    /// `None` when the line is switched off or `now` is outside working hours.
    pub fn current_time_offset(
        &self,
        now: DateTime<Utc>,
        table: &ZoomTable,
    ) -> Result<Option<f64>> {
        if !self.show_current_time {
            return Ok(None);
        }
        let local = now.with_timezone(&self.tutor_timezone()?).time();
        Ok(self.time_grid(table)?.current_time_offset(local))
    }
}
