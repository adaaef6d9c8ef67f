//! Quantized (day, hour, minute) slots used for click targets and reschedule
//! candidates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dst::{resolve_local, DstPolicy};
use crate::error::{GridError, Result};
use crate::time_grid::WorkingHours;

/// Grid quantum in minutes.
pub const SLOT_MINUTES: u32 = 15;

/// A slot in tutor-local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: NaiveDate,
    pub hour: u32,
    pub minute: u32,
}

impl TimeSlot {
    /// # Errors
    /// Returns `GridError::InvalidSlot` if `hour >= 24` or `minute` is not a
    /// multiple of [`SLOT_MINUTES`] below 60.
    pub fn new(day: NaiveDate, hour: u32, minute: u32) -> Result<Self> {
        if hour >= 24 || minute >= 60 || minute % SLOT_MINUTES != 0 {
            return Err(GridError::InvalidSlot { hour, minute });
        }
        Ok(Self { day, hour, minute })
    }

    /// The slot containing a local wall-clock time (minutes floored to the quantum).
    pub fn containing(local: NaiveDateTime) -> Self {
        Self {
            day: local.date(),
            hour: local.hour(),
            minute: local.minute() - local.minute() % SLOT_MINUTES,
        }
    }

    pub fn time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }

    pub fn local(&self) -> NaiveDateTime {
        self.day.and_time(self.time())
    }

    /// The instant this slot starts at in the tutor's timezone.
    pub fn to_instant(&self, tutor_tz: Tz, policy: DstPolicy) -> Option<DateTime<Utc>> {
        resolve_local(self.local(), tutor_tz, policy)
    }

    /// All slots of `days` within working hours, day by day in chronological order.
    pub fn grid(days: &[NaiveDate], working_hours: WorkingHours) -> Vec<TimeSlot> {
        days.iter()
            .flat_map(|&day| {
                (working_hours.start_hour()..working_hours.end_hour()).flat_map(move |hour| {
                    (0..60)
                        .step_by(SLOT_MINUTES as usize)
                        .map(move |minute| TimeSlot { day, hour, minute })
                })
            })
            .collect()
    }
}
