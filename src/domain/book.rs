//! Schedule book - choosing a fee schedule by region and date.
//!
//! The marketplace runs on a default schedule. Named schedules override it
//! for a region, a promotional window, or both. Selection prefers a
//! region-specific match over a region-less one; among equally specific
//! matches the entry declared last wins.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::fees::FeeCalculator;
use super::schedule::FeeSchedule;

/// Reasons a schedule book is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookError {
    #[error("duplicate schedule name: {0}")]
    DuplicateName(String),
    #[error("schedule {name} ends at {ends_at}, not after its start {starts_at}")]
    EmptyWindow {
        name: String,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    },
}

/// A schedule override, optionally scoped to a region and a time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedSchedule {
    pub name: String,
    pub region: Option<String>,
    /// Inclusive start; open when absent.
    pub starts_at: Option<DateTime<Utc>>,
    /// Exclusive end; open when absent.
    pub ends_at: Option<DateTime<Utc>>,
    pub schedule: FeeSchedule,
}

impl NamedSchedule {
    /// An override with no region or window restriction.
    pub fn new(name: impl Into<String>, schedule: FeeSchedule) -> Self {
        Self {
            name: name.into(),
            region: None,
            starts_at: None,
            ends_at: None,
            schedule,
        }
    }

    /// Restricts the override to one region.
    #[must_use]
    pub fn in_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Restricts the override to `[starts_at, ends_at)`.
    #[must_use]
    pub fn during(
        mut self,
        starts_at: Option<DateTime<Utc>>,
        ends_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.starts_at = starts_at;
        self.ends_at = ends_at;
        self
    }

    /// Whether the window contains `at`.
    pub fn is_active(&self, at: DateTime<Utc>) -> bool {
        self.starts_at.is_none_or(|start| start <= at) && self.ends_at.is_none_or(|end| at < end)
    }

    fn applies_to(&self, region: Option<&str>) -> bool {
        match (&self.region, region) {
            (None, _) => true,
            (Some(own), Some(wanted)) => own.eq_ignore_ascii_case(wanted),
            (Some(_), None) => false,
        }
    }
}

/// Default fee schedule plus named overrides.
#[derive(Debug, Clone, Default)]
pub struct ScheduleBook {
    default: FeeSchedule,
    entries: Vec<NamedSchedule>,
}

impl ScheduleBook {
    /// A book with only the default schedule.
    pub const fn new(default: FeeSchedule) -> Self {
        Self {
            default,
            entries: Vec::new(),
        }
    }

    /// Adds an override.
    ///
    /// # Errors
    /// Returns [`BookError`] if the name is already used or the window is
    /// empty.
    pub fn with_schedule(mut self, entry: NamedSchedule) -> Result<Self, BookError> {
        if let (Some(starts_at), Some(ends_at)) = (entry.starts_at, entry.ends_at) {
            if ends_at <= starts_at {
                return Err(BookError::EmptyWindow {
                    name: entry.name,
                    starts_at,
                    ends_at,
                });
            }
        }
        if self.entries.iter().any(|e| e.name == entry.name) {
            return Err(BookError::DuplicateName(entry.name));
        }

        self.entries.push(entry);
        Ok(self)
    }

    /// Builds a book from a default and a list of overrides.
    ///
    /// # Errors
    /// Same as [`ScheduleBook::with_schedule`].
    pub fn from_entries(
        default: FeeSchedule,
        entries: impl IntoIterator<Item = NamedSchedule>,
    ) -> Result<Self, BookError> {
        entries
            .into_iter()
            .try_fold(Self::new(default), Self::with_schedule)
    }

    /// The fallback schedule.
    pub const fn default_schedule(&self) -> &FeeSchedule {
        &self.default
    }

    /// All overrides in declaration order.
    pub fn entries(&self) -> &[NamedSchedule] {
        &self.entries
    }

    /// Looks up an override by name.
    pub fn get(&self, name: &str) -> Option<&NamedSchedule> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Picks the schedule for a sale in `region` at time `at`.
    pub fn select(&self, region: Option<&str>, at: DateTime<Utc>) -> &FeeSchedule {
        self.select_entry(region, at)
            .map_or(&self.default, |entry| &entry.schedule)
    }

    /// Like [`ScheduleBook::select`] but returns the matching override, or
    /// `None` when the default applies.
    pub fn select_entry(&self, region: Option<&str>, at: DateTime<Utc>) -> Option<&NamedSchedule> {
        let chosen = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_active(at) && e.applies_to(region))
            .max_by_key(|(i, e)| (e.region.is_some(), *i))
            .map(|(_, e)| e);

        debug!(
            region = region.unwrap_or("-"),
            schedule = chosen.map_or("default", |e| e.name.as_str()),
            "Fee schedule selected"
        );
        chosen
    }

    /// Calculator for a sale in `region` at time `at`.
    pub fn calculator(&self, region: Option<&str>, at: DateTime<Utc>) -> FeeCalculator {
        FeeCalculator::new(*self.select(region, at))
    }
}
