//! Assemble the decorated calendar from three yearly exports.

use std::{ops::RangeInclusive, sync::OnceLock};

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};
use tracing::info;

use crate::{
    classify::classify,
    document::{AssembledDocument, OutputEntry, Reminder},
    error::{Error, ParseError},
    provider::ScheduleSource,
    schedule::{self, RawScheduleEntry, ScheduleKey, TimeValue},
    uid::uid,
};

/// Where the start and end of an event come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimePolicy {
    /// Copy the provider's start and end.
    #[default]
    Provider,
    /// Take the times from a description like `09:00-11:30 Sammelstelle`.
    ///
    /// The provider's end date is exclusive, so the end time applies to the day before it.
    DescriptionRange,
}

fn time_range_regex() -> &'static Regex {
    static TIME_RANGE: OnceLock<Regex> = OnceLock::new();
    TIME_RANGE.get_or_init(|| {
        Regex::new(r"^(\d+):(\d+)-(\d+):(\d+)\s.*$").expect("valid time range pattern")
    })
}

/// The years fetched around `year`.
pub fn window(year: i32) -> RangeInclusive<i32> {
    year - 1..=year + 1
}

pub struct Assembler<S> {
    source: S,
    time_policy: TimePolicy,
}

impl<S: ScheduleSource> Assembler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            time_policy: TimePolicy::default(),
        }
    }

    pub fn with_time_policy(mut self, time_policy: TimePolicy) -> Self {
        self.time_policy = time_policy;
        self
    }

    /// Assemble the calendar of a place and street as of now.
    pub async fn assemble(&self, key: ScheduleKey) -> Result<AssembledDocument, Error> {
        self.assemble_at(key, Local::now().naive_local()).await
    }

    /// Assemble the calendar of a place and street as of `now`.
    ///
    /// Any failed fetch fails the whole run.
    pub async fn assemble_at(
        &self,
        key: ScheduleKey,
        now: NaiveDateTime,
    ) -> Result<AssembledDocument, Error> {
        info!(place = key.place, street = key.street, "fetching events");
        let mut raw_entries = vec![];
        for year in window(now.year()) {
            let ics = self.source.fetch(key, year).await?;
            let entries = schedule::parse(year, &ics)?;
            info!(year, count = entries.len(), "fetched events");
            raw_entries.extend(entries);
        }
        let entries = raw_entries
            .into_iter()
            .map(|raw_entry| self.entry(key, raw_entry, now))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(AssembledDocument { entries })
    }

    fn entry(
        &self,
        key: ScheduleKey,
        raw_entry: RawScheduleEntry,
        now: NaiveDateTime,
    ) -> Result<OutputEntry, ParseError> {
        let classification = classify(&raw_entry.category);
        let uid = uid(
            &raw_entry.category,
            key,
            raw_entry.year,
            &raw_entry.start.raw,
            raw_entry.description.as_deref(),
        );
        let (start, end) = match self.time_policy {
            TimePolicy::Provider => (raw_entry.start, raw_entry.end),
            TimePolicy::DescriptionRange => match description_range(&raw_entry)? {
                Some((start, end)) => (start, Some(end)),
                None => (raw_entry.start, raw_entry.end),
            },
        };
        Ok(OutputEntry {
            uid,
            start,
            end,
            summary: classification.summary(&raw_entry.category),
            location: raw_entry.location,
            description: raw_entry.description,
            created: now,
            reminder: classification.reminder_text().map(|text| Reminder {
                text: text.to_string(),
            }),
        })
    }
}

/// Start and end taken from a time range at the beginning of the description.
fn description_range(
    raw_entry: &RawScheduleEntry,
) -> Result<Option<(TimeValue, TimeValue)>, ParseError> {
    let Some(description) = raw_entry.description.as_deref() else {
        return Ok(None);
    };
    let Some(captures) = time_range_regex().captures(description) else {
        return Ok(None);
    };
    let start_date = raw_entry.start.date()?;
    let end_date = match &raw_entry.end {
        Some(end) => end
            .date()?
            .pred_opt()
            .ok_or_else(|| ParseError::DateTime(end.raw.clone()))?,
        None => start_date,
    };
    let invalid = || ParseError::DateTime(description.to_string());
    let start = at(start_date, &captures, 1).ok_or_else(invalid)?;
    let end = at(end_date, &captures, 3).ok_or_else(invalid)?;
    Ok(Some((TimeValue::floating(start), TimeValue::floating(end))))
}

fn at(date: NaiveDate, captures: &Captures, hour_group: usize) -> Option<NaiveDateTime> {
    let hour = captures.get(hour_group)?.as_str().parse().ok()?;
    let minute = captures.get(hour_group + 1)?.as_str().parse().ok()?;
    date.and_hms_opt(hour, minute, 0)
}
