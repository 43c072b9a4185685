//! The provider's yearly exports parsed into raw schedule entries.

use std::{
    fmt,
    io::{BufReader, Cursor},
};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ical::{
    generator::{IcalEvent, Property},
    IcalParser,
};

use crate::{error::ParseError, text::unescape};

static DATE_FORMAT: &str = "%Y%m%d";
static DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// The place and street identifiers the provider knows an address by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleKey {
    pub place: u32,
    pub street: u32,
}

impl ScheduleKey {
    pub const fn new(place: u32, street: u32) -> Self {
        Self { place, street }
    }
}

impl fmt::Display for ScheduleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.place, self.street)
    }
}

/// Parameters of an iCalendar property, e.g. `VALUE=DATE`.
pub type Params = Option<Vec<(String, Vec<String>)>>;

/// A date or date-time value exactly as the provider encoded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeValue {
    pub raw: String,
    pub params: Params,
}

impl TimeValue {
    /// A floating local date-time without parameters.
    pub fn floating(date_time: NaiveDateTime) -> Self {
        Self {
            raw: date_time.format(DATE_TIME_FORMAT).to_string(),
            params: None,
        }
    }

    /// The calendar day of the value.
    pub fn date(&self) -> Result<NaiveDate, ParseError> {
        self.raw
            .get(0..8)
            .and_then(|date| NaiveDate::parse_from_str(date, DATE_FORMAT).ok())
            .ok_or_else(|| ParseError::DateTime(self.raw.clone()))
    }

    /// The local date-time of the value; a plain date is its midnight.
    pub fn date_time(&self) -> Result<NaiveDateTime, ParseError> {
        if self.raw.len() == 8 {
            return Ok(self.date()?.and_time(NaiveTime::default()));
        }
        NaiveDateTime::parse_from_str(self.raw.trim_end_matches('Z'), DATE_TIME_FORMAT)
            .map_err(|_| ParseError::DateTime(self.raw.clone()))
    }

    pub(crate) fn to_property(&self, name: &str) -> Property {
        Property {
            name: name.to_string(),
            params: self.params.clone(),
            value: Some(self.raw.clone()),
        }
    }
}

/// One collection event as delivered in the export of `year`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawScheduleEntry {
    pub year: i32,
    pub category: String,
    pub start: TimeValue,
    pub end: Option<TimeValue>,
    pub description: Option<String>,
    pub location: Option<String>,
}

trait GetIcalProperty {
    fn get_ical_property(&self, name: &str) -> Option<&Property>;

    fn get_ical_property_value(&self, name: &str) -> Option<&String> {
        self.get_ical_property(name)
            .and_then(|property| property.value.as_ref())
    }

    /// The decoded value of a TEXT property.
    fn get_ical_text(&self, name: &str) -> Option<String> {
        self.get_ical_property_value(name).map(|value| unescape(value))
    }

    fn get_time_value(&self, name: &str) -> Option<TimeValue> {
        self.get_ical_property(name).and_then(|property| {
            Some(TimeValue {
                raw: property.value.clone()?,
                params: property.params.clone(),
            })
        })
    }
}

impl GetIcalProperty for IcalEvent {
    fn get_ical_property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|property| property.name == name)
    }
}

impl RawScheduleEntry {
    fn from_event(year: i32, ical_event: &IcalEvent) -> Result<Self, ParseError> {
        let category = ical_event
            .get_ical_text("SUMMARY")
            .ok_or(ParseError::MissingProperty {
                year,
                property: "SUMMARY",
            })?;
        let start = ical_event
            .get_time_value("DTSTART")
            .ok_or(ParseError::MissingProperty {
                year,
                property: "DTSTART",
            })?;
        Ok(Self {
            year,
            category,
            start,
            end: ical_event.get_time_value("DTEND"),
            description: ical_event.get_ical_text("DESCRIPTION"),
            location: ical_event.get_ical_text("LOCATION"),
        })
    }
}

/// Parse the provider's iCalendar export of `year` into its events.
pub fn parse(year: i32, ics: &str) -> Result<Vec<RawScheduleEntry>, ParseError> {
    let parser = IcalParser::new(BufReader::new(Cursor::new(ics)));
    let mut entries = vec![];
    for ical_calendar_result in parser {
        let ical_calendar = ical_calendar_result.map_err(|err| ParseError::Ical {
            year,
            message: err.to_string(),
        })?;
        for ical_event in &ical_calendar.events {
            entries.push(RawScheduleEntry::from_event(year, ical_event)?);
        }
    }
    Ok(entries)
}
