//! The assembled calendar and its iCalendar serialization.

use chrono::{Duration, NaiveDateTime};
use ical::{
    generator::{IcalCalendar, IcalCalendarBuilder, IcalEvent, Property},
    ical_property,
    parser::ical::component::IcalAlarm,
};

use crate::{error::ParseError, schedule::TimeValue, text::escape};

pub static PROD_ID: &str = "jan-di/rlk-abfuhrkalender";
static CHANGED_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Hours between a reminder and the start of its event.
pub const REMINDER_HOURS: i64 = 18;
static REMINDER_TRIGGER: &str = "-PT18H";

/// Octets of a content line before it is folded.
const LINE_OCTETS: usize = 75;

/// A display alarm attached to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub text: String,
}

/// A decorated collection event ready to be serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEntry {
    pub uid: String,
    pub start: TimeValue,
    pub end: Option<TimeValue>,
    pub summary: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub created: NaiveDateTime,
    pub reminder: Option<Reminder>,
}

impl OutputEntry {
    /// When the reminder triggers, if there is one.
    pub fn reminder_at(&self) -> Result<Option<NaiveDateTime>, ParseError> {
        if self.reminder.is_none() {
            return Ok(None);
        }
        Ok(Some(
            self.start.date_time()? - Duration::hours(REMINDER_HOURS),
        ))
    }

    fn event(&self) -> IcalEvent {
        let mut event = IcalEvent::new();
        event.properties.push(ical_property!("UID", &self.uid));
        event.properties.push(ical_property!(
            "DTSTAMP",
            self.created.format(CHANGED_FORMAT).to_string()
        ));
        event.properties.push(self.start.to_property("DTSTART"));
        if let Some(end) = &self.end {
            event.properties.push(end.to_property("DTEND"));
        }
        event
            .properties
            .push(ical_property!("SUMMARY", escape(&self.summary)));
        if let Some(location) = &self.location {
            event.properties.push(ical_property!("LOCATION", escape(location)));
        }
        if let Some(description) = &self.description {
            event
                .properties
                .push(ical_property!("DESCRIPTION", escape(description)));
        }
        event
            .properties
            .push(ical_property!("TRANSP", "TRANSPARENT"));
        if let Some(reminder) = &self.reminder {
            let mut alarm = IcalAlarm::new();
            alarm.properties.push(ical_property!("ACTION", "DISPLAY"));
            alarm
                .properties
                .push(ical_property!("DESCRIPTION", escape(&reminder.text)));
            alarm
                .properties
                .push(ical_property!("TRIGGER", REMINDER_TRIGGER));
            event.alarms.push(alarm);
        }
        event
    }
}

/// All events of one assembly run, in fetch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledDocument {
    pub entries: Vec<OutputEntry>,
}

impl AssembledDocument {
    pub fn calendar(&self) -> IcalCalendar {
        let mut calendar = IcalCalendarBuilder::version("2.0")
            .gregorian()
            .prodid(String::from(PROD_ID))
            .build();
        calendar
            .events
            .extend(self.entries.iter().map(OutputEntry::event));
        calendar
    }

    /// Serialize the document to iCalendar text.
    ///
    /// Lines end with CRLF and are folded at 75 octets without splitting a character.
    pub fn generate(&self) -> String {
        let calendar = self.calendar();
        let mut text = String::new();
        push_line(&mut text, "BEGIN:VCALENDAR");
        push_properties(&mut text, &calendar.properties);
        for event in &calendar.events {
            push_line(&mut text, "BEGIN:VEVENT");
            push_properties(&mut text, &event.properties);
            for alarm in &event.alarms {
                push_line(&mut text, "BEGIN:VALARM");
                push_properties(&mut text, &alarm.properties);
                push_line(&mut text, "END:VALARM");
            }
            push_line(&mut text, "END:VEVENT");
        }
        push_line(&mut text, "END:VCALENDAR");
        text
    }
}

fn push_properties(text: &mut String, properties: &[Property]) {
    for property in properties {
        push_line(text, &content_line(property));
    }
}

fn content_line(property: &Property) -> String {
    let mut line = property.name.clone();
    for (name, values) in property.params.iter().flatten() {
        let values: Vec<String> = values
            .iter()
            .map(|value| {
                if value.contains([':', ';', ',']) {
                    format!("\"{value}\"")
                } else {
                    value.clone()
                }
            })
            .collect();
        line.push_str(&format!(";{name}={}", values.join(",")));
    }
    line.push(':');
    if let Some(value) = &property.value {
        line.push_str(value);
    }
    line
}

fn push_line(text: &mut String, line: &str) {
    let mut width = 0;
    for c in line.chars() {
        if width + c.len_utf8() > LINE_OCTETS {
            text.push_str("\r\n ");
            width = 1;
        }
        text.push(c);
        width += c.len_utf8();
    }
    text.push_str("\r\n");
}
