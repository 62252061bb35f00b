//! Scalar formatting of page properties for the frontmatter header.

use chrono::{DateTime, NaiveDate};

use crate::model::{DateRange, PropertyValue};
use crate::render::render_rich_text;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a property as a frontmatter scalar.
///
/// Returns `None` for titles and for property types without a formatter;
/// those are left out of the header. Empty values format as `""`.
pub fn format_property(value: &PropertyValue) -> Option<String> {
    let scalar = match value {
        PropertyValue::Title { .. } | PropertyValue::Unsupported => return None,
        PropertyValue::RichText { rich_text } => render_rich_text(rich_text, false),
        PropertyValue::Number { number } => {
            number.as_ref().map(|n| n.to_string()).unwrap_or_default()
        }
        PropertyValue::Select { select } => {
            select.as_ref().map(|s| s.name.clone()).unwrap_or_default()
        }
        PropertyValue::MultiSelect { multi_select } => multi_select
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        PropertyValue::Date { date } => date.as_ref().map(format_range).unwrap_or_default(),
        PropertyValue::People { people } => people
            .iter()
            .filter_map(|p| p.name.as_deref())
            .collect::<Vec<_>>()
            .join(", "),
        PropertyValue::Files { files } => files
            .iter()
            .filter_map(|f| f.target())
            .map(|url| format!("[📎]({})", url))
            .collect::<Vec<_>>()
            .join(", "),
        PropertyValue::Checkbox { checkbox } => {
            format!("- {}", if *checkbox { "[x]" } else { "[ ]" })
        }
        PropertyValue::Url { url } => url
            .as_ref()
            .map(|u| format!("[🕸]({})", u))
            .unwrap_or_default(),
        PropertyValue::Email { email } => email.clone().unwrap_or_default(),
        PropertyValue::PhoneNumber { phone_number } => phone_number.clone().unwrap_or_default(),
        PropertyValue::CreatedTime { created_time } => {
            created_time.as_deref().map(format_date).unwrap_or_default()
        }
        PropertyValue::LastEditedTime { last_edited_time } => {
            last_edited_time.as_deref().map(format_date).unwrap_or_default()
        }
    };
    Some(scalar)
}

fn format_range(range: &DateRange) -> String {
    let mut out = format_date(&range.start);
    if let Some(ref end) = range.end {
        out.push_str(" - ");
        out.push_str(&format_date(end));
    }
    out
}

/// Reduce a date or RFC 3339 timestamp to `YYYY-MM-DD`.
///
/// Unparseable input is returned unchanged.
pub fn format_date(value: &str) -> String {
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return date.format(DATE_FORMAT).to_string();
    }
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => dt.date_naive().format(DATE_FORMAT).to_string(),
        Err(e) => {
            log::warn!("Unparseable date {:?}: {}", value, e);
            value.to_string()
        }
    }
}
