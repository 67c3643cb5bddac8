//! Display helpers shared by the terminal views

use chrono::{DateTime, Utc};

use revox_protocol::common::{timestamp, Bike, Category};

/// Shown for missing or unreadable dates
pub const MISSING: &str = "-";
pub const UNKNOWN_BIKE: &str = "Unknown bike";
pub const UNKNOWN_CATEGORY: &str = "Unknown category";

/// `YYYY-MM-DD`, or `-` when absent or unparseable
pub fn format_date(raw: Option<&str>) -> String {
    raw.and_then(timestamp::parse)
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// `YYYY-MM-DD HH:MM`, or `-` when absent or unparseable
pub fn format_date_time(raw: Option<&str>) -> String {
    raw.and_then(timestamp::parse)
        .map(|at| format_timestamp(&at))
        .unwrap_or_else(|| MISSING.to_string())
}

pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// Coarse "n units ago" text
pub fn format_relative(at: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(*at);
    if elapsed.num_seconds() < 0 {
        return "in the future".to_string();
    }

    let (value, unit) = if elapsed.num_minutes() < 1 {
        return "just now".to_string();
    } else if elapsed.num_hours() < 1 {
        (elapsed.num_minutes(), "minute")
    } else if elapsed.num_days() < 1 {
        (elapsed.num_hours(), "hour")
    } else if elapsed.num_days() < 30 {
        (elapsed.num_days(), "day")
    } else if elapsed.num_days() < 365 {
        (elapsed.num_days() / 30, "month")
    } else {
        (elapsed.num_days() / 365, "year")
    };

    if value == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", value, unit)
    }
}

/// Display name of a bike id, resolved against the loaded list
pub fn bike_label(bikes: &[Bike], bike_id: i64) -> String {
    bikes
        .iter()
        .find(|b| b.id == bike_id)
        .map(Bike::display_name)
        .unwrap_or_else(|| UNKNOWN_BIKE.to_string())
}

pub fn category_label(categories: &[Category], category_id: i64) -> String {
    categories
        .iter()
        .find(|c| c.id == category_id)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string())
}

/// Optional value or `-`
pub fn or_missing<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

/// Cut `text` to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
