use crate::models::DailyEntry;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

/// Turns arbitrary persisted or imported JSON into a validated, date-ordered
/// entry list. Anything that is not an array yields an empty list; elements
/// without a well-formed `date` are dropped.
pub fn sanitize_entries(raw: Value) -> Vec<DailyEntry> {
    let Value::Array(items) = raw else {
        return Vec::new();
    };

    let total = items.len();
    let parsed: Vec<DailyEntry> = items.into_iter().filter_map(parse_entry).collect();
    if parsed.len() < total {
        warn!(dropped = total - parsed.len(), "dropped malformed entries");
    }

    normalize(parsed)
}

/// Sorts ascending by date and keeps only the last record seen for each date.
pub fn normalize(entries: Vec<DailyEntry>) -> Vec<DailyEntry> {
    let mut indexed: Vec<(usize, DailyEntry)> = entries.into_iter().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| a.date.cmp(&b.date).then(ia.cmp(ib)));

    let mut out: Vec<DailyEntry> = Vec::with_capacity(indexed.len());
    for (_, entry) in indexed {
        match out.last_mut() {
            Some(last) if last.date == entry.date => *last = entry,
            _ => out.push(entry),
        }
    }
    out
}

fn parse_entry(item: Value) -> Option<DailyEntry> {
    let date = item.get("date")?.as_str()?;
    if !DATE_PATTERN.is_match(date) {
        return None;
    }
    serde_json::from_value(item).ok()
}
