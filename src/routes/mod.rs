pub mod health;
pub mod map;
pub mod progress;

use chrono::Utc;

use crate::error::AppError;
use crate::types::progress::CurrentSelection;

/// Reference time for a request: the `now` query value or the wall clock.
fn parse_now(raw: Option<&str>) -> Result<i64, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => value.parse::<i64>().map_err(|_| {
            AppError::BadRequest(format!(
                "Invalid now: {}. Use epoch milliseconds",
                value
            ))
        }),
        None => Ok(Utc::now().timestamp_millis()),
    }
}

fn parse_selection(
    raw: Option<&str>,
    default: CurrentSelection,
) -> Result<CurrentSelection, AppError> {
    match raw {
        Some(value) => CurrentSelection::from_str(value).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Invalid selection: {}. Use 'feed_order' or 'latest_arrival'",
                value
            ))
        }),
        None => Ok(default),
    }
}
