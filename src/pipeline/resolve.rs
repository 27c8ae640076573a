use crate::types::progress::{CurrentSelection, RouteProgress};
use crate::types::route::{RouteFeed, Waypoint};

/// Resolves route progress at `now` (epoch millis), taking the last delivered
/// waypoint in feed order as the current position.
pub fn resolve(feed: Option<&RouteFeed>, now: i64) -> RouteProgress {
    resolve_with(feed, now, CurrentSelection::FeedOrder)
}

pub fn resolve_with(
    feed: Option<&RouteFeed>,
    now: i64,
    selection: CurrentSelection,
) -> RouteProgress {
    let destinations: &[Waypoint] = feed.map(|f| f.destinations.as_slice()).unwrap_or_default();

    let visited: Vec<Waypoint> = destinations
        .iter()
        .filter(|waypoint| waypoint.arrival < now)
        .cloned()
        .collect();

    let delivered: Vec<Waypoint> = visited
        .iter()
        .filter(|waypoint| waypoint.presents_delivered > 0)
        .cloned()
        .collect();

    let current_index = match selection {
        CurrentSelection::FeedOrder => delivered.len().checked_sub(1),
        CurrentSelection::LatestArrival => latest_arrival_index(&delivered),
    };

    RouteProgress {
        visited,
        delivered,
        current_index,
    }
}

fn latest_arrival_index(waypoints: &[Waypoint]) -> Option<usize> {
    // max_by_key returns the last maximum, so later feed entries win ties.
    waypoints
        .iter()
        .enumerate()
        .max_by_key(|(_, waypoint)| waypoint.arrival)
        .map(|(idx, _)| idx)
}
