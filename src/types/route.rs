use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// One stop on the route. `arrival` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub location: Location,
    pub arrival: i64,
    pub presents_delivered: i64,
}

impl Waypoint {
    pub fn new(location: Location, arrival: i64, presents_delivered: i64) -> Self {
        Self {
            id: None,
            city: None,
            region: None,
            location,
            arrival,
            presents_delivered,
        }
    }

    /// Lenient decode of a single feed entry. Entries missing a usable location or
    /// arrival yield `None` and are dropped by the caller; a missing or non-numeric
    /// presents count decodes as nothing delivered.
    fn from_value(value: &Value) -> Option<Self> {
        let location = value.get("location")?;
        let location = Location {
            lat: location.get("lat")?.as_f64()?,
            lng: location.get("lng")?.as_f64()?,
        };
        if !location.lat.is_finite() || !location.lng.is_finite() {
            return None;
        }

        Some(Self {
            id: string_field(value, "id"),
            city: string_field(value, "city"),
            region: string_field(value, "region"),
            location,
            arrival: integer_field(value, "arrival", f64::floor)?,
            presents_delivered: integer_field(value, "presentsDelivered", f64::ceil).unwrap_or(0),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteFeed {
    pub destinations: Vec<Waypoint>,
}

impl RouteFeed {
    pub fn new(destinations: Vec<Waypoint>) -> Self {
        Self { destinations }
    }

    /// Builds a feed from an arbitrary JSON payload. Any shape other than an object
    /// with a `destinations` array decodes to an empty feed.
    pub fn from_value(value: &Value) -> Self {
        let destinations = value
            .get("destinations")
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(Waypoint::from_value).collect())
            .unwrap_or_default();

        Self { destinations }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(bytes)?;
        Ok(Self::from_value(&value))
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}

impl<'de> Deserialize<'de> for RouteFeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Fractional values go through `round`. Arrivals use floor, since
/// `floor(a) < now` iff `a < now` for integer `now`; presents use ceil, since
/// `ceil(p) > 0` iff `p > 0`.
fn integer_field(value: &Value, key: &str, round: fn(f64) -> f64) -> Option<i64> {
    let field = value.get(key)?;
    field.as_i64().or_else(|| {
        field
            .as_f64()
            .filter(|v| v.is_finite())
            .map(|v| round(v) as i64)
    })
}
