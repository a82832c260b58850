use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};
use thiserror::Error;

pub type MatchId = u64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One recorded action, reduced to the fields the team report reads.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub team_name: Option<String>,
    pub kind: EventKind,
    pub duration: Option<f64>,
    pub location: Option<Point>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Shot {
        outcome: Option<String>,
        xg: Option<f64>,
    },
    /// `outcome` is only set for unsuccessful passes; StatsBomb omits it for
    /// completed ones.
    Pass {
        outcome: Option<String>,
        end_location: Option<Point>,
    },
    Pressure,
    Tackle,
    Interception,
    FoulCommitted,
    Dribble {
        outcome: Option<String>,
    },
    Carry {
        end_location: Option<Point>,
    },
    Other(String),
}

/// A single event record that could not be read into an [`Event`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EventError {
    #[error("event #{index}: record is not a JSON object")]
    NotAnObject { index: usize },
    #[error("event #{index}: field `{field}` {reason}")]
    BadField {
        index: usize,
        field: &'static str,
        reason: &'static str,
    },
}

impl EventError {
    pub fn index(&self) -> usize {
        match self {
            EventError::NotAnObject { index } | EventError::BadField { index, .. } => *index,
        }
    }
}

/// Decoded events for one match plus the records that were skipped.
#[derive(Debug, Clone, Default)]
pub struct MatchEvents {
    pub events: Vec<Event>,
    pub rejected: Vec<EventError>,
}

pub fn parse_match_events_json(raw: &str) -> Result<MatchEvents> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(MatchEvents::default());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid events json")?;
    let Value::Array(records) = root else {
        return Err(anyhow!("events json is not an array"));
    };
    Ok(decode_events(&records))
}

pub fn decode_events(records: &[Value]) -> MatchEvents {
    let mut out = MatchEvents {
        events: Vec::with_capacity(records.len()),
        rejected: Vec::new(),
    };
    for (index, record) in records.iter().enumerate() {
        match decode_event(index, record) {
            Ok(event) => out.events.push(event),
            Err(err) => out.rejected.push(err),
        }
    }
    out
}

pub fn decode_event(index: usize, record: &Value) -> Result<Event, EventError> {
    let Some(obj) = record.as_object() else {
        return Err(EventError::NotAnObject { index });
    };
    let bad = |field: &'static str, reason: &'static str| EventError::BadField {
        index,
        field,
        reason,
    };

    let team_name = named(obj, "team")
        .map_err(|reason| bad("team", reason))?
        .filter(|name| !name.is_empty());
    let type_name = named(obj, "type").map_err(|reason| bad("type", reason))?;
    let duration = duration(obj).map_err(|reason| bad("duration", reason))?;
    let location = point(obj, "location").map_err(|reason| bad("location", reason))?;

    let kind = match type_name.as_deref() {
        Some("Shot") => {
            let shot = sub_object(obj, "shot").map_err(|reason| bad("shot", reason))?;
            EventKind::Shot {
                outcome: shot
                    .map(|s| named(s, "outcome"))
                    .transpose()
                    .map_err(|reason| bad("shot.outcome", reason))?
                    .flatten(),
                xg: shot
                    .map(|s| number(s, "statsbomb_xg"))
                    .transpose()
                    .map_err(|reason| bad("shot.statsbomb_xg", reason))?
                    .flatten(),
            }
        }
        Some("Pass") => {
            let pass = sub_object(obj, "pass").map_err(|reason| bad("pass", reason))?;
            EventKind::Pass {
                outcome: pass
                    .map(|p| named(p, "outcome"))
                    .transpose()
                    .map_err(|reason| bad("pass.outcome", reason))?
                    .flatten(),
                end_location: pass
                    .map(|p| point(p, "end_location"))
                    .transpose()
                    .map_err(|reason| bad("pass.end_location", reason))?
                    .flatten(),
            }
        }
        Some("Pressure") => EventKind::Pressure,
        Some("Tackle") => EventKind::Tackle,
        Some("Interception") => EventKind::Interception,
        Some("Foul Committed") => EventKind::FoulCommitted,
        Some("Dribble") => {
            let dribble = sub_object(obj, "dribble").map_err(|reason| bad("dribble", reason))?;
            EventKind::Dribble {
                outcome: dribble
                    .map(|d| named(d, "outcome"))
                    .transpose()
                    .map_err(|reason| bad("dribble.outcome", reason))?
                    .flatten(),
            }
        }
        Some("Carry") => {
            let carry = sub_object(obj, "carry").map_err(|reason| bad("carry", reason))?;
            EventKind::Carry {
                end_location: carry
                    .map(|c| point(c, "end_location"))
                    .transpose()
                    .map_err(|reason| bad("carry.end_location", reason))?
                    .flatten(),
            }
        }
        Some(other) => EventKind::Other(other.to_string()),
        None => EventKind::Other(String::new()),
    };

    Ok(Event {
        team_name,
        kind,
        duration,
        location,
    })
}

type FieldResult<T> = std::result::Result<T, &'static str>;

fn present<'a>(obj: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    obj.get(field).filter(|v| !v.is_null())
}

fn sub_object<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
) -> FieldResult<Option<&'a Map<String, Value>>> {
    match present(obj, field) {
        None => Ok(None),
        Some(Value::Object(inner)) => Ok(Some(inner)),
        Some(_) => Err("is not an object"),
    }
}

/// StatsBomb's `{ "id": .., "name": ".." }` reference objects.
fn named(obj: &Map<String, Value>, field: &str) -> FieldResult<Option<String>> {
    let Some(inner) = sub_object(obj, field)? else {
        return Ok(None);
    };
    match inner.get("name") {
        Some(Value::String(name)) => Ok(Some(name.clone())),
        _ => Err("has no string `name`"),
    }
}

fn number(obj: &Map<String, Value>, field: &str) -> FieldResult<Option<f64>> {
    match present(obj, field) {
        None => Ok(None),
        Some(v) => v.as_f64().map(Some).ok_or("is not a number"),
    }
}

fn duration(obj: &Map<String, Value>) -> FieldResult<Option<f64>> {
    match number(obj, "duration")? {
        Some(secs) if !secs.is_finite() || secs < 0.0 => Err("is not a non-negative number"),
        other => Ok(other),
    }
}

fn point(obj: &Map<String, Value>, field: &str) -> FieldResult<Option<Point>> {
    let Some(value) = present(obj, field) else {
        return Ok(None);
    };
    let Some(coords) = value.as_array() else {
        return Err("is not a coordinate array");
    };
    if coords.is_empty() {
        return Ok(None);
    }
    match (
        coords.first().and_then(Value::as_f64),
        coords.get(1).and_then(Value::as_f64),
    ) {
        (Some(x), Some(y)) => Ok(Some(Point { x, y })),
        _ => Err("is not a numeric [x, y] pair"),
    }
}
