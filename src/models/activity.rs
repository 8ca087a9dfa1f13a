// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity log models.
//!
//! `ActivityDocument` is what actually sits in Firestore: numeric fields may
//! be negative and `distance` may be missing, null, a string, or garbage.
//! `ActivityRecord` is the normalized value the leaderboard engine consumes.

use crate::models::{Reference, UserRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Stored activity document in Firestore.
///
/// Every field is lenient so one odd document cannot fail a whole
/// collection load; `normalize` decides what the values mean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityDocument {
    /// Document ID
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    /// Owning user (loose reference)
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: String,
    /// Free-form kind (Running, Boxing, ...)
    #[serde(default, deserialize_with = "lenient_string")]
    pub activity_type: String,
    /// Duration in minutes
    #[serde(default)]
    pub duration: Option<Value>,
    #[serde(default)]
    pub calories: Option<Value>,
    /// Distance in km. Anything that is not a non-negative number counts as 0.
    #[serde(default)]
    pub distance: Option<Value>,
    /// Activity date (RFC 3339)
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub notes: Option<String>,
}

/// Normalized activity, as consumed by the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub id: String,
    pub user: Reference<UserRecord>,
    pub activity_type: String,
    pub duration_minutes: u32,
    pub calories: u32,
    /// Distance in km; `None` contributes 0.
    pub distance_km: Option<f64>,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Result of normalizing a stored document.
#[derive(Debug, Clone)]
pub struct Normalized {
    pub record: ActivityRecord,
    /// True if any field had to be clamped or dropped.
    pub adjusted: bool,
}

impl ActivityDocument {
    /// Convert into an `ActivityRecord`, clamping rather than rejecting.
    pub fn normalize(self) -> Normalized {
        let mut adjusted = false;

        let duration_minutes = clamp_count(self.duration.as_ref(), &mut adjusted);
        let calories = clamp_count(self.calories.as_ref(), &mut adjusted);

        let distance_km = match self.distance {
            None | Some(Value::Null) => None,
            Some(value) => {
                let parsed = parse_distance(&value);
                if parsed.is_none() {
                    adjusted = true;
                }
                parsed
            }
        };

        let date = match DateTime::parse_from_rfc3339(&self.date) {
            Ok(dt) => dt.with_timezone(&Utc),
            Err(_) => {
                adjusted = true;
                DateTime::UNIX_EPOCH
            }
        };

        if adjusted {
            tracing::debug!(
                activity_id = %self.id,
                user_id = %self.user_id,
                "Normalized malformed activity"
            );
        }

        Normalized {
            record: ActivityRecord {
                id: self.id,
                user: Reference::new(self.user_id),
                activity_type: self.activity_type,
                duration_minutes,
                calories,
                distance_km,
                date,
                notes: self.notes,
            },
            adjusted,
        }
    }
}

impl From<&ActivityRecord> for ActivityDocument {
    fn from(record: &ActivityRecord) -> Self {
        Self {
            id: record.id.clone(),
            user_id: record.user.as_str().to_string(),
            activity_type: record.activity_type.clone(),
            duration: Some(Value::from(record.duration_minutes)),
            calories: Some(Value::from(record.calories)),
            distance: record
                .distance_km
                .and_then(serde_json::Number::from_f64)
                .map(Value::Number),
            date: crate::time_utils::format_utc_rfc3339(record.date),
            notes: record.notes.clone(),
        }
    }
}

/// Counts are whole, non-negative and fit in `u32`. Absent is 0; fractions
/// round, out-of-range values clamp, and anything non-numeric is 0.
fn clamp_count(value: Option<&Value>, adjusted: &mut bool) -> u32 {
    let raw = match value {
        None | Some(Value::Null) => return 0,
        Some(value) => parse_number(value),
    };

    match raw {
        Some(n) if n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) => n as u32,
        Some(n) if n.is_finite() && n >= 0.0 => {
            *adjusted = true;
            n.round().min(f64::from(u32::MAX)) as u32
        }
        _ => {
            *adjusted = true;
            0
        }
    }
}

/// JSON numbers and numeric strings.
fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Accept JSON numbers and numeric strings; reject negatives and non-finite values.
fn parse_distance(value: &Value) -> Option<f64> {
    parse_number(value).filter(|km| km.is_finite() && *km >= 0.0)
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

/// Strings pass through and numbers are formatted; anything else is absent.
fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
