// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-user aggregation over the activity log.
//!
//! Activities are grouped by the raw user reference string, unresolved.
//! The result does not depend on input order: integer totals are plain
//! sums, and each user's distances are summed in sorted order with
//! compensation before a single final rounding to 2 decimal places.

use crate::models::leaderboard::round_distance;
use crate::models::{ActivityRecord, UserAggregate};
use std::borrow::Borrow;
use std::collections::BTreeMap;

/// Aggregates keyed by user reference, plus normalization bookkeeping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateSet {
    by_user: BTreeMap<String, UserAggregate>,
    /// Activities whose distance was negative or non-finite and counted as 0.
    pub normalized_records: u64,
}

impl AggregateSet {
    pub fn len(&self) -> usize {
        self.by_user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_user.is_empty()
    }

    pub fn get(&self, user_id: &str) -> Option<&UserAggregate> {
        self.by_user.get(user_id)
    }

    /// Aggregates in user-id order.
    pub fn iter(&self) -> impl Iterator<Item = &UserAggregate> {
        self.by_user.values()
    }
}

#[derive(Default)]
struct Accumulator {
    calories: u64,
    activities: u64,
    distances: Vec<f64>,
}

/// Group `activities` by user reference and compute totals.
pub fn aggregate<I>(activities: I) -> AggregateSet
where
    I: IntoIterator,
    I::Item: Borrow<ActivityRecord>,
{
    let mut groups: BTreeMap<String, Accumulator> = BTreeMap::new();
    let mut normalized_records = 0u64;

    for item in activities {
        let activity = item.borrow();
        let acc = groups
            .entry(activity.user.as_str().to_string())
            .or_default();

        acc.calories = acc.calories.saturating_add(u64::from(activity.calories));
        acc.activities = acc.activities.saturating_add(1);

        match activity.distance_km {
            Some(km) if km.is_finite() && km >= 0.0 => acc.distances.push(km),
            Some(_) => normalized_records = normalized_records.saturating_add(1),
            None => {}
        }
    }

    let by_user = groups
        .into_iter()
        .map(|(user_id, acc)| {
            let aggregate = UserAggregate {
                user_id: user_id.clone(),
                total_calories: acc.calories,
                total_activities: acc.activities,
                total_distance: round_distance(sorted_sum(acc.distances)),
            };
            (user_id, aggregate)
        })
        .collect();

    AggregateSet {
        by_user,
        normalized_records,
    }
}

/// Neumaier-compensated sum over the values in ascending order.
///
/// Inputs are finite and non-negative; a total past `f64::MAX` saturates.
fn sorted_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);

    let mut sum = 0.0_f64;
    let mut compensation = 0.0_f64;
    for v in values {
        let t = sum + v;
        if !t.is_finite() {
            return f64::MAX;
        }
        if sum.abs() >= v.abs() {
            compensation += (sum - t) + v;
        } else {
            compensation += (v - t) + sum;
        }
        sum = t;
    }
    (sum + compensation).min(f64::MAX)
}
