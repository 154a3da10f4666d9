//! Temporal classification and ordering of itineraries.
//!
//! Stateless helpers applied in-process over a requester's visible
//! itineraries. Classification and sorting are independent and composable.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::database::models::Itinerary;

/// Where an itinerary's [start_date, end_date] window sits relative to "now".
/// For any instant the three classes partition all itineraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalFilter {
    Upcoming,
    Ongoing,
    Past,
}

impl TemporalFilter {
    pub fn matches(self, itinerary: &Itinerary, now: DateTime<Utc>) -> bool {
        classify(itinerary, now) == self
    }
}

/// Classify an itinerary against the given instant:
/// upcoming if start > now; past if end < now; ongoing otherwise.
pub fn classify(itinerary: &Itinerary, now: DateTime<Utc>) -> TemporalFilter {
    if itinerary.start_date > now {
        TemporalFilter::Upcoming
    } else if itinerary.end_date < now {
        TemporalFilter::Past
    } else {
        TemporalFilter::Ongoing
    }
}

/// Keep only itineraries in the given temporal class.
pub fn filter_itineraries(
    itineraries: Vec<Itinerary>,
    filter: TemporalFilter,
    now: DateTime<Utc>,
) -> Vec<Itinerary> {
    itineraries
        .into_iter()
        .filter(|i| filter.matches(i, now))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    StartDate,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Order itineraries by start date or title. Stable with respect to the
/// chosen key, so equal keys keep their incoming order.
pub fn sort_itineraries(itineraries: &mut [Itinerary], key: SortKey, order: SortOrder) {
    match key {
        SortKey::StartDate => itineraries.sort_by_key(|i| i.start_date),
        SortKey::Title => itineraries.sort_by(|a, b| a.title.cmp(&b.title)),
    }
    if order == SortOrder::Desc {
        itineraries.reverse();
    }
}
