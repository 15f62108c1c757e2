//! Conjunctive filtering over flattened people.

use serde::{Deserialize, Serialize};

use crate::models::{Person, Residency};

/// Value meaning "no constraint" for every criterion.
pub const ALL: &str = "All";

/// Dashboard filter criteria, as sent in query strings.
///
/// Every field is optional; absent, empty, `All`, or unrecognized values
/// place no constraint on that dimension.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residency: Option<String>,
    /// `Yes` or `No`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mess_food: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl FilterCriteria {
    /// Whether no criterion constrains anything.
    pub fn is_unconstrained(&self) -> bool {
        let filter = PersonFilter::from(self);
        filter == PersonFilter::default()
    }
}

/// Criteria resolved into typed constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonFilter {
    residency: Option<Residency>,
    mess_food: Option<bool>,
    batch: Option<String>,
    course: Option<String>,
    room: Option<String>,
    search: Option<String>,
}

fn constraint(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
}

impl From<&FilterCriteria> for PersonFilter {
    fn from(criteria: &FilterCriteria) -> Self {
        let mess_food = constraint(&criteria.mess_food).and_then(|v| {
            match v.to_ascii_lowercase().as_str() {
                "yes" | "true" => Some(true),
                "no" | "false" => Some(false),
                _ => None,
            }
        });

        Self {
            residency: constraint(&criteria.residency).and_then(Residency::parse),
            mess_food,
            batch: constraint(&criteria.batch).map(str::to_string),
            course: constraint(&criteria.course).map(str::to_lowercase),
            room: constraint(&criteria.room).map(str::to_string),
            search: criteria
                .search
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_lowercase),
        }
    }
}

impl PersonFilter {
    /// All set constraints must hold; search matches any of name, email,
    /// roll number or team name.
    pub fn matches(&self, person: &Person) -> bool {
        if self.residency.is_some_and(|r| person.residency != r) {
            return false;
        }
        if self.mess_food.is_some_and(|m| person.mess_food != m) {
            return false;
        }
        if self.batch.as_ref().is_some_and(|b| &person.batch != b) {
            return false;
        }
        if self
            .course
            .as_ref()
            .is_some_and(|c| &person.course.to_lowercase() != c)
        {
            return false;
        }
        if self.room.as_ref().is_some_and(|r| &person.room_number != r) {
            return false;
        }
        if let Some(query) = &self.search {
            let hit = [
                &person.name,
                &person.email,
                &person.roll_number,
                &person.team_name,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(query.as_str()));
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Narrow `people` to those matching `criteria`, keeping their order.
pub fn filter(people: &[Person], criteria: &FilterCriteria) -> Vec<Person> {
    let filter = PersonFilter::from(criteria);
    people
        .iter()
        .filter(|p| filter.matches(p))
        .cloned()
        .collect()
}
