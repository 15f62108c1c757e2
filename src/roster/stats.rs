//! Dashboard summary counters.

use serde::{Deserialize, Serialize};

use crate::models::{Person, Residency, Team};

/// Global counters shown on the dashboard regardless of the active filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_teams: usize,
    pub total_people: usize,
    pub day_scholars: usize,
    pub hostellers: usize,
    pub mess_opted: usize,
    #[serde(rename = "batch2024")]
    pub batch_2024: usize,
    #[serde(rename = "batch2025")]
    pub batch_2025: usize,
    pub batch_other: usize,
    pub boards_given: usize,
}

/// Summarize the unfiltered people and the raw teams they came from.
///
/// Batch counts use substring matching since batch is free text; a batch
/// containing both years is counted twice and `batch_other` saturates at 0.
pub fn summarize(people: &[Person], teams: &[Team]) -> Stats {
    let mut stats = Stats {
        total_teams: teams.len(),
        total_people: people.len(),
        boards_given: teams.iter().filter(|t| t.extension_board_given).count(),
        ..Stats::default()
    };

    for person in people {
        match person.residency {
            Residency::DayScholar => stats.day_scholars += 1,
            Residency::Hosteller => stats.hostellers += 1,
        }
        if person.mess_food {
            stats.mess_opted += 1;
        }
        if person.batch.contains("2024") {
            stats.batch_2024 += 1;
        }
        if person.batch.contains("2025") {
            stats.batch_2025 += 1;
        }
    }

    stats.batch_other = stats
        .total_people
        .saturating_sub(stats.batch_2024 + stats.batch_2025);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::fixtures::{alpha, SAMPLE};
    use crate::roster::flatten;

    #[test]
    fn test_summarize_alpha_scenario() {
        let teams = vec![alpha()];
        let stats = summarize(&flatten(&teams), &teams);

        assert_eq!(stats.total_teams, 1);
        assert_eq!(stats.total_people, 3);
        assert_eq!(stats.hostellers, 1);
        assert_eq!(stats.day_scholars, 2);
        assert_eq!(stats.mess_opted, 1);
        assert_eq!(stats.boards_given, 0);
    }

    #[test]
    fn test_summarize_sample() {
        let people = flatten(&SAMPLE);
        let stats = summarize(&people, &SAMPLE);

        assert_eq!(stats.total_teams, 3);
        assert_eq!(stats.total_people, 8);
        assert_eq!(stats.day_scholars + stats.hostellers, stats.total_people);
        assert_eq!(stats.mess_opted, 2);
        assert_eq!(stats.batch_2024, 6);
        assert_eq!(stats.batch_2025, 1);
        assert_eq!(stats.batch_other, 1);
        assert_eq!(stats.boards_given, 1);
    }

    #[test]
    fn test_batch_matching_is_substring() {
        let mut team = alpha();
        team.leader_batch = Some("Batch of 2024-25".to_string());
        team.members[0].batch = Some("2024/2025".to_string());
        let teams = vec![team];
        let stats = summarize(&flatten(&teams), &teams);

        assert_eq!(stats.batch_2024, 3);
        assert_eq!(stats.batch_2025, 1);
        assert_eq!(stats.batch_other, 0);
    }

    #[test]
    fn test_stats_serialize_with_dashboard_names() {
        let json = serde_json::to_value(Stats::default()).unwrap();
        assert!(json.get("batch2024").is_some());
        assert!(json.get("messOpted").is_some());
        assert!(json.get("boardsGiven").is_some());
    }
}
