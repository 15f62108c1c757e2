//! Expansion of teams into one [`Person`] per leader and member.

use crate::models::{Member, Person, Role, Team};

/// Flatten teams into people: for each team in order, the leader first and
/// then its members in stored order.
///
/// Team-level fields are copied, so the result is a snapshot. Missing
/// optional fields become empty strings or `false`.
pub fn flatten(teams: &[Team]) -> Vec<Person> {
    let capacity = teams.iter().map(|t| 1 + t.members.len()).sum();
    let mut people = Vec::with_capacity(capacity);

    for team in teams {
        people.push(person(team, &team.leader(), Role::Leader, 0));
        for (i, member) in team.members.iter().enumerate() {
            people.push(person(team, member, Role::Member, i + 1));
        }
    }

    people
}

fn person(team: &Team, member: &Member, role: Role, index: usize) -> Person {
    Person {
        name: member.name.clone(),
        email: member.email.clone(),
        whats_app: member.whats_app.clone(),
        roll_number: member.roll_number.clone(),
        course: member
            .course
            .map(|c| c.as_str().to_string())
            .unwrap_or_default(),
        batch: member.batch.clone().unwrap_or_default(),
        residency: member.residency,
        mess_food: member.opted_mess_food(),
        role,
        index,
        team_name: team.team_name.clone(),
        team_id: team.id.clone(),
        is_checked_in: team.is_checked_in,
        room_number: team.room_number.clone().unwrap_or_default(),
        extension_board_given: team.extension_board_given,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::roster::fixtures::{alpha, SAMPLE};

    #[test]
    fn test_flatten_alpha_scenario() {
        let people = flatten(&[alpha()]);

        assert_eq!(people.len(), 3);
        assert_eq!(people[0].role, Role::Leader);
        assert_eq!(people[0].name, "Asha");
        assert_eq!(people[1].name, "Ravi");
        assert_eq!(people[2].name, "Meera");
        assert!(people.iter().all(|p| p.team_name == "Alpha"));
    }

    #[test]
    fn test_flatten_length_matches_team_sizes() {
        let expected: usize = SAMPLE.iter().map(|t| 1 + t.members.len()).sum();
        assert_eq!(flatten(&SAMPLE).len(), expected);
        assert!(flatten(&[]).is_empty());
    }

    #[test]
    fn test_flatten_keeps_team_order_and_leader_first() {
        let people = flatten(&SAMPLE);

        let mut seen = Vec::new();
        for p in &people {
            if seen.last() != Some(&p.team_id) {
                assert!(!seen.contains(&p.team_id), "team {} split", p.team_id);
                assert_eq!(p.role, Role::Leader);
                seen.push(p.team_id.clone());
            } else {
                assert_eq!(p.role, Role::Member);
            }
        }
        let ids: Vec<_> = SAMPLE.iter().map(|t| t.id.clone()).collect();
        assert_eq!(seen, ids);
    }

    #[test]
    fn test_flatten_copies_team_fields_and_defaults() {
        let people = flatten(&SAMPLE);
        let zoya = people.iter().find(|p| p.name == "Zoya").unwrap();

        assert!(zoya.is_checked_in);
        assert!(zoya.extension_board_given);
        assert_eq!(zoya.room_number, "EB2 - 104");
        assert_eq!(zoya.course, "");
        assert_eq!(zoya.batch, "");
        assert!(!zoya.mess_food);

        let asha = &people[0];
        assert_eq!(asha.room_number, "");
        assert!(!asha.is_checked_in);
    }

    #[test]
    fn test_flatten_keys_are_unique() {
        let people = flatten(&SAMPLE);
        let keys: HashSet<_> = people.iter().map(Person::key).collect();
        assert_eq!(keys.len(), people.len());
    }
}
