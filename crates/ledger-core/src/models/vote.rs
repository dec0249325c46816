//! Availability votes, tallies, and the consensus predicate

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::Error;

/// A participant's availability for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteStatus {
    Yes,
    No,
    Maybe,
}

impl VoteStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Maybe => "maybe",
        }
    }
}

impl fmt::Display for VoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            "maybe" => Ok(Self::Maybe),
            other => Err(Error::InvalidInput(format!(
                "unknown vote status '{other}' (expected yes, no, or maybe)"
            ))),
        }
    }
}

/// A single vote as stored in the session's `votes` blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub name: String,
    pub status: VoteStatus,
    /// Unix ms
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: i64,
    #[serde(
        rename = "uid",
        alias = "participantId",
        default,
        deserialize_with = "null_as_default"
    )]
    pub participant_id: String,
}

/// Vote counts for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub yes: usize,
    pub no: usize,
    pub maybe: usize,
    pub total: usize,
}

/// Votes keyed by voter display name.
///
/// Keying by name means a renamed participant casts a fresh vote instead of
/// migrating the old one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Votes(BTreeMap<String, Vote>);

impl Votes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the vote for `vote.name`
    pub fn cast(&mut self, vote: Vote) {
        self.0.insert(vote.name.clone(), vote);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Vote> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vote> {
        self.0.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn tally(&self) -> Tally {
        self.iter().fold(
            Tally {
                total: self.len(),
                ..Tally::default()
            },
            |mut tally, vote| {
                match vote.status {
                    VoteStatus::Yes => tally.yes += 1,
                    VoteStatus::No => tally.no += 1,
                    VoteStatus::Maybe => tally.maybe += 1,
                }
                tally
            },
        )
    }

    /// "Stars aligned": more than one yes and nobody declining or hedging.
    #[must_use]
    pub fn consensus_reached(&self) -> bool {
        let tally = self.tally();
        tally.yes > 1 && tally.no == 0 && tally.maybe == 0 && tally.total > 1
    }
}

impl FromIterator<Vote> for Votes {
    fn from_iter<I: IntoIterator<Item = Vote>>(iter: I) -> Self {
        let mut votes = Self::new();
        for vote in iter {
            votes.cast(vote);
        }
        votes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vote(name: &str, status: VoteStatus) -> Vote {
        Vote {
            name: name.to_string(),
            status,
            timestamp: 1,
            participant_id: format!("{name}-id"),
        }
    }

    fn votes(entries: &[(&str, VoteStatus)]) -> Votes {
        entries
            .iter()
            .map(|(name, status)| vote(name, *status))
            .collect()
    }

    #[test]
    fn tally_counts_each_status() {
        let votes = votes(&[
            ("A", VoteStatus::Yes),
            ("B", VoteStatus::Yes),
            ("C", VoteStatus::No),
            ("D", VoteStatus::Maybe),
        ]);
        assert_eq!(
            votes.tally(),
            Tally {
                yes: 2,
                no: 1,
                maybe: 1,
                total: 4
            }
        );
    }

    #[test]
    fn tally_sums_to_distinct_voters() {
        let mut votes = votes(&[("A", VoteStatus::Yes), ("B", VoteStatus::Maybe)]);
        votes.cast(vote("A", VoteStatus::No));
        let tally = votes.tally();
        assert_eq!(tally.total, 2);
        assert_eq!(tally.yes + tally.no + tally.maybe, tally.total);
    }

    #[test]
    fn empty_votes_tally_to_zero() {
        assert_eq!(Votes::new().tally(), Tally::default());
        assert!(!Votes::new().consensus_reached());
    }

    #[test]
    fn consensus_requires_two_yes_and_no_dissent() {
        assert!(votes(&[("A", VoteStatus::Yes), ("B", VoteStatus::Yes)]).consensus_reached());
        assert!(!votes(&[("A", VoteStatus::Yes)]).consensus_reached());
        assert!(!votes(&[
            ("A", VoteStatus::Yes),
            ("B", VoteStatus::Yes),
            ("C", VoteStatus::No)
        ])
        .consensus_reached());
        assert!(!votes(&[
            ("A", VoteStatus::Yes),
            ("B", VoteStatus::Yes),
            ("C", VoteStatus::Maybe)
        ])
        .consensus_reached());
    }

    #[test]
    fn consensus_matches_predicate_for_small_combinations() {
        let statuses = [VoteStatus::Yes, VoteStatus::No, VoteStatus::Maybe];
        for size in 0..=3usize {
            let mut combos: Vec<Vec<VoteStatus>> = vec![Vec::new()];
            for _ in 0..size {
                combos = combos
                    .into_iter()
                    .flat_map(|combo| {
                        statuses.iter().map(move |status| {
                            let mut next = combo.clone();
                            next.push(*status);
                            next
                        })
                    })
                    .collect();
            }

            for combo in combos {
                let votes: Votes = combo
                    .iter()
                    .enumerate()
                    .map(|(index, status)| vote(&format!("voter-{index}"), *status))
                    .collect();
                let yes = combo.iter().filter(|s| **s == VoteStatus::Yes).count();
                let expected = yes > 1 && yes == combo.len();
                assert_eq!(votes.consensus_reached(), expected, "combo {combo:?}");
            }
        }
    }

    #[test]
    fn vote_reads_uid_or_participant_id() {
        let stored: Vote =
            serde_json::from_str(r#"{"name":"A","status":"yes","timestamp":5,"uid":"u-1"}"#)
                .unwrap();
        assert_eq!(stored.participant_id, "u-1");

        let aliased: Vote = serde_json::from_str(
            r#"{"name":"A","status":"maybe","timestamp":5,"participantId":"u-2"}"#,
        )
        .unwrap();
        assert_eq!(aliased.participant_id, "u-2");
        assert_eq!(aliased.status, VoteStatus::Maybe);

        let written = serde_json::to_value(&stored).unwrap();
        assert_eq!(written["uid"], "u-1");
    }

    #[test]
    fn vote_status_parses_case_insensitively() {
        assert_eq!("YES".parse::<VoteStatus>().unwrap(), VoteStatus::Yes);
        assert_eq!(" maybe ".parse::<VoteStatus>().unwrap(), VoteStatus::Maybe);
        assert!("perhaps".parse::<VoteStatus>().is_err());
    }
}
