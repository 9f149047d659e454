//! Suggestions raised by consumers and the vote ledger embedded in each.
//!
//! A suggestion keeps aggregate like/dislike counters next to a ledger that
//! records the current direction of every voter. [`Suggestion::cast_vote`]
//! is the only mutation path, so the counters move in lockstep with the
//! ledger: one entry per voter, flips move a single vote between counters.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, PropertyId, SuggestionId};

/// Maximum length of suggestion text in characters.
pub const SUGGESTION_TEXT_MAX: usize = 2000;

/// Direction of a single vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Wire name (`up` / `down`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteDirection {
    type Err = SuggestionValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(SuggestionValidationError::UnknownDirection(other.to_owned())),
        }
    }
}

/// Review state assigned by the owning developer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl SuggestionStatus {
    /// Stored/wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for SuggestionStatus {
    type Err = SuggestionValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(SuggestionValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

/// Validation errors for suggestion inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SuggestionValidationError {
    #[error("suggestion text must not be empty")]
    EmptyText,
    #[error("suggestion text must be at most {max} characters")]
    TextTooLong { max: usize },
    #[error("vote must be up or down, got '{0}'")]
    UnknownDirection(String),
    #[error("status must be pending, approved or rejected, got '{0}'")]
    UnknownStatus(String),
}

/// Trimmed, non-empty suggestion body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionText(String);

impl SuggestionText {
    /// Validate suggestion text.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SuggestionValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(SuggestionValidationError::EmptyText);
        }
        if trimmed.chars().count() > SUGGESTION_TEXT_MAX {
            return Err(SuggestionValidationError::TextTooLong {
                max: SUGGESTION_TEXT_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for SuggestionText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// One voter's current direction. Serialised as `{"userId":7,"vote":"up"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteEntry {
    pub user_id: AccountId,
    pub vote: VoteDirection,
}

/// Raised when a ledger would hold two entries for the same voter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("voter {0} appears more than once in the ledger")]
pub struct DuplicateVoter(pub AccountId);

/// Per-suggestion record of who voted which way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VoteLedger {
    entries: Vec<VoteEntry>,
}

impl VoteLedger {
    /// Build a ledger, rejecting repeated voters.
    pub fn from_entries(entries: Vec<VoteEntry>) -> Result<Self, DuplicateVoter> {
        for (index, entry) in entries.iter().enumerate() {
            if entries
                .iter()
                .skip(index + 1)
                .any(|other| other.user_id == entry.user_id)
            {
                return Err(DuplicateVoter(entry.user_id));
            }
        }
        Ok(Self { entries })
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[VoteEntry] {
        &self.entries
    }

    /// Number of voters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nobody has voted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current direction recorded for `voter`.
    pub fn direction_of(&self, voter: AccountId) -> Option<VoteDirection> {
        self.entries
            .iter()
            .find(|entry| entry.user_id == voter)
            .map(|entry| entry.vote)
    }

    /// Counters implied by the ledger.
    pub fn tally(&self) -> VoteTally {
        self.entries
            .iter()
            .fold(VoteTally::default(), |tally, entry| match entry.vote {
                VoteDirection::Up => VoteTally {
                    likes: tally.likes + 1,
                    ..tally
                },
                VoteDirection::Down => VoteTally {
                    dislikes: tally.dislikes + 1,
                    ..tally
                },
            })
    }

    fn record(
        &mut self,
        voter: AccountId,
        direction: VoteDirection,
    ) -> Result<VoteChange, VoteRejected> {
        match self.entries.iter_mut().find(|entry| entry.user_id == voter) {
            Some(entry) if entry.vote == direction => Err(VoteRejected::AlreadyVoted(direction)),
            Some(entry) => {
                let from = entry.vote;
                entry.vote = direction;
                Ok(VoteChange::Flipped { from, to: direction })
            }
            None => {
                self.entries.push(VoteEntry {
                    user_id: voter,
                    vote: direction,
                });
                Ok(VoteChange::Added(direction))
            }
        }
    }
}

/// Aggregate like/dislike counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub likes: u32,
    pub dislikes: u32,
}

impl VoteTally {
    /// Total number of votes counted.
    pub fn total(self) -> u32 {
        self.likes + self.dislikes
    }

    fn apply(self, change: VoteChange) -> Self {
        match change {
            VoteChange::Added(VoteDirection::Up) => Self {
                likes: self.likes + 1,
                ..self
            },
            VoteChange::Added(VoteDirection::Down) => Self {
                dislikes: self.dislikes + 1,
                ..self
            },
            VoteChange::Flipped {
                from: VoteDirection::Up,
                to: VoteDirection::Down,
            } => Self {
                likes: self.likes.saturating_sub(1),
                dislikes: self.dislikes + 1,
            },
            VoteChange::Flipped {
                from: VoteDirection::Down,
                to: VoteDirection::Up,
            } => Self {
                likes: self.likes + 1,
                dislikes: self.dislikes.saturating_sub(1),
            },
            VoteChange::Flipped { .. } => self,
        }
    }
}

/// Effect of an accepted vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteChange {
    /// First vote from this voter.
    Added(VoteDirection),
    /// Voter switched direction.
    Flipped {
        from: VoteDirection,
        to: VoteDirection,
    },
}

/// Reasons a vote is refused without mutating anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VoteRejected {
    #[error("user has already voted {0} on this suggestion")]
    AlreadyVoted(VoteDirection),
}

/// Suggestion aggregate.
///
/// ## Invariants
/// - `ledger` holds at most one entry per voter.
/// - Starting from counters that match the ledger, every accepted
///   [`Suggestion::cast_vote`] keeps `tally == ledger.tally()`.
/// - `revision` increases by one per persisted vote and guards
///   compare-and-swap updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub id: SuggestionId,
    pub property_id: PropertyId,
    pub author_id: AccountId,
    pub text: SuggestionText,
    pub status: SuggestionStatus,
    pub created_at: DateTime<Utc>,
    pub tally: VoteTally,
    pub ledger: VoteLedger,
    pub revision: u32,
}

impl Suggestion {
    /// Record `voter`'s vote, updating ledger and counters together.
    ///
    /// # Examples
    /// ```
    /// # use chrono::Utc;
    /// use propertyhub::domain::{
    ///     AccountId, PropertyId, Suggestion, SuggestionId, SuggestionStatus, SuggestionText,
    ///     VoteDirection, VoteLedger, VoteTally,
    /// };
    ///
    /// let mut suggestion = Suggestion {
    ///     id: SuggestionId::new(3).unwrap(),
    ///     property_id: PropertyId::new(1).unwrap(),
    ///     author_id: AccountId::new(2).unwrap(),
    ///     text: SuggestionText::new("Add a play area").unwrap(),
    ///     status: SuggestionStatus::Pending,
    ///     created_at: Utc::now(),
    ///     tally: VoteTally { likes: 2, dislikes: 1 },
    ///     ledger: VoteLedger::default(),
    ///     revision: 0,
    /// };
    /// let voter = AccountId::new(7).unwrap();
    /// suggestion.cast_vote(voter, VoteDirection::Up).unwrap();
    /// assert_eq!(suggestion.tally, VoteTally { likes: 3, dislikes: 1 });
    /// assert_eq!(suggestion.ledger.direction_of(voter), Some(VoteDirection::Up));
    /// ```
    pub fn cast_vote(
        &mut self,
        voter: AccountId,
        direction: VoteDirection,
    ) -> Result<VoteChange, VoteRejected> {
        let change = self.ledger.record(voter, direction)?;
        self.tally = self.tally.apply(change);
        Ok(change)
    }
}

/// Insert payload for a new suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSuggestion {
    pub property_id: PropertyId,
    pub author_id: AccountId,
    pub text: SuggestionText,
    pub created_at: DateTime<Utc>,
}
