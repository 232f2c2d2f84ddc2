//! Registration progress resolver: classifies a stored record into exactly
//! one onboarding stage.
//!
//! Classification runs an ordered rule table; the first rule that matches
//! wins. The order is part of the contract: payment gates everything, then
//! identity fields, then team assignment, and team lead is checked before
//! plain membership.

use serde::{Deserialize, Serialize};

use super::model::{RegistrationRecord, TeamMembership};

/// The stage a user has reached in the registration pipeline.
///
/// Variants are listed in the order of the checks that produce them, not by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressState {
    NoApplication,
    PaymentPending,
    IncompleteRegistration,
    NotYetTeamMember,
    CompleteRegistration,
    CompleteRegistrationTeamLead,
}

impl std::fmt::Display for ProgressState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NoApplication => "no_application",
            Self::PaymentPending => "payment_pending",
            Self::IncompleteRegistration => "incomplete_registration",
            Self::NotYetTeamMember => "not_yet_team_member",
            Self::CompleteRegistration => "complete_registration",
            Self::CompleteRegistrationTeamLead => "complete_registration_team_lead",
        };
        write!(f, "{s}")
    }
}

/// A named classification rule.
pub struct Rule {
    pub name: &'static str,
    pub state: ProgressState,
    matches: fn(&RegistrationRecord) -> bool,
}

impl Rule {
    pub fn matches(&self, record: &RegistrationRecord) -> bool {
        (self.matches)(record)
    }
}

/// Rule name reported when no record exists.
pub const NO_RECORD_RULE: &str = "no_record";

/// Rule name reported when no rule in [`RULES`] matched.
pub const FALLBACK_RULE: &str = "fallback";

/// Rules applied to an existing record, in precedence order.
pub static RULES: &[Rule] = &[
    Rule {
        name: "payment_not_captured",
        state: ProgressState::PaymentPending,
        matches: |r| !r.is_payment_captured(),
    },
    Rule {
        name: "identity_fields_missing",
        state: ProgressState::IncompleteRegistration,
        matches: |r| !r.has_identity_fields(),
    },
    Rule {
        name: "team_not_assigned",
        state: ProgressState::NotYetTeamMember,
        matches: |r| {
            matches!(
                r.team_membership(),
                Some(TeamMembership::Unassigned | TeamMembership::NotOnTeam)
            )
        },
    },
    Rule {
        name: "team_lead",
        state: ProgressState::CompleteRegistrationTeamLead,
        matches: |r| r.is_team_lead(),
    },
    Rule {
        name: "team_member",
        state: ProgressState::CompleteRegistration,
        matches: |r| r.team_membership() == Some(TeamMembership::Member),
    },
];

/// Outcome of a resolution together with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub state: ProgressState,
    pub rule: &'static str,
}

/// Classify a record, reporting which rule matched.
pub fn explain(record: Option<&RegistrationRecord>) -> Resolution {
    let Some(record) = record else {
        return Resolution {
            state: ProgressState::NoApplication,
            rule: NO_RECORD_RULE,
        };
    };

    RULES
        .iter()
        .find(|rule| rule.matches(record))
        .map(|rule| Resolution {
            state: rule.state,
            rule: rule.name,
        })
        // Unrecognized team flag without lead status.
        .unwrap_or(Resolution {
            state: ProgressState::NotYetTeamMember,
            rule: FALLBACK_RULE,
        })
}

/// Classify a record.
pub fn resolve(record: Option<&RegistrationRecord>) -> ProgressState {
    explain(record).state
}

/// Classify the outcome of a record lookup.
///
/// A failed lookup is indistinguishable from "never registered" to the
/// caller, so it resolves to `NoApplication` and lets the user re-enter the form.
pub fn resolve_lookup<E: std::fmt::Display>(
    lookup: Result<Option<RegistrationRecord>, E>,
) -> Resolution {
    match lookup {
        Ok(record) => explain(record.as_ref()),
        Err(e) => {
            tracing::warn!(error = %e, "Registration lookup failed, treating as no application");
            Resolution {
                state: ProgressState::NoApplication,
                rule: NO_RECORD_RULE,
            }
        }
    }
}
