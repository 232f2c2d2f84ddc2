//! Registration record and team-membership models.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The payment provider's terminal success value.
pub const PAYMENT_CAPTURED: &str = "captured";

/// Raw flag values as stored in registration documents.
pub mod flags {
    /// Team membership not evaluated yet.
    pub const TEAM_UNASSIGNED: i64 = -1;
    /// Explicitly not on a team.
    pub const TEAM_NONE: i64 = 0;
    /// Confirmed team member.
    pub const TEAM_MEMBER: i64 = 1;
    /// Member also leads their team.
    pub const TEAM_LEAD: i64 = 1;
    /// Consent (code of conduct, terms) acknowledged.
    pub const CONSENT_GIVEN: i64 = 1;
    /// Stand-in for an `isTeamMember` value that is not an integer.
    pub const TEAM_UNRECOGNIZED: i64 = i64::MIN;
}

/// Team membership, decoded from the stored tri-state `isTeamMember` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamMembership {
    /// Not evaluated yet (`-1`).
    Unassigned,
    /// Explicitly not on a team (`0`).
    NotOnTeam,
    /// Confirmed team member (`1`).
    Member,
}

impl TeamMembership {
    /// Decode a raw flag. Returns `None` for values outside the tri-state vocabulary.
    pub fn from_flag(flag: i64) -> Option<Self> {
        match flag {
            flags::TEAM_UNASSIGNED => Some(Self::Unassigned),
            flags::TEAM_NONE => Some(Self::NotOnTeam),
            flags::TEAM_MEMBER => Some(Self::Member),
            _ => None,
        }
    }

    /// The raw flag written to the store.
    pub fn flag(&self) -> i64 {
        match self {
            Self::Unassigned => flags::TEAM_UNASSIGNED,
            Self::NotOnTeam => flags::TEAM_NONE,
            Self::Member => flags::TEAM_MEMBER,
        }
    }
}

impl std::fmt::Display for TeamMembership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unassigned => write!(f, "unassigned"),
            Self::NotOnTeam => write!(f, "not_on_team"),
            Self::Member => write!(f, "member"),
        }
    }
}

/// One registration per user, stored in the registrations collection keyed by user id.
///
/// Decoding is permissive. Missing, `null` or wrongly typed fields fall back to
/// their defaults: empty strings, no payment status, no accommodation answer,
/// `0` for consent and `isTeamLead`. A missing `isTeamMember` is unassigned; a
/// non-integer one decodes to [`flags::TEAM_UNRECOGNIZED`]. Only a document
/// that is not a JSON object fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    /// Document key; not part of the stored body.
    #[serde(skip)]
    pub user_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub email: String,
    /// Written by the payment webhook, never by this service.
    #[serde(
        default,
        rename = "payment_status",
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub payment_status: Option<String>,
    #[serde(default = "unassigned", deserialize_with = "team_member_flag")]
    pub is_team_member: i64,
    #[serde(default, deserialize_with = "team_lead_flag")]
    pub is_team_lead: i64,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub display_picture: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub coc: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub terms: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub university: String,
    #[serde(default, deserialize_with = "lenient")]
    pub other_university: String,
    #[serde(default, deserialize_with = "lenient")]
    pub gender: String,
    #[serde(default, deserialize_with = "lenient")]
    pub social_profile: String,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub accommodation: Option<i64>,
}

/// Key older writers used for the payment status.
const LEGACY_PAYMENT_STATUS: &str = "paymentStatus";

fn unassigned() -> i64 {
    flags::TEAM_UNASSIGNED
}

/// Decode `T`, falling back to its default on `null` or a mismatched type.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Integral JSON numbers, including floats with no fractional part.
fn integral(value: &Value) -> Option<i64> {
    let Value::Number(number) = value else {
        return None;
    };
    number.as_i64().or_else(|| {
        number
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= 9_007_199_254_740_992.0)
            .map(|f| f as i64)
    })
}

fn team_member_flag<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(flags::TEAM_UNASSIGNED);
    }
    Ok(integral(&value).unwrap_or(flags::TEAM_UNRECOGNIZED))
}

fn team_lead_flag<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(integral(&value).unwrap_or(0))
}

impl Default for RegistrationRecord {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            payment_status: None,
            is_team_member: flags::TEAM_UNASSIGNED,
            is_team_lead: 0,
            display_picture: None,
            coc: 0,
            terms: 0,
            university: String::new(),
            other_university: String::new(),
            gender: String::new(),
            social_profile: String::new(),
            accommodation: None,
        }
    }
}

impl RegistrationRecord {
    /// Decode a stored document body for `user_id`.
    ///
    /// When both payment status keys are present, `payment_status` wins.
    pub fn from_document(user_id: &str, mut document: Value) -> Result<Self, serde_json::Error> {
        let Some(fields) = document.as_object_mut() else {
            return Err(serde::de::Error::custom(
                "registration document is not a JSON object",
            ));
        };
        if let Some(legacy) = fields.remove(LEGACY_PAYMENT_STATUS) {
            fields.entry("payment_status").or_insert(legacy);
        }

        let mut record: Self = serde_json::from_value(document)?;
        record.user_id = user_id.to_string();
        Ok(record)
    }

    /// Encode the record as a document body.
    pub fn to_document(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Whether the payment provider reported the payment as captured.
    pub fn is_payment_captured(&self) -> bool {
        self.payment_status.as_deref() == Some(PAYMENT_CAPTURED)
    }

    /// Whether first name, last name and email are all present.
    pub fn has_identity_fields(&self) -> bool {
        !self.first_name.is_empty() && !self.last_name.is_empty() && !self.email.is_empty()
    }

    /// Decoded team membership, `None` when the stored flag is unrecognized.
    pub fn team_membership(&self) -> Option<TeamMembership> {
        TeamMembership::from_flag(self.is_team_member)
    }

    pub fn is_team_lead(&self) -> bool {
        self.is_team_lead == flags::TEAM_LEAD
    }
}
