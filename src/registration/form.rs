//! Registration form fields and record construction.

use serde::{Deserialize, Serialize};

use super::identity::Identity;
use super::model::{RegistrationRecord, TeamMembership, flags};

/// Fields a user can submit through the registration form.
///
/// Unknown keys in a submitted body are dropped, so a client cannot set
/// consent, team or payment fields through the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub university: String,
    pub other_university: String,
    pub gender: String,
    pub social_profile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accommodation: Option<i64>,
}

impl RegistrationForm {
    /// A form prefilled from the identity's display name and email.
    ///
    /// The first word of the display name becomes the first name and the
    /// remainder the last name.
    pub fn prefill(identity: &Identity) -> Self {
        let display_name = identity.display_name.as_deref().unwrap_or("").trim();
        let (first_name, last_name) = match display_name.split_once(char::is_whitespace) {
            Some((first, rest)) => (first, rest.trim_start()),
            // Single-word name: last name stays empty instead of repeating the word.
            None => (display_name, ""),
        };

        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: identity.email.clone().unwrap_or_default(),
            ..Default::default()
        }
    }

    /// Build the record written on submission.
    ///
    /// Consent is recorded, team status is reset to unassigned and no
    /// payment status is carried over.
    pub fn into_record(self, identity: &Identity) -> RegistrationRecord {
        RegistrationRecord {
            user_id: identity.id.clone(),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            payment_status: None,
            is_team_member: TeamMembership::Unassigned.flag(),
            is_team_lead: 0,
            display_picture: Some(identity.photo_url.clone().unwrap_or_default()),
            coc: flags::CONSENT_GIVEN,
            terms: flags::CONSENT_GIVEN,
            university: self.university,
            other_university: self.other_university,
            gender: self.gender,
            social_profile: self.social_profile,
            accommodation: self.accommodation,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn prefill_splits_display_name() {
        let identity = Identity::new("u1")
            .with_display_name("Ada King Lovelace")
            .with_email("ada@example.com");
        let form = RegistrationForm::prefill(&identity);
        assert_eq!(form.first_name, "Ada");
        assert_eq!(form.last_name, "King Lovelace");
        assert_eq!(form.email, "ada@example.com");
        assert!(form.university.is_empty());
    }

    #[test]
    fn prefill_single_word_name() {
        let form = RegistrationForm::prefill(&Identity::new("u1").with_display_name("Prince"));
        assert_eq!(form.first_name, "Prince");
        assert_eq!(form.last_name, "");
        assert_eq!(form.email, "");
    }

    #[test]
    fn prefill_without_profile() {
        let form = RegistrationForm::prefill(&Identity::new("u1"));
        assert_eq!(form, RegistrationForm::default());
    }

    #[test]
    fn record_forces_fixed_fields() {
        let identity = Identity::new("u1").with_photo_url("https://img/u1.png");
        let form = RegistrationForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            gender: "She/Her".into(),
            accommodation: Some(1),
            ..Default::default()
        };

        let record = form.into_record(&identity);
        assert_eq!(record.user_id, "u1");
        assert_eq!(record.is_team_member, -1);
        assert_eq!(record.is_team_lead, 0);
        assert_eq!(record.coc, 1);
        assert_eq!(record.terms, 1);
        assert_eq!(record.payment_status, None);
        assert_eq!(record.display_picture.as_deref(), Some("https://img/u1.png"));
        assert_eq!(record.gender, "She/Her");
        assert_eq!(record.accommodation, Some(1));
    }

    #[test]
    fn display_picture_defaults_to_empty() {
        let record = RegistrationForm::default().into_record(&Identity::new("u1"));
        assert_eq!(record.display_picture.as_deref(), Some(""));
    }

    #[test]
    fn submitted_privileged_fields_are_dropped() {
        let form: RegistrationForm = serde_json::from_value(json!({
            "firstName": "Ada",
            "isTeamMember": 1,
            "isTeamLead": 1,
            "coc": 0,
            "terms": 0,
            "payment_status": "captured",
            "displayPicture": "https://evil/img.png"
        }))
        .unwrap();

        let record = form.into_record(&Identity::new("u1"));
        assert_eq!(record.first_name, "Ada");
        assert_eq!(record.is_team_member, -1);
        assert_eq!(record.is_team_lead, 0);
        assert_eq!(record.coc, 1);
        assert_eq!(record.terms, 1);
        assert!(!record.is_payment_captured());
        assert_eq!(record.display_picture.as_deref(), Some(""));
    }
}
