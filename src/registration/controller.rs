//! RegistrationSessionController — maps a user's stored registration onto
//! the flow branch the UI should take, and owns the submission write path.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;
use crate::store::DocumentStore;

use super::form::RegistrationForm;
use super::identity::Identity;
use super::model::RegistrationRecord;
use super::progress::{self, ProgressState, Resolution};

/// What the UI should do for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "directive", rename_all = "snake_case")]
pub enum FlowDirective {
    RedirectToLogin,
    RedirectToConfirmationPage,
    ShowForm,
    /// `is_self` is true when the waiting screen is about the caller's own registration.
    ShowWaitingForTeamAssignment { is_self: bool },
    ShowPaymentPrompt,
    ShowCompletionCelebration { is_team_lead: bool },
}

impl From<ProgressState> for FlowDirective {
    fn from(state: ProgressState) -> Self {
        match state {
            ProgressState::NoApplication => Self::ShowForm,
            ProgressState::PaymentPending => Self::ShowPaymentPrompt,
            ProgressState::IncompleteRegistration => Self::RedirectToConfirmationPage,
            ProgressState::NotYetTeamMember => Self::ShowWaitingForTeamAssignment { is_self: true },
            ProgressState::CompleteRegistration => {
                Self::ShowCompletionCelebration { is_team_lead: false }
            }
            ProgressState::CompleteRegistrationTeamLead => {
                Self::ShowCompletionCelebration { is_team_lead: true }
            }
        }
    }
}

impl std::fmt::Display for FlowDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RedirectToLogin => write!(f, "redirect_to_login"),
            Self::RedirectToConfirmationPage => write!(f, "redirect_to_confirmation_page"),
            Self::ShowForm => write!(f, "show_form"),
            Self::ShowWaitingForTeamAssignment { .. } => {
                write!(f, "show_waiting_for_team_assignment")
            }
            Self::ShowPaymentPrompt => write!(f, "show_payment_prompt"),
            Self::ShowCompletionCelebration { .. } => write!(f, "show_completion_celebration"),
        }
    }
}

/// A session's directive together with the resolution behind it.
///
/// Serializes flat: `{"directive": ..., "state": ..., "rule": ...}`. The
/// resolution is absent when there is no identity to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub directive: FlowDirective,
    #[serde(flatten)]
    pub resolution: Option<Resolution>,
}

/// Resolves registration progress per session and writes submissions.
pub struct RegistrationSessionController {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl RegistrationSessionController {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Load and decode the caller's record.
    pub async fn load_record(
        &self,
        user_id: &str,
    ) -> Result<Option<RegistrationRecord>, RegistrationError> {
        let document = self
            .store
            .get(&self.collection, user_id)
            .await
            .map_err(RegistrationError::StoreUnavailable)?;

        document
            .map(|doc| {
                RegistrationRecord::from_document(user_id, doc).map_err(|e| {
                    RegistrationError::MalformedRecord {
                        user_id: user_id.to_string(),
                        reason: e.to_string(),
                    }
                })
            })
            .transpose()
    }

    /// Resolve the caller's progress. Lookup failures resolve to `NoApplication`.
    pub async fn progress(&self, identity: &Identity) -> Resolution {
        let resolution = progress::resolve_lookup(self.load_record(&identity.id).await);
        tracing::debug!(
            user_id = %identity.id,
            state = %resolution.state,
            rule = resolution.rule,
            "Registration progress resolved"
        );
        resolution
    }

    /// Decide the flow branch on session start.
    pub async fn enter(&self, identity: Option<&Identity>) -> FlowDirective {
        self.session(identity).await.directive
    }

    /// Like [`enter`](Self::enter), also reporting the state and matched rule.
    pub async fn session(&self, identity: Option<&Identity>) -> SessionView {
        let Some(identity) = identity else {
            return SessionView {
                directive: FlowDirective::RedirectToLogin,
                resolution: None,
            };
        };
        let resolution = self.progress(identity).await;
        let directive = FlowDirective::from(resolution.state);
        tracing::debug!(user_id = %identity.id, directive = %directive, "Session entered");
        SessionView {
            directive,
            resolution: Some(resolution),
        }
    }

    /// A form prefilled from the caller's identity.
    pub fn prefilled_form(&self, identity: &Identity) -> RegistrationForm {
        RegistrationForm::prefill(identity)
    }

    /// Persist a submission and return the directive that follows it.
    ///
    /// Performs exactly one write. The written record never carries a payment
    /// status, so a successful submission always resolves to the payment prompt.
    pub async fn submit(
        &self,
        identity: &Identity,
        form: RegistrationForm,
    ) -> Result<FlowDirective, RegistrationError> {
        let record = form.into_record(identity);
        let document = record
            .to_document()
            .map_err(|e| RegistrationError::InvalidRecord(e.to_string()))?;

        if let Err(e) = self.store.put(&self.collection, &identity.id, &document).await {
            tracing::warn!(user_id = %identity.id, error = %e, "Registration write failed");
            return Err(RegistrationError::StoreUnavailable(e));
        }

        let state = progress::resolve(Some(&record));
        let directive = FlowDirective::from(state);
        tracing::info!(
            user_id = %identity.id,
            state = %state,
            directive = %directive,
            "Registration submitted"
        );
        Ok(directive)
    }
}
