//! Registration flow — progress resolution over a stored registration record
//! and the session controller that turns it into UI flow decisions.

pub mod controller;
pub mod form;
pub mod identity;
pub mod model;
pub mod progress;
pub mod routes;

pub use controller::{FlowDirective, RegistrationSessionController, SessionView};
pub use form::RegistrationForm;
pub use identity::{CurrentIdentity, Identity};
pub use model::{RegistrationRecord, TeamMembership};
pub use progress::{ProgressState, Resolution, resolve};
pub use routes::{RegistrationRouteState, registration_routes};
