//! Onboarding wizard: step machine, collected state, and the coordinator.

pub mod coordinator;
pub mod model;
pub mod plans;
pub mod state;

pub use coordinator::{OnboardingCoordinator, StepPayload, SyncEvent};
pub use model::{CompanyInfo, OnboardingState, OrganisationDetails, Participant, SelectedPlan};
pub use plans::{PLANS, Plan};
pub use state::{OnboardingStep, UserType};
