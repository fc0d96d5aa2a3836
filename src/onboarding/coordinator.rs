//! Onboarding coordinator — applies step payloads, walks the transition
//! table, keeps the URL query string current, and syncs progress
//! server-side on a best-effort basis.
//!
//! Progress sync runs as a detached task per transition. Failures never
//! block or fail the transition; they are logged and pushed into an event
//! stream so the embedding UI (and tests) can observe them.

use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};

use crate::api::users::{NdisDetails, OnboardingStatus, ServiceProviderDetails};
use crate::api::wallets::NewWallet;
use crate::error::{OnboardingError, Result};
use crate::http::ApiClient;
use crate::onboarding::model::{
    CompanyInfo, OnboardingState, OrganisationDetails, Participant, SelectedPlan,
};
use crate::onboarding::plans;
use crate::onboarding::state::{OnboardingStep, UserType};

/// Form payload delivered when advancing out of a step. Interstitials take
/// [`StepPayload::Continue`].
#[derive(Debug, Clone)]
pub enum StepPayload {
    UserType(UserType),
    Ndis(NdisDetails),
    Participant(Participant),
    Provider(ServiceProviderDetails),
    Organisation(OrganisationDetails),
    Company(CompanyInfo),
    Plan(String),
    Wallet { name: String },
    Continue,
}

impl StepPayload {
    fn kind(&self) -> &'static str {
        match self {
            Self::UserType(_) => "user type",
            Self::Ndis(_) => "NDIS details",
            Self::Participant(_) => "participant",
            Self::Provider(_) => "provider details",
            Self::Organisation(_) => "organisation details",
            Self::Company(_) => "company info",
            Self::Plan(_) => "plan id",
            Self::Wallet { .. } => "wallet name",
            Self::Continue => "continue",
        }
    }
}

/// Observable outcome of a detached progress-sync task.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    StatusSyncFailed {
        step: OnboardingStep,
        message: String,
    },
}

/// Drives the onboarding wizard.
pub struct OnboardingCoordinator {
    client: Arc<ApiClient>,
    state: Arc<RwLock<OnboardingState>>,
    events: mpsc::UnboundedSender<SyncEvent>,
}

impl OnboardingCoordinator {
    /// Create a coordinator plus the receiver for its sync events.
    pub fn new(client: Arc<ApiClient>) -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let coordinator = Self {
            client,
            state: Arc::new(RwLock::new(OnboardingState::default())),
            events,
        };
        (coordinator, receiver)
    }

    /// Snapshot of the collected state.
    pub async fn state(&self) -> OnboardingState {
        self.state.read().await.clone()
    }

    pub async fn current_step(&self) -> OnboardingStep {
        self.state.read().await.step
    }

    pub async fn is_complete(&self) -> bool {
        self.state.read().await.step.is_terminal()
    }

    /// The query string to mirror into the URL after the last transition.
    pub async fn query_string(&self) -> String {
        self.state.read().await.to_query()
    }

    /// Resume from a reloaded page's query string (guards applied).
    pub async fn resume(&self, query: &str) -> OnboardingStep {
        let restored = OnboardingState::from_query(query);
        let step = restored.step;
        *self.state.write().await = restored;
        step
    }

    /// Apply `payload` to the current step and advance.
    ///
    /// Data steps persist their payload to the backend first (when a real
    /// session exists) and fail the transition if that call fails; the
    /// subsequent progress PATCH is detached and best-effort.
    pub async fn advance(&self, payload: StepPayload) -> Result<OnboardingStep> {
        let step = self.current_step().await;
        let authenticated = self.has_real_session().await;

        match (step, payload) {
            (OnboardingStep::AccountType, StepPayload::UserType(user_type)) => {
                self.state.write().await.user_type = Some(user_type);
            }
            (OnboardingStep::NdisDetails, StepPayload::Ndis(details)) => {
                if authenticated {
                    self.client.users().set_ndis_details(&details).await?;
                }
                self.state.write().await.ndis_details = Some(details);
            }
            (OnboardingStep::ParticipantInfo, StepPayload::Participant(participant)) => {
                self.state.write().await.participant = Some(participant);
            }
            (OnboardingStep::ParticipantSuccess, StepPayload::Continue) => {
                // Guard: the interstitial is meaningless without the data
                // it confirms (possible after a reload that lost state).
                if self.state.read().await.participant.is_none() {
                    self.state.write().await.step = OnboardingStep::ParticipantInfo;
                    return Err(OnboardingError::InvalidTransition {
                        step: step.to_string(),
                        reason: "participant data missing; returning to participant form".into(),
                    }
                    .into());
                }
            }
            (OnboardingStep::ProviderDetails, StepPayload::Provider(details)) => {
                if authenticated {
                    self.client
                        .users()
                        .set_service_provider_details(&details)
                        .await?;
                }
                self.state.write().await.provider_details = Some(details);
            }
            (OnboardingStep::OrganisationDetails, StepPayload::Organisation(details)) => {
                self.state.write().await.organisation_details = Some(details);
            }
            (OnboardingStep::CompanyInfo, StepPayload::Company(info)) => {
                self.state.write().await.company_info = Some(info);
            }
            (OnboardingStep::CompanyInfoSuccess, StepPayload::Continue) => {}
            (OnboardingStep::PlanSelection, StepPayload::Plan(plan_id)) => {
                let plan = plans::find(&plan_id)
                    .ok_or_else(|| OnboardingError::UnknownPlan(plan_id.clone()))?;
                // The free tier needs no subscription record.
                if !plan.is_free() && authenticated {
                    self.client
                        .subscriptions()
                        .subscribe(plan.id)
                        .await?;
                }
                self.state.write().await.selected_plan = Some(SelectedPlan::from(plan));
            }
            (OnboardingStep::PlanSuccess, StepPayload::Continue) => {}
            (OnboardingStep::WalletSetup, StepPayload::Wallet { name }) => {
                if authenticated {
                    let wallet = self
                        .client
                        .wallets()
                        .create(&NewWallet {
                            name,
                            owner_id: None,
                        })
                        .await?;
                    self.state.write().await.wallet_id = Some(wallet.id);
                }
            }
            (OnboardingStep::Complete, _) => {
                return Err(OnboardingError::InvalidTransition {
                    step: step.to_string(),
                    reason: "onboarding already complete".into(),
                }
                .into());
            }
            (step, payload) => {
                return Err(OnboardingError::MissingPayload {
                    step: step.to_string(),
                    missing: payload.kind().to_string(),
                }
                .into());
            }
        }

        let user_type = self.state.read().await.user_type.ok_or_else(|| {
            OnboardingError::InvalidTransition {
                step: step.to_string(),
                reason: "account type not selected".into(),
            }
        })?;
        let next = step
            .next(user_type)
            .ok_or_else(|| OnboardingError::InvalidTransition {
                step: step.to_string(),
                reason: "no next step".into(),
            })?;

        self.state.write().await.step = next;
        self.spawn_status_sync(next);
        Ok(next)
    }

    /// Shorthand for advancing out of the plan-selection step.
    pub async fn select_plan(&self, plan_id: &str) -> Result<OnboardingStep> {
        self.advance(StepPayload::Plan(plan_id.to_string())).await
    }

    /// Step backward along the branch taken. No-op on the first step.
    pub async fn back(&self) -> OnboardingStep {
        let mut state = self.state.write().await;
        let Some(user_type) = state.user_type else {
            return state.step;
        };
        if let Some(prev) = state.step.prev(user_type) {
            state.step = prev;
        }
        state.step
    }

    async fn has_real_session(&self) -> bool {
        match self.client.session().session().await {
            Some(session) => !session.is_placeholder(),
            None => false,
        }
    }

    /// Fire-and-forget progress PATCH. Skipped entirely for placeholder or
    /// absent sessions; failures go to the event stream, never the caller.
    fn spawn_status_sync(&self, step: OnboardingStep) {
        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        tokio::spawn(async move {
            let real_session = match client.session().session().await {
                Some(session) => !session.is_placeholder(),
                None => false,
            };
            if !real_session {
                return;
            }
            let status = OnboardingStatus {
                status: if step.is_terminal() {
                    "completed".to_string()
                } else {
                    "in_progress".to_string()
                },
                step: Some(step.to_string()),
            };
            if let Err(e) = client.users().update_onboarding_status(&status).await {
                tracing::warn!(step = %step, error = %e, "Onboarding status sync failed");
                let _ = events.send(SyncEvent::StatusSyncFailed {
                    step,
                    message: e.to_string(),
                });
            }
        });
    }
}
