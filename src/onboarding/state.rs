//! Onboarding step machine.
//!
//! Steps are a closed enum with an explicit transition table. The flow
//! branches once, at account-type selection, and converges again at the
//! company-info step:
//!
//! ```text
//! AccountType
//!   individual / multiple-participants:
//!       NdisDetails -> ParticipantInfo -> ParticipantSuccess
//!   service-provider:        ProviderDetails
//!   government-organisation: OrganisationDetails
//! then, for every branch:
//!   CompanyInfo -> CompanyInfoSuccess -> PlanSelection -> PlanSuccess
//!     -> WalletSetup -> Complete
//! ```
//!
//! `*Success` steps are interstitials: confirmation screens that collect no
//! data. Going back from the step after an interstitial skips it.

use serde::{Deserialize, Serialize};

/// Account type chosen on the first step; drives the branch at step two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserType {
    Individual,
    MultipleParticipants,
    ServiceProvider,
    GovernmentOrganisation,
}

impl UserType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::MultipleParticipants => "multiple-participants",
            Self::ServiceProvider => "service-provider",
            Self::GovernmentOrganisation => "government-organisation",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "individual" => Some(Self::Individual),
            "multiple-participants" => Some(Self::MultipleParticipants),
            "service-provider" => Some(Self::ServiceProvider),
            "government-organisation" => Some(Self::GovernmentOrganisation),
            _ => None,
        }
    }

    /// Whether this account type manages NDIS participants directly.
    pub fn has_participants(self) -> bool {
        matches!(self, Self::Individual | Self::MultipleParticipants)
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The steps of the onboarding wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnboardingStep {
    AccountType,
    NdisDetails,
    ParticipantInfo,
    ParticipantSuccess,
    ProviderDetails,
    OrganisationDetails,
    CompanyInfo,
    CompanyInfoSuccess,
    PlanSelection,
    PlanSuccess,
    WalletSetup,
    Complete,
}

impl OnboardingStep {
    /// Confirmation screens that collect no data.
    pub fn is_interstitial(self) -> bool {
        matches!(
            self,
            Self::ParticipantSuccess | Self::CompanyInfoSuccess | Self::PlanSuccess
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete)
    }

    /// The step that follows `self` for the given account type.
    pub fn next(self, user_type: UserType) -> Option<OnboardingStep> {
        use OnboardingStep::*;
        match self {
            AccountType => Some(match user_type {
                UserType::Individual | UserType::MultipleParticipants => NdisDetails,
                UserType::ServiceProvider => ProviderDetails,
                UserType::GovernmentOrganisation => OrganisationDetails,
            }),
            NdisDetails => Some(ParticipantInfo),
            ParticipantInfo => Some(ParticipantSuccess),
            ParticipantSuccess => Some(CompanyInfo),
            ProviderDetails => Some(CompanyInfo),
            OrganisationDetails => Some(CompanyInfo),
            CompanyInfo => Some(CompanyInfoSuccess),
            CompanyInfoSuccess => Some(PlanSelection),
            PlanSelection => Some(PlanSuccess),
            PlanSuccess => Some(WalletSetup),
            WalletSetup => Some(Complete),
            Complete => None,
        }
    }

    /// The previous *functional* step; interstitials are skipped on the way
    /// back so the user lands on a screen they can edit.
    pub fn prev(self, user_type: UserType) -> Option<OnboardingStep> {
        use OnboardingStep::*;
        match self {
            AccountType => None,
            NdisDetails | ProviderDetails | OrganisationDetails => Some(AccountType),
            ParticipantInfo => Some(NdisDetails),
            ParticipantSuccess => Some(ParticipantInfo),
            CompanyInfo => Some(match user_type {
                UserType::Individual | UserType::MultipleParticipants => ParticipantInfo,
                UserType::ServiceProvider => ProviderDetails,
                UserType::GovernmentOrganisation => OrganisationDetails,
            }),
            CompanyInfoSuccess => Some(CompanyInfo),
            PlanSelection => Some(CompanyInfo),
            PlanSuccess => Some(PlanSelection),
            WalletSetup => Some(PlanSelection),
            Complete => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccountType => "account-type",
            Self::NdisDetails => "ndis-details",
            Self::ParticipantInfo => "participant-info",
            Self::ParticipantSuccess => "participant-success",
            Self::ProviderDetails => "provider-details",
            Self::OrganisationDetails => "organisation-details",
            Self::CompanyInfo => "company-info",
            Self::CompanyInfoSuccess => "company-info-success",
            Self::PlanSelection => "plan-selection",
            Self::PlanSuccess => "plan-success",
            Self::WalletSetup => "wallet-setup",
            Self::Complete => "complete",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "account-type" => Some(Self::AccountType),
            "ndis-details" => Some(Self::NdisDetails),
            "participant-info" => Some(Self::ParticipantInfo),
            "participant-success" => Some(Self::ParticipantSuccess),
            "provider-details" => Some(Self::ProviderDetails),
            "organisation-details" => Some(Self::OrganisationDetails),
            "company-info" => Some(Self::CompanyInfo),
            "company-info-success" => Some(Self::CompanyInfoSuccess),
            "plan-selection" => Some(Self::PlanSelection),
            "plan-success" => Some(Self::PlanSuccess),
            "wallet-setup" => Some(Self::WalletSetup),
            "complete" => Some(Self::Complete),
            _ => None,
        }
    }
}

impl Default for OnboardingStep {
    fn default() -> Self {
        Self::AccountType
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
