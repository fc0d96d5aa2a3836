//! Collected onboarding data and its URL query-string encoding.
//!
//! The wizard mirrors its position and collected field values into the URL
//! query string so a page reload resumes at the same step with the same
//! data. Unknown keys are ignored; missing groups simply stay `None`.

use serde::{Deserialize, Serialize};

use crate::api::users::{NdisDetails, ServiceProviderDetails};
use crate::onboarding::plans;
use crate::onboarding::state::{OnboardingStep, UserType};

/// Company details collected at the company-info step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Details collected on the government-organisation branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationDetails {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abn: Option<String>,
}

/// Participant captured on the individual/multiple-participant branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub first_name: String,
    pub last_name: String,
    pub ndis_number: String,
}

/// The plan chosen at the plan-selection step, with its feature list
/// resolved from the static plan table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedPlan {
    pub id: String,
    pub name: String,
    pub features: Vec<String>,
}

impl From<&plans::Plan> for SelectedPlan {
    fn from(plan: &plans::Plan) -> Self {
        Self {
            id: plan.id.to_string(),
            name: plan.name.to_string(),
            features: plan.features.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Everything the wizard has collected so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnboardingState {
    pub step: OnboardingStep,
    pub user_type: Option<UserType>,
    pub ndis_details: Option<NdisDetails>,
    pub provider_details: Option<ServiceProviderDetails>,
    pub organisation_details: Option<OrganisationDetails>,
    pub company_info: Option<CompanyInfo>,
    pub selected_plan: Option<SelectedPlan>,
    pub participant: Option<Participant>,
    pub wallet_id: Option<String>,
}

impl OnboardingState {
    /// Serialize the step and collected scalar values into a query string
    /// (no leading `?`).
    pub fn to_query(&self) -> String {
        let mut pairs = url::form_urlencoded::Serializer::new(String::new());
        pairs.append_pair("step", self.step.as_str());
        if let Some(user_type) = self.user_type {
            pairs.append_pair("userType", user_type.as_str());
        }
        if let Some(ref ndis) = self.ndis_details {
            pairs.append_pair("ndisNumber", &ndis.ndis_number);
            if let Some(ref plan_type) = ndis.plan_type {
                pairs.append_pair("planType", plan_type);
            }
            if let Some(ref manager) = ndis.plan_manager {
                pairs.append_pair("planManager", manager);
            }
        }
        if let Some(ref provider) = self.provider_details {
            pairs.append_pair("providerAbn", &provider.abn);
            pairs.append_pair("providerName", &provider.organisation_name);
            if let Some(ref reg) = provider.registration_number {
                pairs.append_pair("providerReg", reg);
            }
        }
        if let Some(ref org) = self.organisation_details {
            pairs.append_pair("orgName", &org.name);
            if let Some(ref department) = org.department {
                pairs.append_pair("orgDepartment", department);
            }
            if let Some(ref abn) = org.abn {
                pairs.append_pair("orgAbn", abn);
            }
        }
        if let Some(ref company) = self.company_info {
            pairs.append_pair("companyName", &company.name);
            if let Some(ref abn) = company.abn {
                pairs.append_pair("companyAbn", abn);
            }
            if let Some(ref website) = company.website {
                pairs.append_pair("companyWebsite", website);
            }
        }
        if let Some(ref participant) = self.participant {
            pairs.append_pair("participantFirstName", &participant.first_name);
            pairs.append_pair("participantLastName", &participant.last_name);
            pairs.append_pair("participantNdis", &participant.ndis_number);
        }
        if let Some(ref plan) = self.selected_plan {
            pairs.append_pair("plan", &plan.id);
        }
        if let Some(ref wallet_id) = self.wallet_id {
            pairs.append_pair("walletId", wallet_id);
        }
        pairs.finish()
    }

    /// Rebuild state from a query string (with or without a leading `?`),
    /// then apply the resume guards:
    ///
    /// - any step past account-type without a stored account type falls back
    ///   to the account-type step;
    /// - the participant-success interstitial without participant data
    ///   redirects backward to the participant form.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut fields: std::collections::HashMap<String, String> = std::collections::HashMap::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            fields.insert(key.into_owned(), value.into_owned());
        }

        let mut state = Self {
            step: fields
                .get("step")
                .and_then(|s| OnboardingStep::parse(s))
                .unwrap_or_default(),
            user_type: fields.get("userType").and_then(|s| UserType::parse(s)),
            ..Self::default()
        };

        if let Some(ndis_number) = fields.get("ndisNumber") {
            state.ndis_details = Some(NdisDetails {
                ndis_number: ndis_number.clone(),
                plan_type: fields.get("planType").cloned(),
                plan_manager: fields.get("planManager").cloned(),
            });
        }
        if let (Some(abn), Some(name)) = (fields.get("providerAbn"), fields.get("providerName")) {
            state.provider_details = Some(ServiceProviderDetails {
                abn: abn.clone(),
                organisation_name: name.clone(),
                registration_number: fields.get("providerReg").cloned(),
            });
        }
        if let Some(name) = fields.get("orgName") {
            state.organisation_details = Some(OrganisationDetails {
                name: name.clone(),
                department: fields.get("orgDepartment").cloned(),
                abn: fields.get("orgAbn").cloned(),
            });
        }
        if let Some(name) = fields.get("companyName") {
            state.company_info = Some(CompanyInfo {
                name: name.clone(),
                abn: fields.get("companyAbn").cloned(),
                website: fields.get("companyWebsite").cloned(),
            });
        }
        if let (Some(first), Some(last), Some(ndis)) = (
            fields.get("participantFirstName"),
            fields.get("participantLastName"),
            fields.get("participantNdis"),
        ) {
            state.participant = Some(Participant {
                first_name: first.clone(),
                last_name: last.clone(),
                ndis_number: ndis.clone(),
            });
        }
        if let Some(plan) = fields.get("plan").and_then(|id| plans::find(id)) {
            state.selected_plan = Some(SelectedPlan::from(plan));
        }
        state.wallet_id = fields.get("walletId").cloned();

        state.apply_resume_guards();
        state
    }

    fn apply_resume_guards(&mut self) {
        if self.step != OnboardingStep::AccountType && self.user_type.is_none() {
            self.step = OnboardingStep::AccountType;
            return;
        }
        if self.step == OnboardingStep::ParticipantSuccess && self.participant.is_none() {
            self.step = OnboardingStep::ParticipantInfo;
        }
    }
}
