//! Description step of the policy wizard
//!
//! The step lets the operator move on only when the form is structurally
//! valid and no saved policy already uses the chosen name (ignoring case).
//! The policy list is fetched fresh on every attempt.

use policy_console_core::{matching_entries, PolicyDraft, PolicyListEntry, ValidationOutcome};
use policy_console_gateway::{GatewayError, PolicyGateway};
use serde::Serialize;
use std::sync::Arc;

use crate::{FormState, PolicyStaticData, PolicyWizard, StepAdvance};

/// What a call to `DescriptionStep::validate_form` did
#[derive(Debug)]
pub enum StepOutcome {
    /// The form was invalid; nothing was done
    FormInvalid,
    /// The name is free and the wizard advanced
    Advanced {
        /// Whether raw-data sink settings were removed from the draft
        pruned: bool,
    },
    /// Saved policies already use this name
    NameTaken { matches: Vec<PolicyListEntry> },
    /// The policy list could not be loaded; the wizard did not advance
    FetchFailed(GatewayError),
}

impl StepOutcome {
    pub fn is_advanced(&self) -> bool {
        matches!(self, StepOutcome::Advanced { .. })
    }
}

/// Everything the description form renders
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionView<'a> {
    #[serde(flatten)]
    pub outcome: ValidationOutcome,
    pub options: &'a PolicyStaticData,
}

pub struct DescriptionStep {
    gateway: Arc<dyn PolicyGateway>,
    static_data: PolicyStaticData,
    outcome: ValidationOutcome,
}

impl DescriptionStep {
    pub fn new(gateway: Arc<dyn PolicyGateway>) -> Self {
        Self::with_static_data(gateway, PolicyStaticData::default())
    }

    pub fn with_static_data(
        gateway: Arc<dyn PolicyGateway>,
        static_data: PolicyStaticData,
    ) -> Self {
        Self {
            gateway,
            static_data,
            outcome: ValidationOutcome::default(),
        }
    }

    /// Name conflict flag shown next to the name field
    pub fn error(&self) -> bool {
        self.outcome.error
    }

    pub fn transport_error(&self) -> bool {
        self.outcome.transport_error
    }

    pub fn outcome(&self) -> ValidationOutcome {
        self.outcome
    }

    pub fn view(&self) -> DescriptionView<'_> {
        DescriptionView {
            outcome: self.outcome,
            options: &self.static_data,
        }
    }

    /// Validate the form and, if the name is free, advance the wizard.
    ///
    /// An invalid form is a no-op. On a fetch failure the `error` flag
    /// keeps its previous value and `draft` is left untouched.
    pub async fn validate_form(
        &mut self,
        form: &FormState,
        draft: &mut PolicyDraft,
        wizard: &mut dyn StepAdvance,
    ) -> StepOutcome {
        if !form.valid {
            return StepOutcome::FormInvalid;
        }

        let policies = match self.gateway.fetch_all().await {
            Ok(policies) => policies,
            Err(err) => {
                tracing::error!("There was an error while getting the policies list: {}", err);
                self.outcome.transport_error = true;
                return StepOutcome::FetchFailed(err);
            }
        };
        self.outcome.transport_error = false;

        let matches: Vec<PolicyListEntry> = matching_entries(&policies, &draft.name)
            .into_iter()
            .cloned()
            .collect();

        if !matches.is_empty() {
            tracing::warn!(
                "Policy name '{}' is already used by {} policies",
                draft.name,
                matches.len()
            );
            self.outcome.error = true;
            return StepOutcome::NameTaken { matches };
        }

        self.outcome.error = false;
        let pruned = draft.prune_disabled_raw_data();
        wizard.next_step();
        tracing::info!("Policy '{}' passed the description step", draft.name);
        StepOutcome::Advanced { pruned }
    }

    /// Check the wizard's current draft and run `validate_form` on it
    pub async fn submit(&mut self, wizard: &mut PolicyWizard) -> StepOutcome {
        let form = FormState::check(wizard.current_policy());
        if !form.valid {
            tracing::debug!("Description form has {} violations", form.violations.len());
        }
        let (draft, cursor) = wizard.parts_mut();
        self.validate_form(&form, draft, cursor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WizardStep;
    use policy_console_gateway::InMemoryGateway;
    use rstest::rstest;
    use serde_json::json;

    #[derive(Default)]
    struct CountingAdvance {
        calls: usize,
    }

    impl StepAdvance for CountingAdvance {
        fn next_step(&mut self) {
            self.calls += 1;
        }
    }

    fn saved(names: &[&str]) -> Arc<InMemoryGateway> {
        Arc::new(InMemoryGateway::with_policies(
            names.iter().map(|n| PolicyDraft::new(*n)),
        ))
    }

    fn daily_etl(enabled: bool) -> PolicyDraft {
        let mut draft = PolicyDraft::new("Daily-ETL");
        draft.enabled = enabled;
        draft.raw_data.path = Some("/x".to_string());
        draft.raw_data.partition_format = Some("yyyy/MM/dd".to_string());
        draft
    }

    #[tokio::test]
    async fn test_invalid_form_is_a_silent_noop() {
        let gateway = saved(&["daily-etl"]);
        let mut step = DescriptionStep::new(gateway.clone());
        let mut draft = daily_etl(false);
        let before = draft.clone();
        let mut advance = CountingAdvance::default();

        let outcome = step
            .validate_form(&FormState::from_flag(false), &mut draft, &mut advance)
            .await;

        assert!(matches!(outcome, StepOutcome::FormInvalid));
        assert_eq!(gateway.call_count(), 0);
        assert_eq!(draft, before);
        assert!(!step.error());
        assert_eq!(advance.calls, 0);
    }

    #[tokio::test]
    async fn test_free_name_prunes_disabled_raw_data_and_advances_once() {
        let mut step = DescriptionStep::new(saved(&["other"]));
        let mut draft = daily_etl(false);
        let mut advance = CountingAdvance::default();

        let outcome = step
            .validate_form(&FormState::from_flag(true), &mut draft, &mut advance)
            .await;

        assert!(matches!(outcome, StepOutcome::Advanced { pruned: true }));
        assert!(!step.error());
        assert_eq!(advance.calls, 1);
        assert_eq!(serde_json::to_value(&draft.raw_data).unwrap(), json!({}));
    }

    #[tokio::test]
    async fn test_free_name_keeps_enabled_raw_data() {
        let mut step = DescriptionStep::new(saved(&["other"]));
        let mut draft = daily_etl(true);
        let before = draft.clone();
        let mut advance = CountingAdvance::default();

        let outcome = step
            .validate_form(&FormState::from_flag(true), &mut draft, &mut advance)
            .await;

        assert!(matches!(outcome, StepOutcome::Advanced { pruned: false }));
        assert_eq!(draft, before);
        assert_eq!(advance.calls, 1);
    }

    #[rstest]
    #[case::exact("Daily-ETL")]
    #[case::lower("daily-etl")]
    #[case::upper("DAILY-ETL")]
    #[tokio::test]
    async fn test_taken_name_sets_error_and_blocks(#[case] existing: &str) {
        let mut step = DescriptionStep::new(saved(&[existing, "other"]));
        let mut draft = daily_etl(false);
        let before = draft.clone();
        let mut advance = CountingAdvance::default();

        let outcome = step
            .validate_form(&FormState::from_flag(true), &mut draft, &mut advance)
            .await;

        match outcome {
            StepOutcome::NameTaken { matches } => assert_eq!(matches.len(), 1),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(step.error());
        assert_eq!(advance.calls, 0);
        assert_eq!(draft, before);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_error_flag_and_draft() {
        let gateway = saved(&["daily-etl"]);
        let mut step = DescriptionStep::new(gateway.clone());
        let mut draft = daily_etl(false);
        let mut advance = CountingAdvance::default();

        // Leave the conflict flag raised from a first attempt
        step.validate_form(&FormState::from_flag(true), &mut draft, &mut advance)
            .await;
        assert!(step.error());

        gateway.set_unavailable(true);
        draft.name = "fresh-name".to_string();
        let before = draft.clone();

        let outcome = step
            .validate_form(&FormState::from_flag(true), &mut draft, &mut advance)
            .await;

        assert!(matches!(outcome, StepOutcome::FetchFailed(GatewayError::Unavailable(_))));
        assert!(step.error());
        assert!(step.transport_error());
        assert_eq!(draft, before);
        assert_eq!(advance.calls, 0);
    }

    #[tokio::test]
    async fn test_successful_retry_clears_transport_flag() {
        let gateway = saved(&[]);
        let mut step = DescriptionStep::new(gateway.clone());
        let mut draft = daily_etl(true);
        let mut advance = CountingAdvance::default();

        gateway.set_unavailable(true);
        step.validate_form(&FormState::from_flag(true), &mut draft, &mut advance)
            .await;
        assert!(step.transport_error());

        gateway.set_unavailable(false);
        let outcome = step
            .validate_form(&FormState::from_flag(true), &mut draft, &mut advance)
            .await;

        assert!(outcome.is_advanced());
        assert_eq!(step.outcome(), ValidationOutcome::default());
    }

    #[tokio::test]
    async fn test_each_attempt_fetches_a_fresh_list() {
        let gateway = saved(&[]);
        let mut step = DescriptionStep::new(gateway.clone());
        let mut advance = CountingAdvance::default();

        let mut draft = daily_etl(true);
        step.validate_form(&FormState::from_flag(true), &mut draft, &mut advance)
            .await;
        gateway.create(&PolicyDraft::new("daily-etl")).await.unwrap();
        let outcome = step
            .validate_form(&FormState::from_flag(true), &mut draft, &mut advance)
            .await;

        assert!(matches!(outcome, StepOutcome::NameTaken { .. }));
        assert_eq!(gateway.call_count(), 3);
    }

    #[tokio::test]
    async fn test_submit_checks_form_and_moves_wizard() {
        let mut step = DescriptionStep::new(saved(&["other"]));
        let mut wizard = PolicyWizard::new(daily_etl(false));

        let outcome = step.submit(&mut wizard).await;

        assert!(outcome.is_advanced());
        assert_eq!(wizard.current_step(), WizardStep::Inputs);
        assert!(wizard.current_policy().raw_data.is_empty());
    }

    #[tokio::test]
    async fn test_submit_with_invalid_name_does_not_fetch() {
        let gateway = saved(&[]);
        let mut step = DescriptionStep::new(gateway.clone());
        let mut wizard = PolicyWizard::new(PolicyDraft::new("bad name"));

        let outcome = step.submit(&mut wizard).await;

        assert!(matches!(outcome, StepOutcome::FormInvalid));
        assert_eq!(gateway.call_count(), 0);
        assert_eq!(wizard.current_step(), WizardStep::Description);
    }

    #[tokio::test]
    async fn test_padded_name_still_collides() {
        let mut step = DescriptionStep::new(saved(&["other"]));
        let mut draft = PolicyDraft::new(" other ");
        draft.enabled = false;
        let mut advance = CountingAdvance::default();

        let outcome = step
            .validate_form(&FormState::from_flag(true), &mut draft, &mut advance)
            .await;

        match outcome {
            StepOutcome::NameTaken { matches } => assert_eq!(matches[0].name, "other"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(step.error());
        assert_eq!(advance.calls, 0);
    }

    #[tokio::test]
    async fn test_submit_rejects_padded_name() {
        let gateway = saved(&["other"]);
        let mut step = DescriptionStep::new(gateway.clone());
        let mut draft = PolicyDraft::new(" other ");
        draft.enabled = false;
        let mut wizard = PolicyWizard::new(draft);

        let outcome = step.submit(&mut wizard).await;

        assert!(matches!(outcome, StepOutcome::FormInvalid));
        assert_eq!(gateway.call_count(), 0);
        assert_eq!(wizard.current_step(), WizardStep::Description);
    }

    #[test]
    fn test_view_exposes_flags_and_options() {
        let step = DescriptionStep::new(saved(&[]));
        let view = serde_json::to_value(step.view()).unwrap();
        assert_eq!(view["error"], false);
        assert_eq!(view["transportError"], false);
        assert!(view["options"]["storageLevel"].is_array());
    }
}
