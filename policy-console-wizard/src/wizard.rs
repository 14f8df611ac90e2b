//! Wizard state: the draft being edited and the step cursor

use policy_console_core::PolicyDraft;
use policy_console_gateway::PolicyGateway;
use serde::Serialize;
use std::fmt;

use crate::WizardError;

/// Steps of the policy creation wizard, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Description,
    Inputs,
    Models,
    Cubes,
    Outputs,
    Finish,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::Description,
        WizardStep::Inputs,
        WizardStep::Models,
        WizardStep::Cubes,
        WizardStep::Outputs,
        WizardStep::Finish,
    ];
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WizardStep::Description => "description",
            WizardStep::Inputs => "inputs",
            WizardStep::Models => "models",
            WizardStep::Cubes => "cubes",
            WizardStep::Outputs => "outputs",
            WizardStep::Finish => "finish",
        };
        f.write_str(name)
    }
}

/// Hook a step calls once it lets the operator move on
pub trait StepAdvance: Send {
    fn next_step(&mut self);
}

/// Position within `WizardStep::ALL`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepCursor {
    index: usize,
}

impl StepCursor {
    pub fn current(&self) -> WizardStep {
        WizardStep::ALL[self.index]
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == WizardStep::ALL.len()
    }
}

impl StepAdvance for StepCursor {
    fn next_step(&mut self) {
        if !self.is_last() {
            self.index += 1;
        }
    }
}

/// Owns the policy draft for the duration of the wizard
#[derive(Debug, Clone)]
pub struct PolicyWizard {
    policy: PolicyDraft,
    cursor: StepCursor,
}

impl PolicyWizard {
    pub fn new(policy: PolicyDraft) -> Self {
        Self {
            policy,
            cursor: StepCursor::default(),
        }
    }

    pub fn current_policy(&self) -> &PolicyDraft {
        &self.policy
    }

    pub fn current_policy_mut(&mut self) -> &mut PolicyDraft {
        &mut self.policy
    }

    pub fn current_step(&self) -> WizardStep {
        self.cursor.current()
    }

    pub fn is_complete(&self) -> bool {
        self.cursor.is_last()
    }

    /// Borrow the draft and the step cursor at the same time, so a step
    /// can edit the one and advance the other.
    pub fn parts_mut(&mut self) -> (&mut PolicyDraft, &mut StepCursor) {
        (&mut self.policy, &mut self.cursor)
    }

    pub fn into_policy(self) -> PolicyDraft {
        self.policy
    }

    /// Persist the finished draft: update when it already has an id,
    /// create otherwise.
    pub async fn persist(&self, gateway: &dyn PolicyGateway) -> Result<PolicyDraft, WizardError> {
        if !self.is_complete() {
            return Err(WizardError::NotComplete(self.current_step()));
        }
        let saved = match self.policy.id {
            Some(_) => gateway.save(&self.policy).await?,
            None => gateway.create(&self.policy).await?,
        };
        tracing::info!("Persisted policy '{}'", saved.name);
        Ok(saved)
    }
}

impl StepAdvance for PolicyWizard {
    fn next_step(&mut self) {
        self.cursor.next_step();
    }
}
