//! Wizard error types

use policy_console_gateway::GatewayError;
use thiserror::Error;

use crate::WizardStep;

#[derive(Error, Debug)]
pub enum WizardError {
    #[error("Wizard is not complete, current step: {0}")]
    NotComplete(WizardStep),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}
