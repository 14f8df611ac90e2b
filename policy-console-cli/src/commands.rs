//! Command handlers

use anyhow::{anyhow, Context};
use policy_console_core::{CoreError, PolicyDraft};
use policy_console_gateway::{GatewayError, PolicyGateway};
use policy_console_wizard::{
    DescriptionStep, FormState, PolicyStaticData, PolicyWizard, StepOutcome,
};
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::{Cli, Command, Settings};

/// Distinguishes operator mistakes from operational failures.
#[derive(Debug)]
pub enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl From<GatewayError> for CliError {
    fn from(err: GatewayError) -> Self {
        Self::Failure(err.into())
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        Self::Failure(err)
    }
}

/// Execute the parsed command line, printing results to stdout
pub async fn run(cli: Cli) -> CliResult<()> {
    let mut stdout = std::io::stdout().lock();

    if let Command::Options = cli.command {
        return print_json(&mut stdout, &PolicyStaticData::default());
    }

    let settings = Settings::from_cli(&cli)?;
    let gateway: Arc<dyn PolicyGateway> = Arc::new(settings.gateway()?);
    tracing::debug!("Running '{}'", cli.command.label());
    dispatch(cli.command, gateway, &mut stdout).await
}

pub async fn dispatch(
    command: Command,
    gateway: Arc<dyn PolicyGateway>,
    out: &mut dyn Write,
) -> CliResult<()> {
    match command {
        Command::List => print_json(out, &gateway.fetch_all().await?),
        Command::ByFragment {
            fragment_type,
            fragment_id,
        } => print_json(
            out,
            &gateway.fetch_by_fragment(&fragment_type, &fragment_id).await?,
        ),
        Command::Create { file } => {
            let created = gateway.create(&read_draft(&file)?).await?;
            tracing::info!("Created policy '{}'", created.name);
            print_json(out, &created)
        }
        Command::Delete { id } => {
            gateway.delete(&id).await?;
            tracing::info!("Deleted policy {}", id);
            print_json(out, &json!({"deleted": id}))
        }
        Command::Run { id } => print_json(out, &gateway.run(&id).await?),
        Command::Fake => print_json(out, &gateway.fetch_fake().await?),
        Command::Stop { file } => print_json(out, &gateway.stop(&read_draft(&file)?).await?),
        Command::Save { file } => print_json(out, &gateway.save(&read_draft(&file)?).await?),
        Command::Describe { file, write } => describe(gateway, &file, write, out).await,
        Command::Options => print_json(out, &PolicyStaticData::default()),
    }
}

async fn describe(
    gateway: Arc<dyn PolicyGateway>,
    file: &Path,
    write: bool,
    out: &mut dyn Write,
) -> CliResult<()> {
    let mut wizard = PolicyWizard::new(read_draft(file)?);
    let mut step = DescriptionStep::new(gateway);

    match step.submit(&mut wizard).await {
        StepOutcome::Advanced { pruned } => {
            if write {
                std::fs::write(file, wizard.current_policy().to_json_pretty()? + "\n")
                    .with_context(|| format!("failed to write {}", file.display()))?;
            }
            print_json(
                out,
                &json!({
                    "advanced": true,
                    "nextStep": wizard.current_step(),
                    "pruned": pruned,
                    "policy": wizard.current_policy(),
                }),
            )
        }
        StepOutcome::FormInvalid => {
            let details: Vec<String> = FormState::check(wizard.current_policy())
                .violations
                .iter()
                .map(|v| format!("{}: {}", v.field, v.message))
                .collect();
            Err(CliError::validation(format!(
                "description form is invalid: {}",
                details.join("; ")
            )))
        }
        StepOutcome::NameTaken { .. } => Err(CliError::validation(format!(
            "policy name '{}' is already in use",
            wizard.current_policy().name
        ))),
        StepOutcome::FetchFailed(err) => {
            Err(anyhow!(err).context("could not load the policy list").into())
        }
    }
}

fn read_draft(path: &Path) -> CliResult<PolicyDraft> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(PolicyDraft::from_json(&raw)?)
}

fn print_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::Failure(err.into()))?;
    writeln!(out, "{}", rendered).map_err(|err| CliError::Failure(err.into()))
}
