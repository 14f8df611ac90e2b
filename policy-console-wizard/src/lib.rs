//! Policy creation wizard
//!
//! Holds the in-progress policy draft, the ordered wizard steps and the
//! description step, which gates advancement on form validity and on the
//! policy name being unused on the server.

pub mod description;
pub mod error;
pub mod form;
pub mod static_data;
pub mod wizard;

pub use description::{DescriptionStep, DescriptionView, StepOutcome};
pub use error::WizardError;
pub use form::{FieldViolation, FormState};
pub use static_data::{HelpLinks, PolicyStaticData, SelectOption};
pub use wizard::{PolicyWizard, StepAdvance, StepCursor, WizardStep};
