//! Step Runner
//!
//! Interprets the catalog's Gherkin vocabulary against a simulated
//! administration page. Each scenario gets its own [`ScenarioContext`] with a
//! fresh page, form and clipboard; steps are matched against the templates in
//! a [`StepRegistry`] and executed in order.

pub mod assertions;
pub mod config;
pub mod context;
pub mod error;
pub mod fixtures;
pub mod form;
pub mod page;
pub mod registry;
pub mod runner;
pub mod step;

pub use assertions::Expectation;
pub use config::{RunnerConfig, StoreBackend};
pub use context::ScenarioContext;
pub use error::{AssertionFailure, FailureKind, RunnerError, StepError};
pub use form::{Field, FormState};
pub use page::{Button, CatalogPage, DEFAULT_TITLE, DELETED_MESSAGE, HOME_PAGE, SUCCESS_MESSAGE};
pub use registry::{StepRegistry, StepTemplate};
pub use runner::{
    feature_files, FeatureReport, FeatureRunner, RunSummary, ScenarioReport, ScenarioStatus,
};
pub use step::Step;
