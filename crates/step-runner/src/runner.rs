//! Feature runner
//!
//! Parses Gherkin feature files and runs each scenario in its own
//! [`ScenarioContext`]: background steps first, then the scenario's steps, in
//! order. The first failing step ends the scenario and the remaining steps are
//! skipped. A fixture failure ends the whole run.
//!
//! A Scenario Outline runs once per Examples row, with `<column>` replaced in
//! step text, tables and docstrings.

use gherkin::{Background, Feature, GherkinEnv, Scenario, Step as GherkinStep};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::config::RunnerConfig;
use crate::context::ScenarioContext;
use crate::error::{FailureKind, RunnerError, StepError};
use crate::registry::StepRegistry;

const FEATURE_EXTENSION: &str = "feature";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ScenarioStatus {
    Passed,
    Failed {
        /// Step text including its keyword.
        step: String,
        /// 1-based position among background and scenario steps.
        index: usize,
        kind: FailureKind,
        error: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub name: String,
    pub status: ScenarioStatus,
    pub steps_passed: usize,
    pub steps_skipped: usize,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureReport {
    pub name: String,
    pub path: Option<PathBuf>,
    pub scenarios: Vec<ScenarioReport>,
}

impl FeatureReport {
    pub fn passed(&self) -> usize {
        self.scenarios.iter().filter(|s| s.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.scenarios.len() - self.passed()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub features: Vec<FeatureReport>,
}

impl RunSummary {
    pub fn scenarios(&self) -> impl Iterator<Item = &ScenarioReport> {
        self.features.iter().flat_map(|f| f.scenarios.iter())
    }

    pub fn total(&self) -> usize {
        self.scenarios().count()
    }

    pub fn passed(&self) -> usize {
        self.scenarios().filter(|s| s.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

#[derive(Debug, Clone)]
pub struct FeatureRunner {
    config: RunnerConfig,
    registry: Arc<StepRegistry>,
}

impl FeatureRunner {
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        Ok(Self {
            config,
            registry: Arc::new(StepRegistry::catalog()?),
        })
    }

    /// Run every feature file under `paths`. Directories are searched
    /// recursively for `*.feature`.
    pub async fn run_paths(&self, paths: &[PathBuf]) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::default();
        for path in paths {
            for file in feature_files(path)? {
                summary.features.push(self.run_file(&file).await?);
            }
        }
        info!(
            "Ran {} scenarios: {} passed, {} failed",
            summary.total(),
            summary.passed(),
            summary.failed()
        );
        Ok(summary)
    }

    pub async fn run_file(&self, path: &Path) -> Result<FeatureReport, RunnerError> {
        let source = std::fs::read_to_string(path).map_err(|source| RunnerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let feature = parse_feature(&source, path)?;
        let mut report = self.run_feature(&feature).await?;
        report.path = Some(path.to_path_buf());
        Ok(report)
    }

    pub async fn run_source(&self, source: &str) -> Result<FeatureReport, RunnerError> {
        let feature = parse_feature(source, Path::new("<inline>"))?;
        self.run_feature(&feature).await
    }

    #[instrument(skip(self, feature), fields(feature = %feature.name))]
    pub async fn run_feature(&self, feature: &Feature) -> Result<FeatureReport, RunnerError> {
        let mut scenarios = Vec::new();

        let background: Vec<&Background> = feature.background.iter().collect();
        for scenario in &feature.scenarios {
            scenarios.extend(self.run_scenario(&background, scenario).await?);
        }

        for rule in &feature.rules {
            let background: Vec<&Background> = feature
                .background
                .iter()
                .chain(rule.background.iter())
                .collect();
            for scenario in &rule.scenarios {
                scenarios.extend(self.run_scenario(&background, scenario).await?);
            }
        }

        Ok(FeatureReport {
            name: feature.name.clone(),
            path: None,
            scenarios,
        })
    }

    async fn run_scenario(
        &self,
        backgrounds: &[&Background],
        scenario: &Scenario,
    ) -> Result<Vec<ScenarioReport>, RunnerError> {
        let background: Vec<GherkinStep> = backgrounds
            .iter()
            .flat_map(|background| background.steps.iter().cloned())
            .collect();

        if scenario.examples.is_empty() {
            let steps = background.into_iter().chain(scenario.steps.iter().cloned());
            let report = self.run_steps(&scenario.name, steps.collect()).await?;
            return Ok(vec![report]);
        }

        let examples = expand_outline(scenario);
        if examples.is_empty() {
            warn!(scenario = %scenario.name, "Scenario Outline has no Examples rows");
            return Ok(vec![ScenarioReport {
                name: scenario.name.clone(),
                status: ScenarioStatus::Failed {
                    step: "Examples".to_string(),
                    index: 0,
                    kind: FailureKind::Vocabulary,
                    error: "Scenario Outline has no Examples rows".to_string(),
                },
                steps_passed: 0,
                steps_skipped: background.len() + scenario.steps.len(),
            }]);
        }

        let mut reports = Vec::with_capacity(examples.len());
        for (name, steps) in examples {
            let steps = background.iter().cloned().chain(steps).collect();
            reports.push(self.run_steps(&name, steps).await?);
        }
        Ok(reports)
    }

    async fn run_steps(
        &self,
        name: &str,
        steps: Vec<GherkinStep>,
    ) -> Result<ScenarioReport, RunnerError> {
        let mut ctx = ScenarioContext::new(
            name,
            self.config.backend.open(),
            self.registry.clone(),
            &self.config.home_page_title,
        );
        info!(scenario = %name, id = %ctx.id(), "Running scenario");

        for (index, step) in steps.iter().enumerate() {
            let text = format!("{} {}", step.keyword.trim(), step.value);
            let table = step.table.as_ref().map(|table| table.rows.as_slice());

            match ctx.run_step(&text, table).await {
                Ok(()) => {}
                Err(StepError::Fixture { reason }) => {
                    return Err(RunnerError::Fixture {
                        scenario: name.to_string(),
                        reason,
                    });
                }
                Err(err) => {
                    let kind = err.kind();
                    warn!(scenario = %name, "Step '{}' failed ({}): {}", text, kind, err);
                    return Ok(ScenarioReport {
                        name: name.to_string(),
                        status: ScenarioStatus::Failed {
                            step: text,
                            index: index + 1,
                            kind,
                            error: err.to_string(),
                        },
                        steps_passed: index,
                        steps_skipped: steps.len() - index - 1,
                    });
                }
            }
        }

        Ok(ScenarioReport {
            name: name.to_string(),
            status: ScenarioStatus::Passed,
            steps_passed: steps.len(),
            steps_skipped: 0,
        })
    }
}

/// One `(name, steps)` pair per Examples row, placeholders substituted.
fn expand_outline(scenario: &Scenario) -> Vec<(String, Vec<GherkinStep>)> {
    let mut expanded = Vec::new();
    for examples in &scenario.examples {
        let Some((header, rows)) = examples
            .table
            .as_ref()
            .and_then(|table| table.rows.split_first())
        else {
            continue;
        };

        for row in rows {
            let substitute = |text: &str| {
                header
                    .iter()
                    .zip(row)
                    .fold(text.to_string(), |text, (column, value)| {
                        text.replace(&format!("<{column}>"), value)
                    })
            };

            let steps = scenario
                .steps
                .iter()
                .map(|step| {
                    let mut step = step.clone();
                    step.value = substitute(&step.value);
                    step.docstring = step.docstring.as_deref().map(&substitute);
                    if let Some(table) = step.table.as_mut() {
                        for cell in table.rows.iter_mut().flatten() {
                            *cell = substitute(cell);
                        }
                    }
                    step
                })
                .collect();

            let name = format!("{} (example {})", substitute(&scenario.name), expanded.len() + 1);
            expanded.push((name, steps));
        }
    }
    expanded
}

fn parse_feature(source: &str, path: &Path) -> Result<Feature, RunnerError> {
    Feature::parse(source, GherkinEnv::default()).map_err(|err| RunnerError::Parse {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

/// Feature files at `path`, sorted. A file path is returned as is.
pub fn feature_files(path: &Path) -> Result<Vec<PathBuf>, RunnerError> {
    let io_error = |source| RunnerError::Io {
        path: path.to_path_buf(),
        source,
    };

    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path).map_err(io_error)? {
        let entry_path = entry.map_err(io_error)?.path();
        if entry_path.is_dir() {
            files.extend(feature_files(&entry_path)?);
        } else if entry_path.extension().is_some_and(|ext| ext == FEATURE_EXTENSION) {
            files.push(entry_path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
Feature: Catalog smoke test

  Background:
    Given the following products
      | name  | description  | price | available | category |
      | Hat   | A red fedora | 59.95 | True      | CLOTHS   |

  Scenario: Home page
    When I visit the "Home Page"
    Then I should see "Product Catalog Administration" in the title

  Scenario: Broken expectation
    When I visit the "Home Page"
    Then I should see "Pet Shop" in the title
    And the "Name" field should be empty

  Scenario: Search still works after a failure elsewhere
    When I visit the "Home Page"
    And I press the "Search" button
    Then I should see "Hat" in the results
"#;

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let runner = FeatureRunner::new(RunnerConfig::default()).unwrap();
        let report = runner.run_source(CATALOG).await.unwrap();

        assert_eq!(report.scenarios.len(), 3);
        assert_eq!(report.passed(), 2);

        let broken = &report.scenarios[1];
        assert_eq!(broken.steps_passed, 2);
        assert_eq!(broken.steps_skipped, 1);
        match &broken.status {
            ScenarioStatus::Failed {
                step,
                index,
                kind,
                error,
            } => {
                assert_eq!(step, r#"Then I should see "Pet Shop" in the title"#);
                assert_eq!(*index, 3);
                assert_eq!(*kind, FailureKind::Assertion);
                assert!(error.contains("Product Catalog Administration"));
            }
            ScenarioStatus::Passed => panic!("Expected the scenario to fail"),
        }
    }

    #[tokio::test]
    async fn test_bad_fixture_aborts_the_run() {
        let source = r#"
Feature: Bad fixtures

  Scenario: Unparseable price
    Given the following products
      | name | description  | price | available | category |
      | Hat  | A red fedora | lots  | True      | CLOTHS   |
    When I visit the "Home Page"
"#;
        let runner = FeatureRunner::new(RunnerConfig::default()).unwrap();
        let err = runner.run_source(source).await.unwrap_err();
        assert!(matches!(err, RunnerError::Fixture { .. }));
    }

    #[tokio::test]
    async fn test_outline_runs_each_example_row() {
        let source = r#"
Feature: Outlines

  Scenario Outline: Create <name>
    When I visit the "Home Page"
    And I set the "Name" to "<name>"
    And I set the "Price" to "<price>"
    And I press the "Create" button
    Then I should see the message "Success"
    And I should see "<name>" in the "Name" field

    Examples:
      | name  | price |
      | Hat   | 59.95 |
      | Shoes | lots  |
"#;
        let runner = FeatureRunner::new(RunnerConfig::default()).unwrap();
        let report = runner.run_source(source).await.unwrap();

        let names: Vec<&str> = report.scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Create Hat (example 1)", "Create Shoes (example 2)"]);
        assert!(report.scenarios[0].passed());
        match &report.scenarios[1].status {
            ScenarioStatus::Failed { index, error, .. } => {
                assert_eq!(*index, 5);
                assert!(error.contains("Invalid price: 'lots'"));
            }
            ScenarioStatus::Passed => panic!("Expected the second row to fail"),
        }
    }

    #[tokio::test]
    async fn test_outline_without_rows_fails() {
        let source = r#"
Feature: Outlines

  Scenario Outline: Create <name>
    When I set the "Name" to "<name>"

    Examples:
      | name |
"#;
        let runner = FeatureRunner::new(RunnerConfig::default()).unwrap();
        let report = runner.run_source(source).await.unwrap();
        assert_eq!(report.scenarios.len(), 1);
        assert_eq!(report.failed(), 1);
    }

    #[tokio::test]
    async fn test_unknown_phrases_are_vocabulary_failures() {
        let source = r#"
Feature: Vocabulary

  Scenario: Juggling
    When I juggle the "Name" field
"#;
        let runner = FeatureRunner::new(RunnerConfig::default()).unwrap();
        let report = runner.run_source(source).await.unwrap();
        match &report.scenarios[0].status {
            ScenarioStatus::Failed { kind, .. } => assert_eq!(*kind, FailureKind::Vocabulary),
            ScenarioStatus::Passed => panic!("Expected an undefined step"),
        }
    }

    #[tokio::test]
    async fn test_unparseable_feature() {
        let runner = FeatureRunner::new(RunnerConfig::default()).unwrap();
        let err = runner.run_source("this is not gherkin").await.unwrap_err();
        assert!(matches!(err, RunnerError::Parse { .. }));
    }
}
