//! BDD Tests for the feature runner

use cucumber::{gherkin::Step, given, then, when, World};
use std::path::PathBuf;
use step_runner::*;

#[derive(Debug, World)]
#[world(init = Self::new)]
struct RunnerWorld {
    config: RunnerConfig,
    summary: Option<RunSummary>,
    error: Option<RunnerError>,
}

impl RunnerWorld {
    fn new() -> Self {
        Self {
            config: RunnerConfig::default(),
            summary: None,
            error: None,
        }
    }

    fn runner(&self) -> FeatureRunner {
        FeatureRunner::new(self.config.clone()).expect("Step registry should build")
    }

    fn summary(&self) -> &RunSummary {
        if let Some(err) = &self.error {
            panic!("The run was aborted: {err}");
        }
        self.summary.as_ref().expect("Nothing has been run")
    }

    fn scenario(&self, name: &str) -> &ScenarioReport {
        self.summary()
            .scenarios()
            .find(|scenario| scenario.name == name)
            .unwrap_or_else(|| panic!("No scenario named '{name}' was run"))
    }

    fn record(&mut self, outcome: Result<RunSummary, RunnerError>) {
        match outcome {
            Ok(summary) => self.summary = Some(summary),
            Err(err) => self.error = Some(err),
        }
    }
}

#[given("a runner with an in-memory store")]
async fn given_in_memory_runner(world: &mut RunnerWorld) {
    world.config = RunnerConfig::default();
    assert_eq!(world.config.backend, StoreBackend::InMemory);
}

#[given(expr = "a runner whose home page is titled {string}")]
async fn given_runner_with_title(world: &mut RunnerWorld, title: String) {
    world.config.home_page_title = title;
}

#[when(expr = "I run the feature file {string}")]
async fn when_run_file(world: &mut RunnerWorld, path: String) {
    let runner = world.runner();
    let outcome = runner
        .run_file(&PathBuf::from(path))
        .await
        .map(|report| RunSummary {
            features: vec![report],
        });
    world.record(outcome);
}

#[when(expr = "I run the features under {string}")]
async fn when_run_directory(world: &mut RunnerWorld, path: String) {
    let runner = world.runner();
    let outcome = runner.run_paths(&[PathBuf::from(path)]).await;
    world.record(outcome);
}

#[when("I run the feature:")]
async fn when_run_inline(world: &mut RunnerWorld, step: &Step) {
    let source = step.docstring.as_ref().expect("Expected a feature docstring");
    let runner = world.runner();
    let outcome = runner.run_source(source).await.map(|report| RunSummary {
        features: vec![report],
    });
    world.record(outcome);
}

#[then(expr = "{int} scenario(s) should pass")]
async fn then_scenarios_pass(world: &mut RunnerWorld, count: usize) {
    let summary = world.summary();
    let failures: Vec<_> = summary
        .scenarios()
        .filter(|scenario| !scenario.passed())
        .map(|scenario| format!("{}: {:?}", scenario.name, scenario.status))
        .collect();
    assert_eq!(
        summary.passed(),
        count,
        "Unexpected pass count, failures: {:#?}",
        failures
    );
}

#[then(expr = "{int} scenario(s) should fail")]
async fn then_scenarios_fail(world: &mut RunnerWorld, count: usize) {
    assert_eq!(world.summary().failed(), count);
}

#[then(expr = "the run should cover {int} feature(s)")]
async fn then_feature_count(world: &mut RunnerWorld, count: usize) {
    assert_eq!(world.summary().features.len(), count);
}

#[then("the run should succeed")]
async fn then_run_succeeds(world: &mut RunnerWorld) {
    assert!(world.summary().is_success());
}

#[then(expr = "the scenario {string} should fail at step {int}")]
async fn then_fails_at(world: &mut RunnerWorld, name: String, expected: usize) {
    match &world.scenario(&name).status {
        ScenarioStatus::Failed { index, .. } => assert_eq!(*index, expected),
        ScenarioStatus::Passed => panic!("Scenario '{name}' passed"),
    }
}

#[then(expr = "the failure of {string} should be reported as {string}")]
async fn then_failure_kind(world: &mut RunnerWorld, name: String, expected: String) {
    match &world.scenario(&name).status {
        ScenarioStatus::Failed { kind, .. } => assert_eq!(kind.to_string(), expected),
        ScenarioStatus::Passed => panic!("Scenario '{name}' passed"),
    }
}

#[then(expr = "the failure of {string} should mention {string}")]
async fn then_failure_mentions(world: &mut RunnerWorld, name: String, fragment: String) {
    match &world.scenario(&name).status {
        ScenarioStatus::Failed { error, .. } => assert!(
            error.contains(&fragment),
            "Expected failure containing '{}', got '{}'",
            fragment,
            error
        ),
        ScenarioStatus::Passed => panic!("Scenario '{name}' passed"),
    }
}

#[then(expr = "{int} step(s) of {string} should be skipped")]
async fn then_steps_skipped(world: &mut RunnerWorld, count: usize, name: String) {
    assert_eq!(world.scenario(&name).steps_skipped, count);
}

#[then("the run should be aborted by a fixture error")]
async fn then_fixture_abort(world: &mut RunnerWorld) {
    assert!(
        matches!(world.error, Some(RunnerError::Fixture { .. })),
        "Expected a fixture error, got {:?}",
        world.error
    );
}

#[tokio::main]
async fn main() {
    RunnerWorld::run("tests/features").await;
}
