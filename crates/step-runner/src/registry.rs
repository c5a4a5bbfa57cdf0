//! Step templates and the registry that matches phrases against them
//!
//! A template is the step text with `{}` where a quoted parameter goes, e.g.
//! `I set the "{}" to "{}"`. Each template compiles to an anchored regex with
//! one capture group per placeholder; the first template that matches builds
//! the [`Step`].

use regex::Regex;
use tracing::trace;

use crate::assertions::Expectation;
use crate::error::StepError;
use crate::step::{strip_keyword, Step};

pub type StepBuilder = fn(&[String]) -> Result<Step, StepError>;

const PLACEHOLDER: &str = "{}";
const CAPTURE: &str = "(.*)";

#[derive(Clone)]
pub struct StepTemplate {
    pattern: &'static str,
    regex: Regex,
    build: StepBuilder,
}

impl std::fmt::Debug for StepTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepTemplate")
            .field("pattern", &self.pattern)
            .field("regex", &self.regex.as_str())
            .finish()
    }
}

impl StepTemplate {
    pub fn new(pattern: &'static str, build: StepBuilder) -> Result<Self, StepError> {
        let literals: Vec<String> = pattern.split(PLACEHOLDER).map(regex::escape).collect();
        let source = format!("^{}$", literals.join(CAPTURE));
        let regex = Regex::new(&source).map_err(|source| StepError::InvalidTemplate {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern,
            regex,
            build,
        })
    }

    /// Parameters captured from `text`, or `None` if it does not match.
    pub fn captures(&self, text: &str) -> Option<Vec<String>> {
        let captures = self.regex.captures(text)?;
        Some(
            captures
                .iter()
                .skip(1)
                .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct StepRegistry {
    templates: Vec<StepTemplate>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the full product catalog vocabulary.
    pub fn catalog() -> Result<Self, StepError> {
        let mut registry = Self::new();

        registry
            .register(r#"I visit the "{}""#, |args| {
                Ok(Step::Visit {
                    page: args[0].clone(),
                })
            })?
            .register(r#"I set the "{}" to "{}""#, |args| {
                Ok(Step::Set {
                    field: args[0].parse()?,
                    value: args[1].clone(),
                })
            })?
            .register(r#"I change "{}" to "{}""#, |args| {
                Ok(Step::Set {
                    field: args[0].parse()?,
                    value: args[1].clone(),
                })
            })?
            .register(r#"I select "{}" in the "{}" dropdown"#, |args| {
                Ok(Step::Select {
                    value: args[0].clone(),
                    field: args[1].parse()?,
                })
            })?
            .register(r#"I press the "{}" button"#, |args| {
                Ok(Step::Press {
                    button: args[0].parse()?,
                })
            })?
            .register(r#"I copy the "{}" field"#, |args| {
                Ok(Step::Copy {
                    field: args[0].parse()?,
                })
            })?
            .register(r#"I paste the "{}" field"#, |args| {
                Ok(Step::Paste {
                    field: args[0].parse()?,
                })
            })?
            .register("the following products", |_| Ok(Step::LoadFixtures))?
            .register("the following products:", |_| Ok(Step::LoadFixtures))?;

        registry
            .register(r#"I should see "{}" in the title"#, |args| {
                Ok(Step::Expect(Expectation::Title {
                    text: args[0].clone(),
                    present: true,
                }))
            })?
            .register(r#"I should not see "{}" in the title"#, |args| {
                Ok(Step::Expect(Expectation::Title {
                    text: args[0].clone(),
                    present: false,
                }))
            })?
            .register(r#"I should see the message "{}""#, |args| {
                Ok(Step::Expect(Expectation::Message {
                    text: args[0].clone(),
                    present: true,
                }))
            })?
            .register(r#"I should not see the message "{}""#, |args| {
                Ok(Step::Expect(Expectation::Message {
                    text: args[0].clone(),
                    present: false,
                }))
            })?
            .register(r#"the "{}" field should be empty"#, |args| {
                Ok(Step::Expect(Expectation::FieldEmpty {
                    field: args[0].parse()?,
                }))
            })?
            .register(r#"I should see "{}" in the "{}" field"#, |args| {
                field_value(args, true)
            })?
            .register(r#"I should not see "{}" in the "{}" field"#, |args| {
                field_value(args, false)
            })?
            .register(r#"I should see "{}" in the "{}" dropdown"#, |args| {
                field_value(args, true)
            })?
            .register(r#"I should not see "{}" in the "{}" dropdown"#, |args| {
                field_value(args, false)
            })?
            .register(r#"I should see "{}" in the results"#, |args| {
                Ok(Step::Expect(Expectation::Results {
                    text: args[0].clone(),
                    present: true,
                }))
            })?
            .register(r#"I should not see "{}" in the results"#, |args| {
                Ok(Step::Expect(Expectation::Results {
                    text: args[0].clone(),
                    present: false,
                }))
            })?
            .register(r#"I should see "{}""#, |args| {
                Ok(Step::Expect(Expectation::Page {
                    text: args[0].clone(),
                    present: true,
                }))
            })?
            .register(r#"I should not see "{}""#, |args| {
                Ok(Step::Expect(Expectation::Page {
                    text: args[0].clone(),
                    present: false,
                }))
            })?;

        Ok(registry)
    }

    pub fn register(
        &mut self,
        pattern: &'static str,
        build: StepBuilder,
    ) -> Result<&mut Self, StepError> {
        self.templates.push(StepTemplate::new(pattern, build)?);
        Ok(self)
    }

    /// Parse step text, with or without its Gherkin keyword.
    pub fn parse(&self, text: &str) -> Result<Step, StepError> {
        let phrase = strip_keyword(text);
        for template in &self.templates {
            if let Some(args) = template.captures(phrase) {
                trace!("'{}' matched template '{}'", phrase, template.pattern);
                return (template.build)(&args);
            }
        }
        Err(StepError::UnknownStep {
            phrase: phrase.to_string(),
        })
    }
}

fn field_value(args: &[String], present: bool) -> Result<Step, StepError> {
    Ok(Step::Expect(Expectation::FieldValue {
        value: args[0].clone(),
        field: args[1].parse()?,
        present,
    }))
}
