//! Parsed steps

use crate::assertions::Expectation;
use crate::form::Field;
use crate::page::Button;

/// A recognized step with its parameters bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Visit { page: String },
    Set { field: Field, value: String },
    Select { field: Field, value: String },
    Press { button: Button },
    Copy { field: Field },
    Paste { field: Field },
    /// Seed the store from the step's data table.
    LoadFixtures,
    Expect(Expectation),
}

const KEYWORDS: [&str; 6] = ["Given ", "When ", "Then ", "And ", "But ", "* "];

/// Drop a leading Gherkin keyword, if any.
pub fn strip_keyword(text: &str) -> &str {
    let text = text.trim();
    KEYWORDS
        .iter()
        .find_map(|keyword| text.strip_prefix(keyword))
        .map(str::trim_start)
        .unwrap_or(text)
}
