//! Expectation checks against the current page state

use crate::error::AssertionFailure;
use crate::form::Field;
use crate::page::CatalogPage;

/// One Then/And expectation. `present == false` is the "should not" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    Title { text: String, present: bool },
    Message { text: String, present: bool },
    FieldEmpty { field: Field },
    FieldValue { field: Field, value: String, present: bool },
    Results { text: String, present: bool },
    Page { text: String, present: bool },
}

impl Expectation {
    pub fn check(&self, page: &CatalogPage, step: &str) -> Result<(), AssertionFailure> {
        let (holds, expected, actual) = match self {
            Expectation::Title { text, present } => (
                page.title().contains(text.as_str()) == *present,
                describe("title", "containing", text, *present),
                page.title().to_string(),
            ),
            Expectation::Message { text, present } => (
                page.message().contains(text.as_str()) == *present,
                describe("message", "containing", text, *present),
                page.message().to_string(),
            ),
            Expectation::FieldEmpty { field } => {
                let actual = page.form().get(*field);
                (
                    actual.is_empty(),
                    format!("the {field} field to be empty"),
                    actual.to_string(),
                )
            }
            Expectation::FieldValue {
                field,
                value,
                present,
            } => {
                let actual = page.form().get(*field);
                (
                    (actual == value) == *present,
                    describe(&format!("{field} field"), "equal to", value, *present),
                    actual.to_string(),
                )
            }
            Expectation::Results { text, present } => {
                let rendered = page.render_results();
                (
                    rendered.contains(text.as_str()) == *present,
                    describe("results", "containing", text, *present),
                    rendered,
                )
            }
            Expectation::Page { text, present } => {
                let body = page.body_text();
                (
                    body.contains(text.as_str()) == *present,
                    describe("page", "containing", text, *present),
                    body,
                )
            }
        };

        if holds {
            Ok(())
        } else {
            Err(AssertionFailure {
                step: step.to_string(),
                expected,
                actual,
            })
        }
    }
}

fn describe(subject: &str, relation: &str, text: &str, present: bool) -> String {
    let negation = if present { "" } else { "not " };
    format!("{subject} {negation}{relation} {text:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{DEFAULT_TITLE, HOME_PAGE};
    use product_store::InMemoryProductStore;
    use std::sync::Arc;

    fn home_page() -> CatalogPage {
        let mut page = CatalogPage::new(Arc::new(InMemoryProductStore::new()), DEFAULT_TITLE);
        page.visit(HOME_PAGE).unwrap();
        page
    }

    #[test]
    fn test_title_substring() {
        let page = home_page();
        let seen = Expectation::Title {
            text: "Catalog Administration".to_string(),
            present: true,
        };
        assert!(seen.check(&page, "title").is_ok());

        let unseen = Expectation::Title {
            text: "404 Not Found".to_string(),
            present: false,
        };
        assert!(unseen.check(&page, "title").is_ok());
    }

    #[test]
    fn test_failure_names_step_and_values() {
        let mut page = home_page();
        page.form_mut().set(Field::Name, "Hat");

        let failure = Expectation::FieldValue {
            field: Field::Name,
            value: "Shoes".to_string(),
            present: true,
        }
        .check(&page, "I should see \"Shoes\" in the \"Name\" field")
        .unwrap_err();

        assert_eq!(failure.step, "I should see \"Shoes\" in the \"Name\" field");
        assert_eq!(failure.expected, "Name field equal to \"Shoes\"");
        assert_eq!(failure.actual, "Hat");
    }

    #[test]
    fn test_field_match_is_exact() {
        let mut page = home_page();
        page.form_mut().set(Field::Description, "A stylish red fedora");

        let partial = Expectation::FieldValue {
            field: Field::Description,
            value: "red fedora".to_string(),
            present: true,
        };
        assert!(partial.check(&page, "partial").is_err());
    }

    #[test]
    fn test_empty_field() {
        let page = home_page();
        let empty = Expectation::FieldEmpty { field: Field::Id };
        assert!(empty.check(&page, "empty").is_ok());
    }

    #[test]
    fn test_page_text_covers_form() {
        let mut page = home_page();
        page.form_mut().set(Field::Name, "Sheets");
        let seen = Expectation::Page {
            text: "Sheets".to_string(),
            present: true,
        };
        assert!(seen.check(&page, "page").is_ok());
    }
}
