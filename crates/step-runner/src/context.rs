//! Per-scenario execution context

use product_store::ProductStore;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::StepError;
use crate::fixtures;
use crate::page::CatalogPage;
use crate::registry::StepRegistry;
use crate::step::Step;

/// Everything one scenario mutates: the page (with its form state), the
/// clipboard and the store it talks to. Nothing here is shared between
/// scenarios.
pub struct ScenarioContext {
    id: Uuid,
    name: String,
    store: Arc<dyn ProductStore>,
    registry: Arc<StepRegistry>,
    page: CatalogPage,
    clipboard: Option<String>,
}

impl std::fmt::Debug for ScenarioContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioContext")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("page", &self.page)
            .field("clipboard", &self.clipboard)
            .finish()
    }
}

impl ScenarioContext {
    pub fn new(
        name: impl Into<String>,
        store: Arc<dyn ProductStore>,
        registry: Arc<StepRegistry>,
        home_title: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            page: CatalogPage::new(store.clone(), home_title),
            store,
            registry,
            clipboard: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn page(&self) -> &CatalogPage {
        &self.page
    }

    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    /// Parse and execute one step. `table` is the step's data table, if any.
    #[instrument(skip(self, table), fields(scenario = %self.id))]
    pub async fn run_step(
        &mut self,
        text: &str,
        table: Option<&[Vec<String>]>,
    ) -> Result<(), StepError> {
        let step = self.registry.parse(text)?;
        debug!("Executing {:?}", step);
        self.execute(&step, text, table).await
    }

    pub async fn execute(
        &mut self,
        step: &Step,
        text: &str,
        table: Option<&[Vec<String>]>,
    ) -> Result<(), StepError> {
        match step {
            Step::Visit { page } => self.page.visit(page),
            Step::Set { field, value } => {
                self.page.form_mut().set(*field, value.clone());
                Ok(())
            }
            Step::Select { field, value } => {
                self.page.select(*field, value);
                Ok(())
            }
            Step::Press { button } => self.page.press(*button).await,
            Step::Copy { field } => {
                let value = self.page.form().get(*field).to_string();
                info!("Clipboard contains: {}", value);
                self.clipboard = Some(value);
                Ok(())
            }
            Step::Paste { field } => {
                let value = self
                    .clipboard
                    .clone()
                    .ok_or_else(|| StepError::EmptyClipboard {
                        field: field.to_string(),
                    })?;
                self.page.form_mut().set(*field, value);
                Ok(())
            }
            Step::LoadFixtures => {
                let rows = table.ok_or_else(|| StepError::Fixture {
                    reason: "the step has no products table".to_string(),
                })?;
                let products = fixtures::parse_table(rows)?;
                fixtures::seed(self.store.as_ref(), &products).await?;
                Ok(())
            }
            Step::Expect(expectation) => expectation
                .check(&self.page, text)
                .map_err(StepError::Assertion),
        }
    }
}
