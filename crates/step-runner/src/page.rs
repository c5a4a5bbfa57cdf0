//! The catalog administration page
//!
//! Holds what a browser would show: title, form fields, flash message and the
//! search results table. Buttons forward to the product store.

use catalog_core::{CatalogError, Product, ProductId};
use product_store::ProductStore;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::error::StepError;
use crate::form::{flag_label, Field, FormState};

pub const HOME_PAGE: &str = "Home Page";
pub const DEFAULT_TITLE: &str = "Product Catalog Administration";

pub const SUCCESS_MESSAGE: &str = "Success";
pub const DELETED_MESSAGE: &str = "Product has been Deleted!";

const RESULTS_HEADER: &str = "ID | Name | Description | Available | Category | Price";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Create,
    Retrieve,
    Update,
    Delete,
    Search,
    Clear,
}

impl Button {
    pub const ALL: [Button; 6] = [
        Button::Create,
        Button::Retrieve,
        Button::Update,
        Button::Delete,
        Button::Search,
        Button::Clear,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Button::Create => "Create",
            Button::Retrieve => "Retrieve",
            Button::Update => "Update",
            Button::Delete => "Delete",
            Button::Search => "Search",
            Button::Clear => "Clear",
        }
    }

    /// HTML element id, e.g. `clear-btn`.
    pub fn element_id(&self) -> String {
        format!("{}-btn", self.label().to_lowercase())
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Button {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, StepError> {
        let wanted = s.trim();
        Button::ALL
            .into_iter()
            .find(|button| button.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| StepError::UnknownButton {
                name: s.to_string(),
            })
    }
}

pub struct CatalogPage {
    store: Arc<dyn ProductStore>,
    home_title: String,
    title: String,
    form: FormState,
    message: String,
    results: Vec<Product>,
}

impl fmt::Debug for CatalogPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogPage")
            .field("title", &self.title)
            .field("form", &self.form)
            .field("message", &self.message)
            .field("results_count", &self.results.len())
            .finish()
    }
}

impl CatalogPage {
    pub fn new(store: Arc<dyn ProductStore>, home_title: impl Into<String>) -> Self {
        Self {
            store,
            home_title: home_title.into(),
            title: String::new(),
            form: FormState::new(),
            message: String::new(),
            results: Vec::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn results(&self) -> &[Product] {
        &self.results
    }

    /// Load a named page. Only the home page exists.
    pub fn visit(&mut self, page: &str) -> Result<(), StepError> {
        if !page.trim().eq_ignore_ascii_case(HOME_PAGE) {
            return Err(StepError::UnknownPage {
                name: page.to_string(),
            });
        }
        self.title = self.home_title.clone();
        self.form.clear();
        self.message.clear();
        self.results.clear();
        Ok(())
    }

    /// Choose a dropdown option. An invalid option leaves the form untouched
    /// and shows an error message instead.
    pub fn select(&mut self, field: Field, value: &str) {
        if !field.is_dropdown() {
            self.message = format!("The {field} field is not a dropdown");
            return;
        }
        match field.option(value) {
            Some(option) => self.form.set(field, option),
            None => {
                self.message = format!("'{value}' is not an option of the {field} dropdown");
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn press(&mut self, button: Button) -> Result<(), StepError> {
        match button {
            Button::Create => {
                let outcome = match self.form.to_product() {
                    Ok(product) => self.store.create(product).await,
                    Err(err) => Err(err),
                };
                self.show(outcome)
            }
            Button::Retrieve => {
                let outcome = match self.form_id() {
                    Ok(id) => self.store.get(id).await,
                    Err(err) => Err(err),
                };
                self.show(outcome)
            }
            Button::Update => {
                let outcome = match (self.form_id(), self.form.to_product()) {
                    (Ok(id), Ok(product)) => self.store.update(id, product).await,
                    (Err(err), _) | (_, Err(err)) => Err(err),
                };
                self.show(outcome)
            }
            Button::Delete => {
                if let Ok(id) = self.form_id() {
                    self.store.delete(id).await.map_err(fatal)?;
                }
                self.form.clear();
                self.message = DELETED_MESSAGE.to_string();
                Ok(())
            }
            Button::Search => {
                let filter = match self.form.to_filter() {
                    Ok(filter) => filter,
                    Err(err) => return self.show(Err(err)),
                };
                match self.store.list(&filter).await {
                    Ok(products) => {
                        debug!("Search returned {} products", products.len());
                        if let Some(first) = products.first() {
                            self.form.populate(first);
                        }
                        self.results = products;
                        self.message = SUCCESS_MESSAGE.to_string();
                        Ok(())
                    }
                    Err(err) => self.show(Err(err)),
                }
            }
            Button::Clear => {
                self.form.clear();
                self.message.clear();
                Ok(())
            }
        }
    }

    /// Search results as the table text a user would read.
    pub fn render_results(&self) -> String {
        let mut lines = vec![RESULTS_HEADER.to_string()];
        lines.extend(self.results.iter().map(|product| {
            format!(
                "{} | {} | {} | {} | {} | {}",
                product.id,
                product.name,
                product.description,
                flag_label(product.available),
                product.category.label(),
                product.price
            )
        }));
        lines.join("\n")
    }

    /// Everything visible on the page.
    pub fn body_text(&self) -> String {
        [
            self.title.clone(),
            self.message.clone(),
            self.form.render(),
            self.render_results(),
        ]
        .join("\n")
    }

    fn form_id(&self) -> Result<ProductId, CatalogError> {
        let text = self.form.get(Field::Id).trim();
        text.parse().map_err(|_| CatalogError::InvalidProduct {
            reason: format!("'{text}' is not a product id"),
        })
    }

    /// Populate the form from a successful outcome; show recoverable errors as
    /// the flash message.
    fn show(&mut self, outcome: catalog_core::Result<Product>) -> Result<(), StepError> {
        match outcome {
            Ok(product) => {
                self.form.populate(&product);
                self.message = SUCCESS_MESSAGE.to_string();
                Ok(())
            }
            Err(err @ CatalogError::StoreUnavailable { .. }) => Err(fatal(err)),
            Err(err) => {
                debug!("Showing error message: {}", err);
                self.message = err.to_string();
                Ok(())
            }
        }
    }
}

fn fatal(err: CatalogError) -> StepError {
    StepError::Store {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::{Category, NewProduct, Price};
    use product_store::InMemoryProductStore;

    async fn seeded_page() -> CatalogPage {
        let store = InMemoryProductStore::new();
        for (name, description, category, available) in [
            ("Hat", "A red fedora", Category::Cloths, true),
            ("Shoes", "Blue shoes", Category::Cloths, false),
            ("Big Mac", "1/4 lb burger", Category::Food, true),
        ] {
            store
                .create(NewProduct {
                    name: name.to_string(),
                    description: description.to_string(),
                    price: Price::from_cents(1000),
                    available,
                    category,
                })
                .await
                .unwrap();
        }
        let mut page = CatalogPage::new(Arc::new(store), DEFAULT_TITLE);
        page.visit(HOME_PAGE).unwrap();
        page
    }

    #[tokio::test]
    async fn test_visit_unknown_page() {
        let mut page = seeded_page().await;
        assert!(matches!(
            page.visit("Admin Page"),
            Err(StepError::UnknownPage { .. })
        ));
        assert_eq!(page.title(), DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn test_retrieve_miss_keeps_fields() {
        let mut page = seeded_page().await;
        page.form_mut().set(Field::Id, "999");
        page.form_mut().set(Field::Name, "Ghost");

        page.press(Button::Retrieve).await.unwrap();

        assert_eq!(page.message(), "Product with id '999' was not found.");
        assert_eq!(page.form().get(Field::Name), "Ghost");
    }

    #[tokio::test]
    async fn test_create_fills_in_id() {
        let mut page = seeded_page().await;
        page.form_mut().set(Field::Name, "Hammer");
        page.form_mut().set(Field::Price, "34.95");
        page.select(Field::Category, "Tools");

        page.press(Button::Create).await.unwrap();

        assert_eq!(page.message(), SUCCESS_MESSAGE);
        assert_eq!(page.form().get(Field::Id), "4");
        assert_eq!(page.form().get(Field::Category), "Tools");
        assert_eq!(page.form().get(Field::Available), "False");
    }

    #[tokio::test]
    async fn test_create_with_bad_price_shows_message() {
        let mut page = seeded_page().await;
        page.form_mut().set(Field::Name, "Hammer");
        page.form_mut().set(Field::Price, "cheap");

        page.press(Button::Create).await.unwrap();

        assert_eq!(page.message(), "Invalid price: 'cheap'");
        assert_eq!(page.form().get(Field::Id), "");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let mut page = seeded_page().await;
        for _ in 0..2 {
            page.form_mut().set(Field::Id, "2");
            page.press(Button::Delete).await.unwrap();
            assert_eq!(page.message(), DELETED_MESSAGE);
            assert!(page.form().is_empty());
        }
    }

    #[tokio::test]
    async fn test_search_combines_criteria() {
        let mut page = seeded_page().await;
        page.select(Field::Category, "Cloths");
        page.select(Field::Available, "False");

        page.press(Button::Search).await.unwrap();

        assert_eq!(page.results().len(), 1);
        assert_eq!(page.form().get(Field::Name), "Shoes");
        assert!(page.render_results().contains("Blue shoes"));
    }

    #[tokio::test]
    async fn test_invalid_selection_is_a_no_op() {
        let mut page = seeded_page().await;
        page.select(Field::Available, "Maybe");
        assert_eq!(page.form().get(Field::Available), "");
        assert!(page.message().contains("not an option"));
    }

    #[tokio::test]
    async fn test_select_on_a_text_field_is_a_no_op() {
        let mut page = seeded_page().await;
        page.select(Field::Price, "Tools");
        assert_eq!(page.form().get(Field::Price), "");
        assert_eq!(page.message(), "The Price field is not a dropdown");
    }

    #[tokio::test]
    async fn test_update_missing_product_keeps_fields() {
        let mut page = seeded_page().await;
        page.form_mut().set(Field::Id, "999");
        page.form_mut().set(Field::Name, "Ghost");
        page.form_mut().set(Field::Price, "5.00");

        page.press(Button::Update).await.unwrap();

        assert_eq!(page.message(), "Product with id '999' was not found.");
        assert_eq!(page.form().get(Field::Id), "999");
        assert_eq!(page.form().get(Field::Name), "Ghost");
        assert_eq!(page.form().get(Field::Price), "5.00");
    }

    #[tokio::test]
    async fn test_update_with_non_numeric_id() {
        let mut page = seeded_page().await;
        page.form_mut().set(Field::Id, "abc");
        page.form_mut().set(Field::Name, "Hat");
        page.form_mut().set(Field::Price, "5.00");

        page.press(Button::Update).await.unwrap();

        assert_eq!(page.message(), "Invalid product: 'abc' is not a product id");
        assert_eq!(page.form().get(Field::Id), "abc");
        assert_eq!(page.form().get(Field::Name), "Hat");

        page.form_mut().set(Field::Id, "1");
        page.press(Button::Retrieve).await.unwrap();
        assert_eq!(page.form().get(Field::Price), "10.00");
    }

    #[tokio::test]
    async fn test_search_with_unknown_category_shows_message() {
        let mut page = seeded_page().await;
        page.press(Button::Search).await.unwrap();
        page.form_mut().clear();
        page.form_mut().set(Field::Category, "Gadgets");

        page.press(Button::Search).await.unwrap();

        assert_eq!(page.message(), "Unknown category: 'Gadgets'");
        assert_eq!(page.results().len(), 3);
        assert_eq!(page.form().get(Field::Category), "Gadgets");
    }

    #[tokio::test]
    async fn test_search_with_bad_availability_shows_message() {
        let mut page = seeded_page().await;
        page.form_mut().set(Field::Available, "Maybe");

        page.press(Button::Search).await.unwrap();

        assert_eq!(
            page.message(),
            "Invalid product: 'Maybe' is not a valid availability"
        );
        assert!(page.results().is_empty());
    }

    #[tokio::test]
    async fn test_clear_keeps_results() {
        let mut page = seeded_page().await;
        page.press(Button::Search).await.unwrap();
        page.press(Button::Clear).await.unwrap();

        assert!(page.form().is_empty());
        assert_eq!(page.message(), "");
        assert_eq!(page.results().len(), 3);
    }

    #[test]
    fn test_button_names() {
        assert_eq!("retrieve".parse::<Button>().unwrap(), Button::Retrieve);
        assert_eq!(Button::Clear.element_id(), "clear-btn");
        assert!("Launch".parse::<Button>().is_err());
    }
}
