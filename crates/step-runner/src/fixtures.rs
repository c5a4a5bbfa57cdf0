//! Fixture loading: seed the store from a products table

use catalog_core::{Category, NewProduct, Price, Product, ProductFilter};
use product_store::ProductStore;
use tracing::{info, instrument};

use crate::error::StepError;
use crate::form::parse_flag;

const COLUMNS: [&str; 5] = ["name", "description", "price", "available", "category"];

/// Parse a data table whose first row names the columns.
pub fn parse_table(rows: &[Vec<String>]) -> Result<Vec<NewProduct>, StepError> {
    let (header, body) = rows.split_first().ok_or_else(|| fixture("the products table is empty"))?;

    let mut positions = [0usize; COLUMNS.len()];
    for (slot, column) in positions.iter_mut().zip(COLUMNS) {
        *slot = header
            .iter()
            .position(|cell| cell.trim().eq_ignore_ascii_case(column))
            .ok_or_else(|| fixture(&format!("the products table has no '{column}' column")))?;
    }
    let [name, description, price, available, category] = positions;

    body.iter()
        .enumerate()
        .map(|(index, row)| -> Result<NewProduct, StepError> {
            let cell = |position: usize| {
                row.get(position)
                    .map(|text| text.trim())
                    .ok_or_else(|| fixture(&format!("row {} is missing cells", index + 1)))
            };
            let product = NewProduct {
                name: cell(name)?.to_string(),
                description: cell(description)?.to_string(),
                price: cell(price)?
                    .parse::<Price>()
                    .map_err(|err| fixture(&format!("row {}: {err}", index + 1)))?,
                available: parse_flag(cell(available)?).ok_or_else(|| {
                    fixture(&format!("row {}: availability must be True or False", index + 1))
                })?,
                category: cell(category)?
                    .parse::<Category>()
                    .map_err(|err| fixture(&format!("row {}: {err}", index + 1)))?,
            };
            Ok(product)
        })
        .collect()
}

/// Replace the store's contents with `products`, created in order.
#[instrument(skip(store, products), fields(count = products.len()))]
pub async fn seed(
    store: &dyn ProductStore,
    products: &[NewProduct],
) -> Result<Vec<Product>, StepError> {
    let existing = store
        .list(&ProductFilter::all())
        .await
        .map_err(|err| fixture(&err.to_string()))?;
    for product in existing {
        store
            .delete(product.id)
            .await
            .map_err(|err| fixture(&err.to_string()))?;
    }

    let mut created = Vec::with_capacity(products.len());
    for product in products {
        let product = store
            .create(product.clone())
            .await
            .map_err(|err| fixture(&format!("could not create '{}': {err}", product.name)))?;
        created.push(product);
    }

    info!("Seeded {} products", created.len());
    Ok(created)
}

fn fixture(reason: &str) -> StepError {
    StepError::Fixture {
        reason: reason.to_string(),
    }
}
