//! Form state: the transient field buffer behind the catalog page

use catalog_core::{CatalogError, Category, NewProduct, Price, Product, ProductFilter};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::StepError;

const ID_PREFIX: &str = "product_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Id,
    Name,
    Description,
    Price,
    Available,
    Category,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Id,
        Field::Name,
        Field::Description,
        Field::Price,
        Field::Available,
        Field::Category,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Id => "Id",
            Field::Name => "Name",
            Field::Description => "Description",
            Field::Price => "Price",
            Field::Available => "Available",
            Field::Category => "Category",
        }
    }

    /// HTML element id of the input, e.g. `product_name`.
    pub fn element_id(&self) -> String {
        format!("{ID_PREFIX}{}", self.label().to_lowercase())
    }

    pub fn is_dropdown(&self) -> bool {
        matches!(self, Field::Available | Field::Category)
    }

    /// The option whose visible text is exactly `value`, or `None` when the
    /// dropdown has no such option.
    pub fn option(&self, value: &str) -> Option<&'static str> {
        match self {
            Field::Available => [true, false]
                .into_iter()
                .map(flag_label)
                .find(|label| *label == value),
            Field::Category => Category::ALL
                .iter()
                .map(Category::label)
                .find(|label| *label == value),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Field {
    type Err = StepError;

    fn from_str(s: &str) -> Result<Self, StepError> {
        let key = s.trim().to_lowercase().replace(' ', "_");
        let key = key.strip_prefix(ID_PREFIX).unwrap_or(&key);
        Field::ALL
            .into_iter()
            .find(|field| field.label().eq_ignore_ascii_case(key))
            .ok_or_else(|| StepError::UnknownField {
                name: s.to_string(),
            })
    }
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

pub(crate) fn flag_label(flag: bool) -> &'static str {
    if flag {
        "True"
    } else {
        "False"
    }
}

/// Field name to current value. Unset fields read as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    values: BTreeMap<Field, String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(String::is_empty)
    }

    pub fn populate(&mut self, product: &Product) {
        self.set(Field::Id, product.id.to_string());
        self.set(Field::Name, product.name.clone());
        self.set(Field::Description, product.description.clone());
        self.set(Field::Price, product.price.to_string());
        self.set(Field::Available, flag_label(product.available));
        self.set(Field::Category, product.category.label());
    }

    /// The submitted record, ignoring Id. Empty dropdowns fall back to
    /// unavailable and the unknown category.
    pub fn to_product(&self) -> Result<NewProduct, CatalogError> {
        let price: Price = self.get(Field::Price).parse()?;
        let available = match self.get(Field::Available) {
            "" => false,
            text => parse_flag(text).ok_or_else(|| CatalogError::InvalidProduct {
                reason: format!("'{text}' is not a valid availability"),
            })?,
        };
        let category = match self.get(Field::Category) {
            "" => Category::Unknown,
            text => text.parse::<Category>()?,
        };

        Ok(NewProduct {
            name: self.get(Field::Name).to_string(),
            description: self.get(Field::Description).to_string(),
            price,
            available,
            category,
        })
    }

    /// Search criteria from whichever of Name, Category and Available are set.
    pub fn to_filter(&self) -> Result<ProductFilter, CatalogError> {
        let mut filter = ProductFilter::all();

        let name = self.get(Field::Name);
        if !name.is_empty() {
            filter = filter.with_name(name);
        }

        let category = self.get(Field::Category);
        if !category.is_empty() {
            filter = filter.with_category(category.parse::<Category>()?);
        }

        let available = self.get(Field::Available);
        if !available.is_empty() {
            let flag = parse_flag(available).ok_or_else(|| CatalogError::InvalidProduct {
                reason: format!("'{available}' is not a valid availability"),
            })?;
            filter = filter.with_available(flag);
        }

        Ok(filter)
    }

    /// Rendered as `label: value` lines for page-wide text searches.
    pub fn render(&self) -> String {
        Field::ALL
            .iter()
            .map(|field| format!("{}: {}", field.label(), self.get(*field)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
