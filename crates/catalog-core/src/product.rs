//! Product types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CatalogError, Result};

pub type ProductId = u64;

/// Product category. Parsed case-insensitively, serialized upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Category {
    #[default]
    Unknown,
    Cloths,
    Food,
    Housewares,
    Automotive,
    Tools,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Unknown,
        Category::Cloths,
        Category::Food,
        Category::Housewares,
        Category::Automotive,
        Category::Tools,
    ];

    /// Wire and storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Unknown => "UNKNOWN",
            Category::Cloths => "CLOTHS",
            Category::Food => "FOOD",
            Category::Housewares => "HOUSEWARES",
            Category::Automotive => "AUTOMOTIVE",
            Category::Tools => "TOOLS",
        }
    }

    /// Visible text of the option in the category dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Unknown => "Unknown",
            Category::Cloths => "Cloths",
            Category::Food => "Food",
            Category::Housewares => "Housewares",
            Category::Automotive => "Automotive",
            Category::Tools => "Tools",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CatalogError::UnknownCategory {
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for Category {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

/// Non-negative decimal price held as whole cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "PriceRepr", into = "String")]
pub struct Price(u64);

impl Price {
    pub fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub fn cents(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Price {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CatalogError::InvalidPrice {
            value: s.to_string(),
        };
        let text = s.trim();
        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if fraction.len() > 2 {
            return Err(invalid());
        }
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !all_digits(whole) || !all_digits(fraction) {
            return Err(invalid());
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let fraction: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(fraction))
            .map(Price)
            .ok_or_else(invalid)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceRepr {
    Text(String),
    Number(f64),
}

impl TryFrom<PriceRepr> for Price {
    type Error = CatalogError;

    fn try_from(repr: PriceRepr) -> Result<Self> {
        match repr {
            PriceRepr::Text(text) => text.parse(),
            PriceRepr::Number(number) => number.to_string().parse(),
        }
    }
}

impl From<Price> for String {
    fn from(price: Price) -> Self {
        price.to_string()
    }
}

/// Product fields as submitted by a client, without an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub category: Category,
}

impl NewProduct {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::InvalidProduct {
                reason: "name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub available: bool,
    pub category: Category,
}

impl Product {
    pub fn new(id: ProductId, fields: NewProduct) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            price: fields.price,
            available: fields.available,
            category: fields.category,
        }
    }

    /// Replace every field except the id.
    pub fn apply(&mut self, fields: NewProduct) {
        self.name = fields.name;
        self.description = fields.description;
        self.price = fields.price;
        self.available = fields.available;
        self.category = fields.category;
    }

    pub fn fields(&self) -> NewProduct {
        NewProduct {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            available: self.available,
            category: self.category,
        }
    }
}

/// Conjunction of optional search criteria. Omitted criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl ProductFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.available.is_none()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    /// Name matching is exact.
    pub fn matches(&self, product: &Product) -> bool {
        self.name.as_deref().map_or(true, |name| product.name == name)
            && self.category.map_or(true, |c| product.category == c)
            && self.available.map_or(true, |a| product.available == a)
    }
}
