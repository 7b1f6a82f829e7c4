//! Product categories.

use chrono::{DateTime, Utc};
use common::CategoryId;
use serde::{Deserialize, Serialize};

use crate::catalog::vocab::{self, CategoryName};
use crate::error::ValidationError;

/// A product category.
///
/// Categories carry no free-form text; the name comes from the closed
/// [`CategoryName`] vocabulary and drives how products are presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier.
    pub id: CategoryId,

    /// Vocabulary name, e.g. `caps` or `tshirts`.
    pub name: CategoryName,

    /// When the category was created.
    pub created_at: DateTime<Utc>,

    /// When the category was last renamed.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    /// Requested vocabulary name.
    pub name: String,
}

/// Input for updating a category.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    /// New vocabulary name, if the category is being renamed.
    pub name: Option<String>,
}

impl Category {
    /// Creates a category from validated input.
    pub fn create(input: NewCategory) -> Result<Self, ValidationError> {
        let name = vocab::parse_field("name", &input.name)?;

        let now = Utc::now();
        Ok(Self {
            id: CategoryId::new(),
            name,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an update, bumping `updated_at` when anything changed.
    pub fn apply_update(&mut self, update: &CategoryUpdate) -> Result<(), ValidationError> {
        if let Some(name) = &update.name {
            self.name = vocab::parse_field("name", name)?;
            self.updated_at = Utc::now();
        }
        Ok(())
    }
}
