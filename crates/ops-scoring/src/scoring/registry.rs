use tracing::debug;

use super::catalog;
use super::criterion::Criterion;
use super::error::ScoringError;

/// Canonical, insertion-ordered list of criteria per category.
///
/// Categories come into existence on their first registration and disappear
/// once their last criterion is removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriterionRegistry {
    categories: Vec<CategoryCriteria>,
}

#[derive(Debug, Clone, PartialEq)]
struct CategoryCriteria {
    name: String,
    criteria: Vec<Criterion>,
}

impl CriterionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the seven default weight tables.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for category in catalog::ordered_categories() {
            registry.categories.push(CategoryCriteria {
                name: category.to_string(),
                criteria: catalog::standard_criteria(category),
            });
        }
        registry
    }

    pub fn register_criterion(
        &mut self,
        category: &str,
        criterion: Criterion,
    ) -> Result<(), ScoringError> {
        criterion.validate()?;

        if self.criterion(category, &criterion.key).is_some() {
            return Err(ScoringError::DuplicateKey {
                category: category.to_string(),
                key: criterion.key,
            });
        }

        debug!(category, key = %criterion.key, "registering criterion");
        match self.position(category) {
            Some(index) => self.categories[index].criteria.push(criterion),
            None => self.categories.push(CategoryCriteria {
                name: category.to_string(),
                criteria: vec![criterion],
            }),
        }
        Ok(())
    }

    /// Criteria in registration order; empty for an unknown category.
    pub fn criteria(&self, category: &str) -> &[Criterion] {
        self.position(category)
            .map(|index| self.categories[index].criteria.as_slice())
            .unwrap_or(&[])
    }

    pub fn criterion(&self, category: &str, key: &str) -> Option<&Criterion> {
        self.criteria(category)
            .iter()
            .find(|criterion| criterion.key == key)
    }

    /// Remove a criterion. Weight sets that reference it are left untouched;
    /// callers drop the key from them explicitly.
    pub fn remove_criterion(
        &mut self,
        category: &str,
        key: &str,
    ) -> Result<Criterion, ScoringError> {
        let not_found = || ScoringError::NotFound {
            category: category.to_string(),
            key: key.to_string(),
        };

        let index = self.position(category).ok_or_else(not_found)?;
        let criteria = &mut self.categories[index].criteria;
        let slot = criteria
            .iter()
            .position(|criterion| criterion.key == key)
            .ok_or_else(not_found)?;
        let removed = criteria.remove(slot);

        if criteria.is_empty() {
            self.categories.remove(index);
        }

        debug!(category, key, "removed criterion");
        Ok(removed)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|entry| entry.name.as_str())
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.position(category).is_some()
    }

    fn position(&self, category: &str) -> Option<usize> {
        self.categories
            .iter()
            .position(|entry| entry.name == category)
    }
}
