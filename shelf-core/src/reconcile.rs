//! Category allocation in the destination numbering space.
//!
//! Source and destination category ids are unrelated, so every source
//! category gets a brand-new destination category numbered above everything
//! the destination already holds. Categories are never merged with existing
//! ones of the same name; user-curated categories stay untouched.

use std::collections::BTreeMap;

use crate::types::{CategoryMapping, CategoryRecord, DestinationCategory};

/// New destination categories together with the id → order mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPlan {
    pub mapping: CategoryMapping,
    /// Categories to append, in allocation order.
    pub categories: Vec<DestinationCategory>,
}

/// Allocate a destination category for every source category.
///
/// Categories are processed in ascending source id. Each one takes the next
/// `id` above `existing_max_id` and the next `order` above
/// `existing_max_order`; its title is `"{prefix}_{title}"` and `flags` is
/// set to `flags`. If `source_categories` repeats an id, the last title wins.
pub fn reconcile_categories(
    source_categories: &[CategoryRecord],
    existing_max_id: i64,
    existing_max_order: i64,
    prefix: &str,
    flags: i64,
) -> CategoryPlan {
    let titles: BTreeMap<i64, &str> = source_categories
        .iter()
        .map(|c| (c.id, c.title.as_str()))
        .collect();

    let mut plan = CategoryPlan::default();
    let mut next_id = existing_max_id;
    let mut next_order = existing_max_order;

    for (source_id, title) in titles {
        next_id += 1;
        next_order += 1;
        plan.mapping.insert(source_id, next_order);
        plan.categories.push(DestinationCategory {
            id: next_id,
            title: format!("{prefix}_{title}"),
            order: next_order,
            flags,
        });
    }

    plan
}
