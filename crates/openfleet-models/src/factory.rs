//! Fixture factories for tests and demos.
//!
//! These produce plausible jobs and items with unique order numbers so that
//! repeated test runs against a shared account never collide on the
//! `do_number` + `date` identity.

use chrono::Utc;
use uuid::Uuid;

use serde_json::json;

use crate::item::{Item, ItemCollection};
use crate::job::Job;

/// Builds fake [`Job`] fixtures.
pub struct JobFactory;

impl JobFactory {
    /// One fake delivery job dated today, with a unique order number and a
    /// couple of line items.
    pub fn fake() -> Job {
        let date = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        let do_number = format!("DO-{}", Uuid::new_v4().simple());
        Job::from_value(&json!({
            "do_number": do_number,
            "date": date,
            "address": "1 Null Island",
            "items": ItemFactory::fakes(2).to_value(),
        }))
    }

    /// `count` independent fake jobs.
    pub fn fakes(count: usize) -> Vec<Job> {
        (0..count).map(|_| Self::fake()).collect()
    }
}

/// Builds fake [`Item`] fixtures.
pub struct ItemFactory;

impl ItemFactory {
    /// One fake line item with a unique SKU.
    pub fn fake() -> Item {
        let mut item = Item::new();
        item.set_sku(&format!("SKU-{}", Uuid::new_v4().simple()));
        item.set_description("Widget");
        item.set_quantity(1);
        item
    }

    /// A collection of `count` fake line items.
    pub fn fakes(count: usize) -> ItemCollection {
        (0..count).map(|_| Self::fake()).collect::<Vec<_>>().into()
    }
}
