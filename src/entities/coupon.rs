use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Promotional coupon, keyed by its case-sensitive code.
///
/// `coupon_code` is the join key against `orders.coupon_code_used`, which is
/// how historical usage per user is counted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub coupon_code: String,

    /// A coupon is a candidate while `expiry_date` is strictly after the
    /// caller-supplied reference instant.
    pub expiry_date: DateTime<Utc>,

    pub usage_type: String, // "one-time" or "multi-use"

    /// Comma-joined category labels; see [`split_categories`].
    pub applicable_categories: String,

    /// Opaque metadata, stored and returned but never enforced.
    pub applicable_medicine_ids: Option<String>,

    pub min_order_value: Decimal,

    pub valid_time_window: Option<String>,
    pub terms_and_conditions: Option<String>,

    pub discount_type: String, // "percentage" or "fixed"
    pub discount_value: Decimal,

    /// Stored for future enforcement; the usage gate currently only
    /// distinguishes one-time from multi-use.
    pub max_usage_per_user: i32,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Categories this coupon applies to, as a set.
    pub fn category_set(&self) -> BTreeSet<String> {
        split_categories(&self.applicable_categories)
    }
}

/// Splits a stored comma-joined label list back into a set.
///
/// This and [`join_labels`] are the only places the storage encoding is
/// known. Empty storage maps to the empty set. Labels containing a comma
/// are unsupported; the delimiter is not escaped.
pub fn split_categories(raw: &str) -> BTreeSet<String> {
    if raw.is_empty() {
        BTreeSet::new()
    } else {
        raw.split(',').map(str::to_owned).collect()
    }
}

/// Joins a label set into the comma-delimited storage encoding.
pub fn join_labels(labels: &BTreeSet<String>) -> String {
    labels.iter().map(String::as_str).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_empty_storage_is_empty_set() {
        assert!(split_categories("").is_empty());
    }

    #[test]
    fn split_and_join_round_trip() {
        let set = split_categories("pain-relief,vitamins,first-aid");
        assert_eq!(set.len(), 3);
        assert!(set.contains("vitamins"));
        assert_eq!(join_labels(&set), "first-aid,pain-relief,vitamins");
    }

    #[test]
    fn join_empty_set_is_empty_storage() {
        assert_eq!(join_labels(&BTreeSet::new()), "");
    }

    #[test]
    fn categories_are_case_sensitive() {
        let set = split_categories("Pain-Relief");
        assert!(!set.contains("pain-relief"));
    }
}
