mod common;

use chrono::{Duration as ChronoDuration, Utc};
use common::TestApp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeSet;
use uuid::Uuid;

use coupon_api::cache::CATALOG_KEY;
use coupon_api::services::coupons::{CartItemInput, CouponQuery, CreateCouponInput};
use coupon_api::services::orders::CreateOrderInput;

fn categories(labels: &[&str]) -> BTreeSet<String> {
    labels.iter().map(|label| label.to_string()).collect()
}

fn coupon_input(
    code: &str,
    discount_type: &str,
    discount_value: Decimal,
    min_order_value: Decimal,
    category_labels: &[&str],
) -> CreateCouponInput {
    CreateCouponInput {
        coupon_code: code.to_string(),
        expiry_date: Utc::now() + ChronoDuration::days(30),
        usage_type: "multi-use".to_string(),
        applicable_categories: categories(category_labels),
        applicable_medicine_ids: None,
        min_order_value,
        valid_time_window: None,
        terms_and_conditions: None,
        discount_type: discount_type.to_string(),
        discount_value,
        max_usage_per_user: 0,
    }
}

fn cart_query(items: &[(&str, Decimal)], order_total: Decimal, coupon_code: &str) -> CouponQuery {
    CouponQuery {
        cart_items: items
            .iter()
            .map(|(category, price)| CartItemInput {
                id: String::new(),
                name: String::new(),
                category: category.to_string(),
                price: *price,
            })
            .collect(),
        order_total,
        timestamp: Utc::now().to_rfc3339(),
        coupon_code: coupon_code.to_string(),
    }
}

#[tokio::test]
async fn percentage_coupon_worked_example() {
    let app = TestApp::new().await;
    let coupons = &app.state.services.coupons;

    coupons
        .create_coupon(coupon_input(
            "SAVE10",
            "percentage",
            dec!(10),
            dec!(50),
            &["pain-relief"],
        ))
        .await
        .expect("failed to create coupon");

    let query = cart_query(&[("pain-relief", dec!(100))], dec!(120), "");

    // Listing reports 10% of the order total, formatted to two decimals
    let applicable = coupons.applicable_coupons(&query).await.unwrap();
    assert_eq!(applicable.len(), 1);
    assert_eq!(applicable[0].coupon_code, "SAVE10");
    assert_eq!(applicable[0].discount_value, "12.00");

    // Validation splits the same coupon into item and charges portions
    let query = cart_query(&[("pain-relief", dec!(100))], dec!(120), "SAVE10");
    let breakdown = coupons
        .validate_coupon(&query, Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(breakdown.items_discount, dec!(10));
    assert_eq!(breakdown.charges_discount, dec!(2));
}

#[tokio::test]
async fn fixed_coupon_below_charges_mirrors_both_portions() {
    let app = TestApp::new().await;
    let coupons = &app.state.services.coupons;

    coupons
        .create_coupon(coupon_input(
            "FLAT15",
            "fixed",
            dec!(15),
            dec!(50),
            &["pain-relief"],
        ))
        .await
        .unwrap();

    // charges = 120 - 100 = 20, 15 < 20
    let query = cart_query(&[("pain-relief", dec!(100))], dec!(120), "FLAT15");
    let breakdown = coupons
        .validate_coupon(&query, Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(breakdown.items_discount, dec!(15));
    assert_eq!(breakdown.charges_discount, dec!(15));
}

#[tokio::test]
async fn fixed_coupon_covering_charges_leaves_items_untouched() {
    let app = TestApp::new().await;
    let coupons = &app.state.services.coupons;

    coupons
        .create_coupon(coupon_input(
            "FLAT25",
            "fixed",
            dec!(25),
            dec!(50),
            &["pain-relief"],
        ))
        .await
        .unwrap();

    // charges = 20, 25 >= 20
    let query = cart_query(&[("pain-relief", dec!(100))], dec!(120), "FLAT25");
    let breakdown = coupons
        .validate_coupon(&query, Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(breakdown.items_discount, dec!(0));
    assert_eq!(breakdown.charges_discount, dec!(25));
}

#[tokio::test]
async fn one_time_coupon_blocks_only_the_user_who_spent_it() {
    let app = TestApp::new().await;
    let coupons = &app.state.services.coupons;
    let orders = &app.state.services.orders;

    let mut input = coupon_input(
        "WELCOME",
        "percentage",
        dec!(10),
        dec!(0),
        &["pain-relief"],
    );
    input.usage_type = "one-time".to_string();
    coupons.create_coupon(input).await.unwrap();

    let spender = Uuid::new_v4();
    let fresh_user = Uuid::new_v4();

    orders
        .create_order(CreateOrderInput {
            user_id: spender,
            order_status: None,
            coupon_code_used: Some("WELCOME".to_string()),
            amount_paid: dec!(108),
        })
        .await
        .unwrap();

    let query = cart_query(&[("pain-relief", dec!(100))], dec!(120), "WELCOME");

    let spent = coupons.validate_coupon(&query, spender).await.unwrap();
    assert!(spent.is_zero());

    let unspent = coupons.validate_coupon(&query, fresh_user).await.unwrap();
    assert_eq!(unspent.items_discount, dec!(10));
}

#[tokio::test]
async fn multi_use_coupon_survives_repeated_usage() {
    let app = TestApp::new().await;
    let coupons = &app.state.services.coupons;
    let orders = &app.state.services.orders;

    coupons
        .create_coupon(coupon_input(
            "ALWAYS",
            "percentage",
            dec!(5),
            dec!(0),
            &["vitamins"],
        ))
        .await
        .unwrap();

    let user = Uuid::new_v4();
    for _ in 0..3 {
        orders
            .create_order(CreateOrderInput {
                user_id: user,
                order_status: None,
                coupon_code_used: Some("ALWAYS".to_string()),
                amount_paid: dec!(95),
            })
            .await
            .unwrap();
    }

    let query = cart_query(&[("vitamins", dec!(100))], dec!(100), "ALWAYS");
    let breakdown = coupons.validate_coupon(&query, user).await.unwrap();
    assert_eq!(breakdown.items_discount, dec!(5));
}

#[tokio::test]
async fn catalog_cache_is_invalidated_by_writes() {
    let app = TestApp::new().await;
    let coupons = &app.state.services.coupons;

    coupons
        .create_coupon(coupon_input(
            "FIRST",
            "fixed",
            dec!(5),
            dec!(0),
            &["vitamins"],
        ))
        .await
        .unwrap();

    // Prime the cache
    let before = coupons.all_coupons().await.unwrap();
    assert_eq!(before.len(), 1);
    assert!(app.cache.get(CATALOG_KEY).is_some());

    // The write drops the cached snapshot before acknowledging
    coupons
        .create_coupon(coupon_input(
            "SECOND",
            "fixed",
            dec!(7),
            dec!(0),
            &["vitamins"],
        ))
        .await
        .unwrap();
    assert!(app.cache.get(CATALOG_KEY).is_none());

    let after = coupons.all_coupons().await.unwrap();
    assert_eq!(after.len(), 2);
    assert!(after.iter().any(|c| c.coupon_code == "SECOND"));
}

#[tokio::test]
async fn catalog_read_is_served_from_cache_until_invalidated() {
    let app = TestApp::new().await;
    let coupons = &app.state.services.coupons;

    coupons
        .create_coupon(coupon_input(
            "CACHED",
            "fixed",
            dec!(5),
            dec!(0),
            &["vitamins"],
        ))
        .await
        .unwrap();
    coupons.all_coupons().await.unwrap();

    // Poison the cached payload; a cache-first read must reflect it
    app.cache.insert(CATALOG_KEY, "[]".to_string());
    let cached = coupons.all_coupons().await.unwrap();
    assert!(cached.is_empty());

    // Once invalidated, the store copy comes back and repopulates the cache
    app.cache.invalidate(CATALOG_KEY);
    let fresh = coupons.all_coupons().await.unwrap();
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].coupon_code, "CACHED");
    assert_eq!(fresh[0].applicable_categories, categories(&["vitamins"]));
}

#[tokio::test]
async fn min_order_value_gates_both_query_paths() {
    let app = TestApp::new().await;
    let coupons = &app.state.services.coupons;

    coupons
        .create_coupon(coupon_input(
            "BIGSPEND",
            "percentage",
            dec!(20),
            dec!(500),
            &["pain-relief"],
        ))
        .await
        .unwrap();

    // Item total is 100 even though the order total is 520; the minimum is
    // checked against the item sum
    let query = cart_query(&[("pain-relief", dec!(100))], dec!(520), "BIGSPEND");

    let applicable = coupons.applicable_coupons(&query).await.unwrap();
    assert!(applicable.is_empty());

    let breakdown = coupons
        .validate_coupon(&query, Uuid::new_v4())
        .await
        .unwrap();
    assert!(breakdown.is_zero());
}

#[tokio::test]
async fn expiry_uses_the_caller_supplied_reference_time() {
    let app = TestApp::new().await;
    let coupons = &app.state.services.coupons;

    coupons
        .create_coupon(coupon_input(
            "SHORTLIVED",
            "percentage",
            dec!(10),
            dec!(0),
            &["pain-relief"],
        ))
        .await
        .unwrap();

    // Reference inside the validity window: applicable
    let mut query = cart_query(&[("pain-relief", dec!(100))], dec!(120), "SHORTLIVED");
    query.timestamp = Utc::now().to_rfc3339();
    assert!(!coupons
        .validate_coupon(&query, Uuid::new_v4())
        .await
        .unwrap()
        .is_zero());

    // Reference beyond the expiry: the same coupon is gone
    query.timestamp = (Utc::now() + ChronoDuration::days(60)).to_rfc3339();
    assert!(coupons
        .validate_coupon(&query, Uuid::new_v4())
        .await
        .unwrap()
        .is_zero());
    assert!(coupons.applicable_coupons(&query).await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_timestamp_is_a_validation_error() {
    let app = TestApp::new().await;
    let coupons = &app.state.services.coupons;

    let mut query = cart_query(&[("pain-relief", dec!(100))], dec!(120), "");
    query.timestamp = "tomorrow".to_string();

    let err = coupons.applicable_coupons(&query).await.unwrap_err();
    assert!(matches!(
        err,
        coupon_api::errors::ServiceError::ValidationError(_)
    ));
}

#[tokio::test]
async fn empty_category_set_matches_no_cart() {
    let app = TestApp::new().await;
    let coupons = &app.state.services.coupons;

    coupons
        .create_coupon(coupon_input("NOCATS", "percentage", dec!(10), dec!(0), &[]))
        .await
        .unwrap();

    let query = cart_query(&[("pain-relief", dec!(100))], dec!(120), "NOCATS");

    assert!(coupons.applicable_coupons(&query).await.unwrap().is_empty());
    assert!(coupons
        .validate_coupon(&query, Uuid::new_v4())
        .await
        .unwrap()
        .is_zero());
}

#[tokio::test]
async fn category_mismatch_is_not_applicable_not_an_error() {
    let app = TestApp::new().await;
    let coupons = &app.state.services.coupons;

    coupons
        .create_coupon(coupon_input(
            "DERMA",
            "percentage",
            dec!(10),
            dec!(0),
            &["skincare"],
        ))
        .await
        .unwrap();

    let query = cart_query(&[("pain-relief", dec!(100))], dec!(120), "DERMA");
    let breakdown = coupons
        .validate_coupon(&query, Uuid::new_v4())
        .await
        .unwrap();
    assert!(breakdown.is_zero());
}

#[tokio::test]
async fn unknown_coupon_code_is_not_applicable() {
    let app = TestApp::new().await;
    let coupons = &app.state.services.coupons;

    let query = cart_query(&[("pain-relief", dec!(100))], dec!(120), "NOSUCH");
    let breakdown = coupons
        .validate_coupon(&query, Uuid::new_v4())
        .await
        .unwrap();
    assert!(breakdown.is_zero());
}

#[tokio::test]
async fn unknown_discount_type_reports_zero_everywhere() {
    let app = TestApp::new().await;
    let coupons = &app.state.services.coupons;

    coupons
        .create_coupon(coupon_input(
            "BOGO",
            "buy-one-get-one",
            dec!(1),
            dec!(0),
            &["pain-relief"],
        ))
        .await
        .unwrap();

    let query = cart_query(&[("pain-relief", dec!(100))], dec!(120), "BOGO");

    let applicable = coupons.applicable_coupons(&query).await.unwrap();
    assert_eq!(applicable.len(), 1);
    assert_eq!(applicable[0].discount_value, "0.00");

    let breakdown = coupons
        .validate_coupon(&query, Uuid::new_v4())
        .await
        .unwrap();
    assert!(breakdown.is_zero());
}

#[tokio::test]
async fn listing_reports_each_eligible_coupon() {
    let app = TestApp::new().await;
    let coupons = &app.state.services.coupons;

    coupons
        .create_coupon(coupon_input(
            "TEN",
            "percentage",
            dec!(10),
            dec!(0),
            &["pain-relief"],
        ))
        .await
        .unwrap();
    coupons
        .create_coupon(coupon_input(
            "FLAT5",
            "fixed",
            dec!(5),
            dec!(0),
            &["pain-relief"],
        ))
        .await
        .unwrap();
    coupons
        .create_coupon(coupon_input(
            "OTHER",
            "percentage",
            dec!(50),
            dec!(0),
            &["skincare"],
        ))
        .await
        .unwrap();

    let query = cart_query(&[("pain-relief", dec!(100))], dec!(120), "");
    let applicable = coupons.applicable_coupons(&query).await.unwrap();

    assert_eq!(applicable.len(), 2);
    let ten = applicable.iter().find(|c| c.coupon_code == "TEN").unwrap();
    assert_eq!(ten.discount_value, "12.00");
    let flat = applicable.iter().find(|c| c.coupon_code == "FLAT5").unwrap();
    assert_eq!(flat.discount_value, "5.00");
}
