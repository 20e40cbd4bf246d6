// [business] Property search query generation through the public API
// These tests need no database - they check the SQL text and bound parameters handed to sqlx

use lightbnb::db::{build_property_query, PropertyFilter, SqlValue, DEFAULT_LIMIT};

/// Filter as the web layer would deserialize it from a search form
fn filter_from_json(json: &str) -> PropertyFilter {
    serde_json::from_str(json).expect("search form should deserialize")
}

#[test]
fn test_search_form_deserializes_into_filter() {
    let filter = filter_from_json(
        r#"{"city":"Vancouver","minimum_price_per_night":50,"maximum_price_per_night":200}"#,
    );

    assert_eq!(filter.city.as_deref(), Some("Vancouver"));
    assert_eq!(filter.owner_id, None);
    assert_eq!(filter.minimum_price_per_night, Some(50.0));
    assert_eq!(filter.maximum_price_per_night, Some(200.0));
    assert_eq!(filter.minimum_rating, None);
}

#[test]
fn test_empty_form_lists_cheapest_properties() {
    let query = build_property_query(&filter_from_json("{}"), None);

    assert_eq!(query.params(), &[SqlValue::Int(DEFAULT_LIMIT)]);
    assert!(!query.sql().contains("WHERE"));
    assert!(query.sql().contains("ORDER BY properties.cost_per_night"));
}

#[test]
fn test_my_listings_filters_by_owner() {
    let query = build_property_query(&filter_from_json(r#"{"owner_id":7}"#), Some(50));

    assert!(query.sql().contains("WHERE properties.owner_id = $1 "));
    assert_eq!(query.params(), &[SqlValue::Int(7), SqlValue::Int(50)]);
}

#[test]
fn test_city_owner_and_rating_combine_with_and() {
    let query = build_property_query(
        &filter_from_json(r#"{"city":"Toronto","owner_id":7,"minimum_rating":4}"#),
        None,
    );
    let sql = query.sql();

    assert_eq!(sql.matches("WHERE").count(), 1);
    assert!(sql.contains(
        "WHERE properties.city LIKE $1 \
         AND properties.owner_id = $2 \
         AND property_reviews.rating >= $3 "
    ));
    assert_eq!(query.params().len(), 4);
    assert!(sql.ends_with("LIMIT $4;"));
}

#[test]
fn test_into_parts_keeps_sql_and_params_aligned() {
    let query = build_property_query(
        &filter_from_json(r#"{"minimum_price_per_night":50,"maximum_price_per_night":200}"#),
        None,
    );
    let expected_sql = query.sql().to_string();

    let (sql, params) = query.into_parts();

    assert_eq!(sql, expected_sql);
    assert_eq!(
        params,
        vec![SqlValue::Int(5000), SqlValue::Int(20000), SqlValue::Int(10)]
    );
    assert_eq!(sql.matches('$').count(), params.len());
}

#[test]
fn test_half_filled_form_skips_blank_fields() {
    let filter = filter_from_json(
        r#"{"city":"Toronto","owner_id":"","minimum_price_per_night":"",
            "maximum_price_per_night":"","minimum_rating":""}"#,
    );

    assert_eq!(
        filter,
        PropertyFilter {
            city: Some("Toronto".into()),
            ..Default::default()
        }
    );

    let query = build_property_query(&filter, None);
    assert_eq!(
        query.params(),
        &[SqlValue::Text("%Toronto%".into()), SqlValue::Int(DEFAULT_LIMIT)]
    );
}

#[test]
fn test_numeric_form_text_is_parsed() {
    let filter = filter_from_json(
        r#"{"owner_id":"7","minimum_price_per_night":" 50 ","maximum_price_per_night":"199.99",
            "minimum_rating":"4"}"#,
    );

    assert_eq!(filter.owner_id, Some(7));
    assert_eq!(filter.minimum_price_per_night, Some(50.0));
    assert_eq!(filter.maximum_price_per_night, Some(199.99));
    assert_eq!(filter.minimum_rating, Some(4.0));

    let query = build_property_query(&filter, None);
    assert_eq!(query.params()[2], SqlValue::Int(19999));
}

#[test]
fn test_null_and_garbage_form_values() {
    assert_eq!(
        filter_from_json(r#"{"owner_id":null,"minimum_rating":null}"#),
        PropertyFilter::default()
    );
    assert!(serde_json::from_str::<PropertyFilter>(r#"{"owner_id":"seven"}"#).is_err());
}
