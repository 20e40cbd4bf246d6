// [library] Serde - criteria arrive as query-string/form input from the web layer
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

// [business] Number of listings returned when the caller does not ask for a specific count
pub const DEFAULT_LIMIT: i64 = 10;

// [business] Every listing row carries the property's columns and its mean review rating
const BASE_QUERY: &str = "SELECT properties.*, \
avg(property_reviews.rating)::float8 AS average_rating \
FROM properties \
JOIN property_reviews \
ON properties.id = property_reviews.property_id ";

const TAIL_QUERY: &str = "GROUP BY properties.id ORDER BY properties.cost_per_night";

// [business] Search criteria for the property listing page - every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilter {
    pub city: Option<String>, // [business] Matched anywhere in the city name

    // [business] Only this owner's properties ("My Listings")
    #[serde(default, deserialize_with = "form_number")]
    pub owner_id: Option<i32>,

    // [business] Dollars, stored as cents
    #[serde(default, deserialize_with = "form_number")]
    pub minimum_price_per_night: Option<f64>,
    #[serde(default, deserialize_with = "form_number")]
    pub maximum_price_per_night: Option<f64>,

    #[serde(default, deserialize_with = "form_number")]
    pub minimum_rating: Option<f64>,
}

// [library] A form field is either a JSON number or the raw text the browser submitted
#[derive(Deserialize)]
#[serde(untagged)]
enum FormField<T> {
    Number(T),
    Text(String),
}

// [business] Unfilled search inputs arrive as "" and mean "no filter"; "120" parses like 120
fn form_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    match Option::<FormField<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(FormField::Number(value)) => Ok(Some(value)),
        Some(FormField::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Ok(None)
            } else {
                text.parse().map(Some).map_err(de::Error::custom)
            }
        }
    }
}

// [rust] A scalar bound to a positional placeholder
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Eq,
    Like,
    Gte,
    Lte,
}

impl Operator {
    fn as_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Like => "LIKE",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
        }
    }
}

// [rust] One `column op $n` condition; the placeholder number is assigned at render time
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Predicate {
    pub column: &'static str,
    pub op: Operator,
    pub value: SqlValue,
}

/// Ordered list of predicates joined into a single `WHERE ... AND ...` clause.
///
/// The keyword is chosen from the predicate's position in the list, so adding
/// or removing a filter never changes how the others are joined.
#[derive(Debug, Default)]
pub(crate) struct Conditions {
    predicates: Vec<Predicate>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, column: &'static str, op: Operator, value: SqlValue) {
        self.predicates.push(Predicate { column, op, value });
    }

    // [rust] Appends each value to `params` and references it by its new 1-based position
    pub fn render(self, sql: &mut String, params: &mut Vec<SqlValue>) {
        for (index, predicate) in self.predicates.into_iter().enumerate() {
            params.push(predicate.value);
            let keyword = if index == 0 { "WHERE" } else { "AND" };
            sql.push_str(&format!(
                "{} {} {} ${} ",
                keyword,
                predicate.column,
                predicate.op.as_sql(),
                params.len()
            ));
        }
    }
}

// [business] Generated listing query - SQL text plus the values for $1..$n, in order
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyQuery {
    sql: String,
    params: Vec<SqlValue>,
}

impl PropertyQuery {
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }

    pub fn into_parts(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.params)
    }
}

// [business] Empty strings, zero and NaN count as "not supplied", like an unfilled form field
fn supplied_text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

fn supplied_number(value: Option<f64>) -> Option<f64> {
    value.filter(|number| *number != 0.0 && !number.is_nan())
}

// [business] Prices are entered in dollars; cost_per_night is stored in cents
fn to_cents(dollars: f64) -> i64 {
    (dollars * 100.0).round() as i64
}

/// Builds the property search query for `filter`.
///
/// Filters are evaluated in a fixed order (city, owner, minimum price, maximum
/// price, minimum rating) and the row limit is always the last parameter.
/// `limit` defaults to [`DEFAULT_LIMIT`] and is otherwise bound as given.
pub fn build_property_query(filter: &PropertyFilter, limit: Option<i64>) -> PropertyQuery {
    let mut conditions = Conditions::new();

    if let Some(city) = supplied_text(&filter.city) {
        conditions.push(
            "properties.city",
            Operator::Like,
            SqlValue::Text(format!("%{}%", city)),
        );
    }

    if let Some(owner_id) = filter.owner_id.filter(|id| *id != 0) {
        conditions.push(
            "properties.owner_id",
            Operator::Eq,
            SqlValue::Int(i64::from(owner_id)),
        );
    }

    if let Some(price) = supplied_number(filter.minimum_price_per_night) {
        conditions.push(
            "properties.cost_per_night",
            Operator::Gte,
            SqlValue::Int(to_cents(price)),
        );
    }

    if let Some(price) = supplied_number(filter.maximum_price_per_night) {
        conditions.push(
            "properties.cost_per_night",
            Operator::Lte,
            SqlValue::Int(to_cents(price)),
        );
    }

    if let Some(rating) = supplied_number(filter.minimum_rating) {
        conditions.push("property_reviews.rating", Operator::Gte, SqlValue::Float(rating));
    }

    let mut sql = String::from(BASE_QUERY);
    let mut params = Vec::new();
    conditions.render(&mut sql, &mut params);

    params.push(SqlValue::Int(limit.unwrap_or(DEFAULT_LIMIT)));
    sql.push_str(&format!("{} LIMIT ${};", TAIL_QUERY, params.len()));

    tracing::debug!(sql = %sql, params = ?params, "built property query");

    PropertyQuery { sql, params }
}
