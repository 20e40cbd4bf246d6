use super::filter::{build_property_query, PropertyFilter, SqlValue, DEFAULT_LIMIT};
use super::models::*;
use crate::db::Database;
use anyhow::Result;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;
use sqlx::query_as;
use tracing::debug;

// [rust] Binds generated parameters in list order so `$n` lines up with params[n - 1]
fn bind_params<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: Vec<SqlValue>,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for param in params {
        query = match param {
            SqlValue::Text(value) => query.bind(value),
            SqlValue::Int(value) => query.bind(value),
            SqlValue::Float(value) => query.bind(value),
        };
    }
    query
}

// User queries
pub async fn get_user_with_email(db: &Database, email: &str) -> Result<Option<User>> {
    let mut conn = db.acquire().await;
    let user = query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(user)
}

pub async fn get_user_with_id(db: &Database, id: i32) -> Result<Option<User>> {
    let mut conn = db.acquire().await;
    let user = query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    if user.is_none() {
        debug!("No user found with id: {}", id);
    }

    Ok(user)
}

pub async fn add_user(db: &Database, user: &NewUser) -> Result<User> {
    let mut conn = db.acquire().await;
    let user = query_as::<_, User>(
        "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password)
    .fetch_one(&mut *conn)
    .await?;

    Ok(user)
}

// Reservation queries
pub async fn get_all_reservations(
    db: &Database,
    guest_id: i32,
    limit: Option<i64>,
) -> Result<Vec<ReservationListing>> {
    let mut conn = db.acquire().await;
    let reservations = query_as::<_, ReservationListing>(
        "SELECT reservations.id AS reservation_id, reservations.guest_id,
                reservations.start_date, reservations.end_date,
                properties.*, avg(property_reviews.rating)::float8 AS average_rating
         FROM reservations
         JOIN properties ON reservations.property_id = properties.id
         JOIN property_reviews ON properties.id = property_reviews.property_id
         WHERE reservations.guest_id = $1
         GROUP BY reservations.id, properties.id
         ORDER BY reservations.start_date
         LIMIT $2",
    )
    .bind(guest_id)
    .bind(limit.unwrap_or(DEFAULT_LIMIT))
    .fetch_all(&mut *conn)
    .await?;

    Ok(reservations)
}

// Property queries
pub async fn get_all_properties(
    db: &Database,
    filter: &PropertyFilter,
    limit: Option<i64>,
) -> Result<Vec<PropertyListing>> {
    let (sql, params) = build_property_query(filter, limit).into_parts();

    let mut conn = db.acquire().await;
    let properties = bind_params(query_as::<_, PropertyListing>(&sql), params)
        .fetch_all(&mut *conn)
        .await?;

    Ok(properties)
}

pub async fn add_property(db: &Database, property: &NewProperty) -> Result<Property> {
    let mut conn = db.acquire().await;
    let property = query_as::<_, Property>(
        "INSERT INTO properties (
            owner_id, title, description, thumbnail_photo_url, cover_photo_url,
            cost_per_night, street, city, province, post_code, country,
            parking_spaces, number_of_bathrooms, number_of_bedrooms
         )
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
         RETURNING *",
    )
    .bind(property.owner_id)
    .bind(&property.title)
    .bind(&property.description)
    .bind(&property.thumbnail_photo_url)
    .bind(&property.cover_photo_url)
    .bind(property.cost_per_night)
    .bind(&property.street)
    .bind(&property.city)
    .bind(&property.province)
    .bind(&property.post_code)
    .bind(&property.country)
    .bind(property.parking_spaces)
    .bind(property.number_of_bathrooms)
    .bind(property.number_of_bedrooms)
    .fetch_one(&mut *conn)
    .await?;

    Ok(property)
}
