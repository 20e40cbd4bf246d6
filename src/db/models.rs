// [library] Serde - JSON serialization for API responses and form parsing for new records
use serde::{Deserialize, Serialize};

// [library] SQLx type mapping for DATE columns
use sqlx::types::time::Date;

// [business] Registered user - guests and property owners share this table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String, // [business] Login identifier
    pub password: String, // [security] Stored hash, produced by the web layer before insert
}

// [business] Sign-up payload - the id is assigned by the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

// [business] Rental property as stored in the properties table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Property {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i32, // [business] Cents
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
    pub country: String,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub active: bool,
}

// [business] Listing form payload - column order matches the INSERT in add_property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProperty {
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_photo_url: String,
    pub cover_photo_url: String,
    pub cost_per_night: i32,
    pub street: String,
    pub city: String,
    pub province: String,
    pub post_code: String,
    pub country: String,
    pub parking_spaces: i32,
    pub number_of_bathrooms: i32,
    pub number_of_bedrooms: i32,
}

// [business] Search result row - a property plus the mean of its review ratings
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PropertyListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: Property,
    pub average_rating: Option<f64>,
}

// [business] "My Reservations" row - the booking, the booked property and its rating
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReservationListing {
    pub reservation_id: i32,
    pub guest_id: i32,
    pub start_date: Date,
    pub end_date: Date,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: Property,
    pub average_rating: Option<f64>,
}
