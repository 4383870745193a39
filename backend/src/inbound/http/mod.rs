//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod geography;
pub mod health;
pub mod parcels;
pub mod quotes;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod webhooks;

pub use error::ApiResult;

/// Every versioned endpoint, mounted under `/api/v1`.
#[must_use]
pub fn api_scope() -> actix_web::Scope {
    actix_web::web::scope("/api/v1")
        .service(geography::list_regions)
        .service(geography::list_sub_regions)
        .service(geography::list_pickup_points)
        .service(quotes::create_quote)
        .service(parcels::create_parcel)
        .service(parcels::update_parcel)
        .service(parcels::delete_parcel)
        .service(parcels::get_parcel)
        .service(webhooks::receive_carrier_webhook)
}
