//! Reference-data endpoints for checkout address forms.
//!
//! ```text
//! GET /api/v1/regions
//! GET /api/v1/regions/{region}/sub-regions
//! GET /api/v1/regions/{region}/pickup-points
//! ```
//!
//! `{region}` is a region name fragment, numeric id, or two-digit code.
//! Sub-region lists degrade to the offline catalog, flagged by `source`.

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::geography::{DataSource, PickupPoint, Region, Sourced, SubRegion};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    DataSourceSchema, ErrorSchema, PickupPointSchema, RegionSchema, SubRegionSchema,
};
use crate::inbound::http::state::HttpState;

/// All regions.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegionListResponse {
    /// Every region.
    #[schema(value_type = Vec<RegionSchema>)]
    pub items: Vec<Region>,
}

/// Sub-regions of one region.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubRegionListResponse {
    /// Requested region.
    #[schema(value_type = RegionSchema)]
    pub region: Region,
    /// Its sub-regions.
    #[schema(value_type = Vec<SubRegionSchema>)]
    pub items: Vec<SubRegion>,
    /// Where the list came from.
    #[schema(value_type = DataSourceSchema)]
    pub source: DataSource,
}

/// Pickup desks of one region.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickupPointListResponse {
    /// Requested region.
    #[schema(value_type = RegionSchema)]
    pub region: Region,
    /// Its pickup desks.
    #[schema(value_type = Vec<PickupPointSchema>)]
    pub items: Vec<PickupPoint>,
    /// Where the list came from.
    #[schema(value_type = DataSourceSchema)]
    pub source: DataSource,
}

/// List every region.
#[utoipa::path(
    get,
    path = "/api/v1/regions",
    tags = ["geography"],
    responses(
        (status = 200, description = "Region catalog", body = RegionListResponse)
    )
)]
#[get("/regions")]
pub async fn list_regions(state: web::Data<HttpState>) -> web::Json<RegionListResponse> {
    web::Json(RegionListResponse {
        items: state.geography.list_regions().to_vec(),
    })
}

/// List the sub-regions (communes) of a region.
#[utoipa::path(
    get,
    path = "/api/v1/regions/{region}/sub-regions",
    tags = ["geography"],
    params(("region" = String, Path, description = "Region name, id, or code")),
    responses(
        (status = 200, description = "Sub-regions", body = SubRegionListResponse),
        (status = 404, description = "Unknown region", body = ErrorSchema)
    )
)]
#[get("/regions/{region}/sub-regions")]
pub async fn list_sub_regions(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<SubRegionListResponse>> {
    let query = path.into_inner();
    let region = state.geography.region(&query)?.clone();
    let Sourced { items, source } = state.geography.list_sub_regions(&query).await?;
    Ok(web::Json(SubRegionListResponse {
        region,
        items,
        source,
    }))
}

/// List the pickup desks of a region.
#[utoipa::path(
    get,
    path = "/api/v1/regions/{region}/pickup-points",
    tags = ["geography"],
    params(("region" = String, Path, description = "Region name, id, or code")),
    responses(
        (status = 200, description = "Pickup points", body = PickupPointListResponse),
        (status = 404, description = "Unknown region", body = ErrorSchema)
    )
)]
#[get("/regions/{region}/pickup-points")]
pub async fn list_pickup_points(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PickupPointListResponse>> {
    let query = path.into_inner();
    let region = state.geography.region(&query)?.clone();
    let Sourced { items, source } = state.geography.list_pickup_points(&query).await?;
    Ok(web::Json(PickupPointListResponse {
        region,
        items,
        source,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::Value;

    use crate::inbound::http::test_utils::offline_state;

    #[actix_web::test]
    async fn lists_the_whole_catalog() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(offline_state()))
                .service(web::scope("/api/v1").service(list_regions)),
        )
        .await;
        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/api/v1/regions").to_request(),
        )
        .await;
        assert_eq!(body["items"].as_array().map(Vec::len), Some(58));
        assert_eq!(body["items"][15]["name"], "Alger");
    }

    #[actix_web::test]
    async fn unconfigured_carrier_serves_the_offline_catalog() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(offline_state()))
                .service(web::scope("/api/v1").service(list_sub_regions)),
        )
        .await;
        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/regions/oran/sub-regions")
                .to_request(),
        )
        .await;
        assert_eq!(body["source"], "offline-catalog");
        assert_eq!(body["region"]["name"], "Oran");
        assert!(!body["items"].as_array().expect("items").is_empty());
    }

    #[actix_web::test]
    async fn unknown_region_is_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(offline_state()))
                .service(web::scope("/api/v1").service(list_pickup_points)),
        )
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/regions/Atlantis/pickup-points")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
