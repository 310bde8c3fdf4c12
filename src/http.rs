use crate::backend::StorageBackend;
use crate::booking_store::BookingStore;
use crate::error::BookingError;
use crate::types::{
    CancelResponse, Facility, FacilityAvailability, Reservation, ReserveRequest, ReserveResponse,
    TimeSlot,
};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query};
use axum::response::Response;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum::{
    routing::{delete, get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error};

pub struct AppState<S> {
    pub booking_store: Arc<BookingStore<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            booking_store: self.booking_store.clone(),
        }
    }
}

/// JSON body extractor whose rejections are reported as `BookingError`.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(BookingError))]
struct ApiJson<T>(T);

/// Query string extractor whose rejections are reported as `BookingError`.
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(BookingError))]
struct ApiQuery<T>(T);

impl From<JsonRejection> for BookingError {
    fn from(rejection: JsonRejection) -> Self {
        BookingError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for BookingError {
    fn from(rejection: QueryRejection) -> Self {
        BookingError::BadRequest(rejection.body_text())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AvailabilityQuery {
    date: Option<String>,
    #[serde(rename = "type")]
    facility_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PhoneQuery {
    phone: Option<String>,
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = match &self {
            BookingError::MissingField(_)
            | BookingError::InvalidFacilityNumber
            | BookingError::InvalidDate
            | BookingError::BadRequest(_) => StatusCode::BAD_REQUEST,
            BookingError::UnknownFacilityType
            | BookingError::UnknownTimeSlot
            | BookingError::NotFound => StatusCode::NOT_FOUND,
            BookingError::AlreadyReserved => StatusCode::CONFLICT,
            BookingError::Storage(err) => {
                error!(%err, "Booking storage failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        debug!(code = self.code(), %status, "Request rejected");

        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));
        (status, body).into_response()
    }
}

pub fn create_app<S: StorageBackend + 'static>(booking_store: Arc<BookingStore<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/facilities", get(get_facilities::<S>))
        .route("/time-slots", get(get_time_slots::<S>))
        .route("/available-dates", get(get_available_dates::<S>))
        .route("/available-facilities", get(get_available_facilities::<S>))
        .route("/reserve", post(reserve::<S>))
        .route("/reservations", get(get_reservations::<S>))
        .route("/reservations/:id", delete(cancel_reservation::<S>));

    Router::new()
        .nest("/api", api)
        .with_state(AppState { booking_store })
        .layer(cors)
}

async fn get_facilities<S: StorageBackend + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Facility>>, BookingError> {
    Ok(Json(state.booking_store.list_facilities().await?))
}

async fn get_time_slots<S: StorageBackend + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<TimeSlot>>, BookingError> {
    Ok(Json(state.booking_store.list_time_slots().await?))
}

async fn get_available_dates<S: StorageBackend + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<NaiveDate>>, BookingError> {
    Ok(Json(state.booking_store.list_available_dates().await?))
}

async fn get_available_facilities<S: StorageBackend + 'static>(
    State(state): State<AppState<S>>,
    ApiQuery(query): ApiQuery<AvailabilityQuery>,
) -> Result<Json<FacilityAvailability>, BookingError> {
    let date = query.date.unwrap_or_default();
    let facility_type = query.facility_type.unwrap_or_default();
    let availability = state
        .booking_store
        .available_facilities(&date, &facility_type)
        .await?;
    Ok(Json(availability))
}

async fn reserve<S: StorageBackend + 'static>(
    State(state): State<AppState<S>>,
    ApiJson(request): ApiJson<ReserveRequest>,
) -> Result<Json<ReserveResponse>, BookingError> {
    Ok(Json(state.booking_store.reserve(request).await?))
}

async fn get_reservations<S: StorageBackend + 'static>(
    State(state): State<AppState<S>>,
    ApiQuery(query): ApiQuery<PhoneQuery>,
) -> Result<Json<Vec<Reservation>>, BookingError> {
    let phone = query.phone.unwrap_or_default();
    Ok(Json(state.booking_store.reservations_by_phone(&phone).await?))
}

async fn cancel_reservation<S: StorageBackend + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<PhoneQuery>,
) -> Result<Json<CancelResponse>, BookingError> {
    let phone = query.phone.unwrap_or_default();
    Ok(Json(state.booking_store.cancel_reservation(&id, &phone).await?))
}
