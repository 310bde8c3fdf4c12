use crate::types::{Reservation, ReserveRequest};
use chrono::{NaiveDate, Utc};

pub const NAME: &str = "Li";
pub const PHONE: &str = "123";
pub const DATE: &str = "2024-06-01";

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

/// A complete request for `DATE`, booked by `NAME` / `PHONE`.
pub fn reserve_request(facility_type: &str, time_slot_id: &str, facility_number: i64) -> ReserveRequest {
    ReserveRequest {
        name: Some(NAME.into()),
        phone: Some(PHONE.into()),
        facility_type: Some(facility_type.into()),
        date: Some(DATE.into()),
        time_slot_id: Some(time_slot_id.into()),
        facility_number: Some(facility_number),
    }
}

/// A stored reservation written directly into a dataset, bypassing validation.
pub fn reservation_record(facility_type: &str, time_slot_id: &str, facility_number: u32) -> Reservation {
    Reservation {
        id: format!("{facility_type}-{time_slot_id}-{facility_number}"),
        name: NAME.into(),
        phone: PHONE.into(),
        facility_type: facility_type.into(),
        date: date(DATE),
        time_slot_id: time_slot_id.into(),
        time_slot_name: String::new(),
        facility_number,
        created_at: Utc::now(),
    }
}
