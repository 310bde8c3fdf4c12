use crate::{
    backend::StorageBackend,
    error::{BookingError, MissingField, StorageError},
    types::{
        CancelResponse, Dataset, Facility, FacilityAvailability, Reservation, ReserveRequest,
        ReserveResponse, TimeSlot,
    },
};
use chrono::{Days, NaiveDate, Utc};
use std::time::Duration;
use tokio::{sync::Mutex, time::sleep};
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_STORAGE_KEY: &str = "venueBookingData";

/// Artificial delay applied before every call completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    pub read: Duration,
    pub write: Duration,
}

impl Latency {
    #[cfg(test)]
    pub fn none() -> Self {
        Self {
            read: Duration::ZERO,
            write: Duration::ZERO,
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            read: Duration::from_millis(300),
            write: Duration::from_millis(500),
        }
    }
}

/// Owner of the booking dataset. Every call reads the whole dataset from
/// storage, mutating calls write it back while holding `write_lock`.
pub struct BookingStore<S> {
    storage: S,
    key: String,
    latency: Latency,
    write_lock: Mutex<()>,
}

impl<S: StorageBackend> BookingStore<S> {
    pub fn new(storage: S, key: impl Into<String>, latency: Latency) -> Self {
        Self {
            storage,
            key: key.into(),
            latency,
            write_lock: Mutex::new(()),
        }
    }

    /// Writes the seed dataset unless something is already stored.
    /// Returns whether seeding happened.
    pub async fn initialize(&self) -> Result<bool, BookingError> {
        let _guard = self.write_lock.lock().await;
        if self.storage.get(&self.key)?.is_some() {
            debug!(key = %self.key, "Dataset already present, keeping it");
            return Ok(false);
        }
        self.save(&Dataset::seed())?;
        info!(key = %self.key, "Seeded booking dataset");
        Ok(true)
    }

    pub async fn list_facilities(&self) -> Result<Vec<Facility>, BookingError> {
        sleep(self.latency.read).await;
        Ok(self.load()?.facilities)
    }

    pub async fn list_time_slots(&self) -> Result<Vec<TimeSlot>, BookingError> {
        sleep(self.latency.read).await;
        Ok(self.load()?.time_slots)
    }

    pub async fn list_available_dates(&self) -> Result<Vec<NaiveDate>, BookingError> {
        sleep(self.latency.read).await;
        Ok(available_dates(Utc::now().date_naive()))
    }

    pub async fn available_facilities(
        &self,
        date: &str,
        facility_type: &str,
    ) -> Result<FacilityAvailability, BookingError> {
        sleep(self.latency.read).await;
        let dataset = self.load()?;
        let facility = dataset
            .facility(facility_type)
            .ok_or(BookingError::UnknownFacilityType)?;
        let date = parse_date(date)?;

        // no clamping: an overbooked slot reports a negative count
        let available = dataset
            .time_slots
            .iter()
            .map(|slot| {
                let booked = dataset
                    .reservations
                    .iter()
                    .filter(|r| {
                        r.date == date && r.facility_type == facility_type && r.time_slot_id == slot.id
                    })
                    .count() as i64;
                (slot.id.clone(), i64::from(facility.count) - booked)
            })
            .collect();

        Ok(FacilityAvailability {
            total: facility.count,
            available,
        })
    }

    pub async fn reserve(&self, request: ReserveRequest) -> Result<ReserveResponse, BookingError> {
        sleep(self.latency.write).await;

        let (
            Some(name),
            Some(phone),
            Some(facility_type),
            Some(date),
            Some(time_slot_id),
            Some(facility_number),
        ) = (
            present(request.name),
            present(request.phone),
            present(request.facility_type),
            present(request.date),
            present(request.time_slot_id),
            request.facility_number.filter(|number| *number != 0),
        )
        else {
            return Err(BookingError::MissingField(MissingField::Reservation));
        };
        let date = parse_date(&date)?;

        let _guard = self.write_lock.lock().await;
        let mut dataset = self.load()?;

        let facility = dataset
            .facility(&facility_type)
            .ok_or(BookingError::UnknownFacilityType)?;
        let facility_number = u32::try_from(facility_number)
            .ok()
            .filter(|number| (1..=facility.count).contains(number))
            .ok_or(BookingError::InvalidFacilityNumber)?;
        let time_slot = dataset
            .time_slot(&time_slot_id)
            .ok_or(BookingError::UnknownTimeSlot)?;

        if dataset
            .reservations
            .iter()
            .any(|r| r.occupies(&facility_type, date, &time_slot_id, facility_number))
        {
            debug!(%facility_type, %date, %time_slot_id, facility_number, "Facility already reserved");
            return Err(BookingError::AlreadyReserved);
        }

        let reservation = Reservation {
            id: Uuid::new_v4().to_string(),
            name,
            phone,
            facility_type,
            date,
            time_slot_name: time_slot.name.clone(),
            time_slot_id,
            facility_number,
            created_at: Utc::now(),
        };
        dataset.reservations.push(reservation.clone());
        self.save(&dataset)?;

        info!(
            id = %reservation.id,
            facility_type = %reservation.facility_type,
            date = %reservation.date,
            time_slot_id = %reservation.time_slot_id,
            facility_number = reservation.facility_number,
            "Reservation created"
        );
        Ok(ReserveResponse {
            success: true,
            reservation,
        })
    }

    pub async fn reservations_by_phone(&self, phone: &str) -> Result<Vec<Reservation>, BookingError> {
        sleep(self.latency.read).await;
        if phone.is_empty() {
            return Err(BookingError::MissingField(MissingField::Phone));
        }
        let mut reservations = self.load()?.reservations;
        reservations.retain(|r| r.phone == phone);
        Ok(reservations)
    }

    pub async fn cancel_reservation(&self, id: &str, phone: &str) -> Result<CancelResponse, BookingError> {
        sleep(self.latency.write).await;
        if id.is_empty() || phone.is_empty() {
            return Err(BookingError::MissingField(MissingField::Cancellation));
        }

        let _guard = self.write_lock.lock().await;
        let mut dataset = self.load()?;
        let index = dataset
            .reservations
            .iter()
            .position(|r| r.id == id && r.phone == phone)
            .ok_or(BookingError::NotFound)?;
        dataset.reservations.remove(index);
        self.save(&dataset)?;

        info!(%id, "Reservation cancelled");
        Ok(CancelResponse { success: true })
    }

    fn load(&self) -> Result<Dataset, StorageError> {
        match self.storage.get(&self.key)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Dataset::default()),
        }
    }

    fn save(&self, dataset: &Dataset) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(dataset)?;
        self.storage.set(&self.key, bytes)
    }
}

/// The six bookable days: two through seven days after `today`.
pub fn available_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (2..=7)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .collect()
}

fn parse_date(raw: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| BookingError::InvalidDate)
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
