use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    #[serde(rename = "type")]
    pub facility_type: String,
    pub count: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: String,
    pub name: String,
    #[serde(with = "hour_minute")]
    pub start: NaiveTime,
    #[serde(with = "hour_minute")]
    pub end: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub facility_type: String,
    pub date: NaiveDate,
    pub time_slot_id: String,
    pub time_slot_name: String,
    pub facility_number: u32,
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    /// Two reservations conflict when they claim the same facility instance
    /// for the same slot on the same day.
    pub fn occupies(
        &self,
        facility_type: &str,
        date: NaiveDate,
        time_slot_id: &str,
        facility_number: u32,
    ) -> bool {
        self.facility_type == facility_type
            && self.date == date
            && self.time_slot_id == time_slot_id
            && self.facility_number == facility_number
    }
}

/// Everything the store persists, written and read back as one blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dataset {
    pub facilities: Vec<Facility>,
    pub time_slots: Vec<TimeSlot>,
    pub reservations: Vec<Reservation>,
}

impl Dataset {
    pub fn seed() -> Self {
        let facility = |facility_type: &str, count: u32, name: &str| Facility {
            facility_type: facility_type.into(),
            count,
            name: name.into(),
        };
        let slot = |id: &str, (start_h, start_m): (u32, u32), (end_h, end_m): (u32, u32)| {
            let start = NaiveTime::from_hms_opt(start_h, start_m, 0)
                .expect("seed slot start is a valid time of day");
            let end = NaiveTime::from_hms_opt(end_h, end_m, 0)
                .expect("seed slot end is a valid time of day");
            TimeSlot {
                id: id.into(),
                name: format!("{}~{}", start.format("%-H:%M"), end.format("%-H:%M")),
                start,
                end,
            }
        };

        Self {
            facilities: vec![
                facility("badminton", 6, "羽毛球场"),
                facility("volleyball", 6, "排球场"),
                facility("tableTennis", 20, "乒乓球场"),
                facility("basketball", 6, "篮球场"),
                facility("football", 1, "足球场"),
            ],
            time_slots: vec![
                slot("m1", (8, 0), (10, 0)),
                slot("m2", (10, 0), (12, 0)),
                slot("a1", (14, 0), (16, 0)),
                slot("a2", (16, 0), (18, 0)),
                slot("e1", (19, 30), (21, 30)),
            ],
            reservations: vec![],
        }
    }

    pub fn facility(&self, facility_type: &str) -> Option<&Facility> {
        self.facilities
            .iter()
            .find(|facility| facility.facility_type == facility_type)
    }

    pub fn time_slot(&self, id: &str) -> Option<&TimeSlot> {
        self.time_slots.iter().find(|slot| slot.id == id)
    }
}

/// Body of `POST /api/reserve`. Every field is optional on the wire and the
/// date stays a string, so absent or malformed values are reported as
/// validation errors rather than decode failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub facility_type: Option<String>,
    pub date: Option<String>,
    pub time_slot_id: Option<String>,
    pub facility_number: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityAvailability {
    pub total: u32,
    pub available: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveResponse {
    pub success: bool,
    pub reservation: Reservation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelResponse {
    pub success: bool,
}

mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn seed_contains_reference_data() {
        let dataset = Dataset::seed();
        assert_eq!(dataset.facilities.len(), 5);
        assert_eq!(dataset.time_slots.len(), 5);
        assert!(dataset.reservations.is_empty());

        assert_eq!(dataset.facility("badminton").unwrap().count, 6);
        assert_eq!(dataset.facility("tableTennis").unwrap().count, 20);
        assert_eq!(dataset.facility("football").unwrap().count, 1);
        assert!(dataset.facility("curling").is_none());

        let names: Vec<&str> = dataset.time_slots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["8:00~10:00", "10:00~12:00", "14:00~16:00", "16:00~18:00", "19:30~21:30"]
        );
    }

    #[test]
    fn dataset_uses_camel_case_layout() {
        let json = serde_json::to_value(Dataset::seed()).unwrap();
        assert_eq!(json["facilities"][0]["type"], "badminton");
        assert_eq!(json["timeSlots"][4]["id"], "e1");
        assert_eq!(json["timeSlots"][4]["start"], "19:30");
        assert_eq!(json["timeSlots"][0]["end"], "10:00");
        assert!(json["reservations"].as_array().unwrap().is_empty());
    }

    #[test]
    fn missing_sections_decode_as_empty() {
        let dataset: Dataset = serde_json::from_str("{}").unwrap();
        assert_eq!(dataset, Dataset::default());
    }

    #[test]
    fn reservation_wire_format() {
        let json = r#"{
            "id": "abc",
            "name": "Li",
            "phone": "123",
            "type": "badminton",
            "date": "2024-06-01",
            "timeSlotId": "m1",
            "timeSlotName": "8:00~10:00",
            "facilityNumber": 1,
            "createdAt": "2024-05-30T08:00:00Z"
        }"#;
        let reservation: Reservation = serde_json::from_str(json).unwrap();
        assert_eq!(reservation.facility_type, "badminton");
        assert_eq!(reservation.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert!(reservation.occupies("badminton", reservation.date, "m1", 1));
        assert!(!reservation.occupies("badminton", reservation.date, "m1", 2));
    }
}
