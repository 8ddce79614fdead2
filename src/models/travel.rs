//! Travel-allowance detail model.
//!
//! The backend returns one [`TravelAllowanceDetail`] per employee and month: a
//! list of per-day entries, each with its checkout count, the recorded travel
//! distance and the visits made that day.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::de::{count_or_zero, decimal_or_zero};

/// The vehicle a visit was travelled with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    /// Travelled by car.
    Car,
    /// Travelled by bike. Visits without a recognised vehicle tag count as bike.
    #[default]
    Bike,
}

fn vehicle_type_or_bike<'de, D>(deserializer: D) -> Result<VehicleType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw.as_deref() {
        Some("Car") => VehicleType::Car,
        _ => VehicleType::Bike,
    })
}

/// A GPS position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A single customer visit within a day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitDetail {
    /// The visit identifier, when the backend sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visit_id: Option<i64>,
    /// Latitude captured at check-in.
    #[serde(default)]
    pub checkin_latitude: Option<f64>,
    /// Longitude captured at check-in.
    #[serde(default)]
    pub checkin_longitude: Option<f64>,
    /// The vehicle used to reach the next visit.
    #[serde(default, deserialize_with = "vehicle_type_or_bike")]
    pub vehicle_type: VehicleType,
}

impl VisitDetail {
    /// The check-in position, if both coordinates were captured.
    ///
    /// A zero coordinate is what the field app records without a GPS fix, so
    /// it counts as missing.
    pub fn checkin(&self) -> Option<Coordinates> {
        match (self.checkin_latitude, self.checkin_longitude) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }
}

/// One day of travel data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateDetail {
    /// The calendar day.
    pub date: NaiveDate,
    /// Number of visit checkouts recorded that day.
    #[serde(default, deserialize_with = "count_or_zero")]
    pub checkout_count: u32,
    /// Total kilometers recorded that day.
    #[serde(default, deserialize_with = "decimal_or_zero")]
    pub total_distance_travelled: Decimal,
    /// The day's visits in check-in order.
    #[serde(default)]
    pub visit_details: Vec<VisitDetail>,
}

impl DateDetail {
    /// A day is anomalous when a checkout happened but no distance was recorded.
    pub fn is_anomalous(&self) -> bool {
        self.checkout_count > 0 && self.total_distance_travelled.is_zero()
    }
}

/// An employee's travel data for one month.
///
/// # Example
///
/// ```
/// use field_payroll::models::{TravelAllowanceDetail, VehicleType};
///
/// let json = r#"{
///     "dateDetails": [{
///         "date": "2024-07-02",
///         "checkoutCount": 3,
///         "totalDistanceTravelled": 0,
///         "visitDetails": [
///             { "checkinLatitude": 18.52, "checkinLongitude": 73.85, "vehicleType": "Car" },
///             { "checkinLatitude": 18.55, "checkinLongitude": 73.80 }
///         ]
///     }]
/// }"#;
///
/// let detail: TravelAllowanceDetail = serde_json::from_str(json).unwrap();
/// assert!(detail.date_details[0].is_anomalous());
/// assert_eq!(detail.date_details[0].visit_details[1].vehicle_type, VehicleType::Bike);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelAllowanceDetail {
    /// Per-day entries in date order.
    #[serde(default)]
    pub date_details: Vec<DateDetail>,
}

impl TravelAllowanceDetail {
    /// The entries that need distance backfill.
    pub fn anomalous_days(&self) -> impl Iterator<Item = &DateDetail> {
        self.date_details.iter().filter(|d| d.is_anomalous())
    }
}
