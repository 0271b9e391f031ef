//! Reminder engine behind the notification bell.
//!
//! For every active vehicle of the requesting user it checks the three
//! document expiry dates and how long ago fuel and trips were last logged,
//! then appends a monthly e-challan reminder on the first day of a month.
//! [`compute_alerts`] is pure; [`AlertService`] only gathers its inputs.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::config::AlertPolicy;
use crate::db::{FuelLogRepository, TripLogRepository, User, Vehicle, VehicleRepository};
use crate::error::AppResult;

pub const MONTHLY_CHALLAN_MESSAGE: &str =
    "Monthly Check: Verify pending e-Challans for all vehicles.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Danger,
    Warning,
    Info,
    Primary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
}

impl Alert {
    fn new(severity: Severity, message: String) -> Self {
        Alert { severity, message }
    }
}

/// Alert list plus its length, rendered as-is by the frontend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationSummary {
    pub notifications: Vec<Alert>,
    pub notification_count: usize,
}

impl From<Vec<Alert>> for NotificationSummary {
    fn from(notifications: Vec<Alert>) -> Self {
        let notification_count = notifications.len();
        NotificationSummary {
            notifications,
            notification_count,
        }
    }
}

/// A vehicle together with the most recent logging activity on it.
#[derive(Debug, Clone)]
pub struct VehicleActivity {
    pub vehicle: Vehicle,
    pub last_fuel_at: Option<NaiveDateTime>,
    pub last_trip_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy)]
enum Document {
    Insurance,
    Pollution,
    Fitness,
}

impl Document {
    const ALL: [Document; 3] = [Document::Insurance, Document::Pollution, Document::Fitness];

    fn label(self) -> &'static str {
        match self {
            Document::Insurance => "Insurance",
            Document::Pollution => "PUC",
            Document::Fitness => "Fitness",
        }
    }

    fn expiry(self, vehicle: &Vehicle) -> Option<NaiveDate> {
        match self {
            Document::Insurance => vehicle.insurance_expiry,
            Document::Pollution => vehicle.pollution_expiry,
            Document::Fitness => vehicle.fitness_expiry,
        }
    }

    fn expired_message(self, vehicle: &Vehicle) -> String {
        match self {
            // Only the insurance message carries the plate.
            Document::Insurance => format!(
                "{} EXPIRED for {} ({})",
                self.label(),
                vehicle.model_name,
                vehicle.license_plate
            ),
            _ => format!("{} EXPIRED for {}", self.label(), vehicle.model_name),
        }
    }
}

fn document_alert(
    document: Document,
    vehicle: &Vehicle,
    today: NaiveDate,
    policy: &AlertPolicy,
) -> Option<Alert> {
    let expiry = document.expiry(vehicle)?;
    let days_left = (expiry - today).num_days();
    if days_left > policy.expiry_warning_days {
        return None;
    }

    if days_left < 0 {
        Some(Alert::new(Severity::Danger, document.expired_message(vehicle)))
    } else {
        Some(Alert::new(
            Severity::Warning,
            format!(
                "{} expires in {} days for {}",
                document.label(),
                days_left,
                vehicle.model_name
            ),
        ))
    }
}

fn fuel_alert(activity: &VehicleActivity, today: NaiveDate, policy: &AlertPolicy) -> Option<Alert> {
    let last_fill = activity.last_fuel_at.map(|at| at.date());
    let stale = match last_fill {
        None => true,
        Some(day) => (today - day).num_days() > policy.fuel_stale_days,
    };
    if !stale {
        return None;
    }

    let last = last_fill
        .map(|day| day.to_string())
        .unwrap_or_else(|| "Never".to_string());
    Some(Alert::new(
        Severity::Info,
        format!(
            "Update Fuel Log for {} (Last: {})",
            activity.vehicle.model_name, last
        ),
    ))
}

fn trip_alert(activity: &VehicleActivity, today: NaiveDate, policy: &AlertPolicy) -> Option<Alert> {
    let stale = match activity.last_trip_on {
        None => true,
        Some(day) => (today - day).num_days() > policy.trip_stale_days,
    };
    stale.then(|| {
        Alert::new(
            Severity::Info,
            format!("Log a trip for {}?", activity.vehicle.model_name),
        )
    })
}

/// Build the ordered alert list.
///
/// Vehicles are visited in the given order; per vehicle the order is
/// insurance, pollution, fitness, fuel, trip. Inactive vehicles are skipped.
/// The monthly reminder, if due, is always last.
pub fn compute_alerts(
    vehicles: &[VehicleActivity],
    today: NaiveDate,
    policy: &AlertPolicy,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for activity in vehicles.iter().filter(|a| a.vehicle.is_active) {
        alerts.extend(
            Document::ALL
                .iter()
                .filter_map(|doc| document_alert(*doc, &activity.vehicle, today, policy)),
        );
        alerts.extend(fuel_alert(activity, today, policy));
        alerts.extend(trip_alert(activity, today, policy));
    }

    if today.day() == 1 {
        alerts.push(Alert::new(
            Severity::Primary,
            MONTHLY_CHALLAN_MESSAGE.to_string(),
        ));
    }

    alerts
}

pub struct AlertService;

impl AlertService {
    /// Load the user's active vehicles with their latest fuel fill and trip.
    pub async fn load_activity(pool: &SqlitePool, owner_id: &str) -> AppResult<Vec<VehicleActivity>> {
        let vehicles = VehicleRepository::find_active_by_owner(pool, owner_id).await?;

        let mut activity = Vec::with_capacity(vehicles.len());
        for vehicle in vehicles {
            let last_fuel_at = FuelLogRepository::latest_for_vehicle(pool, &vehicle.id)
                .await?
                .map(|log| log.date);
            let last_trip_on = TripLogRepository::latest_for_vehicle(pool, &vehicle.id)
                .await?
                .map(|trip| trip.date);
            activity.push(VehicleActivity {
                vehicle,
                last_fuel_at,
                last_trip_on,
            });
        }

        Ok(activity)
    }

    /// Alerts for the current caller. Anonymous callers get an empty summary.
    pub async fn for_user(
        pool: &SqlitePool,
        user: Option<&User>,
        today: NaiveDate,
        policy: &AlertPolicy,
    ) -> AppResult<NotificationSummary> {
        let Some(user) = user else {
            return Ok(NotificationSummary::default());
        };

        let activity = Self::load_activity(pool, &user.id).await?;
        let alerts = compute_alerts(&activity, today, policy);
        tracing::debug!(
            "Computed {} alerts for user {} across {} vehicles",
            alerts.len(),
            user.id,
            activity.len()
        );

        Ok(alerts.into())
    }
}
