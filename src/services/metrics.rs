//! Derived figures: trip distance, full-tank fuel efficiency and per-vehicle
//! running totals. Everything here is pure.

use serde::Serialize;

use crate::db::{ExpenseLog, FuelLog, MaintenanceLog, TripLog, Vehicle};

/// Distance covered by a trip. Validation of the odometer pair happens at
/// save time; this only does the arithmetic.
pub fn trip_distance(start_odometer: f64, end_odometer: f64) -> f64 {
    end_odometer - start_odometer
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FuelEfficiency {
    pub km_per_liter: Option<f64>,
    pub cost_per_km: Option<f64>,
}

/// Full-tank method: the distance since the previous fill was burnt by the
/// fuel added now.
pub fn fuel_efficiency(
    previous_odometer: Option<i64>,
    odometer: i64,
    liters: f64,
    total_cost: f64,
) -> FuelEfficiency {
    let Some(previous) = previous_odometer else {
        return FuelEfficiency::default();
    };

    let distance = odometer - previous;
    if distance <= 0 || liters <= 0.0 {
        return FuelEfficiency::default();
    }

    let distance = distance as f64;
    FuelEfficiency {
        km_per_liter: Some(round2(distance / liters)),
        cost_per_km: Some(round2(total_cost / distance)),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VehicleStats {
    pub fill_count: usize,
    pub total_liters: f64,
    pub total_fuel_cost: f64,
    pub average_km_per_liter: Option<f64>,
    pub latest_km_per_liter: Option<f64>,

    pub trip_count: usize,
    pub total_trip_distance: f64,

    pub total_expenses: f64,
    pub maintenance_count: usize,

    /// Fuel plus expenses to date.
    pub total_cost: f64,
    pub cost_per_km: Option<f64>,

    /// `None` when no target is set or there is nothing to compare yet.
    pub mileage_on_target: Option<bool>,
    pub cost_on_target: Option<bool>,
}

impl VehicleStats {
    /// `fuel_logs` must be newest first, as the repositories return them.
    pub fn compute(
        vehicle: &Vehicle,
        fuel_logs: &[FuelLog],
        trips: &[TripLog],
        expenses: &[ExpenseLog],
        maintenance: &[MaintenanceLog],
    ) -> Self {
        let total_liters: f64 = fuel_logs.iter().map(|f| f.liters_filled).sum();
        let total_fuel_cost: f64 = fuel_logs.iter().map(|f| f.total_cost).sum();

        let efficiencies: Vec<f64> = fuel_logs
            .iter()
            .filter_map(|f| f.calculated_km_per_liter)
            .collect();
        let average_km_per_liter = (!efficiencies.is_empty())
            .then(|| round2(efficiencies.iter().sum::<f64>() / efficiencies.len() as f64));
        let latest_km_per_liter = efficiencies.first().copied();

        let total_trip_distance: f64 = trips.iter().map(|t| t.distance_km).sum();
        let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();

        let total_cost = round2(total_fuel_cost + total_expenses);
        let cost_per_km = (total_trip_distance > 0.0).then(|| round2(total_cost / total_trip_distance));

        let mileage_on_target = match average_km_per_liter {
            Some(avg) if vehicle.target_mileage > 0.0 => Some(avg >= vehicle.target_mileage),
            _ => None,
        };
        let cost_on_target = match cost_per_km {
            Some(cpk) if vehicle.target_cost_per_km > 0.0 => Some(cpk <= vehicle.target_cost_per_km),
            _ => None,
        };

        VehicleStats {
            fill_count: fuel_logs.len(),
            total_liters: round2(total_liters),
            total_fuel_cost: round2(total_fuel_cost),
            average_km_per_liter,
            latest_km_per_liter,
            trip_count: trips.len(),
            total_trip_distance,
            total_expenses: round2(total_expenses),
            maintenance_count: maintenance.len(),
            total_cost,
            cost_per_km,
            mileage_on_target,
            cost_on_target,
        }
    }
}
