pub mod expense_log;
pub mod fuel_log;
pub mod maintenance_log;
pub mod new_car;
pub mod trip_log;
pub mod user;
pub mod vehicle;

pub use expense_log::ExpenseLogRepository;
pub use fuel_log::FuelLogRepository;
pub use maintenance_log::MaintenanceLogRepository;
pub use new_car::NewCarRepository;
pub use trip_log::TripLogRepository;
pub use user::UserRepository;
pub use vehicle::VehicleRepository;
