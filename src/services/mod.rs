pub mod admin;
pub mod alerts;
pub mod auth;
pub mod clock;
pub mod fuel;
pub mod init;
pub mod metrics;
pub mod trips;
pub mod vehicles;
