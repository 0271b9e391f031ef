//! Database row types, one file per table, re-exported at `crate::db::models`.

pub mod choices;
pub mod expense_log;
pub mod fuel_log;
pub mod maintenance_log;
pub mod new_car;
pub mod trip_log;
pub mod user;
pub mod vehicle;

pub use self::choices::*;
pub use self::expense_log::*;
pub use self::fuel_log::*;
pub use self::maintenance_log::*;
pub use self::new_car::*;
pub use self::trip_log::*;
pub use self::user::*;
pub use self::vehicle::*;
