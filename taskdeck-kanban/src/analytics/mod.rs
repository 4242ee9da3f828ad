//! Sprint and board analytics
//!
//! Each report is a pure calculation over persisted records, wrapped in an
//! unlogged read command. Nothing here mutates state.

mod burndown;
mod cycle_time;
mod velocity;
mod workload;

pub use burndown::{burndown_series, BurndownPoint, BurndownReport, GetBurndown};
pub use cycle_time::{column_stays, ColumnCycleTime, CycleTimeReport, GetCycleTime, Stay};
pub use velocity::{GetVelocity, VelocityReport};
pub use workload::{workload_level, GetWorkload, WorkloadEntry, WorkloadLevel, WorkloadReport};
