//! Trip activation for static transit schedules.
//!
//! Built once from an immutable schedule snapshot, then queried many times:
//! given a wall-clock window and a set of routes, which scheduled trips are
//! running? Trips are timetabled in seconds relative to their service day,
//! which can pass 24h, so a trip departing at 23:50 is still active the next
//! calendar morning. The [`activation::TripActivator`] reconciles absolute
//! time, service-day-relative time and calendar applicability by walking
//! backward over candidate service days and querying an interval index.

pub mod activation;
pub mod calendar;
pub mod gtfs;
pub mod index;
pub mod schedule;
pub mod shared;

pub mod prelude {
    pub use crate::activation::{ActivatedTrip, TripActivator};
    pub use crate::calendar::{Exception, ServiceCalendar};
    pub use crate::gtfs::GtfsReader;
    pub use crate::index::{TripIntervalIndex, TripSpan};
    pub use crate::schedule::{Schedule, ScheduleBuilder};
    pub use crate::shared::time::Time;
}
