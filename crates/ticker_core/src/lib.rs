/// Adlerticker — Core
///
/// The poll/derive/reschedule loop behind the ticker: one coordinator
/// fetches the club's game feed, derives last/current/next, resolves
/// per-game detail, publishes an immutable snapshot and re-arms its own
/// next poll on a wall-clock boundary. Sensors read the snapshot, never
/// the feed.

pub mod config;
pub mod coordinator;
pub mod scheduler;
pub mod sensors;
pub mod snapshot;

pub use config::Config;
pub use coordinator::{Coordinator, TickerEvent, Trigger};
pub use scheduler::{next_poll_deadline, PollTimer};
pub use sensors::{read_sensor, Sensor, SensorReading, ALL_SENSORS};
pub use snapshot::{Snapshot, SnapshotStore};
