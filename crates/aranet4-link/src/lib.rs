//! BLE link to a single Aranet4 environmental sensor.
//!
//! This crate owns the connection lifecycle to one physical sensor and
//! exposes a single operation: [`SensorLink::read_current`], which either
//! returns a [`Reading`] snapshot or fails with a [`LinkError`].
//!
//! The link is deliberately forgiving: any failure (scan, connect, service
//! discovery, read, parse) drops the held connection and the *next* call
//! re-attempts a fresh one. There is no retry or backoff inside a call;
//! callers that poll on an interval get the implicit backoff for free.
//!
//! # Quick Start
//!
//! ```no_run
//! use aranet4_link::SensorLink;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // None = auto-discover the first Aranet device in range
//!     let mut link = SensorLink::new(None);
//!
//!     let reading = link.read_current().await?;
//!     println!("CO2: {} ppm", reading.co2);
//!
//!     Ok(())
//! }
//! ```

pub mod ble;
pub mod error;
pub mod link;
pub mod mock;
pub mod reading;
pub mod scan;
pub mod source;

pub use error::{LinkError, Result};
pub use link::{LinkTimeouts, SensorLink};
pub use mock::MockSensor;
pub use reading::Reading;
pub use source::SensorSource;
