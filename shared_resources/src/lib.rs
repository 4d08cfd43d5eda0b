//! Value types shared between the dispatcher, the elevator units and the driver.

pub mod call;
pub mod config;
pub mod direction;
pub mod error;
pub mod request;
pub mod request_queue;

pub use call::Call;
pub use config::{BuildingConfig, SimulatorConfig};
pub use direction::Direction;
pub use error::{Error, Result};
pub use request::Request;
pub use request_queue::RequestQueue;
