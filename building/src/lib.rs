//! Discrete-step simulation of a building's elevator fleet.
//!
//! ```
//! use building::dispatcher::Building;
//! use shared_resources::Request;
//!
//! let mut building = Building::new(10, 2, 5).unwrap();
//! building.start().unwrap();
//! building.add_request(Request::new(1, 4)).unwrap();
//! for _ in 0..5 {
//!     building.step().unwrap();
//! }
//! assert_eq!(building.report().elevators[0].load, vec![Request::new(1, 4)]);
//! ```

pub mod debug;
pub mod dispatcher;
pub mod fsm;
pub mod utilities;

pub use dispatcher::Building;
pub use fsm::ElevatorUnit;
pub use utilities::building_report::{BuildingReport, SystemStatus};
pub use utilities::elevator_status::{Behaviour, DoorState, ElevatorStatus, Lifecycle};
