use shared_resources::Request;

use crate::utilities::elevator_status::ElevatorStatus;

#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub enum SystemStatus {
    OutOfService,
    Running,
    Stopping,
}

impl SystemStatus {
    pub fn as_string(&self) -> String {
        match self {
            SystemStatus::OutOfService => String::from("out of service"),
            SystemStatus::Running => String::from("running"),
            SystemStatus::Stopping => String::from("stopping"),
        }
    }

    pub fn accepts_requests(&self) -> bool {
        *self == SystemStatus::Running
    }
}

/// Point-in-time copy of the whole building. Owns all of its data.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BuildingReport {
    pub num_floors: usize,
    pub num_elevators: usize,
    pub capacity: usize,
    pub elevators: Vec<ElevatorStatus>,
    pub up_requests: Vec<Request>,
    pub down_requests: Vec<Request>,
    pub status: SystemStatus,
}

impl BuildingReport {
    pub fn all_at_ground(&self) -> bool {
        self.elevators.iter().all(|elevator| elevator.floor == 0)
    }

    pub fn pending_requests(&self) -> usize {
        self.up_requests.len() + self.down_requests.len()
    }
}
