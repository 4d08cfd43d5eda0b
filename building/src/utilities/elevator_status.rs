use shared_resources::{Direction, Request};

#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub enum Behaviour {
    OutOfService,
    Idle,
    Moving,
    DoorOpen,
    ReturningToGround,
}

impl Behaviour {
    pub fn as_string(&self) -> String {
        match self {
            Behaviour::OutOfService => String::from("outOfService"),
            Behaviour::Idle => String::from("idle"),
            Behaviour::Moving => String::from("moving"),
            Behaviour::DoorOpen => String::from("doorOpen"),
            Behaviour::ReturningToGround => String::from("returning"),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub enum DoorState {
    Open,
    Closed,
}

impl DoorState {
    pub fn as_string(&self) -> String {
        match self {
            DoorState::Open => String::from("open"),
            DoorState::Closed => String::from("closed"),
        }
    }
}

/// Service lifecycle of a single unit, separate from the building's `SystemStatus`.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone, Copy)]
pub enum Lifecycle {
    OutOfService,
    InService,
    ShuttingDown,
}

/// Point-in-time copy of one elevator unit.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ElevatorStatus {
    pub id: usize,
    pub floor: usize,
    pub direction: Direction,
    pub door: DoorState,
    pub behaviour: Behaviour,
    pub lifecycle: Lifecycle,
    pub accepting: bool,
    /// Requests currently on board.
    pub load: Vec<Request>,
    /// Requests assigned to this car but not picked up yet.
    pub waiting: Vec<Request>,
    /// Requests delivered since the unit was last started.
    pub delivered: Vec<Request>,
}

impl ElevatorStatus {
    pub fn has_delivered(&self, request: &Request) -> bool {
        self.delivered.contains(request)
    }
}
