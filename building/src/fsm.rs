//! ----- FSM MODULE -----
//! The state machine of a single elevator car. It is advanced one step at a
//! time by the dispatcher and never does anything on its own.

use shared_resources::{BuildingConfig, Direction, Error, Request, Result};

use crate::utilities::elevator_status::{Behaviour, DoorState, ElevatorStatus, Lifecycle};
use crate::utilities::trip::Trip;

#[derive(Clone, Debug)]
pub struct ElevatorUnit {
    id: usize,
    num_floors: usize,
    capacity: usize,
    floor: usize,
    direction: Direction,
    door: DoorState,
    lifecycle: Lifecycle,
    trip: Option<Trip>,
    delivered: Vec<Request>,
}

impl ElevatorUnit {
    pub(crate) fn new(id: usize, config: &BuildingConfig) -> Self {
        ElevatorUnit {
            id,
            num_floors: config.num_floors(),
            capacity: config.capacity(),
            floor: 0,
            direction: Direction::Idle,
            door: DoorState::Closed,
            lifecycle: Lifecycle::OutOfService,
            trip: None,
            delivered: Vec::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn current_floor(&self) -> usize {
        self.floor
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn top_floor(&self) -> usize {
        self.num_floors - 1
    }

    pub fn start(&mut self) -> Result<()> {
        if self.lifecycle != Lifecycle::OutOfService {
            return Err(Error::invalid_state(format!(
                "elevator {} can only be started while out of service",
                self.id
            )));
        }
        self.floor = 0;
        self.direction = Direction::Idle;
        self.door = DoorState::Closed;
        self.trip = None;
        self.delivered.clear();
        self.lifecycle = Lifecycle::InService;
        tracing::debug!(elevator = self.id, "started");
        Ok(())
    }

    /// Stops boarding and sends the car to the ground floor once the people
    /// already inside have reached their destinations.
    pub fn take_out_of_service(&mut self) -> Result<()> {
        if self.lifecycle != Lifecycle::InService {
            return Err(Error::invalid_state(format!(
                "elevator {} is not in service",
                self.id
            )));
        }
        self.lifecycle = Lifecycle::ShuttingDown;

        if let Some(trip) = self.trip.as_mut() {
            let dropped = trip.cancel_boarding();
            if !dropped.is_empty() {
                tracing::warn!(
                    elevator = self.id,
                    dropped = dropped.len(),
                    "shutting down, dropping requests that never boarded"
                );
            }
            if trip.riding().is_empty() {
                self.trip = None;
                self.direction = Direction::Idle;
            }
        }
        tracing::debug!(elevator = self.id, floor = self.floor, "returning to ground");
        Ok(())
    }

    pub fn is_accepting(&self) -> bool {
        self.lifecycle == Lifecycle::InService
            && self.trip.is_none()
            && self.door == DoorState::Closed
    }

    /// Direction of the sweep a new batch starts from this floor. Only the
    /// terminal floors start one.
    fn sweep_direction(&self) -> Result<Direction> {
        if self.floor == 0 {
            Ok(Direction::Up)
        } else if self.floor == self.top_floor() {
            Ok(Direction::Down)
        } else {
            Err(Error::invalid_state(format!(
                "elevator {} can only take a batch at a terminal floor, not {}",
                self.id, self.floor
            )))
        }
    }

    pub fn process_requests(&mut self, batch: Vec<Request>) -> Result<()> {
        if !self.is_accepting() {
            return Err(Error::invalid_state(format!(
                "elevator {} is not taking requests",
                self.id
            )));
        }
        if batch.len() > self.capacity {
            return Err(Error::invalid_state(format!(
                "elevator {} can carry {} requests, got {}",
                self.id,
                self.capacity,
                batch.len()
            )));
        }

        let direction = self.sweep_direction()?;
        for request in &batch {
            let call = request.validate(self.num_floors)?;
            let behind = match direction {
                Direction::Up => request.start_floor < self.floor,
                _ => request.start_floor > self.floor,
            };
            if direction.to_call() != Some(call) || behind {
                return Err(Error::invalid_argument(format!(
                    "request {} -> {} cannot be served going {} from floor {}",
                    request.start_floor,
                    request.end_floor,
                    direction.as_string(),
                    self.floor
                )));
            }
        }

        let target = match direction {
            Direction::Up => self.top_floor(),
            _ => 0,
        };
        tracing::debug!(
            elevator = self.id,
            floor = self.floor,
            direction = %direction.as_string(),
            requests = batch.len(),
            "trip assigned"
        );
        self.trip = Some(Trip::new(direction, target, batch));
        self.direction = direction;
        Ok(())
    }

    /// Advances the car by exactly one state change.
    pub fn step(&mut self) {
        if self.lifecycle == Lifecycle::OutOfService {
            return;
        }

        if self.door == DoorState::Open {
            self.door = DoorState::Closed;
            tracing::debug!(elevator = self.id, floor = self.floor, "doors closed");
            self.settle();
            return;
        }

        let floor = self.floor;
        let Some(trip) = self.trip.as_mut() else {
            if self.lifecycle == Lifecycle::ShuttingDown {
                self.move_one_floor(Direction::Down);
                self.settle();
            }
            return;
        };

        if trip.should_stop(floor) {
            let leaving = trip.discharge(floor);
            let boarding = trip.board(floor);
            tracing::debug!(
                elevator = self.id,
                floor,
                leaving = leaving.len(),
                boarding = boarding.len(),
                "doors open"
            );
            self.delivered.extend(leaving);
            self.door = DoorState::Open;
            return;
        }

        let direction = if trip.target() > floor {
            Direction::Up
        } else if trip.target() < floor {
            Direction::Down
        } else {
            Direction::Idle
        };
        self.move_one_floor(direction);
        self.settle();
    }

    fn move_one_floor(&mut self, direction: Direction) {
        match direction {
            Direction::Up if self.floor < self.top_floor() => self.floor += 1,
            Direction::Down if self.floor > 0 => self.floor -= 1,
            _ => return,
        }
        self.direction = direction;
    }

    /// Finishes the trip and completes shutdown when there is nothing left to do here.
    fn settle(&mut self) {
        if self.door == DoorState::Open {
            return;
        }
        if self
            .trip
            .as_ref()
            .is_some_and(|trip| trip.is_finished(self.floor))
        {
            tracing::debug!(elevator = self.id, floor = self.floor, "trip finished");
            self.trip = None;
            self.direction = Direction::Idle;
        }
        if self.trip.is_none() && self.lifecycle == Lifecycle::ShuttingDown && self.floor == 0 {
            tracing::debug!(elevator = self.id, "out of service");
            self.lifecycle = Lifecycle::OutOfService;
            self.direction = Direction::Idle;
        }
    }

    pub fn behaviour(&self) -> Behaviour {
        match (self.lifecycle, self.door, &self.trip) {
            (Lifecycle::OutOfService, _, _) => Behaviour::OutOfService,
            (_, DoorState::Open, _) => Behaviour::DoorOpen,
            (Lifecycle::ShuttingDown, _, _) => Behaviour::ReturningToGround,
            (_, _, Some(_)) => Behaviour::Moving,
            (_, _, None) => Behaviour::Idle,
        }
    }

    pub fn status(&self) -> ElevatorStatus {
        let (load, waiting) = match &self.trip {
            Some(trip) => (trip.riding().to_vec(), trip.waiting().to_vec()),
            None => (Vec::new(), Vec::new()),
        };
        ElevatorStatus {
            id: self.id,
            floor: self.floor,
            direction: self.direction,
            door: self.door,
            behaviour: self.behaviour(),
            lifecycle: self.lifecycle,
            accepting: self.is_accepting(),
            load,
            waiting,
            delivered: self.delivered.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: usize, num_floors: usize, capacity: usize) -> ElevatorUnit {
        ElevatorUnit::new(id, &BuildingConfig::new(num_floors, 1, capacity).unwrap())
    }

    fn running_unit(num_floors: usize, capacity: usize) -> ElevatorUnit {
        let mut unit = unit(0, num_floors, capacity);
        unit.start().unwrap();
        unit
    }

    #[test]
    fn test_new_unit_is_out_of_service() {
        let mut unit = unit(3, 5, 2);
        assert_eq!(unit.behaviour(), Behaviour::OutOfService);
        assert!(!unit.is_accepting());
        unit.step();
        assert_eq!(unit.current_floor(), 0);
        assert!(unit.process_requests(vec![]).unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_start_only_from_out_of_service() {
        let mut unit = running_unit(5, 2);
        assert!(unit.is_accepting());
        assert_eq!(unit.behaviour(), Behaviour::Idle);
        assert!(unit.start().unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_one_state_change_per_step() {
        let mut unit = running_unit(6, 2);
        unit.process_requests(vec![Request::new(1, 3)]).unwrap();
        assert_eq!(unit.behaviour(), Behaviour::Moving);
        assert!(!unit.is_accepting());

        unit.step();
        assert_eq!(unit.current_floor(), 1);
        assert_eq!(unit.status().door, DoorState::Closed);

        unit.step();
        assert_eq!(unit.behaviour(), Behaviour::DoorOpen);
        assert_eq!(unit.status().load, vec![Request::new(1, 3)]);

        unit.step();
        assert_eq!(unit.status().door, DoorState::Closed);
        assert_eq!(unit.current_floor(), 1);

        unit.step();
        unit.step();
        assert_eq!(unit.current_floor(), 3);

        unit.step();
        assert_eq!(unit.behaviour(), Behaviour::DoorOpen);
        assert_eq!(unit.status().delivered, vec![Request::new(1, 3)]);
        assert!(unit.status().load.is_empty());
    }

    #[test]
    fn test_trip_ends_idle_at_top_floor() {
        let mut unit = running_unit(4, 2);
        unit.process_requests(vec![Request::new(0, 1)]).unwrap();
        for _ in 0..10 {
            unit.step();
        }
        assert_eq!(unit.current_floor(), 3);
        assert_eq!(unit.status().direction, Direction::Idle);
        assert!(unit.is_accepting());

        unit.process_requests(vec![Request::new(2, 0)]).unwrap();
        assert_eq!(unit.status().direction, Direction::Down);
    }

    #[test]
    fn test_empty_batch_sweeps_to_opposite_terminal() {
        let mut unit = running_unit(3, 1);
        unit.process_requests(Vec::new()).unwrap();
        unit.step();
        assert!(!unit.is_accepting());
        unit.step();
        assert_eq!(unit.current_floor(), 2);
        assert!(unit.is_accepting());
    }

    #[test]
    fn test_process_requests_rejections() {
        let mut unit = running_unit(10, 2);
        let too_many = vec![Request::new(0, 1), Request::new(0, 2), Request::new(0, 3)];
        assert!(unit.process_requests(too_many).unwrap_err().is_invalid_state());

        let wrong_way = vec![Request::new(5, 2)];
        assert!(unit.process_requests(wrong_way).unwrap_err().is_invalid_argument());

        let off_the_map = vec![Request::new(0, 10)];
        assert!(unit.process_requests(off_the_map).unwrap_err().is_invalid_argument());

        assert!(unit.is_accepting());
        unit.process_requests(vec![Request::new(0, 5)]).unwrap();
        assert!(unit.process_requests(vec![Request::new(0, 5)]).unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_batch_only_accepted_at_terminal_floor() {
        let mut unit = running_unit(5, 2);
        unit.floor = 2;
        assert!(unit.is_accepting());
        assert!(unit.process_requests(Vec::new()).unwrap_err().is_invalid_state());
        assert!(unit.process_requests(vec![Request::new(2, 4)]).unwrap_err().is_invalid_state());
        assert_eq!(unit.behaviour(), Behaviour::Idle);
    }

    #[test]
    fn test_idle_shutdown_at_ground_is_immediate() {
        let mut unit = running_unit(5, 2);
        unit.take_out_of_service().unwrap();
        assert_eq!(unit.behaviour(), Behaviour::ReturningToGround);
        assert!(!unit.is_accepting());
        assert!(unit.take_out_of_service().unwrap_err().is_invalid_state());

        unit.step();
        assert_eq!(unit.lifecycle(), Lifecycle::OutOfService);
        assert!(unit.start().is_ok());
    }

    #[test]
    fn test_shutdown_discharges_riders_first() {
        let mut unit = running_unit(10, 3);
        unit.process_requests(vec![Request::new(1, 4), Request::new(2, 7)]).unwrap();
        unit.step(); // floor 1
        unit.step(); // open, board (1, 4)
        unit.take_out_of_service().unwrap();
        assert_eq!(unit.status().waiting, Vec::new());
        assert_eq!(unit.status().load, vec![Request::new(1, 4)]);

        let mut steps = 0;
        while unit.lifecycle() != Lifecycle::OutOfService {
            unit.step();
            steps += 1;
            assert!(unit.current_floor() <= 4);
            assert!(steps < 20);
        }
        assert_eq!(unit.current_floor(), 0);
        assert_eq!(unit.status().door, DoorState::Closed);
        assert_eq!(unit.status().delivered, vec![Request::new(1, 4)]);
    }

    #[test]
    fn test_shutdown_with_nobody_on_board_abandons_trip() {
        let mut unit = running_unit(10, 3);
        unit.process_requests(vec![Request::new(3, 8)]).unwrap();
        unit.step();
        unit.step();
        unit.take_out_of_service().unwrap();
        assert!(unit.status().waiting.is_empty());
        unit.step();
        unit.step();
        assert_eq!(unit.current_floor(), 0);
        assert_eq!(unit.lifecycle(), Lifecycle::OutOfService);
    }

    #[test]
    fn test_status_is_a_copy() {
        let mut unit = running_unit(5, 2);
        unit.process_requests(vec![Request::new(0, 2)]).unwrap();
        let before = unit.status();
        unit.step();
        unit.step();
        assert!(before.waiting.contains(&Request::new(0, 2)));
        assert!(before.load.is_empty());
        assert_eq!(unit.status().load, vec![Request::new(0, 2)]);
    }
}
