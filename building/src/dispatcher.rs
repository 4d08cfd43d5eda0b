//! ----- DISPATCHER MODULE -----
//! The building owns the elevator fleet and the two hall call queues. Every
//! call to `step` hands waiting requests to idle cars at the terminal floors
//! and then advances each car by one tick.

use shared_resources::{BuildingConfig, Call, Error, Request, RequestQueue, Result};

use crate::fsm::ElevatorUnit;
use crate::utilities::building_report::{BuildingReport, SystemStatus};
use crate::utilities::elevator_status::Lifecycle;

#[derive(Debug, Clone)]
pub struct Building {
    config: BuildingConfig,
    status: SystemStatus,
    up_requests: RequestQueue,
    down_requests: RequestQueue,
    elevators: Vec<ElevatorUnit>,
}

impl Building {
    pub fn new(num_floors: usize, num_elevators: usize, capacity: usize) -> Result<Self> {
        Ok(Self::from_config(BuildingConfig::new(
            num_floors,
            num_elevators,
            capacity,
        )?))
    }

    pub fn from_config(config: BuildingConfig) -> Self {
        let elevators = (0..config.num_elevators())
            .map(|id| ElevatorUnit::new(id, &config))
            .collect();
        Building {
            config,
            status: SystemStatus::OutOfService,
            up_requests: RequestQueue::new(),
            down_requests: RequestQueue::new(),
            elevators,
        }
    }

    pub fn num_floors(&self) -> usize {
        self.config.num_floors()
    }

    pub fn num_elevators(&self) -> usize {
        self.config.num_elevators()
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity()
    }

    pub fn status(&self) -> SystemStatus {
        self.status
    }

    pub fn elevators(&self) -> &[ElevatorUnit] {
        &self.elevators
    }

    /// Queues a request. Accepts a `Request` or an `Option<Request>`; `None` is rejected.
    pub fn add_request(&mut self, request: impl Into<Option<Request>>) -> Result<()> {
        if !self.status.accepts_requests() {
            return Err(Error::invalid_state(format!(
                "elevator system not accepting requests while {}",
                self.status.as_string()
            )));
        }
        let request = request
            .into()
            .ok_or_else(|| Error::invalid_argument("request cannot be empty"))?;

        match request.validate(self.num_floors())? {
            Call::HallUp => self.up_requests.push(request),
            Call::HallDown => self.down_requests.push(request),
        }
        tracing::debug!(
            start = request.start_floor,
            end = request.end_floor,
            "request queued"
        );
        Ok(())
    }

    /// Starts every elevator. Returns `false` if the system was already running.
    pub fn start(&mut self) -> Result<bool> {
        match self.status {
            SystemStatus::Stopping => {
                return Err(Error::invalid_state(
                    "the elevator system cannot be started while it is stopping",
                ))
            }
            SystemStatus::Running => return Ok(false),
            SystemStatus::OutOfService => {}
        }
        let stale = self.up_requests.len() + self.down_requests.len();
        if stale > 0 {
            tracing::warn!(stale, "discarding requests left over from the last shutdown");
        }
        self.up_requests.clear();
        self.down_requests.clear();

        for elevator in &mut self.elevators {
            elevator.start()?;
        }
        self.status = SystemStatus::Running;
        tracing::info!(elevators = self.elevators.len(), "elevator system started");
        Ok(true)
    }

    /// Sends every elevator back to the ground floor. New requests are refused
    /// from now on.
    pub fn stop(&mut self) -> Result<()> {
        if self.status != SystemStatus::Running {
            return Err(Error::invalid_state(format!(
                "system is already {}",
                self.status.as_string()
            )));
        }
        for elevator in &mut self.elevators {
            elevator.take_out_of_service()?;
        }
        self.status = SystemStatus::Stopping;
        tracing::info!("elevator system stopping");
        Ok(())
    }

    pub fn report(&self) -> BuildingReport {
        BuildingReport {
            num_floors: self.num_floors(),
            num_elevators: self.num_elevators(),
            capacity: self.capacity(),
            elevators: self.elevators.iter().map(ElevatorUnit::status).collect(),
            up_requests: self.up_requests.to_vec(),
            down_requests: self.down_requests.to_vec(),
            status: self.status,
        }
    }

    /// Runs one tick of the simulation.
    pub fn step(&mut self) -> Result<()> {
        if self.status == SystemStatus::OutOfService {
            return Ok(());
        }
        if self.status != SystemStatus::Stopping {
            self.distribute_requests()?;
        }

        for elevator in &mut self.elevators {
            elevator.step();
        }

        if self.status == SystemStatus::Stopping
            && self
                .elevators
                .iter()
                .all(|elevator| elevator.lifecycle() == Lifecycle::OutOfService)
        {
            self.status = SystemStatus::OutOfService;
            tracing::info!(
                abandoned = self.up_requests.len() + self.down_requests.len(),
                "elevator system out of service"
            );
        }
        Ok(())
    }

    fn distribute_requests(&mut self) -> Result<()> {
        if self.up_requests.is_empty() && self.down_requests.is_empty() {
            return Ok(());
        }
        let capacity = self.capacity();
        let top_floor = self.config.top_floor();

        for elevator in &mut self.elevators {
            if !elevator.is_accepting() {
                continue;
            }
            // Cars only load at the terminal floor they stand on. A car with nothing
            // to load there while the other queue waits sweeps over empty.
            let (own, other) = match elevator.current_floor() {
                0 => (&mut self.up_requests, &self.down_requests),
                floor if floor == top_floor => (&mut self.down_requests, &self.up_requests),
                _ => continue,
            };
            if own.is_empty() && other.is_empty() {
                continue;
            }
            let batch = own.take_batch(capacity);
            tracing::debug!(
                elevator = elevator.id(),
                floor = elevator.current_floor(),
                requests = batch.len(),
                "dispatching batch"
            );
            if let Err(err) = elevator.process_requests(batch.clone()) {
                own.restore(batch);
                return Err(err);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_building(num_floors: usize, num_elevators: usize, capacity: usize) -> Building {
        let mut building = Building::new(num_floors, num_elevators, capacity).unwrap();
        assert!(building.start().unwrap());
        building
    }

    #[test]
    fn test_batch_is_capped_by_capacity() {
        let mut building = running_building(10, 1, 5);
        for end in 1..=8 {
            building.add_request(Request::new(0, end)).unwrap();
        }
        building.distribute_requests().unwrap();

        let report = building.report();
        assert_eq!(report.elevators[0].waiting.len(), 5);
        assert_eq!(
            report.up_requests,
            vec![Request::new(0, 6), Request::new(0, 7), Request::new(0, 8)]
        );
    }

    #[test]
    fn test_ground_floor_unit_never_takes_down_requests() {
        let mut building = running_building(10, 1, 5);
        building.add_request(Request::new(6, 2)).unwrap();
        building.distribute_requests().unwrap();

        let report = building.report();
        assert_eq!(report.down_requests, vec![Request::new(6, 2)]);
        assert!(report.elevators[0].waiting.is_empty());
        assert!(report.elevators[0].load.is_empty());
    }

    #[test]
    fn test_second_unit_only_gets_what_is_left() {
        let mut building = running_building(10, 2, 2);
        for end in [3, 4, 5] {
            building.add_request(Request::new(1, end)).unwrap();
        }
        building.distribute_requests().unwrap();

        let report = building.report();
        assert_eq!(report.elevators[0].waiting, vec![Request::new(1, 3), Request::new(1, 4)]);
        assert_eq!(report.elevators[1].waiting, vec![Request::new(1, 5)]);
        assert!(report.up_requests.is_empty());
    }

    #[test]
    fn test_top_floor_unit_never_takes_up_requests() {
        let mut building = running_building(4, 1, 5);
        building.elevators[0].process_requests(Vec::new()).unwrap();
        while !building.elevators[0].is_accepting() {
            building.elevators[0].step();
        }
        assert_eq!(building.elevators[0].current_floor(), 3);

        building.add_request(Request::new(1, 2)).unwrap();
        building.distribute_requests().unwrap();

        let report = building.report();
        assert_eq!(report.up_requests, vec![Request::new(1, 2)]);
        assert!(report.elevators[0].waiting.is_empty());
        assert_eq!(report.elevators[0].direction, shared_resources::Direction::Down);
    }

    #[test]
    fn test_rejected_batch_goes_back_to_the_queue() {
        let mut building = running_building(5, 1, 2);
        building.up_requests.push(Request::new(0, 9));
        building.add_request(Request::new(1, 3)).unwrap();
        building.add_request(Request::new(2, 4)).unwrap();

        let err = building.distribute_requests().unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(
            building.report().up_requests,
            vec![Request::new(0, 9), Request::new(1, 3), Request::new(2, 4)]
        );
        assert!(building.elevators[0].is_accepting());
    }

    #[test]
    fn test_no_distribution_while_stopping() {
        let mut building = running_building(5, 1, 2);
        building.add_request(Request::new(1, 3)).unwrap();
        building.stop().unwrap();
        building.step().unwrap();

        let report = building.report();
        assert_eq!(report.status, SystemStatus::OutOfService);
        assert_eq!(report.up_requests, vec![Request::new(1, 3)]);
        assert!(report.elevators[0].delivered.is_empty());
    }
}
