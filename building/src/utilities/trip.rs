use shared_resources::{Direction, Request};

/// The batch one elevator is currently carrying out.
///
/// A trip is a single sweep in `direction` that ends at `target`. Requests wait in
/// `waiting` until the car stops at their start floor and ride in `riding` until it
/// stops at their end floor.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Trip {
    direction: Direction,
    target: usize,
    waiting: Vec<Request>,
    riding: Vec<Request>,
}

impl Trip {
    pub fn new(direction: Direction, target: usize, batch: Vec<Request>) -> Self {
        Trip {
            direction,
            target,
            waiting: batch,
            riding: Vec::new(),
        }
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn waiting(&self) -> &[Request] {
        &self.waiting
    }

    pub fn riding(&self) -> &[Request] {
        &self.riding
    }

    pub fn has_passengers(&self) -> bool {
        !self.waiting.is_empty() || !self.riding.is_empty()
    }

    pub fn pickup_at_floor(&self, floor: usize) -> bool {
        self.waiting.iter().any(|request| request.start_floor == floor)
    }

    pub fn dropoff_at_floor(&self, floor: usize) -> bool {
        self.riding.iter().any(|request| request.end_floor == floor)
    }

    pub fn should_stop(&self, floor: usize) -> bool {
        self.pickup_at_floor(floor) || self.dropoff_at_floor(floor)
    }

    /// Done once everybody got off and the car stands at the end of the sweep.
    pub fn is_finished(&self, floor: usize) -> bool {
        !self.has_passengers() && floor == self.target
    }

    /// Moves everybody waiting at `floor` into the car.
    pub fn board(&mut self, floor: usize) -> Vec<Request> {
        let (boarding, waiting): (Vec<Request>, Vec<Request>) = self
            .waiting
            .drain(..)
            .partition(|request| request.start_floor == floor);
        self.waiting = waiting;
        self.riding.extend(boarding.iter().copied());
        boarding
    }

    /// Lets out everybody whose destination is `floor`.
    pub fn discharge(&mut self, floor: usize) -> Vec<Request> {
        let (leaving, riding): (Vec<Request>, Vec<Request>) = self
            .riding
            .drain(..)
            .partition(|request| request.end_floor == floor);
        self.riding = riding;
        leaving
    }

    /// Forgets everybody not yet on board and shortens the sweep to the last
    /// destination of those who are.
    pub fn cancel_boarding(&mut self) -> Vec<Request> {
        let dropped = std::mem::take(&mut self.waiting);
        let last_stop = match self.direction {
            Direction::Up => self.riding.iter().map(|request| request.end_floor).max(),
            Direction::Down | Direction::Idle => {
                self.riding.iter().map(|request| request.end_floor).min()
            }
        };
        if let Some(last_stop) = last_stop {
            self.target = last_stop;
        }
        dropped
    }
}
