use crate::call::Call;
use crate::error::{Error, Result};

/// A passenger travelling from `start_floor` to `end_floor`.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Request {
    pub start_floor: usize,
    pub end_floor: usize,
}

impl Request {
    pub fn new(start_floor: usize, end_floor: usize) -> Self {
        Request { start_floor, end_floor }
    }

    /// The hall call this request corresponds to, `None` if it goes nowhere.
    pub fn call(&self) -> Option<Call> {
        if self.start_floor < self.end_floor {
            Some(Call::HallUp)
        } else if self.start_floor > self.end_floor {
            Some(Call::HallDown)
        } else {
            None
        }
    }

    /// Checks the request against a building with `num_floors` floors.
    pub fn validate(&self, num_floors: usize) -> Result<Call> {
        if self.start_floor >= num_floors {
            return Err(Error::invalid_argument(format!(
                "start floor {} must be between 0 and {}",
                self.start_floor,
                num_floors - 1
            )));
        }
        if self.end_floor >= num_floors {
            return Err(Error::invalid_argument(format!(
                "end floor {} must be between 0 and {}",
                self.end_floor,
                num_floors - 1
            )));
        }
        self.call().ok_or_else(|| {
            Error::invalid_argument(format!(
                "start floor and end floor cannot both be {}",
                self.start_floor
            ))
        })
    }
}

impl From<(usize, usize)> for Request {
    fn from((start_floor, end_floor): (usize, usize)) -> Self {
        Request::new(start_floor, end_floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_from_floors() {
        assert_eq!(Request::new(1, 4).call(), Some(Call::HallUp));
        assert_eq!(Request::new(6, 2).call(), Some(Call::HallDown));
        assert_eq!(Request::new(3, 3).call(), None);
    }

    #[test]
    fn test_validate() {
        assert_eq!(Request::new(0, 9).validate(10), Ok(Call::HallUp));
        assert!(Request::new(0, 10).validate(10).unwrap_err().is_invalid_argument());
        assert!(Request::new(10, 0).validate(10).unwrap_err().is_invalid_argument());
        assert!(Request::new(3, 3).validate(10).unwrap_err().is_invalid_argument());
    }
}
