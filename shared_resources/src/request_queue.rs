use std::collections::VecDeque;

use crate::request::Request;

/// First-in-first-served queue of waiting requests.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Default)]
pub struct RequestQueue {
    requests: VecDeque<Request>,
}

impl RequestQueue {
    pub fn new() -> Self {
        RequestQueue {
            requests: VecDeque::new(),
        }
    }

    pub fn push(&mut self, request: Request) {
        self.requests.push_back(request);
    }

    /// Removes and returns up to `max` of the oldest requests, oldest first.
    pub fn take_batch(&mut self, max: usize) -> Vec<Request> {
        let count = max.min(self.requests.len());
        self.requests.drain(..count).collect()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Puts a batch taken with `take_batch` back at the front, in its original order.
    pub fn restore(&mut self, batch: Vec<Request>) {
        for request in batch.into_iter().rev() {
            self.requests.push_front(request);
        }
    }

    pub fn to_vec(&self) -> Vec<Request> {
        self.requests.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }
}
