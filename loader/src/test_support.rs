//! Scripted collaborators for exercising the loader without a network.
//!
//! Available to unit tests and, through the `test-support` feature, to
//! integration tests.

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};

use crate::clock::{Clock, NaiveDate};
use crate::host::{FetchError, HostEvent, RequestId, ScriptHost};
use crate::resource::ResourceUrl;

/// How a [`ScriptedHost`] settles requests for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Behaviour {
    /// Load with the given body.
    Load(String),
    /// Error with "not found".
    Fail,
    /// Never settle.
    Hang,
}

/// Order in which a [`ScriptedHost`] delivers settled requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryOrder {
    /// Oldest injection first.
    #[default]
    Fifo,
    /// Newest injection first.
    Lifo,
}

/// A [`ScriptHost`] that records injections and settles them by path.
///
/// Paths with no rule load successfully with a body naming the path.
#[derive(Debug, Default)]
pub struct ScriptedHost {
    rules: HashMap<String, Behaviour>,
    order: DeliveryOrder,
    queue: VecDeque<(RequestId, ResourceUrl)>,
    hung: Vec<(RequestId, ResourceUrl)>,
    injected: Vec<ResourceUrl>,
}

impl ScriptedHost {
    /// A host on which every request loads.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make requests for `path` error.
    #[must_use]
    pub fn fail(mut self, path: &str) -> Self {
        self.rules.insert(path.to_owned(), Behaviour::Fail);
        self
    }

    /// Make requests for `path` load with `body`.
    #[must_use]
    pub fn respond(mut self, path: &str, body: &str) -> Self {
        self.rules
            .insert(path.to_owned(), Behaviour::Load(body.to_owned()));
        self
    }

    /// Make requests for `path` never settle.
    #[must_use]
    pub fn hang(mut self, path: &str) -> Self {
        self.rules.insert(path.to_owned(), Behaviour::Hang);
        self
    }

    /// Deliver events in `order`.
    #[must_use]
    pub fn with_order(mut self, order: DeliveryOrder) -> Self {
        self.order = order;
        self
    }

    /// Change the rule for `path` after construction.
    pub fn set_behaviour(&mut self, path: &str, behaviour: Behaviour) {
        self.rules.insert(path.to_owned(), behaviour);
    }

    /// Every URL injected so far, in injection order.
    #[must_use]
    pub fn injected(&self) -> &[ResourceUrl] {
        &self.injected
    }

    /// Paths of every URL injected so far, in injection order.
    #[must_use]
    pub fn injected_paths(&self) -> Vec<&str> {
        self.injected.iter().map(ResourceUrl::path).collect()
    }

    /// Forget recorded injections.
    pub fn clear_injected(&mut self) {
        self.injected.clear();
    }

    /// Requests waiting to be delivered, excluding hung ones.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Requests that will never settle.
    #[must_use]
    pub fn hung(&self) -> usize {
        self.hung.len()
    }

    fn behaviour(&self, path: &str) -> Behaviour {
        self.rules
            .get(path)
            .cloned()
            .unwrap_or_else(|| Behaviour::Load(format!("// {path}")))
    }
}

impl ScriptHost for ScriptedHost {
    fn inject(&mut self, request: RequestId, url: &ResourceUrl) {
        self.injected.push(url.clone());
        if self.behaviour(url.path()) == Behaviour::Hang {
            self.hung.push((request, url.clone()));
        } else {
            self.queue.push_back((request, url.clone()));
        }
    }

    fn next_event(&mut self) -> Option<HostEvent> {
        let (request, url) = match self.order {
            DeliveryOrder::Fifo => self.queue.pop_front(),
            DeliveryOrder::Lifo => self.queue.pop_back(),
        }?;
        let event = match self.behaviour(url.path()) {
            Behaviour::Load(body) => HostEvent::loaded(request, body),
            Behaviour::Fail | Behaviour::Hang => HostEvent::errored(
                request,
                FetchError::NotFound {
                    url: url.to_string(),
                },
            ),
        };
        Some(event)
    }
}

/// A [`Clock`] pinned to one date whose millisecond counter advances by a
/// fixed step on every read.
#[derive(Debug, Clone)]
pub struct FixedClock {
    date: NaiveDate,
    millis: Cell<u64>,
    step: u64,
}

impl FixedClock {
    /// A clock on `date`, starting at 1 000 ms and advancing 1 ms per read.
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            millis: Cell::new(1_000),
            step: 1,
        }
    }

    /// Stop the millisecond counter from advancing.
    #[must_use]
    pub fn frozen(mut self) -> Self {
        self.step = 0;
        self
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }

    fn now_millis(&self) -> u64 {
        let now = self.millis.get();
        self.millis.set(now.saturating_add(self.step));
        now
    }
}
