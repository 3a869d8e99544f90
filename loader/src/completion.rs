//! Waiting for a load cycle to complete.
//!
//! Callers either hand the loader a callback or take a [`Completion`]
//! handle. Both are queued as waiters and resolved, in the order they were
//! queued, when the cycle that is current at the time completes.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use log::debug;

use crate::report::LoadReport;

/// Callback invoked once with the report of the completing cycle.
pub type Callback = Box<dyn FnOnce(&LoadReport)>;

pub(crate) enum Waiter {
    Callback(Callback),
    Channel(Sender<LoadReport>),
}

impl Waiter {
    pub(crate) fn channel() -> (Self, Completion) {
        let (sender, receiver) = mpsc::channel();
        (
            Self::Channel(sender),
            Completion {
                receiver,
                report: None,
            },
        )
    }

    pub(crate) fn resolve(self, report: &LoadReport) {
        match self {
            Self::Callback(callback) => callback(report),
            Self::Channel(sender) => {
                if sender.send(report.clone()).is_err() {
                    debug!(target: "loader::completion", "completion handle dropped before delivery");
                }
            }
        }
    }
}

/// Handle that resolves when a load cycle completes.
///
/// The loader is driven on the caller's thread, so the handle never blocks;
/// pump the loader (see `DataLoader::run_until_settled`) and poll.
#[derive(Debug)]
pub struct Completion {
    receiver: Receiver<LoadReport>,
    report: Option<LoadReport>,
}

impl Completion {
    /// The report, once the cycle has completed.
    pub fn poll(&mut self) -> Option<&LoadReport> {
        if self.report.is_none() {
            match self.receiver.try_recv() {
                Ok(report) => self.report = Some(report),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => {}
            }
        }
        self.report.as_ref()
    }

    /// Whether the cycle has completed.
    pub fn is_settled(&mut self) -> bool {
        self.poll().is_some()
    }

    /// Consume the handle, yielding the report if the cycle has completed.
    #[must_use]
    pub fn into_report(mut self) -> Option<LoadReport> {
        self.poll();
        self.report
    }
}
