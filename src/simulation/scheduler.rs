//! Discrete-event scheduler driving the simulated clock

use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::core::types::SimTime;
use crate::memory::{MotorCommand, RequestToken, RetrievalOutcome, Screen};
use crate::simulation::executor::Firing;

/// What happens when a scheduled event comes due
#[derive(Debug, Clone)]
pub enum EventKind {
    /// Visual attention lands on whatever the screen shows
    Attend,
    /// A fresh working-memory note is ready
    WorkingMemory,
    /// Declarative memory answers a request (outcome computed at request time)
    Retrieval(RetrievalOutcome),
    /// The key press completes
    Motor(MotorCommand),
    /// The selected rule's effects land
    Fire(Firing),
    /// The trial driver changes the display
    Screen(Screen),
}

#[derive(Debug, Clone)]
pub struct ScheduledEvent {
    pub time: SimTime,
    pub seq: u64,
    pub token: Option<RequestToken>,
    pub kind: EventKind,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    // Reversed so the max-heap pops the earliest time, then the earliest insertion
    fn cmp(&self, other: &Self) -> Ordering {
        (OrderedFloat(other.time), other.seq).cmp(&(OrderedFloat(self.time), self.seq))
    }
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: SimTime,
    queue: BinaryHeap<ScheduledEvent>,
    next_seq: u64,
    next_token: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    /// Fresh token for a module request
    pub fn token(&mut self) -> RequestToken {
        self.next_token += 1;
        RequestToken(self.next_token)
    }

    pub fn schedule_in(&mut self, delay: SimTime, token: Option<RequestToken>, kind: EventKind) {
        let time = self.now + delay.max(0.0);
        let seq = self.next_seq;
        self.next_seq += 1;
        tracing::trace!(time, seq, ?kind, "scheduled");
        self.queue.push(ScheduledEvent {
            time,
            seq,
            token,
            kind,
        });
    }

    /// Remove the earliest event and advance the clock to it
    pub fn pop(&mut self) -> Option<ScheduledEvent> {
        let event = self.queue.pop()?;
        self.now = self.now.max(event.time);
        Some(event)
    }

    pub fn next_time(&self) -> Option<SimTime> {
        self.queue.peek().map(|e| e.time)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop everything outstanding; the clock keeps its value
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen(s: Screen) -> EventKind {
        EventKind::Screen(s)
    }

    #[test]
    fn test_pops_in_time_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(0.3, None, screen(Screen::Done));
        scheduler.schedule_in(0.1, None, screen(Screen::Fixation));
        scheduler.schedule_in(0.2, None, screen(Screen::Blank));

        let times: Vec<_> = std::iter::from_fn(|| scheduler.pop()).map(|e| e.time).collect();
        assert_eq!(times, vec![0.1, 0.2, 0.3]);
        assert_eq!(scheduler.now(), 0.3);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(0.5, None, screen(Screen::Fixation));
        scheduler.schedule_in(0.5, None, screen(Screen::Done));

        let first = scheduler.pop().unwrap();
        let second = scheduler.pop().unwrap();
        assert!(matches!(first.kind, EventKind::Screen(Screen::Fixation)));
        assert!(matches!(second.kind, EventKind::Screen(Screen::Done)));
    }

    #[test]
    fn test_delays_are_relative_to_now() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(1.0, None, screen(Screen::Fixation));
        scheduler.pop();
        scheduler.schedule_in(0.25, None, screen(Screen::Blank));
        assert_eq!(scheduler.next_time(), Some(1.25));
    }

    #[test]
    fn test_tokens_are_unique() {
        let mut scheduler = Scheduler::new();
        assert_ne!(scheduler.token(), scheduler.token());
    }

    #[test]
    fn test_clear_keeps_clock() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_in(0.4, None, screen(Screen::Fixation));
        scheduler.pop();
        scheduler.schedule_in(0.4, None, screen(Screen::Done));
        scheduler.clear();
        assert!(scheduler.is_idle());
        assert_eq!(scheduler.now(), 0.4);
    }
}
