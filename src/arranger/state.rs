// Selection State - Usage counts and recency shared across one generation run
// Created per run and threaded by reference through every phrase fill

use std::collections::{HashMap, VecDeque};

/// Default number of recent picks kept out of the primary candidate pool
pub const DEFAULT_RECENT_WINDOW: usize = 3;

/// How often each move id has been selected in this run
#[derive(Debug, Clone, Default)]
pub struct UsageCounters {
    counts: HashMap<String, u32>,
    total: u32,
}

impl UsageCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection count for a move (0 if never picked)
    pub fn count(&self, id: &str) -> u32 {
        self.counts.get(id).copied().unwrap_or(0)
    }

    /// Record one selection
    pub fn increment(&mut self, id: &str) {
        *self.counts.entry(id.to_string()).or_insert(0) += 1;
        self.total += 1;
    }

    /// Total selections recorded
    pub fn total(&self) -> u32 {
        self.total
    }
}

/// Bounded FIFO of the most recently selected move ids
#[derive(Debug, Clone)]
pub struct RecentWindow {
    ids: VecDeque<String>,
    capacity: usize,
}

impl RecentWindow {
    pub fn new(capacity: usize) -> Self {
        RecentWindow {
            ids: VecDeque::with_capacity(capacity.min(16)),
            capacity,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|recent| recent == id)
    }

    /// Push an id, evicting the oldest entries beyond capacity
    pub fn push(&mut self, id: &str) {
        if self.capacity == 0 {
            return;
        }
        self.ids.push_back(id.to_string());
        while self.ids.len() > self.capacity {
            self.ids.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Ids oldest first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

/// Mutable state of one sequence-generation run
#[derive(Debug, Clone)]
pub struct SelectionState {
    pub usage: UsageCounters,
    pub recent: RecentWindow,
}

impl SelectionState {
    pub fn new(recent_window: usize) -> Self {
        SelectionState {
            usage: UsageCounters::new(),
            recent: RecentWindow::new(recent_window),
        }
    }

    /// Record a pick in both the usage counters and the recency window
    pub fn record(&mut self, id: &str) {
        self.usage.increment(id);
        self.recent.push(id);
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        SelectionState::new(DEFAULT_RECENT_WINDOW)
    }
}
