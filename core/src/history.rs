use crate::{CapabilityFlags, ChangeListener, UndoRedo};
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryConfig {
    /// `None` keeps every entry.
    pub max_depth: Option<usize>,
}

/// Linear snapshot history: `past` oldest first, `future` nearest redo first.
pub struct History<T> {
    past: VecDeque<T>,
    present: T,
    future: VecDeque<T>,
    config: HistoryConfig,
    listeners: Vec<ChangeListener>,
}

impl<T: Clone + PartialEq> History<T> {
    pub fn new(initial: T) -> Self {
        Self::with_config(initial, HistoryConfig::default())
    }

    pub fn with_config(initial: T, config: HistoryConfig) -> Self {
        Self {
            past: VecDeque::new(),
            present: initial,
            future: VecDeque::new(),
            config,
            listeners: Vec::new(),
        }
    }

    /// Applies `config` in place. Entries beyond a new `max_depth` are
    /// dropped oldest first; listeners stay subscribed.
    pub fn set_config(&mut self, config: HistoryConfig) {
        let before = self.flags();
        self.config = config;
        self.trim_past();
        if self.flags() != before {
            self.notify();
        }
    }

    pub fn config(&self) -> HistoryConfig {
        self.config
    }

    pub fn present(&self) -> &T {
        &self.present
    }

    pub fn past(&self) -> impl ExactSizeIterator<Item = &T> {
        self.past.iter()
    }

    pub fn future(&self) -> impl ExactSizeIterator<Item = &T> {
        self.future.iter()
    }

    /// Records `state` as the new present. Structurally equal states are
    /// dropped so redundant re-derivations never grow `past`.
    pub fn push(&mut self, state: T) -> bool {
        if state == self.present {
            return false;
        }
        let previous = std::mem::replace(&mut self.present, state);
        self.past.push_back(previous);
        self.trim_past();
        self.future.clear();
        tracing::trace!(past = self.past.len(), "history push");
        self.notify();
        true
    }

    pub fn undo(&mut self) -> &T {
        if let Some(previous) = self.past.pop_back() {
            let current = std::mem::replace(&mut self.present, previous);
            self.future.push_front(current);
            tracing::trace!(past = self.past.len(), future = self.future.len(), "history undo");
            self.notify();
        }
        &self.present
    }

    pub fn redo(&mut self) -> &T {
        if let Some(next) = self.future.pop_front() {
            let current = std::mem::replace(&mut self.present, next);
            self.past.push_back(current);
            tracing::trace!(past = self.past.len(), future = self.future.len(), "history redo");
            self.notify();
        }
        &self.present
    }

    /// Replaces the present and drops both stacks.
    pub fn reset(&mut self, initial: T) {
        let had_entries = !self.past.is_empty() || !self.future.is_empty();
        self.past.clear();
        self.future.clear();
        self.present = initial;
        if had_entries {
            self.notify();
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn flags(&self) -> CapabilityFlags {
        CapabilityFlags { can_undo: self.can_undo(), can_redo: self.can_redo() }
    }

    pub fn subscribe(&mut self, listener: ChangeListener) {
        self.listeners.push(listener);
    }

    fn trim_past(&mut self) {
        if let Some(limit) = self.config.max_depth {
            while self.past.len() > limit {
                self.past.pop_front();
            }
        }
    }

    fn notify(&mut self) {
        let flags = self.flags();
        for listener in self.listeners.iter_mut() {
            listener(flags);
        }
    }
}

impl<T: Clone + PartialEq> UndoRedo for History<T> {
    fn can_undo(&self) -> bool {
        History::can_undo(self)
    }

    fn can_redo(&self) -> bool {
        History::can_redo(self)
    }

    fn undo(&mut self) -> bool {
        let available = History::can_undo(self);
        History::undo(self);
        available
    }

    fn redo(&mut self) -> bool {
        let available = History::can_redo(self);
        History::redo(self);
        available
    }
}

impl<T: fmt::Debug> fmt::Debug for History<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("past", &self.past)
            .field("present", &self.present)
            .field("future", &self.future)
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
