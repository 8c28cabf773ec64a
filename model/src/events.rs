//! FILENAME: model/src/events.rs
//! PURPOSE: Change notifications sent from the table core to its presentation layer.
//! CONTEXT: Store and facade operations return or queue `TableEvent`s. The host
//! drains the queue after each call; nothing is delivered through callbacks.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::column::SortDirection;
use crate::log_warn;

/// Maximum number of undrained events kept before the oldest are dropped.
const MAX_PENDING_EVENTS: usize = 1024;

/// Snapshot of the pagination/filter outcome after a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSummary {
    pub total_pages: usize,
    pub current_page: usize,
    pub filtered_count: usize,
    /// Half-open range of filtered positions shown on the current page.
    pub visible_range: (usize, usize),
}

impl FilterSummary {
    /// "start - end" label (1-based, inclusive) or "0" when nothing matches.
    pub fn display_label(&self) -> String {
        if self.filtered_count == 0 {
            "0".to_string()
        } else {
            format!("{} - {}", self.visible_range.0 + 1, self.visible_range.1)
        }
    }
}

/// A change the presentation layer may need to react to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "event")]
pub enum TableEvent {
    /// All rows were replaced.
    RowStoreReset { row_count: usize },
    /// Rows `first..=last` were inserted.
    RowsInserted { first: usize, last: usize },
    CellChanged { row: usize, key: String },
    ExpansionChanged { row: usize, expanded: bool },
    FilterStateChanged(FilterSummary),
    SortChanged { key: String, direction: SortDirection },
    SortCleared,
    SelectionChanged { selected: usize },
    ColumnsChanged { visible: Vec<String> },
}

/// FIFO of pending events, bounded to `MAX_PENDING_EVENTS`.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<TableEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue {
            pending: VecDeque::new(),
        }
    }

    pub fn push(&mut self, event: TableEvent) {
        if self.pending.len() >= MAX_PENDING_EVENTS {
            if let Some(dropped) = self.pending.pop_front() {
                log_warn!("EVENTS", "queue full, dropping oldest event {:?}", dropped);
            }
        }
        self.pending.push_back(event);
    }

    /// Removes and returns all pending events, oldest first.
    pub fn drain(&mut self) -> Vec<TableEvent> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
