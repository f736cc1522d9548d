//! Open-set priority structures for best-first search
//!
//! Two implementations of [`Frontier`] are provided:
//!
//! - [`DualQueueFrontier`] keeps two binary heaps, of which only one is
//!   active. `BinaryHeap` cannot lower the key of an entry in place, so a
//!   reprioritization pops entries from the active heap into the inactive
//!   one until the target surfaces, drops it, merges the two heaps and
//!   pushes the replacement. Each update is O(n log n) in the frontier size.
//!   This is fine on the map sizes the engine is used with, and is the
//!   largest cost on big open maps.
//! - [`IndexedFrontier`] keeps an ordered map keyed by priority plus a
//!   cell index, giving O(log n) updates. It pops in exactly the same order.
//!
//! Both order by ascending `f_score`, ties by insertion sequence.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap, HashMap};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::common::{Cell, Frontier, Node};

/// Which [`Frontier`] implementation the engine searches with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontierKind {
    DualQueue,
    Indexed,
}

impl Default for FrontierKind {
    fn default() -> Self {
        FrontierKind::DualQueue
    }
}

/// Heap entry; the earliest-inserted lowest `f_score` compares greatest
#[derive(Debug)]
struct FrontierEntry {
    node: Node,
    priority: OrderedFloat<f64>,
    seq: u64,
}

impl Eq for FrontierEntry {}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Frontier built from two interchangeable binary heaps.
///
/// Between calls the inactive heap is always empty.
#[derive(Debug, Default)]
pub struct DualQueueFrontier {
    queues: [BinaryHeap<FrontierEntry>; 2],
    active: usize,
    next_seq: u64,
}

impl DualQueueFrontier {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, node: Node) -> FrontierEntry {
        let seq = self.next_seq;
        self.next_seq += 1;
        FrontierEntry { node, priority: OrderedFloat(node.f_score), seq }
    }
}

impl Frontier for DualQueueFrontier {
    fn push(&mut self, node: Node) {
        let entry = self.entry(node);
        self.queues[self.active].push(entry);
    }

    fn pop(&mut self) -> Option<Node> {
        self.queues[self.active].pop().map(|e| e.node)
    }

    fn peek(&self) -> Option<&Node> {
        self.queues[self.active].peek().map(|e| &e.node)
    }

    fn reprioritize(&mut self, node: Node) {
        let active = self.active;
        let inactive = 1 - active;

        // Everything popped before the target is already in ascending order
        // and lands in the inactive heap.
        let mut found = false;
        while let Some(top) = self.queues[active].pop() {
            if top.node.cell == node.cell {
                found = true;
                break;
            }
            self.queues[inactive].push(top);
        }
        if !found {
            log::trace!("reprioritize: {} was not queued, inserting", node.cell);
        }

        // Merge the smaller heap into the larger one; the larger becomes active.
        let (from, to) = if self.queues[active].len() >= self.queues[inactive].len() {
            (inactive, active)
        } else {
            (active, inactive)
        };
        let mut drained = std::mem::take(&mut self.queues[from]);
        self.queues[to].append(&mut drained);
        self.active = to;

        self.push(node);
    }

    fn len(&self) -> usize {
        self.queues[self.active].len()
    }

    fn contains(&self, cell: Cell) -> bool {
        self.queues[self.active].iter().any(|e| e.node.cell == cell)
    }
}

/// Frontier with a cell index for logarithmic reprioritization
#[derive(Debug, Default)]
pub struct IndexedFrontier {
    order: BTreeMap<(OrderedFloat<f64>, u64), Node>,
    index: HashMap<Cell, (OrderedFloat<f64>, u64)>,
    next_seq: u64,
}

impl IndexedFrontier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Frontier for IndexedFrontier {
    fn push(&mut self, node: Node) {
        if let Some(old) = self.index.remove(&node.cell) {
            self.order.remove(&old);
        }
        let key = (OrderedFloat(node.f_score), self.next_seq);
        self.next_seq += 1;
        self.index.insert(node.cell, key);
        self.order.insert(key, node);
    }

    fn pop(&mut self) -> Option<Node> {
        let (_, node) = self.order.pop_first()?;
        self.index.remove(&node.cell);
        Some(node)
    }

    fn peek(&self) -> Option<&Node> {
        self.order.first_key_value().map(|(_, node)| node)
    }

    fn reprioritize(&mut self, node: Node) {
        self.push(node);
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn contains(&self, cell: Cell) -> bool {
        self.index.contains_key(&cell)
    }
}
