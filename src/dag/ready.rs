// src/dag/ready.rs

use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, PartialEq, Eq)]
struct ReadyEntry {
    priority: i32,
    seq: u64,
    node: usize,
}

impl Ord for ReadyEntry {
    /// Higher priority first; among equal priorities, earlier insertion first.
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for ReadyEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Nodes whose in-degree has reached zero, popped highest-priority first.
#[derive(Debug, Default)]
pub struct ReadyPool {
    heap: BinaryHeap<ReadyEntry>,
    next_seq: u64,
}

impl ReadyPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: usize, priority: i32) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(ReadyEntry {
            priority,
            seq,
            node,
        });
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|e| e.node)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
