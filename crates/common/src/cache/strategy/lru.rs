//! Byte-budgeted least recently used strategy.
//!
//! Entries live in a doubly linked list threaded through a `Vec` of slots,
//! with a key → slot map for `O(1)` lookup. The head is the most recently
//! used entry and the tail the next eviction candidate.
//!
//! Every entry is charged `key.len() + value.len()` bytes. After each `add`
//! the tail is evicted until the running total fits the budget, which can
//! evict the entry that was just inserted when it alone is larger than the
//! budget. A budget of `0` disables eviction.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use super::{EvictionStrategy, StrategyKind};
use crate::cache::value::{EvictionListener, Value};

/// LRU eviction strategy with byte-based accounting.
///
/// # Example
/// ```
/// use std::sync::Arc;
///
/// use distcache_common::cache::{ByteView, EvictionStrategy, LruStrategy};
///
/// let lru = LruStrategy::new(6, None);
/// lru.add("k1", Arc::new(ByteView::from("a")));
/// lru.add("k2", Arc::new(ByteView::from("b")));
/// lru.add("k3", Arc::new(ByteView::from("c"))); // evicts "k1"
/// assert_eq!(lru.keys(), vec!["k3".to_string(), "k2".to_string()]);
/// ```
pub struct LruStrategy {
    max_bytes: u64,
    listener: Option<Arc<dyn EvictionListener>>,
    state: Mutex<LruState>,
}

impl LruStrategy {
    /// Create an empty strategy. `max_bytes == 0` means unbounded.
    pub fn new(max_bytes: u64, listener: Option<Arc<dyn EvictionListener>>) -> Self {
        Self { max_bytes, listener, state: Mutex::new(LruState::default()) }
    }

    /// Keys ordered from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        let state = self.state.lock();
        let mut keys = Vec::with_capacity(state.map.len());
        let mut current = state.head;
        while let Some(index) = current {
            let Some(node) = state.node(index) else { break };
            keys.push(node.key.to_string());
            current = node.next;
        }
        keys
    }

    fn over_budget(&self, state: &LruState) -> bool {
        self.max_bytes != 0 && state.used_bytes > self.max_bytes
    }

    /// Evicts the tail of an already locked state.
    fn evict_oldest(&self, state: &mut LruState) -> Option<String> {
        let node = state.pop_tail()?;
        trace!(key = &*node.key, bytes = node.charge(), "evicted lru entry");
        if let Some(listener) = &self.listener {
            listener.on_evicted(&node.key, node.value.as_ref());
        }
        Some(node.key.to_string())
    }
}

impl EvictionStrategy for LruStrategy {
    fn add(&self, key: &str, value: Arc<dyn Value>) {
        let mut state = self.state.lock();

        if let Some(&index) = state.map.get(key) {
            let new_len = value.len() as u64;
            if let Some(node) = state.node_mut(index) {
                let old_len = node.value.len() as u64;
                node.value = value;
                state.used_bytes = state.used_bytes - old_len + new_len;
            }
            state.promote(index);
        } else {
            state.insert_front(Arc::from(key), value);
        }

        while self.over_budget(&state) {
            if self.evict_oldest(&mut state).is_none() {
                break;
            }
        }
    }

    fn get(&self, key: &str) -> Option<Arc<dyn Value>> {
        let mut state = self.state.lock();
        let &index = state.map.get(key)?;
        state.promote(index);
        state.node(index).map(|node| Arc::clone(&node.value))
    }

    fn remove_oldest(&self) -> Option<String> {
        let mut state = self.state.lock();
        self.evict_oldest(&mut state)
    }

    fn len(&self) -> usize {
        self.state.lock().map.len()
    }

    fn used_bytes(&self) -> u64 {
        self.state.lock().used_bytes
    }

    fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    fn kind(&self) -> StrategyKind {
        StrategyKind::Lru
    }
}

impl fmt::Debug for LruStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("LruStrategy")
            .field("len", &state.map.len())
            .field("used_bytes", &state.used_bytes)
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}

struct Node {
    key: Arc<str>,
    value: Arc<dyn Value>,
    prev: Option<usize>,
    next: Option<usize>,
}

impl Node {
    fn charge(&self) -> u64 {
        (self.key.len() + self.value.len()) as u64
    }
}

#[derive(Default)]
struct LruState {
    map: HashMap<Arc<str>, usize>,
    nodes: Vec<Option<Node>>,
    free_list: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    used_bytes: u64,
}

impl LruState {
    fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index).and_then(Option::as_mut)
    }

    fn insert_front(&mut self, key: Arc<str>, value: Arc<dyn Value>) {
        let node = Node { key: Arc::clone(&key), value, prev: None, next: None };
        self.used_bytes += node.charge();
        let index = match self.free_list.pop() {
            Some(index) => {
                self.nodes[index] = Some(node);
                index
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        };
        self.attach_front(index);
        self.map.insert(key, index);
    }

    fn pop_tail(&mut self) -> Option<Node> {
        let index = self.tail?;
        self.detach(index);
        let node = self.nodes.get_mut(index).and_then(Option::take)?;
        self.map.remove(&node.key);
        self.free_list.push(index);
        self.used_bytes -= node.charge();
        Some(node)
    }

    fn promote(&mut self, index: usize) {
        if self.head == Some(index) {
            return;
        }
        self.detach(index);
        self.attach_front(index);
    }

    fn detach(&mut self, index: usize) {
        let Some((prev, next)) = self.node(index).map(|node| (node.prev, node.next)) else {
            return;
        };

        match prev.and_then(|p| self.node_mut(p)) {
            Some(prev_node) => prev_node.next = next,
            None => self.head = next,
        }
        match next.and_then(|n| self.node_mut(n)) {
            Some(next_node) => next_node.prev = prev,
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(index) {
            node.prev = None;
            node.next = None;
        }
    }

    fn attach_front(&mut self, index: usize) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(index) {
            node.prev = None;
            node.next = old_head;
        }

        match old_head.and_then(|h| self.node_mut(h)) {
            Some(head_node) => head_node.prev = Some(index),
            None => self.tail = Some(index),
        }

        self.head = Some(index);
    }
}
