//! core-keymap: multi-key sequence tables.
//!
//! Design principles:
//! - Pure and deterministic: a lookup depends only on the table and the keys
//!   fed so far.
//! - Sequences compile into a small trie; each node keeps its edges inline
//!   (`SmallVec`) since fan-out after an operator rarely exceeds a handful.
//! - Ambiguity is surfaced as [`Lookup::Prefix`]: the keys so far are a strict
//!   prefix of at least one sequence but name nothing yet.
//! - No side effects: logging only at TRACE for build conflicts and traversal.
//!
//! Keys are canonical key-token strings (`"w"`, `"<escape>"`), so the trie is
//! agnostic to how tokens were produced.

use smallvec::SmallVec;
use tracing::trace;

#[derive(Debug, Clone)]
struct Edge {
    key: String,
    next: usize,
}

#[derive(Debug, Clone)]
struct Node {
    terminal: Option<usize>,
    edges: SmallVec<[Edge; 4]>,
}

impl Node {
    fn new() -> Self {
        Self {
            terminal: None,
            edges: SmallVec::new(),
        }
    }

    fn child(&self, key: &str) -> Option<usize> {
        self.edges.iter().find(|e| e.key == key).map(|e| e.next)
    }
}

/// Result of feeding a key sequence through a [`SequenceTrie`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a, T> {
    /// The sequence names a value.
    Exact(&'a T),
    /// Not complete, but some longer sequence starts with these keys.
    Prefix,
    /// No registered sequence starts with these keys.
    NoMatch,
}

/// Trie of key-token sequences mapping to values.
#[derive(Debug, Clone)]
pub struct SequenceTrie<T> {
    nodes: Vec<Node>,
    values: Vec<T>,
}

impl<T> Default for SequenceTrie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SequenceTrie<T> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
            values: Vec::new(),
        }
    }

    /// Build from `(sequence, value)` pairs. A later duplicate overrides an earlier one.
    pub fn build<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Vec<S>, T)>,
        S: AsRef<str>,
    {
        let mut trie = Self::new();
        for (seq, value) in entries {
            trie.insert(&seq, value);
        }
        trie
    }

    /// Register `value` under `seq`. An empty sequence is ignored.
    pub fn insert<S: AsRef<str>>(&mut self, seq: &[S], value: T) {
        if seq.is_empty() {
            return;
        }
        let mut cur = 0usize;
        for key in seq {
            let key = key.as_ref();
            cur = match self.nodes[cur].child(key) {
                Some(next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::new());
                    self.nodes[cur].edges.push(Edge {
                        key: key.to_string(),
                        next,
                    });
                    next
                }
            };
        }
        match self.nodes[cur].terminal {
            Some(slot) => {
                trace!(target: "keymap.trie", node = cur, "terminal_override");
                self.values[slot] = value;
            }
            None => {
                self.nodes[cur].terminal = Some(self.values.len());
                self.values.push(value);
            }
        }
    }

    pub fn lookup<S: AsRef<str>>(&self, keys: &[S]) -> Lookup<'_, T> {
        let mut node = 0usize;
        for (step, key) in keys.iter().enumerate() {
            let key = key.as_ref();
            match self.nodes[node].child(key) {
                Some(next) => {
                    node = next;
                    trace!(target: "keymap.trie", step, key, node, "advance");
                }
                None => return Lookup::NoMatch,
            }
        }
        if node == 0 {
            return Lookup::Prefix;
        }
        match self.nodes[node].terminal {
            Some(slot) => Lookup::Exact(&self.values[slot]),
            None if self.nodes[node].edges.is_empty() => Lookup::NoMatch,
            None => Lookup::Prefix,
        }
    }

    /// Number of registered sequences.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Operator plus the keys typed after it. Empty unless a multi-key
/// sequence is in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingKeys {
    pub operator: Option<char>,
    pub keys: SmallVec<[String; 4]>,
}

impl PendingKeys {
    pub fn begin(&mut self, operator: char) {
        self.operator = Some(operator);
        self.keys.clear();
        trace!(target: "keymap.pending", operator = %operator, "begin");
    }

    pub fn push(&mut self, key: &str) {
        self.keys.push(key.to_string());
    }

    pub fn clear(&mut self) {
        self.operator = None;
        self.keys.clear();
    }

    pub fn is_active(&self) -> bool {
        self.operator.is_some()
    }
}
