//! Operator DAG and the logical operator set.
//!
//! A `Dag` is built once through `DagBuilder` and is immutable afterwards.
//! Every node gets a dense `OpId` equal to its insertion index, and a node may
//! only name parents that were added before it. Insertion order is therefore
//! always a valid topological order, which is what `Dag::nodes` yields.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::id::OpId;
use crate::schema::Schema;

/// One operator in the DAG: payload, diagnostic name, and ordered parents.
#[derive(Debug, Clone, Serialize)]
pub struct Node<T> {
    id: OpId,
    name: String,
    op: T,
    parents: Vec<OpId>,
}

impl<T> Node<T> {
    pub fn id(&self) -> OpId {
        self.id
    }

    /// Human-readable name; not required to be unique.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn op(&self) -> &T {
        &self.op
    }

    /// Direct parents in declaration order.
    pub fn parents(&self) -> &[OpId] {
        &self.parents
    }
}

/// Immutable operator graph.
#[derive(Debug, Clone, Serialize)]
pub struct Dag<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Dag<T> {
    pub fn builder() -> DagBuilder<T> {
        DagBuilder::new()
    }

    pub fn node(&self, op: OpId) -> Option<&Node<T>> {
        op.index().and_then(|i| self.nodes.get(i))
    }

    pub fn contains(&self, op: OpId) -> bool {
        self.node(op).is_some()
    }

    /// All nodes, parents before children.
    pub fn nodes(&self) -> std::slice::Iter<'_, Node<T>> {
        self.nodes.iter()
    }

    /// Ids in the same order as `nodes`.
    pub fn topological_order(&self) -> Vec<OpId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First node carrying `name`, in topological order.
    pub fn find(&self, name: &str) -> Option<&Node<T>> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Direct consumers of `op`, in topological order.
    pub fn children(&self, op: OpId) -> Vec<OpId> {
        self.nodes
            .iter()
            .filter(|n| n.parents.contains(&op))
            .map(|n| n.id)
            .collect()
    }

    /// Nodes without parents.
    pub fn roots(&self) -> Vec<OpId> {
        self.nodes
            .iter()
            .filter(|n| n.parents.is_empty())
            .map(|n| n.id)
            .collect()
    }

    /// Nodes nobody consumes.
    pub fn leaves(&self) -> Vec<OpId> {
        let consumed: HashSet<OpId> = self
            .nodes
            .iter()
            .flat_map(|n| n.parents.iter().copied())
            .collect();
        self.nodes
            .iter()
            .filter(|n| !consumed.contains(&n.id))
            .map(|n| n.id)
            .collect()
    }
}

/// Incremental DAG construction. Parents must already be present.
#[derive(Debug, Clone)]
pub struct DagBuilder<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Default for DagBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DagBuilder<T> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append a node and return its id.
    ///
    /// Fails if any parent id has not been handed out by this builder yet.
    /// The same parent may appear more than once (e.g. a self-union).
    pub fn add(&mut self, name: impl Into<String>, op: T, parents: &[OpId]) -> Result<OpId> {
        let name = name.into();
        if let Some(bad) = parents
            .iter()
            .find(|p| p.index().map_or(true, |i| i >= self.nodes.len()))
        {
            return Err(Error::Dag(format!(
                "operator '{}' names unknown parent {}",
                name, bad
            )));
        }
        let id = OpId::new(self.nodes.len() as u64);
        self.nodes.push(Node {
            id,
            name,
            op,
            parents: parents.to_vec(),
        });
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn build(self) -> Dag<T> {
        Dag { nodes: self.nodes }
    }
}

/// Number of inputs an operator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, inputs: usize) -> bool {
        match self {
            Arity::Exactly(n) => inputs == n,
            Arity::AtLeast(n) => inputs >= n,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Logical operators understood by the bundled backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogicalOp {
    Scan {
        source: String, // e.g., "memory://users"
        schema: Schema,
    },
    Filter {
        expr: String, // "<column> <op> <literal>"
    },
    Map {
        expr: String, // "old AS new, ..."
    },
    Project {
        columns: Vec<String>,
    },
    Union,
    Sink {
        destination: String,
        format: String,
    },
}

impl LogicalOp {
    /// Stable operator key used by backends and explain output.
    pub fn key(&self) -> &'static str {
        match self {
            LogicalOp::Scan { .. } => "scan",
            LogicalOp::Filter { .. } => "filter",
            LogicalOp::Map { .. } => "map",
            LogicalOp::Project { .. } => "project",
            LogicalOp::Union => "union",
            LogicalOp::Sink { .. } => "sink",
        }
    }

    pub fn arity(&self) -> Arity {
        use LogicalOp::*;
        match self {
            Scan { .. } => Arity::Exactly(0),
            Filter { .. } | Map { .. } | Project { .. } | Sink { .. } => Arity::Exactly(1),
            Union => Arity::AtLeast(2),
        }
    }

    /// Returns true if this operator consumes exactly one input.
    pub fn is_unary(&self) -> bool {
        self.arity() == Arity::Exactly(1)
    }
}
