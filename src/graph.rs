use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::fix::{Fix, FixKind};
use crate::method_index::{MethodIndex, RunContext};
use crate::tracker::{Region, RegionTracker};

/// A candidate fix placed in the round's interference graph, with the
/// regions its evaluation can touch.
#[derive(Clone, Debug)]
pub(crate) struct FixNode {
    pub(crate) id: u32,
    pub(crate) fix: Fix,
    pub(crate) regions: BTreeSet<Region>,
}

/// Interference graph over one round's candidate fixes.
///
/// An edge means the two fixes cannot be measured independently in a single
/// build: they share an affected region, or their methods sit in the same
/// override chain. Lives for one round only and is rebuilt from fresh
/// diagnostics next round.
#[derive(Debug, Default)]
pub(crate) struct FixGraph {
    nodes: Vec<FixNode>,
    edges: BTreeSet<(u32, u32)>,
}

impl FixGraph {
    pub(crate) fn build(
        fixes: Vec<Fix>,
        tracker: &RegionTracker,
        index: &MethodIndex,
        ctx: &mut RunContext,
    ) -> Self {
        let nodes: Vec<FixNode> = fixes
            .into_iter()
            .map(|fix| {
                // Node ids are interned per declaration, so the same fix
                // keeps its id across rounds.
                let identity = format!("{}:{}#{}", fix.kind.as_str(), fix.method, fix.param);
                FixNode {
                    id: ctx.intern(&identity, &fix.class),
                    regions: tracker.regions(&fix),
                    fix,
                }
            })
            .collect();

        let mut edges = BTreeSet::new();
        for (left_at, left) in nodes.iter().enumerate() {
            for right in nodes.iter().skip(left_at + 1) {
                if interferes(left, right, index) {
                    edges.insert((left.id, right.id));
                }
            }
        }
        FixGraph { nodes, edges }
    }

    pub(crate) fn nodes(&self) -> &[FixNode] {
        &self.nodes
    }

    pub(crate) fn node(&self, id: u32) -> Option<&FixNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    fn connected(&self, a: u32, b: u32) -> bool {
        self.edges.contains(&(a.min(b), a.max(b)))
    }

    /// Partition node ids into build batches.
    ///
    /// Without chain mode, mutually non-interfering nodes are greedily packed
    /// together so one build measures many seeds. With chain mode each batch
    /// is a whole connected component, so interacting fixes are evaluated
    /// jointly. Either way no batch exceeds `max_batch` nodes; oversized
    /// components are split into consecutive chunks and the split count is
    /// reported by `clamped_components`.
    pub(crate) fn batches(&self, chain: bool, max_batch: usize) -> Vec<Vec<u32>> {
        let max_batch = max_batch.max(1);
        if chain {
            self.component_batches(max_batch)
        } else {
            self.independent_batches(max_batch)
        }
    }

    /// Connected components split at `max_batch`, in node id order.
    pub(crate) fn clamped_components(&self, max_batch: usize) -> usize {
        self.components()
            .iter()
            .filter(|component| component.len() > max_batch.max(1))
            .count()
    }

    fn independent_batches(&self, max_batch: usize) -> Vec<Vec<u32>> {
        let mut batches: Vec<Vec<u32>> = Vec::new();
        for node in &self.nodes {
            let slot = batches.iter_mut().find(|batch| {
                batch.len() < max_batch
                    && batch.iter().all(|member| !self.connected(*member, node.id))
            });
            match slot {
                Some(batch) => batch.push(node.id),
                None => batches.push(vec![node.id]),
            }
        }
        batches
    }

    fn component_batches(&self, max_batch: usize) -> Vec<Vec<u32>> {
        let mut batches = Vec::new();
        for component in self.components() {
            for chunk in component.chunks(max_batch) {
                batches.push(chunk.to_vec());
            }
        }
        batches
    }

    fn components(&self) -> Vec<Vec<u32>> {
        let mut adjacency: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for (a, b) in &self.edges {
            adjacency.entry(*a).or_default().push(*b);
            adjacency.entry(*b).or_default().push(*a);
        }
        let mut components = Vec::new();
        let mut visited: BTreeSet<u32> = BTreeSet::new();
        for node in &self.nodes {
            if visited.contains(&node.id) {
                continue;
            }
            let mut component = Vec::new();
            let mut queue = VecDeque::from([node.id]);
            visited.insert(node.id);
            while let Some(current) = queue.pop_front() {
                component.push(current);
                if let Some(neighbors) = adjacency.get(&current) {
                    for neighbor in neighbors {
                        if visited.insert(*neighbor) {
                            queue.push_back(*neighbor);
                        }
                    }
                }
            }
            component.sort();
            components.push(component);
        }
        components
    }
}

fn interferes(left: &FixNode, right: &FixNode, index: &MethodIndex) -> bool {
    if left.regions.intersection(&right.regions).next().is_some() {
        return true;
    }
    inheritance_related(&left.fix, &right.fix, index)
}

/// Two method-level fixes interact when one's method overrides the other's.
fn inheritance_related(left: &Fix, right: &Fix, index: &MethodIndex) -> bool {
    if left.kind == FixKind::Field || right.kind == FixKind::Field {
        return false;
    }
    index
        .ancestors(&left.method, &left.class)
        .iter()
        .chain(index.descendants(&left.method, &left.class).iter())
        .any(|record| record.signature == right.method && record.class == right.class)
}
