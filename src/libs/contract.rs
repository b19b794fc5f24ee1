//! Degree-one chain contraction.
//!
//! Unifying `u` into `v`:
//!
//! ```text
//! before:
//!   v --- u == u2 --- w1
//!                 \-- w2
//! after:
//!   v --- w1
//!     \-- w2
//! ```
//!
//! `u` has exactly one neighbour `v`; the gene owning `u` is spliced out and
//! its far side is reattached to `v`. The worklist tolerates stale entries:
//! every dequeued extremity is re-checked against the live graph.

use crate::libs::error::GraphError;
use crate::libs::graph::{AdjacencyGraph, Node};
use crate::libs::partition::PartitionTree;
use crate::libs::repeat::RepeatSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Order in which pending extremities are taken from the worklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Order {
    #[default]
    Lifo,
    Fifo,
    /// Uniformly random pick, seeded
    Random(u64),
}

impl std::str::FromStr for Order {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lifo" => Ok(Order::Lifo),
            "fifo" => Ok(Order::Fifo),
            "random" => Ok(Order::Random(0)),
            other => Err(anyhow::anyhow!("Unknown worklist order: {}", other)),
        }
    }
}

struct Worklist {
    items: VecDeque<Node>,
    order: Order,
    rng: Option<StdRng>,
}

impl Worklist {
    fn new(order: Order) -> Self {
        let rng = match order {
            Order::Random(seed) => Some(StdRng::seed_from_u64(seed)),
            _ => None,
        };
        Self {
            items: VecDeque::new(),
            order,
            rng,
        }
    }

    fn push(&mut self, node: Node) {
        self.items.push_back(node);
    }

    fn pop(&mut self) -> Option<Node> {
        match self.order {
            Order::Lifo => self.items.pop_back(),
            Order::Fifo => self.items.pop_front(),
            Order::Random(_) => {
                if self.items.is_empty() {
                    return None;
                }
                let rng = self.rng.as_mut()?;
                let i = rng.gen_range(0..self.items.len());
                self.items.swap_remove_back(i)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractionStats {
    /// Extremities queued before the loop started
    pub seeded: usize,
    /// Total pushes, seeds included
    pub enqueued: usize,
    /// Genes spliced out
    pub merged: usize,
    /// Dequeued entries that were no longer mergeable
    pub stale: usize,
}

impl std::ops::AddAssign for ContractionStats {
    fn add_assign(&mut self, rhs: Self) {
        self.seeded += rhs.seeded;
        self.enqueued += rhs.enqueued;
        self.merged += rhs.merged;
        self.stale += rhs.stale;
    }
}

/// Owns the working copy of the adjacency structure for one run.
pub struct Contractor<'a> {
    graph: AdjacencyGraph,
    repeats: &'a RepeatSet,
    worklist: Worklist,
    stats: ContractionStats,
}

impl<'a> Contractor<'a> {
    /// Takes the working copy. Fails when the graph breaks the invariants the
    /// contraction depends on.
    pub fn new(graph: AdjacencyGraph, repeats: &'a RepeatSet, order: Order) -> Result<Self, GraphError> {
        graph.validate()?;
        Ok(Self {
            graph,
            repeats,
            worklist: Worklist::new(order),
            stats: ContractionStats::default(),
        })
    }

    pub fn is_telomere(node: Node) -> bool {
        node.is_telomere()
    }

    pub fn is_protected_gene(&self, gene: usize) -> bool {
        self.repeats.contains(gene)
    }

    /// The neighbour `u` would merge into, if `u` can be contracted now.
    fn mergeable(&self, u: Node) -> Option<Node> {
        if Self::is_telomere(u) || self.graph.degree(u) != 1 {
            return None;
        }
        let v = *self.graph.neighbors(u).first()?;
        if Self::is_telomere(v) {
            return None;
        }
        let (gu, gv) = (u.gene()?, v.gene()?);
        if self.is_protected_gene(gu) || self.is_protected_gene(gv) {
            return None;
        }
        // a gene folded onto itself
        if gu == gv {
            return None;
        }
        Some(v)
    }

    fn enqueue(&mut self, node: Node) {
        if self.mergeable(node).is_some() {
            self.worklist.push(node);
            self.stats.enqueued += 1;
        }
    }

    /// Runs to the fixed point, recording merges in `tree`.
    pub fn run(mut self, tree: &mut PartitionTree) -> (AdjacencyGraph, ContractionStats) {
        let seeds: Vec<Node> = self.graph.nodes().collect();
        for node in seeds {
            self.enqueue(node);
        }
        self.stats.seeded = self.stats.enqueued;

        while let Some(u) = self.worklist.pop() {
            let v = match self.mergeable(u) {
                Some(v) => v,
                None => {
                    self.stats.stale += 1;
                    continue;
                }
            };
            self.splice(u, v, tree);
        }

        log::debug!(
            "contraction: {} seeded, {} enqueued, {} merged, {} stale",
            self.stats.seeded,
            self.stats.enqueued,
            self.stats.merged,
            self.stats.stale
        );
        (self.graph, self.stats)
    }

    fn splice(&mut self, u: Node, v: Node, tree: &mut PartitionTree) {
        let (gu, u2) = match (u.gene(), u.paired()) {
            (Some(g), Some(p)) => (g, p),
            _ => return,
        };
        if let Some(gv) = v.gene() {
            tree.merge(gu, gv);
        }
        self.stats.merged += 1;

        self.graph.remove_edge(v, u);

        let far = self.graph.take_neighbors(u2);
        for w in far {
            if w == u {
                // head joined to its own tail; retired with the gene
                continue;
            }
            if w == u2 {
                self.graph.add_edge(v, v);
                continue;
            }
            self.graph.remove_edge(w, u2);
            self.graph.add_edge(w, v);
            self.enqueue(w);
        }

        self.enqueue(v);

        self.graph.take_neighbors(u);
        self.graph.take_neighbors(u2);
    }
}

/// Contracts `graph` to its fixed point with the default worklist order.
pub fn contract(
    graph: AdjacencyGraph,
    repeats: &RepeatSet,
    tree: &mut PartitionTree,
) -> Result<(AdjacencyGraph, ContractionStats), GraphError> {
    contract_with(graph, repeats, tree, Order::default())
}

pub fn contract_with(
    graph: AdjacencyGraph,
    repeats: &RepeatSet,
    tree: &mut PartitionTree,
    order: Order,
) -> Result<(AdjacencyGraph, ContractionStats), GraphError> {
    Ok(Contractor::new(graph, repeats, order)?.run(tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::genome::GenomeSet;
    use crate::libs::partition::Partition;

    fn blocks(orders: &[Vec<&str>], anchored: bool, order: Order) -> (Partition, AdjacencyGraph) {
        let set = GenomeSet::from_tokens(orders);
        let repeats = RepeatSet::detect(&set);
        let graph = AdjacencyGraph::from_genomes(&set, anchored);
        let mut tree = PartitionTree::new(set.num_genes(), anchored);
        let (graph, _) = contract_with(graph, &repeats, &mut tree, order).unwrap();
        (tree.components(), graph)
    }

    #[test]
    fn test_linear_chromosome() {
        for order in [Order::Lifo, Order::Fifo, Order::Random(7)] {
            let (p, graph) = blocks(&[vec!["1+", "2+", "3+"]], true, order);
            assert_eq!(p.block_count(), 1);
            assert!(graph.validate().is_ok());
        }
    }

    #[test]
    fn test_unanchored_chromosome() {
        let (p, _) = blocks(&[vec!["1+", "2-", "3+", "4-"]], false, Order::Lifo);
        assert_eq!(p.block_count(), 1);
        assert_eq!(p.components, vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn test_single_gene() {
        let (p, _) = blocks(&[vec!["1+"]], true, Order::Lifo);
        assert_eq!(p.block_count(), 1);
    }

    #[test]
    fn test_transposition_breaks_every_adjacency() {
        let (p, _) = blocks(
            &[vec!["1+", "2+", "3+", "4+"], vec!["1+", "3+", "2+", "4+"]],
            true,
            Order::Lifo,
        );
        assert_eq!(p.components, vec![vec![0], vec![1], vec![2], vec![3]]);
        assert_eq!(p.block_count(), 4);
    }

    #[test]
    fn test_end_variants_are_absorbed() {
        // 3 and 4 are only ever entered from 2
        let (p, _) = blocks(
            &[vec!["1+", "2+", "3+"], vec!["1+", "2+", "4+"]],
            true,
            Order::Fifo,
        );
        assert_eq!(p.components, vec![vec![0, 1, 2, 3]]);
        assert_eq!(p.block_count(), 1);
    }

    #[test]
    fn test_inversion_keeps_chain() {
        // the second genome carries 2 3 inverted
        let (p, _) = blocks(
            &[vec!["1+", "2+", "3+", "4+"], vec!["1+", "3-", "2-", "4+"]],
            true,
            Order::Fifo,
        );
        assert_eq!(p.block_count(), 3);
        assert_eq!(p.block_of(1), p.block_of(2));
        assert_ne!(p.block_of(0), p.block_of(1));
    }

    #[test]
    fn test_repeat_is_never_merged() {
        let (p, _) = blocks(&[vec!["1+", "2+", "3+", "2+", "4+"]], true, Order::Lifo);
        let g2 = 1;
        assert_eq!(p.components[p.block_of(g2).unwrap()], vec![g2]);
    }

    #[test]
    fn test_dirty_merges_repeats() {
        let set = GenomeSet::from_tokens(&[vec!["1+", "2+", "1+", "2+"]]);
        let graph = AdjacencyGraph::from_genomes(&set, true);
        let mut tree = PartitionTree::new(set.num_genes(), true);
        contract(graph, &RepeatSet::empty(), &mut tree).unwrap();
        assert!(tree.has_edge(0, 1));
    }

    #[test]
    fn test_telomere_never_crossed() {
        // two chromosomes meeting only at the sentinel
        let set = GenomeSet::from_tokens(&[vec!["1+"], vec!["2+"]]);
        let graph = AdjacencyGraph::from_genomes(&set, true);
        let mut tree = PartitionTree::new(set.num_genes(), true);
        let (_, stats) = contract(graph, &RepeatSet::empty(), &mut tree).unwrap();
        assert_eq!(tree.num_edges(), 0);
        assert_eq!(stats.enqueued, 0);
        assert_eq!(tree.components().block_count(), 2);
    }

    #[test]
    fn test_circular_genes() {
        // 1 and 2 close a cycle without telomeres
        let (p, graph) = blocks(&[vec!["1+", "2+"], vec!["2-", "1+"]], false, Order::Lifo);
        assert_eq!(p.block_count(), 1);
        assert!(graph.validate().is_ok());

        // a circular chromosome of two genes
        let set = GenomeSet::from_tokens(&[vec!["1+", "2+"]]);
        let mut graph = AdjacencyGraph::from_genomes(&set, false);
        graph.add_edge(Node::tail(0), Node::head(1));
        let mut tree = PartitionTree::new(2, false);
        let (graph, _) = contract(graph, &RepeatSet::empty(), &mut tree).unwrap();
        assert!(tree.has_edge(0, 1));
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_self_loop_on_far_side() {
        // 1+ 2+ 2- : head(2) joined to itself after 2; dirty mode
        let set = GenomeSet::from_tokens(&[vec!["1+", "2+", "2-"]]);
        let graph = AdjacencyGraph::from_genomes(&set, false);
        let mut tree = PartitionTree::new(set.num_genes(), false);
        let (graph, _) = contract(graph, &RepeatSet::empty(), &mut tree).unwrap();
        assert!(graph.validate().is_ok());
        assert_eq!(tree.components().block_count(), 1);
    }

    #[test]
    fn test_rejects_broken_graph() {
        let set = GenomeSet::from_tokens(&[vec!["1+", "2+"]]);
        let mut graph = AdjacencyGraph::from_genomes(&set, true);
        graph.take_neighbors(Node::head(0));
        let mut tree = PartitionTree::new(2, true);
        assert!(contract(graph, &RepeatSet::empty(), &mut tree).is_err());
    }

    #[test]
    fn test_idempotent() {
        let set = GenomeSet::from_tokens(&[
            vec!["1+", "2+", "3+", "4+", "5+"],
            vec!["1+", "2+", "6-", "4+", "5+"],
            vec!["7+", "3+", "7+"],
        ]);
        let repeats = RepeatSet::detect(&set);
        let graph = AdjacencyGraph::from_genomes(&set, true);
        let mut tree = PartitionTree::new(set.num_genes(), true);
        let (contracted, first) = contract(graph, &repeats, &mut tree).unwrap();
        assert!(first.merged > 0);
        let before = tree.components();

        let (again, second) = contract(contracted.clone(), &repeats, &mut tree).unwrap();
        assert_eq!(second.enqueued, 0);
        assert_eq!(second.merged, 0);
        assert_eq!(tree.components(), before);
        assert_eq!(again.edges(), contracted.edges());
    }

    #[test]
    fn test_stale_entries_are_skipped() {
        // both ends of a two-gene chain are queued; one of them goes stale
        let set = GenomeSet::from_tokens(&[vec!["1+", "2+"]]);
        let graph = AdjacencyGraph::from_genomes(&set, false);
        let mut tree = PartitionTree::new(2, false);
        let (graph, stats) = contract(graph, &RepeatSet::empty(), &mut tree).unwrap();
        assert_eq!(stats.seeded, 2);
        assert_eq!(stats.merged, 1);
        assert_eq!(stats.stale, 1);
        assert_eq!(graph.num_edges(), 0);
    }

    #[test]
    fn test_order_independent_on_random_genomes() {
        use crate::libs::sim::{generate, SimParams};

        for seed in 0..20u64 {
            let params = SimParams {
                len: 40,
                count: 4,
                mad: 1 + (seed as usize % 2),
                dup: false,
                rep: 1,
            };
            let generated = generate(&params, &mut StdRng::seed_from_u64(seed)).unwrap();
            let orders: Vec<Vec<&str>> = generated
                .iter()
                .map(|g| g.iter().map(String::as_str).collect())
                .collect();

            for anchored in [true, false] {
                let (reference, graph) = blocks(&orders, anchored, Order::Lifo);
                assert!(graph.validate().is_ok());
                for order in [Order::Fifo, Order::Random(seed), Order::Random(seed + 1000)] {
                    let (partition, graph) = blocks(&orders, anchored, order);
                    assert_eq!(partition.as_sets(), reference.as_sets(), "seed {}", seed);
                    assert!(graph.validate().is_ok());
                }
            }
        }
    }

    #[test]
    fn test_order_from_str() {
        assert_eq!("fifo".parse::<Order>().unwrap(), Order::Fifo);
        assert_eq!("lifo".parse::<Order>().unwrap(), Order::Lifo);
        assert!(matches!("random".parse::<Order>().unwrap(), Order::Random(_)));
        assert!("sorted".parse::<Order>().is_err());
    }
}
