//! Undirected adjacency structure over gene extremities.
//!
//! Every gene owns two slots, one per extremity, each holding the set of
//! nodes it is adjacent to. One extra slot holds the telomere sentinel.
//!
//! ```text
//!        1+           2-           3+
//!  T -- t==h -- h==t -- t==h -- T
//! ```
//!
//! A forward gene is entered through its tail and left through its head; a
//! reverse gene the other way round.

use crate::libs::error::GraphError;
use crate::libs::genome::{GenomeSet, SignedGene};
use indexmap::IndexSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum End {
    Tail,
    Head,
}

impl End {
    pub fn other(self) -> End {
        match self {
            End::Tail => End::Head,
            End::Head => End::Tail,
        }
    }

    fn slot(self) -> usize {
        match self {
            End::Tail => 0,
            End::Head => 1,
        }
    }
}

/// A vertex of the adjacency structure: a gene extremity or the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    Telomere,
    Ext(usize, End),
}

impl Node {
    pub fn head(gene: usize) -> Node {
        Node::Ext(gene, End::Head)
    }

    pub fn tail(gene: usize) -> Node {
        Node::Ext(gene, End::Tail)
    }

    pub fn gene(self) -> Option<usize> {
        match self {
            Node::Telomere => None,
            Node::Ext(g, _) => Some(g),
        }
    }

    /// The other extremity of the same gene. The sentinel has none.
    pub fn paired(self) -> Option<Node> {
        match self {
            Node::Telomere => None,
            Node::Ext(g, end) => Some(Node::Ext(g, end.other())),
        }
    }

    pub fn is_telomere(self) -> bool {
        self == Node::Telomere
    }

    /// The extremity through which a walk leaves `sg`.
    pub fn outward(sg: SignedGene) -> Node {
        if sg.orient.is_forward() {
            Node::head(sg.gene)
        } else {
            Node::tail(sg.gene)
        }
    }

    /// The extremity through which a walk enters `sg`.
    pub fn inward(sg: SignedGene) -> Node {
        if sg.orient.is_forward() {
            Node::tail(sg.gene)
        } else {
            Node::head(sg.gene)
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Telomere => write!(f, "T"),
            Node::Ext(g, End::Head) => write!(f, "{}h", g),
            Node::Ext(g, End::Tail) => write!(f, "{}t", g),
        }
    }
}

pub type Neighbors = IndexSet<Node>;

#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    genes: Vec<[Neighbors; 2]>,
    telomere: Neighbors,
    anchored: bool,
}

impl AdjacencyGraph {
    pub fn new(num_genes: usize, anchored: bool) -> Self {
        Self {
            genes: (0..num_genes).map(|_| Default::default()).collect(),
            telomere: Neighbors::default(),
            anchored,
        }
    }

    /// Builds the graph of all paths and links in `set`.
    pub fn from_genomes(set: &GenomeSet, anchored: bool) -> Self {
        GraphBuilder::new(set.num_genes(), anchored)
            .add_genomes(set)
            .finish()
    }

    pub fn num_genes(&self) -> usize {
        self.genes.len()
    }

    fn ensure_gene(&mut self, gene: usize) {
        if gene >= self.genes.len() {
            self.genes.resize_with(gene + 1, Default::default);
        }
    }

    pub fn contains(&self, node: Node) -> bool {
        match node {
            Node::Telomere => true,
            Node::Ext(g, _) => g < self.genes.len(),
        }
    }

    /// Panics if `node` refers to a gene outside the arena.
    pub fn neighbors(&self, node: Node) -> &Neighbors {
        match node {
            Node::Telomere => &self.telomere,
            Node::Ext(g, end) => &self.genes[g][end.slot()],
        }
    }

    fn neighbors_mut(&mut self, node: Node) -> &mut Neighbors {
        match node {
            Node::Telomere => &mut self.telomere,
            Node::Ext(g, end) => &mut self.genes[g][end.slot()],
        }
    }

    pub fn degree(&self, node: Node) -> usize {
        self.neighbors(node).len()
    }

    /// Inserts the symmetric edge `a`-`b`. Returns false if it already existed.
    pub fn add_edge(&mut self, a: Node, b: Node) -> bool {
        for g in [a.gene(), b.gene()].into_iter().flatten() {
            self.ensure_gene(g);
        }
        if !self.neighbors_mut(a).insert(b) {
            return false;
        }
        self.neighbors_mut(b).insert(a);
        true
    }

    /// Removes the symmetric edge `a`-`b`. Returns false if it was absent.
    pub fn remove_edge(&mut self, a: Node, b: Node) -> bool {
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        if !self.neighbors_mut(a).swap_remove(&b) {
            return false;
        }
        self.neighbors_mut(b).swap_remove(&a);
        true
    }

    /// Empties the slot of `node` and hands back its old neighbours. Mirrors
    /// are left untouched; the caller owns restoring symmetry.
    pub fn take_neighbors(&mut self, node: Node) -> Neighbors {
        std::mem::take(self.neighbors_mut(node))
    }

    /// The sentinel first, then both extremities of every gene.
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        std::iter::once(Node::Telomere).chain(
            (0..self.genes.len()).flat_map(|g| [Node::tail(g), Node::head(g)]),
        )
    }

    /// Every undirected edge once, as `(lo, hi)`, sorted.
    pub fn edges(&self) -> Vec<(Node, Node)> {
        let mut edges = Vec::new();
        for node in self.nodes() {
            for &w in self.neighbors(node) {
                if node <= w {
                    edges.push((node, w));
                }
            }
        }
        edges.sort();
        edges
    }

    pub fn num_edges(&self) -> usize {
        self.edges().len()
    }

    /// Checks the structural invariants the contraction relies on.
    pub fn validate(&self) -> Result<(), GraphError> {
        let num_genes = self.genes.len();
        if !self.anchored && !self.telomere.is_empty() {
            return Err(GraphError::UnanchoredTelomere);
        }
        for node in self.nodes() {
            for &w in self.neighbors(node) {
                if let Some(gene) = w.gene() {
                    if gene >= num_genes {
                        return Err(GraphError::UnknownGene {
                            node,
                            gene,
                            num_genes,
                        });
                    }
                }
                if !self.neighbors(w).contains(&node) {
                    return Err(GraphError::Asymmetric { from: node, to: w });
                }
            }
        }
        Ok(())
    }

    /// Removes, gene by gene, an edge joining a gene's head to its own tail.
    /// Returns the number of edges removed.
    pub fn scrub_self_loops(&mut self) -> usize {
        let mut removed = 0;
        for gene in 0..self.genes.len() {
            if self.remove_edge(Node::head(gene), Node::tail(gene)) {
                removed += 1;
            }
        }
        removed
    }
}

fn is_kept(keep: Option<&[bool]>, gene: usize) -> bool {
    keep.map_or(true, |k| k.get(gene).copied().unwrap_or(true))
}

/// Accumulates genomes and links into an [`AdjacencyGraph`].
pub struct GraphBuilder<'a> {
    graph: AdjacencyGraph,
    keep: Option<&'a [bool]>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(num_genes: usize, anchored: bool) -> Self {
        Self {
            graph: AdjacencyGraph::new(num_genes, anchored),
            keep: None,
        }
    }

    /// Genes with `keep[g] == false` are skipped; their neighbours in a genome
    /// become adjacent directly.
    pub fn with_mask(mut self, keep: &'a [bool]) -> Self {
        self.keep = Some(keep);
        self
    }

    pub fn add_genome(&mut self, genes: &[SignedGene]) {
        let keep = self.keep;
        let anchored = self.graph.anchored;

        let mut last: Option<SignedGene> = None;
        for &sg in genes.iter().filter(|sg| is_kept(keep, sg.gene)) {
            match last {
                None if anchored => {
                    self.graph.add_edge(Node::Telomere, Node::inward(sg));
                }
                None => {}
                Some(prev) => {
                    self.graph.add_edge(Node::outward(prev), Node::inward(sg));
                }
            }
            last = Some(sg);
        }
        if let Some(prev) = last {
            if anchored {
                self.graph.add_edge(Node::outward(prev), Node::Telomere);
            }
        }
    }

    pub fn add_link(&mut self, a: SignedGene, b: SignedGene) {
        if is_kept(self.keep, a.gene) && is_kept(self.keep, b.gene) {
            self.graph.add_edge(Node::outward(a), Node::inward(b));
        }
    }

    pub fn add_genomes(mut self, set: &GenomeSet) -> Self {
        for (_, path) in set.paths() {
            self.add_genome(&path.genes);
        }
        for &(a, b) in &set.links {
            self.add_link(a, b);
        }
        self
    }

    pub fn finish(self) -> AdjacencyGraph {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(orders: &[Vec<&str>], anchored: bool) -> (GenomeSet, AdjacencyGraph) {
        let set = GenomeSet::from_tokens(orders);
        let graph = AdjacencyGraph::from_genomes(&set, anchored);
        (set, graph)
    }

    #[test]
    fn test_polarity() {
        // 1+ 2- : head(1) -- head(2)
        let (_, graph) = build(&[vec!["1+", "2-"]], false);
        assert_eq!(graph.edges(), vec![(Node::head(0), Node::head(1))]);

        // 1- 2+ : tail(1) -- tail(2)
        let (_, graph) = build(&[vec!["1-", "2+"]], false);
        assert_eq!(graph.edges(), vec![(Node::tail(0), Node::tail(1))]);
    }

    #[test]
    fn test_telomere_anchoring() {
        let (_, graph) = build(&[vec!["1+", "2+", "3-"]], true);
        let t = graph.neighbors(Node::Telomere);
        assert_eq!(t.len(), 2);
        assert!(t.contains(&Node::tail(0)));
        // last gene reversed: walk leaves through its tail
        assert!(t.contains(&Node::tail(2)));
        assert_eq!(graph.num_edges(), 4);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_single_gene_and_empty_genome() {
        let (_, graph) = build(&[vec!["1+"], vec![]], true);
        assert_eq!(
            graph.edges(),
            vec![(Node::Telomere, Node::tail(0)), (Node::Telomere, Node::head(0))]
        );

        let (_, graph) = build(&[vec![]], true);
        assert_eq!(graph.num_edges(), 0);
        assert_eq!(graph.num_genes(), 0);
    }

    #[test]
    fn test_no_parallel_edges() {
        let (_, graph) = build(&[vec!["1+", "2+"], vec!["1+", "2+"], vec!["2-", "1-"]], false);
        assert_eq!(graph.edges(), vec![(Node::head(0), Node::tail(1))]);
        assert_eq!(graph.degree(Node::head(0)), 1);
    }

    #[test]
    fn test_mask_bridges_over_gene() {
        let set = GenomeSet::from_tokens(&[vec!["1+", "2+", "3+"]]);
        let keep = vec![true, false, true];
        let graph = GraphBuilder::new(set.num_genes(), false)
            .with_mask(&keep)
            .add_genomes(&set)
            .finish();
        assert_eq!(graph.edges(), vec![(Node::head(0), Node::tail(2))]);
        assert_eq!(graph.degree(Node::head(1)), 0);
    }

    #[test]
    fn test_links() {
        let mut set = GenomeSet::new();
        let a = set.genes.parse_signed("a+").unwrap();
        let b = set.genes.parse_signed("b-").unwrap();
        set.links.push((a, b));
        let graph = AdjacencyGraph::from_genomes(&set, true);
        assert_eq!(graph.edges(), vec![(Node::head(0), Node::head(1))]);
    }

    #[test]
    fn test_scrub_self_loops() {
        // 1+ 1+ joins head(1) to tail(1); 2+ 2- joins head(2) to itself
        let (_, mut graph) = build(&[vec!["1+", "1+", "2+", "2-"]], false);
        assert!(graph.neighbors(Node::head(0)).contains(&Node::tail(0)));
        assert!(graph.neighbors(Node::head(1)).contains(&Node::head(1)));

        assert_eq!(graph.scrub_self_loops(), 1);
        assert!(!graph.neighbors(Node::head(0)).contains(&Node::tail(0)));
        assert!(!graph.neighbors(Node::tail(0)).contains(&Node::head(0)));
        // only the paired extremity is scrubbed
        assert!(graph.neighbors(Node::head(1)).contains(&Node::head(1)));
        assert!(graph.neighbors(Node::head(0)).contains(&Node::tail(1)));
        assert!(graph.validate().is_ok());

        assert_eq!(graph.scrub_self_loops(), 0);
    }

    #[test]
    fn test_validate_errors() {
        let mut graph = AdjacencyGraph::new(2, true);
        graph.add_edge(Node::head(0), Node::tail(1));
        assert!(graph.validate().is_ok());

        graph.genes[0][End::Tail.slot()].insert(Node::head(1));
        assert_eq!(
            graph.validate(),
            Err(GraphError::Asymmetric {
                from: Node::tail(0),
                to: Node::head(1)
            })
        );

        let mut graph = AdjacencyGraph::new(1, true);
        graph.telomere.insert(Node::head(5));
        assert!(matches!(
            graph.validate(),
            Err(GraphError::UnknownGene { gene: 5, .. })
        ));

        let mut graph = AdjacencyGraph::new(1, false);
        graph.add_edge(Node::Telomere, Node::head(0));
        assert_eq!(graph.validate(), Err(GraphError::UnanchoredTelomere));
    }

    #[test]
    fn test_remove_edge() {
        let (_, mut graph) = build(&[vec!["1+", "2+"]], false);
        assert!(graph.remove_edge(Node::tail(1), Node::head(0)));
        assert!(!graph.remove_edge(Node::tail(1), Node::head(0)));
        assert!(!graph.remove_edge(Node::head(9), Node::head(0)));
        assert_eq!(graph.num_edges(), 0);
    }
}
