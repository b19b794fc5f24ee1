use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::{Dfs, VisitMap};

/// Merge decisions over gene indices. Node `i` is gene `i`; when telomere
/// anchoring is on, one more node stands for the sentinel and stays isolated.
#[derive(Debug, Clone)]
pub struct PartitionTree {
    graph: UnGraph<(), ()>,
    num_genes: usize,
    anchored: bool,
}

impl PartitionTree {
    pub fn new(num_genes: usize, anchored: bool) -> Self {
        let num_nodes = num_genes + anchored as usize;
        let mut graph = UnGraph::with_capacity(num_nodes, num_genes);
        for _ in 0..num_nodes {
            graph.add_node(());
        }
        Self {
            graph,
            num_genes,
            anchored,
        }
    }

    pub fn num_genes(&self) -> usize {
        self.num_genes
    }

    /// Records that genes `a` and `b` belong to one block. Repeated calls and
    /// `a == b` are no-ops.
    pub fn merge(&mut self, a: usize, b: usize) {
        if a != b {
            self.graph
                .update_edge(NodeIndex::new(a), NodeIndex::new(b), ());
        }
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.graph
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .is_some()
    }

    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// Connected components over all genes.
    pub fn components(&self) -> Partition {
        self.components_masked(None)
    }

    /// Connected components over genes with `keep[g] == true`. Masked genes
    /// get no block.
    pub fn components_masked(&self, keep: Option<&[bool]>) -> Partition {
        let kept = |g: usize| keep.map_or(true, |k| k.get(g).copied().unwrap_or(true));

        let mut components: Vec<Vec<usize>> = Vec::new();
        let mut gene_to_block = vec![None; self.num_genes];
        let mut num_components = 0usize;

        let mut dfs = Dfs::empty(&self.graph);
        for start in self.graph.node_indices() {
            if dfs.discovered.is_visited(&start) {
                continue;
            }
            let is_sentinel = start.index() >= self.num_genes;
            if !is_sentinel && !kept(start.index()) {
                continue;
            }

            num_components += 1;
            dfs.move_to(start);
            let mut members = Vec::new();
            while let Some(nx) = dfs.next(&self.graph) {
                let g = nx.index();
                if g < self.num_genes && kept(g) {
                    members.push(g);
                }
            }
            if is_sentinel {
                continue;
            }

            members.sort_unstable();
            let block = components.len();
            for &g in &members {
                gene_to_block[g] = Some(block);
            }
            components.push(members);
        }

        Partition {
            components,
            gene_to_block,
            num_components,
            anchored: self.anchored,
        }
    }
}

/// Genes grouped into synteny blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Gene members of each block, sorted; blocks ordered by smallest member.
    pub components: Vec<Vec<usize>>,
    gene_to_block: Vec<Option<usize>>,
    num_components: usize,
    anchored: bool,
}

impl Partition {
    pub fn block_of(&self, gene: usize) -> Option<usize> {
        self.gene_to_block.get(gene).copied().flatten()
    }

    /// Components found by the traversal, the sentinel's own included.
    pub fn num_components(&self) -> usize {
        self.num_components
    }

    /// Number of synteny blocks: components minus the sentinel's degenerate
    /// one when the tree carried a sentinel.
    ///
    /// ```
    /// use mice::libs::partition::PartitionTree;
    /// let mut tree = PartitionTree::new(3, true);
    /// tree.merge(0, 1);
    /// let partition = tree.components();
    /// assert_eq!(partition.num_components(), 3);
    /// assert_eq!(partition.block_count(), 2);
    ///
    /// let tree = PartitionTree::new(3, false);
    /// assert_eq!(tree.components().block_count(), 3);
    /// ```
    pub fn block_count(&self) -> usize {
        self.num_components - self.anchored as usize
    }

    /// First (smallest) gene of a block.
    pub fn representative(&self, block: usize) -> usize {
        self.components[block][0]
    }

    pub fn is_representative(&self, gene: usize) -> bool {
        self.block_of(gene)
            .map_or(false, |b| self.representative(b) == gene)
    }

    pub fn block_size(&self, block: usize) -> usize {
        self.components[block].len()
    }

    /// Blocks as sets of gene indices, for order-insensitive comparison.
    pub fn as_sets(&self) -> std::collections::BTreeSet<Vec<usize>> {
        self.components.iter().cloned().collect()
    }
}
