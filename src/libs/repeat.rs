use crate::libs::genome::GenomeSet;
use fxhash::{FxHashMap, FxHashSet};

/// Genes occurring more than once within a single genome. Contraction never
/// merges through them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepeatSet {
    genes: FxHashSet<usize>,
}

impl RepeatSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// One pass over every genome, remembering genes already seen in it.
    pub fn detect(set: &GenomeSet) -> Self {
        let mut genes = FxHashSet::default();
        for genome in set.genomes.values() {
            let mut seen: FxHashSet<usize> = FxHashSet::default();
            for path in &genome.paths {
                for sg in &path.genes {
                    if !seen.insert(sg.gene) {
                        genes.insert(sg.gene);
                    }
                }
            }
        }
        Self { genes }
    }

    pub fn contains(&self, gene: usize) -> bool {
        self.genes.contains(&gene)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Sorted gene indices.
    pub fn to_sorted_vec(&self) -> Vec<usize> {
        let mut v: Vec<usize> = self.genes.iter().copied().collect();
        v.sort_unstable();
        v
    }
}

/// Splits repeats by their largest per-genome copy number.
///
/// Genes with at least `threshold` copies in some genome are returned in the
/// second set and are meant to be dropped from the graph; the remaining
/// repeats stay protected. A `threshold` of 0 disables removal.
pub fn split_repeats(set: &GenomeSet, threshold: usize) -> (RepeatSet, FxHashSet<usize>) {
    if threshold == 0 {
        return (RepeatSet::detect(set), FxHashSet::default());
    }

    let mut protected = FxHashSet::default();
    let mut filtered = FxHashSet::default();
    for genome in set.genomes.values() {
        let mut counts: FxHashMap<usize, usize> = FxHashMap::default();
        for path in &genome.paths {
            for sg in &path.genes {
                *counts.entry(sg.gene).or_insert(0) += 1;
            }
        }
        for (&gene, &count) in &counts {
            if count >= threshold && count > 1 {
                filtered.insert(gene);
            } else if count > 1 {
                protected.insert(gene);
            }
        }
    }
    protected.retain(|g| !filtered.contains(g));

    (RepeatSet { genes: protected }, filtered)
}
