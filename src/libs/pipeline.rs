//! Loading, graph construction and contraction in one place, so that the
//! subcommands only deal with arguments and output files.

use crate::libs::contract::{contract_with, ContractionStats, Order};
use crate::libs::genome::GenomeSet;
use crate::libs::graph::GraphBuilder;
use crate::libs::io::{detect_format, Format};
use crate::libs::partition::{Partition, PartitionTree};
use crate::libs::repeat::{split_repeats, RepeatSet};
use crate::libs::{gfa, gff};

/// Switches shared by every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Anchor path ends to the telomere sentinel
    pub telomeres: bool,
    /// Drop head-tail edges of a gene before contracting
    pub scrub_loops: bool,
    /// Let repeats merge like unique genes
    pub dirty: bool,
    /// Group `genome#hap#contig` paths by genome
    pub group_by: bool,
    pub order: Order,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            telomeres: true,
            scrub_loops: false,
            dirty: false,
            group_by: true,
            order: Order::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressOptions {
    pub build: BuildOptions,
    /// Genes with at least this many copies in a genome are filtered; 0 is off
    pub remove_dup: usize,
    /// Singleton blocks shorter than this are filtered after the first pass
    pub min_size: Option<usize>,
}

/// Result of a run.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub partition: Partition,
    /// Repeats that were protected during contraction
    pub repeats: RepeatSet,
    /// `false` for genes filtered out of the graph
    pub keep: Vec<bool>,
    pub stats: ContractionStats,
}

impl Outcome {
    pub fn num_filtered(&self) -> usize {
        self.keep.iter().filter(|&&k| !k).count()
    }
}

/// Reads `input` as GFA or GFF. `format` overrides the extension.
pub fn load(input: &str, format: Option<&str>, group_by: bool) -> anyhow::Result<GenomeSet> {
    let format = detect_format(input, format)?;
    let reader = crate::reader(input)?;
    let set = match format {
        Format::Gfa => gfa::read_gfa(reader, group_by)?,
        Format::Gff => gff::read_gff(reader, group_by)?,
    };
    log::debug!(
        "{}: {} genomes, {} paths, {} genes, {} links",
        input,
        set.genomes.len(),
        set.num_paths(),
        set.num_genes(),
        set.links.len()
    );
    Ok(set)
}

/// Contracts `set` and returns its synteny blocks.
pub fn run(set: &GenomeSet, opts: &CompressOptions) -> anyhow::Result<Outcome> {
    if opts.remove_dup == 1 {
        anyhow::bail!("--remove-dup must be 0 (off) or at least 2");
    }
    let build = &opts.build;
    let num_genes = set.num_genes();

    let (protected, filtered) = split_repeats(set, opts.remove_dup);
    let repeats = if build.dirty {
        RepeatSet::empty()
    } else {
        protected
    };
    let mut keep = vec![true; num_genes];
    for &g in &filtered {
        keep[g] = false;
    }

    let mut graph = GraphBuilder::new(num_genes, build.telomeres)
        .with_mask(&keep)
        .add_genomes(set)
        .finish();
    if build.scrub_loops {
        let removed = graph.scrub_self_loops();
        log::debug!("scrubbed {} self loops", removed);
    }

    let mut tree = PartitionTree::new(num_genes, build.telomeres);
    let (_, mut stats) = contract_with(graph, &repeats, &mut tree, build.order)?;
    let mut partition = tree.components_masked(Some(keep.as_slice()));

    if let Some(min_size) = opts.min_size.filter(|&m| m > 0) {
        if set.has_coords() {
            let dropped = filter_short_singletons(set, &partition, &mut keep, min_size);
            log::debug!("min size {}: {} singleton genes filtered", min_size, dropped);

            let core: Vec<bool> = (0..num_genes)
                .map(|g| keep[g] && partition.is_representative(g))
                .collect();
            let graph = GraphBuilder::new(num_genes, build.telomeres)
                .with_mask(&core)
                .add_genomes(set)
                .finish();
            let (_, more) = contract_with(graph, &repeats, &mut tree, build.order)?;
            stats += more;
            partition = tree.components_masked(Some(keep.as_slice()));
        } else {
            log::warn!("--min-size needs interval coordinates (GFF input); skipped");
        }
    }

    Ok(Outcome {
        partition,
        repeats,
        keep,
        stats,
    })
}

/// Number of synteny blocks of `set` under `opts`.
pub fn count_blocks(set: &GenomeSet, opts: &BuildOptions) -> anyhow::Result<usize> {
    let outcome = run(
        set,
        &CompressOptions {
            build: *opts,
            ..Default::default()
        },
    )?;
    Ok(outcome.partition.block_count())
}

/// Marks genes that are alone in their block and shorter than `min_size` in
/// some occurrence. Returns how many were newly filtered.
fn filter_short_singletons(
    set: &GenomeSet,
    partition: &Partition,
    keep: &mut [bool],
    min_size: usize,
) -> usize {
    let mut dropped = 0;
    for (_, path) in set.paths() {
        for (i, sg) in path.genes.iter().enumerate() {
            let Some(block) = partition.block_of(sg.gene) else {
                continue;
            };
            if partition.block_size(block) != 1 || !keep[sg.gene] {
                continue;
            }
            if path.len_of(i).map_or(false, |len| len < min_size) {
                keep[sg.gene] = false;
                dropped += 1;
            }
        }
    }
    dropped
}

/// Run statistics at `info` level.
pub fn log_summary(set: &GenomeSet, outcome: &Outcome) {
    let num_genes = set.num_genes();
    let blocks = outcome.partition.block_count();
    log::info!("num genomes:\t{}", set.genomes.len());
    log::info!("num paths:\t{}", set.num_paths());
    log::info!("num genes:\t{}", num_genes);
    log::info!("num repeats:\t{}", outcome.repeats.len());
    log::info!("num filtered:\t{}", outcome.num_filtered());
    log::info!("num partitions:\t{}", blocks);
    if num_genes > 0 {
        log::info!("ratio:\t\t{:.2}", blocks as f64 / num_genes as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::genome::{Orientation, Path, SignedGene};

    fn tokens(orders: &[&str]) -> GenomeSet {
        let orders: Vec<Vec<&str>> = orders
            .iter()
            .map(|o| o.split_whitespace().collect())
            .collect();
        GenomeSet::from_tokens(&orders)
    }

    #[test]
    fn test_count_shared_chain() {
        let set = tokens(&["1+ 2+ 3+", "1+ 2+ 3+"]);
        assert_eq!(count_blocks(&set, &BuildOptions::default()).unwrap(), 1);

        let opts = BuildOptions {
            telomeres: false,
            ..Default::default()
        };
        assert_eq!(count_blocks(&set, &opts).unwrap(), 1);
    }

    #[test]
    fn test_disjoint_genomes() {
        let set = tokens(&["1+ 2+", "3+ 4- 5+", "6-"]);
        assert_eq!(count_blocks(&set, &BuildOptions::default()).unwrap(), 3);
    }

    #[test]
    fn test_empty_input() {
        let set = GenomeSet::new();
        assert_eq!(count_blocks(&set, &BuildOptions::default()).unwrap(), 0);

        let set = tokens(&["", ""]);
        assert_eq!(count_blocks(&set, &BuildOptions::default()).unwrap(), 0);
    }

    #[test]
    fn test_remove_dup_one_rejected() {
        let set = tokens(&["1+ 2+"]);
        let opts = CompressOptions {
            remove_dup: 1,
            ..Default::default()
        };
        assert!(run(&set, &opts).is_err());
    }

    #[test]
    fn test_repeats_protected_then_filtered() {
        // 2 occurs twice in g1
        let set = tokens(&["1+ 2+ 3+ 2+ 4+", "1+ 3+ 4+"]);

        let outcome = run(&set, &CompressOptions::default()).unwrap();
        assert_eq!(outcome.repeats.len(), 1);
        assert_eq!(outcome.num_filtered(), 0);
        let g2 = set.genes.get("2").unwrap();
        assert_eq!(outcome.partition.block_size(outcome.partition.block_of(g2).unwrap()), 1);

        let outcome = run(
            &set,
            &CompressOptions {
                remove_dup: 2,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(outcome.num_filtered(), 1);
        assert!(outcome.repeats.is_empty());
        assert_eq!(outcome.partition.block_of(g2), None);
        // 1 3 4 in both genomes once 2 is gone
        assert_eq!(outcome.partition.block_count(), 1);
    }

    fn with_coords(set: &mut GenomeSet, lens: &[usize]) {
        for genome in set.genomes.values_mut() {
            for path in genome.paths.iter_mut() {
                let mut pos = 1;
                for sg in &path.genes {
                    path.starts.push(pos);
                    path.ends.push(pos + lens[sg.gene] - 1);
                    pos += lens[sg.gene];
                }
            }
        }
    }

    #[test]
    fn test_min_size_refinement() {
        // 2 and 5 swap places between the genomes, which breaks the chain
        let mut set = tokens(&["1+ 2+ 3+ 4+ 5+ 6+", "1+ 5+ 3+ 4+ 2+ 6+"]);
        let lens = vec![100, 10, 100, 100, 10, 100];
        with_coords(&mut set, &lens);

        let first = run(&set, &CompressOptions::default()).unwrap();
        assert_eq!(first.partition.block_count(), 5);

        let opts = CompressOptions {
            min_size: Some(50),
            ..Default::default()
        };
        let refined = run(&set, &opts).unwrap();
        assert_eq!(refined.num_filtered(), 2);
        assert_eq!(refined.partition.block_count(), 1);
        assert_eq!(refined.partition.components, vec![vec![0, 2, 3, 5]]);
    }

    #[test]
    fn test_min_size_needs_coords() {
        let set = tokens(&["1+ 2+ 3+", "1+ 3+ 2+"]);
        let opts = CompressOptions {
            min_size: Some(1000),
            ..Default::default()
        };
        let outcome = run(&set, &opts).unwrap();
        assert_eq!(outcome.num_filtered(), 0);
    }

    #[test]
    fn test_scrub_loops_option() {
        let mut set = GenomeSet::new();
        let a = set.genes.id_for("a");
        set.add_path(
            "g1",
            Path::new(
                "g1",
                vec![SignedGene::forward(a), SignedGene::new(a, Orientation::Forward)],
            ),
        );
        let opts = BuildOptions {
            scrub_loops: true,
            dirty: true,
            ..Default::default()
        };
        assert_eq!(count_blocks(&set, &opts).unwrap(), 1);
    }
}
