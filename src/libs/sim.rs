//! Random genome sets for benchmarking and confluence checks.

use crate::libs::genome::split_signed;
use crate::libs::gfa::GfaWriter;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimParams {
    /// Genes per genome
    pub len: usize,
    /// Number of genomes
    pub count: usize,
    /// Gene ids are drawn from `0..len * mad`
    pub mad: usize,
    /// Draw with replacement
    pub dup: bool,
    /// Replicate number, only recorded in the header
    pub rep: usize,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            len: 10,
            count: 3,
            mad: 2,
            dup: false,
            rep: 1,
        }
    }
}

/// Signed gene orders such as `["4+", "0-", ...]`, one per genome.
pub fn generate(params: &SimParams, rng: &mut StdRng) -> anyhow::Result<Vec<Vec<String>>> {
    if params.mad == 0 {
        anyhow::bail!("The id multiplier must be at least 1");
    }
    let pool: Vec<String> = (0..params.len * params.mad).map(|i| i.to_string()).collect();

    let mut genomes = Vec::with_capacity(params.count);
    for _ in 0..params.count {
        let genes: Vec<&String> = if params.dup {
            (0..params.len).filter_map(|_| pool.choose(rng)).collect()
        } else {
            let mut sample: Vec<&String> = pool.choose_multiple(rng, params.len).collect();
            sample.shuffle(rng);
            sample
        };
        let signed = genes
            .into_iter()
            .map(|g| format!("{}{}", g, if rng.gen_bool(0.5) { '+' } else { '-' }))
            .collect();
        genomes.push(signed);
    }
    Ok(genomes)
}

/// Writes `genomes` as GFA: header tags, sorted segments, sorted distinct
/// links between consecutive genes, one path `g<i>` per genome.
pub fn write_sim_gfa<W: Write>(
    writer: W,
    genomes: &[Vec<String>],
    params: &SimParams,
) -> io::Result<()> {
    let mut gfa = GfaWriter::new(writer);
    gfa.write_header(&[
        "VN:Z:1.0".to_string(),
        format!("m:i:{}", params.len),
        format!("n:i:{}", params.count),
        format!("mad_id:i:{}", params.mad),
        format!("dup:Z:{}", if params.dup { "T" } else { "F" }),
        format!("rep:i:{}", params.rep),
    ])?;

    let mut segments: BTreeSet<&str> = BTreeSet::new();
    let mut links = BTreeSet::new();
    for genome in genomes {
        let parsed: Vec<_> = genome.iter().filter_map(|t| split_signed(t)).collect();
        segments.extend(parsed.iter().map(|(name, _)| *name));
        for (a, b) in parsed.iter().tuple_windows() {
            links.insert((a.0, a.1, b.0, b.1));
        }
    }

    for seg in &segments {
        gfa.write_segment(seg, "A")?;
    }
    for &(a, oa, b, ob) in &links {
        gfa.write_link(a, oa, b, ob, "0M")?;
    }
    for (i, genome) in genomes.iter().enumerate() {
        gfa.write_path(&format!("g{}", i + 1), genome, "0M")?;
    }
    gfa.flush()
}
