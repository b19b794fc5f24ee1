//! GFF3 interval annotations as gene orders.
//!
//! Rows carry the gene in the `ID` attribute and, optionally, the genome in
//! `genome`:
//!
//! ```text
//! Genome1.Chr2	SibeliaZ	SO:0000856	524938	525114	.	+	.	ID=1;genome=Genome1
//! Genome1.Chr1	SibeliaZ	SO:0000856	521833	522009	.	+	.	ID=2;genome=Genome1
//! ```
//!
//! Rows of one sequence form one path, ordered by start coordinate.

use crate::libs::genome::{GenomeSet, Orientation, Path, SignedGene};
use crate::libs::partition::Partition;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GffRow {
    pub seqname: String,
    pub start: usize,
    pub end: usize,
    pub strand: Orientation,
    pub id: String,
    pub genome: Option<String>,
}

impl GffRow {
    /// Parses one feature line. `None` when a column is missing or unparsable
    /// or when the `ID` attribute is absent.
    pub fn parse(line: &str) -> Option<Self> {
        let mut f = line.trim_end_matches('\r').splitn(9, '\t');

        let seqname = f.next()?.to_string();
        let _source = f.next()?;
        let _feature = f.next()?;
        let start = f.next()?.parse::<usize>().ok()?;
        let end = f.next()?.parse::<usize>().ok()?;
        let _score = f.next()?;
        let strand = if f.next()? == "-" {
            Orientation::Reverse
        } else {
            Orientation::Forward
        };
        let _frame = f.next()?;
        let attributes = f.next()?;

        let mut id = None;
        let mut genome = None;
        for key_val in attributes.split(';') {
            if let Some((key, val)) = key_val.trim().split_once('=') {
                if key.eq_ignore_ascii_case("id") {
                    id = Some(val.trim().to_string());
                } else if key.eq_ignore_ascii_case("genome") {
                    genome = Some(val.trim().to_string());
                }
            }
        }

        let id = id.filter(|s| !s.is_empty())?;
        Some(Self {
            seqname,
            start,
            end,
            strand,
            id,
            genome,
        })
    }

    /// Renders the row as a synteny block feature.
    pub fn to_line(&self, source: &str) -> String {
        let mut attributes = format!("ID={}", self.id);
        if let Some(genome) = &self.genome {
            attributes.push_str(";genome=");
            attributes.push_str(genome);
        }
        format!(
            "{}\t{}\tSO:0000856\t{}\t{}\t.\t{}\t.\t{}",
            self.seqname, source, self.start, self.end, self.strand, attributes
        )
    }
}

/// `##sequence-region name start end`
fn parse_region(line: &str) -> Option<(String, usize)> {
    let mut f = line.split_whitespace();
    if f.next()? != "##sequence-region" {
        return None;
    }
    let name = f.next()?.to_string();
    let _start = f.next()?.parse::<usize>().ok()?;
    let end = f.next()?.parse::<usize>().ok()?;
    Some((name, end))
}

struct BoundedPath {
    genome: String,
    seqname: String,
    rows: Vec<GffRow>,
}

/// Reads a GFF file into genomes with coordinates. With `group_by`, paths are
/// grouped by the `genome` attribute (falling back to the sequence name);
/// otherwise each sequence is its own genome, named `genome#seqname`. Equal
/// sequence names in different genomes are different paths.
pub fn read_gff<R: BufRead>(reader: R, group_by: bool) -> anyhow::Result<GenomeSet> {
    let mut bounded: IndexMap<(String, String), BoundedPath> = IndexMap::new();
    let mut sizes: HashMap<String, usize> = HashMap::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with('#') {
            if let Some((name, size)) = parse_region(&line) {
                sizes.insert(name, size);
            }
            continue;
        }

        match GffRow::parse(&line) {
            Some(row) => {
                let genome = match (&row.genome, group_by) {
                    (Some(g), true) => g.clone(),
                    (Some(g), false) => format!("{}#{}", g, row.seqname),
                    (None, _) => row.seqname.clone(),
                };
                let key = (row.genome.clone().unwrap_or_default(), row.seqname.clone());
                bounded
                    .entry(key)
                    .or_insert_with(|| BoundedPath {
                        genome,
                        seqname: row.seqname.clone(),
                        rows: Vec::new(),
                    })
                    .rows
                    .push(row);
            }
            None => log::warn!("Unable to read GFF line: {}", line),
        }
    }

    let mut set = GenomeSet::new();
    for (_, mut bp) in bounded {
        bp.rows.sort_by_key(|r| r.start);

        let mut path = Path::new(&bp.seqname, Vec::with_capacity(bp.rows.len()));
        for row in &bp.rows {
            let gene = set.genes.id_for(&row.id);
            path.genes.push(SignedGene::new(gene, row.strand));
            path.starts.push(row.start);
            path.ends.push(row.end);
        }
        path.size = sizes.get(&bp.seqname).copied();
        set.add_path(&bp.genome, path);
    }

    Ok(set)
}

/// Writes the block intervals of every path with coordinates.
///
/// A run is a stretch of occurrences of one block, filtered genes included.
/// With a single representative occurrence the run becomes one feature,
/// followed by `filtered` rows for the filtered genes it hides and `Ns` rows
/// for the gaps between its intervals. With several, each representative
/// occurrence opens a feature of its own.
pub fn write_blocks<W: Write>(
    writer: &mut W,
    set: &GenomeSet,
    partition: &Partition,
) -> io::Result<()> {
    writeln!(writer, "##gff-version 3")?;
    for (_, path) in set.paths() {
        if let Some(size) = path.size {
            writeln!(writer, "##sequence-region {} 1 {}", path.name, size)?;
        }
    }

    for (genome, path) in set.paths() {
        if !path.has_coords() {
            continue;
        }
        let blocks: Vec<Option<usize>> = path
            .genes
            .iter()
            .map(|sg| partition.block_of(sg.gene))
            .collect();

        let mut i = 0;
        while i < blocks.len() {
            let Some(block) = blocks[i] else {
                i += 1;
                continue;
            };
            let mut end = i;
            while end + 1 < blocks.len() && blocks[end + 1].map_or(true, |b| b == block) {
                end += 1;
            }
            // trailing filtered genes belong to no feature
            let mut last = end;
            while blocks[last].is_none() {
                last -= 1;
            }

            let run = BlockRun {
                genome,
                path,
                block,
                first: i,
                last,
            };
            let cores: Vec<usize> = (i..=last)
                .filter(|&l| partition.is_representative(path.genes[l].gene))
                .collect();
            match cores.as_slice() {
                [] => log::warn!(
                    "{}#{}: no representative of block {} in {}..{}",
                    genome,
                    path.name,
                    block + 1,
                    path.starts[i],
                    path.ends[last]
                ),
                [core] => run.write_single(writer, &blocks, *core)?,
                _ => run.write_split(writer, &cores)?,
            }
            i = end + 1;
        }
    }

    Ok(())
}

/// Occurrences `first..=last` of one block on a path.
struct BlockRun<'a> {
    genome: &'a str,
    path: &'a Path,
    block: usize,
    first: usize,
    last: usize,
}

impl BlockRun<'_> {
    fn feature(&self, start: usize, end: usize, strand: Orientation) -> GffRow {
        GffRow {
            seqname: self.path.name.clone(),
            start,
            end,
            strand,
            id: (self.block + 1).to_string(),
            genome: Some(self.genome.to_string()),
        }
    }

    fn write_hidden<W: Write>(
        &self,
        writer: &mut W,
        kind: &str,
        start: usize,
        end: usize,
        strand: Orientation,
    ) -> io::Result<()> {
        writeln!(
            writer,
            "{}\tmice\t{}\t{}\t{}\t.\t{}\t.\tgenome={}",
            self.path.name, kind, start, end, strand, self.genome
        )
    }

    fn write_single<W: Write>(
        &self,
        writer: &mut W,
        blocks: &[Option<usize>],
        core: usize,
    ) -> io::Result<()> {
        let path = self.path;
        let strand = path.genes[core].orient;
        let row = self.feature(path.starts[self.first], path.ends[self.last], strand);
        writeln!(writer, "{}", row.to_line("mice"))?;

        // filtered stretches, clipped to the space left by their neighbours
        let mut l = self.first + 1;
        while l < self.last {
            if blocks[l].is_some() {
                l += 1;
                continue;
            }
            let mut m = l;
            while blocks[m + 1].is_none() {
                m += 1;
            }
            let left = path.ends[l - 1];
            let right = path.starts[m + 1];
            if right > left + 1 {
                let start = path.starts[l].max(left + 1);
                let end = path.ends[m].min(right - 1);
                if start <= end {
                    self.write_hidden(writer, "filtered", start, end, strand)?;
                }
            }
            l = m + 1;
        }

        for l in self.first..self.last {
            let (left, right) = (path.ends[l], path.starts[l + 1]);
            if right > left + 1 {
                self.write_hidden(writer, "Ns", left + 1, right - 1, strand)?;
            }
        }
        Ok(())
    }

    fn write_split<W: Write>(&self, writer: &mut W, cores: &[usize]) -> io::Result<()> {
        let path = self.path;
        for (k, &core) in cores.iter().enumerate() {
            let start = if k == 0 { self.first } else { core };
            let end = cores.get(k + 1).map_or(self.last, |&next| next - 1);
            let row = self.feature(path.starts[start], path.ends[end], path.genes[core].orient);
            writeln!(writer, "{}", row.to_line("mice"))?;
        }
        Ok(())
    }
}
