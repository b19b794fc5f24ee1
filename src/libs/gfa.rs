use crate::libs::genome::{genome_of, split_signed, GenomeSet, Orientation, Path, SignedGene};
use crate::libs::graph::{AdjacencyGraph, End, Node};
use itertools::Itertools;
use std::io::{self, BufRead, Write};

/// Reads `P` and `L` records. Every other record kind, records with missing
/// fields and records holding a token without a `+`/`-` orientation are
/// skipped.
///
/// With `group_by`, a path named `genome#hap#contig` joins genome `genome`;
/// otherwise each path is its own genome.
pub fn read_gfa<R: BufRead>(reader: R, group_by: bool) -> anyhow::Result<GenomeSet> {
    let mut set = GenomeSet::new();

    for line in reader.lines() {
        let line = line?;
        let fields: Vec<&str> = line.trim_end_matches('\r').split('\t').collect();

        match fields[0] {
            "P" if fields.len() >= 4 => {
                let Some(tokens) = parse_segments(fields[2]) else {
                    continue;
                };
                let name = fields[1];
                let genes = tokens
                    .into_iter()
                    .map(|(seg, orient)| SignedGene::new(set.genes.id_for(seg), orient))
                    .collect();
                let genome = if group_by { genome_of(name) } else { name };
                set.add_path(genome, Path::new(name, genes));
            }
            "L" if fields.len() >= 6 => {
                let (Some(oa), Some(ob)) = (parse_orient(fields[2]), parse_orient(fields[4]))
                else {
                    continue;
                };
                if fields[1].is_empty() || fields[3].is_empty() {
                    continue;
                }
                let a = SignedGene::new(set.genes.id_for(fields[1]), oa);
                let b = SignedGene::new(set.genes.id_for(fields[3]), ob);
                set.links.push((a, b));
            }
            _ => {}
        }
    }

    Ok(set)
}

fn parse_orient(field: &str) -> Option<Orientation> {
    match field.as_bytes() {
        [b] => Orientation::from_byte(*b),
        _ => None,
    }
}

/// `1+,2-,3+` into name/orientation pairs; `*` and the empty string are an
/// empty path. `None` if any token is malformed.
fn parse_segments(field: &str) -> Option<Vec<(&str, Orientation)>> {
    let field = field.trim();
    if field.is_empty() || field == "*" {
        return Some(Vec::new());
    }
    field.split(',').map(split_signed).collect()
}

/// Gene-gene edges of `graph` as links `a -> b`, leaving `a` by its outward
/// extremity and entering `b` by its inward one. Sentinel edges have no link
/// form and are dropped.
pub fn links_from_graph(graph: &AdjacencyGraph) -> Vec<(SignedGene, SignedGene)> {
    graph
        .edges()
        .into_iter()
        .filter_map(|(x, y)| match (x, y) {
            (Node::Ext(ga, ea), Node::Ext(gb, eb)) => {
                let oa = if ea == End::Head {
                    Orientation::Forward
                } else {
                    Orientation::Reverse
                };
                let ob = if eb == End::Tail {
                    Orientation::Forward
                } else {
                    Orientation::Reverse
                };
                Some((SignedGene::new(ga, oa), SignedGene::new(gb, ob)))
            }
            _ => None,
        })
        .collect()
}

pub struct GfaWriter<W: Write> {
    writer: W,
}

impl<W: Write> GfaWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_header(&mut self, tags: &[String]) -> io::Result<()> {
        writeln!(self.writer, "H\t{}", tags.iter().join("\t"))
    }

    pub fn write_segment(&mut self, name: &str, seq: &str) -> io::Result<()> {
        writeln!(self.writer, "S\t{}\t{}", name, seq)
    }

    pub fn write_link(
        &mut self,
        a: &str,
        oa: Orientation,
        b: &str,
        ob: Orientation,
        overlap: &str,
    ) -> io::Result<()> {
        writeln!(self.writer, "L\t{}\t{}\t{}\t{}\t{}", a, oa, b, ob, overlap)
    }

    /// `tokens` are signed genes such as `12+`; an empty path is written as `*`.
    pub fn write_path(&mut self, name: &str, tokens: &[String], overlap: &str) -> io::Result<()> {
        let segs = if tokens.is_empty() {
            "*".to_string()
        } else {
            tokens.join(",")
        };
        let overlaps = if tokens.len() > 1 {
            std::iter::repeat(overlap).take(tokens.len() - 1).join(",")
        } else {
            "*".to_string()
        };
        writeln!(self.writer, "P\t{}\t{}\t{}", name, segs, overlaps)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Serializes `set` with the gene-gene adjacencies of `graph` as links.
pub fn write_gfa<W: Write>(writer: W, set: &GenomeSet, graph: &AdjacencyGraph) -> io::Result<()> {
    let mut gfa = GfaWriter::new(writer);
    gfa.write_header(&["VN:Z:1.0".to_string()])?;
    for g in 0..set.num_genes() {
        gfa.write_segment(set.genes.name(g), "*")?;
    }
    for (a, b) in links_from_graph(graph) {
        gfa.write_link(set.genes.name(a.gene), a.orient, set.genes.name(b.gene), b.orient, "0M")?;
    }
    for (_, path) in set.paths() {
        let tokens: Vec<String> = path
            .genes
            .iter()
            .map(|&sg| set.genes.format_signed(sg))
            .collect();
        gfa.write_path(&path.name, &tokens, "0M")?;
    }
    gfa.flush()
}
