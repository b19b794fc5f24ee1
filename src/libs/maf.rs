use crate::libs::genome::Orientation;
use crate::libs::gff::GffRow;
use std::io::BufRead;

/// One `s` line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MafComp {
    pub src: String,
    pub start: usize,
    pub size: usize,
    pub strand: char,
    pub src_size: usize,
}

/// One `a` paragraph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MafAli {
    pub components: Vec<MafComp>,
}

impl MafComp {
    fn parse(line: &str) -> anyhow::Result<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 7 || parts[0] != "s" {
            anyhow::bail!("Invalid MAF s line: {}", line);
        }
        Ok(MafComp {
            src: parts[1].to_string(),
            start: parts[2].parse()?,
            size: parts[3].parse()?,
            strand: parts[4].chars().next().unwrap_or('+'),
            src_size: parts[5].parse()?,
        })
    }

    /// `genome.chr1` into (`genome`, `chr1`). Sources without a dot name both.
    pub fn split_src(&self) -> (&str, &str) {
        match self.src.split_once('.') {
            Some((genome, seq)) => (genome, seq),
            None => (self.src.as_str(), self.src.as_str()),
        }
    }

    /// 1-based, closed interval on the forward strand.
    pub fn forward_range(&self) -> (usize, usize) {
        let start = if self.strand == '-' {
            self.src_size.saturating_sub(self.start + self.size)
        } else {
            self.start
        };
        (start + 1, start + self.size)
    }

    /// The interval annotation of this component within block `block_id`.
    /// Empty components and ancestral (`Anc*`) sequences have none.
    pub fn to_gff_row(&self, block_id: usize) -> Option<GffRow> {
        let (genome, seq) = self.split_src();
        if self.size == 0 || seq.starts_with("Anc") {
            return None;
        }
        let (start, end) = self.forward_range();
        Some(GffRow {
            seqname: seq.to_string(),
            start,
            end,
            strand: if self.strand == '-' {
                Orientation::Reverse
            } else {
                Orientation::Forward
            },
            id: block_id.to_string(),
            genome: Some(genome.to_string()),
        })
    }
}

/// Streams alignment blocks out of a MAF file. Lines other than `a` and `s`
/// are ignored.
pub struct MafReader<R: BufRead> {
    lines: std::io::Lines<R>,
    pending: Option<MafAli>,
}

impl<R: BufRead> MafReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            pending: None,
        }
    }
}

impl<R: BufRead> Iterator for MafReader<R> {
    type Item = anyhow::Result<MafAli>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => return Some(Err(e.into())),
                None => return self.pending.take().map(Ok),
            };
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if let Some(ali) = self.pending.take() {
                    return Some(Ok(ali));
                }
            } else if trimmed.starts_with('a') {
                let next = MafAli::default();
                if let Some(ali) = self.pending.replace(next) {
                    return Some(Ok(ali));
                }
            } else if trimmed.starts_with("s ") || trimmed.starts_with("s\t") {
                let comp = match MafComp::parse(trimmed) {
                    Ok(c) => c,
                    Err(e) => return Some(Err(e)),
                };
                self.pending
                    .get_or_insert_with(MafAli::default)
                    .components
                    .push(comp);
            }
        }
    }
}
