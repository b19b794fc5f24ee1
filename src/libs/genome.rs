use indexmap::{IndexMap, IndexSet};
use std::fmt;

/// Strand of one gene occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'+' => Some(Orientation::Forward),
            b'-' => Some(Orientation::Reverse),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Orientation::Forward => '+',
            Orientation::Reverse => '-',
        }
    }

    pub fn is_forward(self) -> bool {
        self == Orientation::Forward
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// One occurrence of a gene in a genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignedGene {
    pub gene: usize,
    pub orient: Orientation,
}

impl SignedGene {
    pub fn new(gene: usize, orient: Orientation) -> Self {
        Self { gene, orient }
    }

    pub fn forward(gene: usize) -> Self {
        Self::new(gene, Orientation::Forward)
    }

    pub fn reverse(gene: usize) -> Self {
        Self::new(gene, Orientation::Reverse)
    }
}

/// Interns gene names to dense indices in order of first appearance.
#[derive(Debug, Clone, Default)]
pub struct GeneIndexer {
    names: IndexSet<String>,
}

impl GeneIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_for(&mut self, name: &str) -> usize {
        match self.names.get_index_of(name) {
            Some(id) => id,
            None => self.names.insert_full(name.to_string()).0,
        }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.names.get_index_of(name)
    }

    pub fn name(&self, id: usize) -> &str {
        self.names
            .get_index(id)
            .map(|s| s.as_str())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Parses a token like `12+` or `geneA-` into a signed gene.
    ///
    /// ```
    /// use mice::libs::genome::{GeneIndexer, Orientation};
    /// let mut indexer = GeneIndexer::new();
    /// let sg = indexer.parse_signed("12-").unwrap();
    /// assert_eq!(indexer.name(sg.gene), "12");
    /// assert_eq!(sg.orient, Orientation::Reverse);
    ///
    /// assert!(indexer.parse_signed("12").is_none());
    /// assert!(indexer.parse_signed("+").is_none());
    /// assert_eq!(indexer.len(), 1);
    /// ```
    pub fn parse_signed(&mut self, token: &str) -> Option<SignedGene> {
        let (name, orient) = split_signed(token)?;
        Some(SignedGene::new(self.id_for(name), orient))
    }

    /// Renders a signed gene back to its token form.
    pub fn format_signed(&self, sg: SignedGene) -> String {
        format!("{}{}", self.name(sg.gene), sg.orient)
    }
}

/// Splits `name+` into (`name`, Forward) without interning.
pub fn split_signed(token: &str) -> Option<(&str, Orientation)> {
    let token = token.trim();
    let (&last, _) = token.as_bytes().split_last()?;
    let orient = Orientation::from_byte(last)?;
    let name = &token[..token.len() - 1];
    if name.is_empty() {
        return None;
    }
    Some((name, orient))
}

/// A named, ordered sequence of signed genes, optionally with the interval
/// each occurrence covers on its sequence.
#[derive(Debug, Clone, Default)]
pub struct Path {
    pub name: String,
    pub genes: Vec<SignedGene>,
    pub starts: Vec<usize>,
    pub ends: Vec<usize>,
    pub size: Option<usize>,
}

impl Path {
    pub fn new(name: &str, genes: Vec<SignedGene>) -> Self {
        Self {
            name: name.to_string(),
            genes,
            ..Default::default()
        }
    }

    pub fn has_coords(&self) -> bool {
        !self.genes.is_empty() && self.starts.len() == self.genes.len()
    }

    /// Length in bp of the `i`-th occurrence, when coordinates are known.
    pub fn len_of(&self, i: usize) -> Option<usize> {
        let start = *self.starts.get(i)?;
        let end = *self.ends.get(i)?;
        Some(end.saturating_sub(start) + 1)
    }
}

/// All paths of one genome. Repeats are detected per genome.
#[derive(Debug, Clone, Default)]
pub struct Genome {
    pub name: String,
    pub paths: Vec<Path>,
}

/// The whole input: genomes grouped by name, plus explicit links.
#[derive(Debug, Clone, Default)]
pub struct GenomeSet {
    pub genomes: IndexMap<String, Genome>,
    pub links: Vec<(SignedGene, SignedGene)>,
    pub genes: GeneIndexer,
}

impl GenomeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set where every token list is its own genome `g1`, `g2`, ...
    ///
    /// ```
    /// use mice::libs::genome::GenomeSet;
    /// let set = GenomeSet::from_tokens(&[vec!["1+", "2-"], vec![], vec!["2+", "3+"]]);
    /// assert_eq!(set.genomes.len(), 3);
    /// assert_eq!(set.num_genes(), 3);
    /// assert_eq!(set.num_paths(), 3);
    /// ```
    pub fn from_tokens<S: AsRef<str>>(orders: &[Vec<S>]) -> Self {
        let mut set = Self::new();
        for (i, order) in orders.iter().enumerate() {
            let genes = order
                .iter()
                .filter_map(|t| set.genes.parse_signed(t.as_ref()))
                .collect();
            let name = format!("g{}", i + 1);
            set.add_path(&name, Path::new(&name, genes));
        }
        set
    }

    pub fn add_path(&mut self, genome: &str, path: Path) {
        self.genomes
            .entry(genome.to_string())
            .or_insert_with(|| Genome {
                name: genome.to_string(),
                paths: Vec::new(),
            })
            .paths
            .push(path);
    }

    pub fn num_genes(&self) -> usize {
        self.genes.len()
    }

    pub fn num_paths(&self) -> usize {
        self.genomes.values().map(|g| g.paths.len()).sum()
    }

    pub fn paths(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.genomes
            .values()
            .flat_map(|g| g.paths.iter().map(move |p| (g.name.as_str(), p)))
    }

    pub fn has_coords(&self) -> bool {
        self.paths().any(|(_, p)| p.has_coords())
    }
}

/// Genome part of a PanSN-style path name (`genome#hap#contig`).
///
/// ```
/// assert_eq!(mice::libs::genome::genome_of("HG002#1#chr1"), "HG002");
/// assert_eq!(mice::libs::genome::genome_of("g1"), "g1");
/// ```
pub fn genome_of(path_name: &str) -> &str {
    match path_name.find('#') {
        Some(idx) => &path_name[..idx],
        None => path_name,
    }
}
