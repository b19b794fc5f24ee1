use crate::libs::graph::Node;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// `from` lists `to` as a neighbour but not the other way round
    Asymmetric { from: Node, to: Node },
    /// A neighbour refers to a gene outside the arena
    UnknownGene { node: Node, gene: usize, num_genes: usize },
    /// The sentinel carries edges although telomere anchoring is off
    UnanchoredTelomere,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::Asymmetric { from, to } => {
                write!(f, "Asymmetric adjacency: {} -> {} has no mirror", from, to)
            }
            GraphError::UnknownGene {
                node,
                gene,
                num_genes,
            } => write!(
                f,
                "Adjacency of {} refers to gene {} but only {} genes exist",
                node, gene, num_genes
            ),
            GraphError::UnanchoredTelomere => {
                write!(f, "Telomere has edges but anchoring is disabled")
            }
        }
    }
}

impl std::error::Error for GraphError {}
