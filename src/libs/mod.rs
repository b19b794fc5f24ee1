pub mod contract;
pub mod error;
pub mod genome;
pub mod gfa;
pub mod gff;
pub mod graph;
pub mod io;
pub mod maf;
pub mod output;
pub mod partition;
pub mod pipeline;
pub mod repeat;
pub mod sim;
