use crate::libs::genome::GenomeSet;
use crate::libs::partition::Partition;
use itertools::Itertools;
use std::io::{self, Write};

/// Each path rewritten as blocks:
///
/// ```text
/// >genome#path
/// 1+,2-,3+
/// ```
///
/// Only occurrences of a block's representative gene are written, so a block
/// appears once per traversal.
pub fn write_paths<W: Write>(
    writer: &mut W,
    set: &GenomeSet,
    partition: &Partition,
) -> io::Result<()> {
    for (genome, path) in set.paths() {
        writeln!(writer, ">{}#{}", genome, path.name)?;
        let tokens = path
            .genes
            .iter()
            .filter(|sg| partition.is_representative(sg.gene))
            .filter_map(|sg| {
                partition
                    .block_of(sg.gene)
                    .map(|b| format!("{}{}", b + 1, sg.orient))
            })
            .join(",");
        writeln!(writer, "{}", tokens)?;
    }
    Ok(())
}

/// One line per block, `block<TAB>representative: member member ...`, with
/// blocks numbered as in `paths.txt` and genes by name.
pub fn write_partitions<W: Write>(
    writer: &mut W,
    set: &GenomeSet,
    partition: &Partition,
) -> io::Result<()> {
    for (block, members) in partition.components.iter().enumerate() {
        let Some(&rep) = members.first() else {
            continue;
        };
        let names = members.iter().map(|&g| set.genes.name(g)).join(" ");
        writeln!(writer, "{}\t{}: {}", block + 1, set.genes.name(rep), names)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::partition::PartitionTree;

    fn sample() -> (GenomeSet, Partition) {
        let set = GenomeSet::from_tokens(&[vec!["a+", "b+", "c-"], vec!["c+", "b-", "a-"]]);
        let mut tree = PartitionTree::new(set.num_genes(), true);
        tree.merge(0, 1);
        (set, tree.components())
    }

    #[test]
    fn test_paths() {
        let (set, partition) = sample();
        let mut buf = Vec::new();
        write_paths(&mut buf, &set, &partition).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            ">g1#g1\n1+,2-\n>g2#g2\n2+,1-\n"
        );
    }

    #[test]
    fn test_partitions() {
        let (set, partition) = sample();
        let mut buf = Vec::new();
        write_partitions(&mut buf, &set, &partition).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1\ta: a b\n2\tc: c\n");
    }
}
