use clap::*;
use mice::libs::contract::Order;
use mice::libs::io::{detect_format, Format};
use mice::libs::pipeline::{self, CompressOptions};
use mice::libs::{gff, output};
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    let cmd = Command::new("compress")
        .about("Compress a gene-order graph into synteny blocks")
        .after_help(
            r###"
Contracts the graph and writes, in the output directory:

* paths.txt      - every path rewritten as blocks, `>genome#path` then
                   `<block><strand>,...`
* partitions.txt - one line per block, `<block>\t<representative>: <members>`
* output.gff     - block intervals (GFF input only); consecutive genes of one
                   block are merged into a single feature, split again at each
                   repeated representative. `filtered` and `Ns` rows mark
                   filtered genes and gaps hidden inside a feature

Notes:
* --remove-dup N drops genes occurring N or more times in some genome; repeats
  below N are kept but never merged. 1 is not allowed
* --min-size L drops singleton blocks shorter than L bp and contracts again;
  it needs interval coordinates, so it only applies to GFF input

Examples:
1. Compress a GFF file:
   mice compress tests/gff/blocks.gff -d out

2. Drop genes with 3 or more copies, then small leftovers:
   mice compress tests/gff/blocks.gff -d out -r 3 -m 100

"###,
        )
        .arg(
            Arg::new("infile")
                .required(true)
                .num_args(1)
                .index(1)
                .help("Input GFA/GFF file"),
        )
        .arg(
            Arg::new("outdir")
                .long("outdir")
                .short('d')
                .num_args(1)
                .default_value("mice_output")
                .help("Output directory"),
        )
        .arg(
            Arg::new("remove_dup")
                .long("remove-dup")
                .short('r')
                .num_args(1)
                .default_value("0")
                .value_parser(parse_remove_dup)
                .help("Remove genes occurring at least N times in a genome; 0 disables"),
        )
        .arg(
            Arg::new("min_size")
                .long("min-size")
                .short('m')
                .num_args(1)
                .default_value("0")
                .value_parser(value_parser!(usize))
                .help("Minimum length in bp of genes left unmerged after the first pass"),
        );

    super::build_args(cmd)
}

fn parse_remove_dup(s: &str) -> Result<usize, String> {
    let v: usize = s
        .parse()
        .map_err(|_| "Expected a non-negative integer".to_string())?;
    if v == 1 {
        Err("Value 1 is not allowed".to_string())
    } else {
        Ok(v)
    }
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let infile = args.get_one::<String>("infile").unwrap();
    let outdir = std::path::Path::new(args.get_one::<String>("outdir").unwrap());
    let format = args.get_one::<String>("format").map(|s| s.as_str());

    let opts = CompressOptions {
        build: super::build_options(args, Order::default()),
        remove_dup: *args.get_one::<usize>("remove_dup").unwrap(),
        min_size: Some(*args.get_one::<usize>("min_size").unwrap()).filter(|&m| m > 0),
    };

    //----------------------------
    // Ops
    //----------------------------
    let set = pipeline::load(infile, format, opts.build.group_by)?;
    let outcome = pipeline::run(&set, &opts)?;
    pipeline::log_summary(&set, &outcome);

    //----------------------------
    // Output
    //----------------------------
    std::fs::create_dir_all(outdir)?;

    let mut writer = mice::writer(&outdir.join("paths.txt").to_string_lossy())?;
    output::write_paths(&mut writer, &set, &outcome.partition)?;
    writer.flush()?;

    let mut writer = mice::writer(&outdir.join("partitions.txt").to_string_lossy())?;
    output::write_partitions(&mut writer, &set, &outcome.partition)?;
    writer.flush()?;

    if detect_format(infile, format)? == Format::Gff {
        let mut writer = mice::writer(&outdir.join("output.gff").to_string_lossy())?;
        gff::write_blocks(&mut writer, &set, &outcome.partition)?;
        writer.flush()?;
    }

    Ok(())
}
