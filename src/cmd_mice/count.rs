use clap::*;
use mice::libs::contract::Order;
use mice::libs::pipeline;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    let cmd = Command::new("count")
        .about("Count synteny blocks of gene-order graphs")
        .after_help(
            r###"
Contracts every non-branching chain of the gene adjacency graph and reports the
number of synteny blocks left.

Input is GFA (P and L records, segments as genes) or GFF (one feature per gene
occurrence, `ID=<gene>`). Files can be gzipped.

Output: the number of blocks of each input file, one per line.

Notes:
* The worklist order never changes the result; --order and --seed exist to
  check that
* Genes occurring twice in one genome are never merged unless --dirty is given

Examples:
1. Count blocks:
   mice count tests/gfa/chain.gfa

2. Without telomere anchoring:
   mice count tests/gfa/chain.gfa --no-telomeres

3. Random worklist order:
   mice count tests/gfa/chain.gfa --order random --seed 42

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Input GFA/GFF file(s) to process"),
        )
        .arg(
            Arg::new("order")
                .long("order")
                .num_args(1)
                .default_value("lifo")
                .value_parser(["lifo", "fifo", "random"])
                .help("Worklist order"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .num_args(1)
                .default_value("42")
                .value_parser(value_parser!(u64))
                .help("Seed for --order random"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        );

    super::build_args(cmd)
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let mut writer = mice::writer(args.get_one::<String>("outfile").unwrap())?;

    let order = match args.get_one::<String>("order").unwrap().parse::<Order>()? {
        Order::Random(_) => Order::Random(*args.get_one::<u64>("seed").unwrap()),
        other => other,
    };
    let opts = super::build_options(args, order);
    let format = args.get_one::<String>("format").map(|s| s.as_str());

    //----------------------------
    // Ops
    //----------------------------
    for infile in args.get_many::<String>("infiles").unwrap() {
        let set = pipeline::load(infile, format, opts.group_by)?;
        let blocks = pipeline::count_blocks(&set, &opts)?;
        log::info!(
            "{}: {} genes in {} blocks",
            infile,
            set.num_genes(),
            blocks
        );

        //----------------------------
        // Output
        //----------------------------
        writer.write_fmt(format_args!("{}\n", blocks))?;
    }
    writer.flush()?;

    Ok(())
}
