use clap::*;
use mice::libs::sim::{generate, write_sim_gfa, SimParams};
use rand::rngs::StdRng;
use rand::SeedableRng;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("sim")
        .about("Generate random gene orders as GFA")
        .after_help(
            r###"
Each genome holds `len` signed genes drawn from the ids 0 .. len*mad. Without
--dup a genome never repeats a gene; with it genes are drawn with replacement.
Every occurrence gets a random strand.

The header records the parameters:
    H  VN:Z:1.0  m:i:<len>  n:i:<count>  mad_id:i:<mad>  dup:Z:T|F  rep:i:<rep>

Examples:
1. Three genomes of 100 genes:
   mice sim --len 100 --count 3 --seed 7

2. With duplicates, then count blocks:
   mice sim --len 100 --count 5 --dup -o sim.gfa
   mice count sim.gfa

"###,
        )
        .arg(
            Arg::new("len")
                .long("len")
                .short('m')
                .num_args(1)
                .default_value("10")
                .value_parser(value_parser!(usize))
                .help("Genes per genome"),
        )
        .arg(
            Arg::new("count")
                .long("count")
                .short('n')
                .num_args(1)
                .default_value("3")
                .value_parser(value_parser!(usize))
                .help("Number of genomes"),
        )
        .arg(
            Arg::new("mad")
                .long("mad")
                .num_args(1)
                .default_value("2")
                .value_parser(value_parser!(usize))
                .help("Multiplier of the gene id range"),
        )
        .arg(
            Arg::new("dup")
                .long("dup")
                .action(ArgAction::SetTrue)
                .help("Draw genes with replacement"),
        )
        .arg(
            Arg::new("rep")
                .long("rep")
                .num_args(1)
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Replicate number written to the header"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .short('s')
                .num_args(1)
                .value_parser(value_parser!(u64))
                .help("Random seed; drawn from the OS when omitted"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    //----------------------------
    // Args
    //----------------------------
    let params = SimParams {
        len: *args.get_one::<usize>("len").unwrap(),
        count: *args.get_one::<usize>("count").unwrap(),
        mad: *args.get_one::<usize>("mad").unwrap(),
        dup: args.get_flag("dup"),
        rep: *args.get_one::<usize>("rep").unwrap(),
    };
    let mut rng = match args.get_one::<u64>("seed") {
        Some(&seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    //----------------------------
    // Ops
    //----------------------------
    let genomes = generate(&params, &mut rng)?;
    log::debug!("generated {} genomes", genomes.len());

    //----------------------------
    // Output
    //----------------------------
    let writer = mice::writer(args.get_one::<String>("outfile").unwrap())?;
    write_sim_gfa(writer, &genomes, &params)?;

    Ok(())
}
