use clap::*;
use mice::libs::maf::MafReader;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("to-gff")
        .about("Convert MAF alignment blocks to GFF block intervals")
        .after_help(
            r###"
Every alignment block becomes one block id, counted from 1 across all input
files. Each `s` line of the block becomes a GFF row:

    <seq>  cactus  SO:0000856  <start>  <end>  .  <strand>  .  ID=<block>;genome=<genome>

`src` is split on its first dot into genome and sequence names. Coordinates
are 1-based and on the forward strand. Sequences whose name starts with `Anc`
(ancestral reconstructions) and empty components are skipped.

The output is a valid input for `mice compress`.

Examples:
1. Convert a Cactus MAF:
   mice maf to-gff tests/maf/example.maf -o blocks.gff

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Input MAF file(s) to process"),
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
    let mut writer = mice::writer(args.get_one::<String>("outfile").unwrap())?;

    //----------------------------
    // Ops
    //----------------------------
    writer.write_all(b"##gff-version 3\n")?;
    let mut block_id = 0usize;
    for infile in args.get_many::<String>("infiles").unwrap() {
        let reader = mice::reader(infile)?;

        for ali in MafReader::new(reader) {
            let ali = ali?;
            block_id += 1;

            //----------------------------
            // Output
            //----------------------------
            for row in ali.components.iter().filter_map(|c| c.to_gff_row(block_id)) {
                writeln!(writer, "{}", row.to_line("cactus"))?;
            }
        }
    }
    writer.flush()?;

    Ok(())
}
