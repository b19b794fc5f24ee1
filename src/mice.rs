extern crate clap;
use clap::*;

mod cmd_mice;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let app = Command::new("mice")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`mice` - Merge Isolated Chains of Elements")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_mice::count::make_subcommand())
        .subcommand(cmd_mice::compress::make_subcommand())
        .subcommand(cmd_mice::sim::make_subcommand())
        .subcommand(cmd_mice::maf::make_subcommand())
        .after_help(
            r###"Subcommand groups:

* Synteny blocks:
    * count    - Number of synteny blocks of each input
    * compress - Blocks, rewritten paths and block annotations

* Inputs:
    * sim - Random gene orders as GFA
    * maf - MAF to GFF conversion

Log messages go to stderr; set RUST_LOG=debug for details or RUST_LOG=warn
to silence the run statistics.

"###,
        );

    match app.get_matches().subcommand() {
        Some(("count", sub_matches)) => cmd_mice::count::execute(sub_matches),
        Some(("compress", sub_matches)) => cmd_mice::compress::execute(sub_matches),
        Some(("sim", sub_matches)) => cmd_mice::sim::execute(sub_matches),
        Some(("maf", sub_matches)) => cmd_mice::maf::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
