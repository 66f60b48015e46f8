use clap::Parser as _;

use chartbridge::worker::cli::WorkerArgs;

fn main() {
    let args = WorkerArgs::parse();
    chartbridge::logging::init(if args.fast { "warn" } else { "info" });
    std::process::exit(chartbridge::worker::run::run(args));
}
