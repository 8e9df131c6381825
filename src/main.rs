use clap::Parser;
use log::debug;
use snafu::ErrorCompat;

mod args;
mod board;

#[tokio::main]
async fn main() {
    let args = args::Args::parse();
    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();
    debug!("args: {:?}", args);

    let res = match board::BoardConfig::from_args(&args) {
        Ok(config) => board::run_board(config).await,
        Err(e) => Err(e),
    };
    if let Err(e) = res {
        eprintln!("An error occured {}", e);
        for cause in ErrorCompat::iter_chain(&e).skip(1) {
            eprintln!("  caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
