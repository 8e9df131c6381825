use clap::Parser;

/// Web dashboard for sports-event standings, backed by a CSV file.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the board settings (dataFile, layout, host, port, title, subtitle).
    /// Options given on the command line override the values of this file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, default sports_standings.csv) The CSV file holding the standings. It is created with
    /// the starter events if it does not exist.
    #[clap(short, long, value_parser)]
    pub data: Option<String>,

    /// (categorized or flat, default categorized) Whether events are grouped by category.
    #[clap(short, long, value_parser)]
    pub layout: Option<String>,

    /// (default 127.0.0.1) The address to listen on.
    #[clap(long, value_parser)]
    pub host: Option<String>,

    /// (default 8501, or STANDINGS_PORT) The port to listen on.
    #[clap(short, long, value_parser)]
    pub port: Option<u16>,

    /// The title of the leaderboard page.
    #[clap(long, value_parser)]
    pub title: Option<String>,

    /// The subheading of the leaderboard page.
    #[clap(long, value_parser)]
    pub subtitle: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
