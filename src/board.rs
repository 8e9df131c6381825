use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use standings::*;

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::args::Args;
use crate::board::admin::AdminSecret;
use crate::board::config_reader::*;

pub mod admin;
pub mod pages;
pub mod server;
pub mod store;

#[derive(Debug, Snafu)]
pub enum BoardError {
    #[snafu(display("Error opening standings file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Line {lineno} of {path} has no value for column {column:?}"))]
    CsvLineTooShort {
        path: String,
        lineno: usize,
        column: String,
    },
    #[snafu(display("Missing column {column:?} in the header of {path}"))]
    MissingColumn { path: String, column: String },
    #[snafu(display("Line {lineno} of {path} repeats the event {event:?} ({category:?})"))]
    DuplicateRow {
        path: String,
        lineno: usize,
        event: String,
        category: Option<String>,
    },
    #[snafu(display("Error writing standings file {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error flushing standings file {path}"))]
    CsvFlush {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error creating directory {path}"))]
    CreateDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening config file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing config file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Invalid layout: {message}"))]
    InvalidLayout { message: String },
    #[snafu(display("Invalid port {value:?} in STANDINGS_PORT"))]
    InvalidPort { value: String },
    #[snafu(display("Error listening on {address}"))]
    Bind {
        source: std::io::Error,
        address: String,
    },
    #[snafu(display("Server error"))]
    Serve { source: std::io::Error },
}

pub type BoardResult<T> = Result<T, BoardError>;

pub const DEFAULT_DATA_FILE: &str = "sports_standings.csv";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_TITLE: &str = "Circle Sports for Primary Schools, 2025";
pub const DEFAULT_SUBTITLE: &str = "Diamond Harbour North Circle";

pub mod config_reader {
    use crate::board::*;

    /// The optional JSON settings file.
    #[derive(Eq, PartialEq, Debug, Clone, Default, Deserialize)]
    pub struct BoardSettings {
        #[serde(rename = "dataFile")]
        pub data_file: Option<String>,
        pub layout: Option<String>,
        pub host: Option<String>,
        pub port: Option<u16>,
        pub title: Option<String>,
        pub subtitle: Option<String>,
    }

    pub fn read_settings(path: &str) -> BoardResult<BoardSettings> {
        let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
        debug!("read settings: {:?}", contents);
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
    }
}

/// Everything the board needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    pub data_file: PathBuf,
    pub layout: Layout,
    pub host: String,
    pub port: u16,
    pub title: String,
    pub subtitle: String,
    pub admin_secret: AdminSecret,
}

/// Values read from the process environment.
#[derive(Debug, Clone, Default)]
pub struct BoardEnv {
    pub admin_password: Option<String>,
    pub port: Option<String>,
}

impl BoardEnv {
    /// Reads the environment, after loading a `.env` file if there is one.
    pub fn from_process() -> BoardEnv {
        if let Ok(p) = dotenvy::dotenv() {
            info!("Loaded environment from {:?}", p);
        }
        BoardEnv {
            admin_password: std::env::var("ADMIN_PASSWORD").ok(),
            port: std::env::var("STANDINGS_PORT").ok(),
        }
    }
}

impl BoardConfig {
    pub fn from_args(args: &Args) -> BoardResult<BoardConfig> {
        let settings = match &args.config {
            Some(p) => read_settings(p)?,
            None => BoardSettings::default(),
        };
        BoardConfig::resolve(args, settings, BoardEnv::from_process())
    }

    /// Merges the command line, the settings file and the environment, in that order of priority.
    pub fn resolve(args: &Args, settings: BoardSettings, env: BoardEnv) -> BoardResult<BoardConfig> {
        let layout_str = args.layout.clone().or(settings.layout);
        let layout: Layout = match layout_str {
            Some(s) => s
                .parse()
                .map_err(|message| InvalidLayoutSnafu { message }.build())?,
            None => Layout::Categorized,
        };
        let env_port: Option<u16> = match env.port {
            Some(value) => Some(
                value
                    .parse::<u16>()
                    .ok()
                    .context(InvalidPortSnafu { value })?,
            ),
            None => None,
        };
        let config = BoardConfig {
            data_file: PathBuf::from(
                args.data
                    .clone()
                    .or(settings.data_file)
                    .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string()),
            ),
            layout,
            host: args
                .host
                .clone()
                .or(settings.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: args
                .port
                .or(settings.port)
                .or(env_port)
                .unwrap_or(DEFAULT_PORT),
            title: args
                .title
                .clone()
                .or(settings.title)
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            subtitle: args
                .subtitle
                .clone()
                .or(settings.subtitle)
                .unwrap_or_else(|| DEFAULT_SUBTITLE.to_string()),
            admin_secret: AdminSecret::new(env.admin_password),
        };
        info!("config: {:?}", config);
        Ok(config)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Seeds the backing file if needed, then serves the two pages until the process stops.
pub async fn run_board(config: BoardConfig) -> BoardResult<()> {
    let store = store::Store::new(config.data_file.clone(), config.layout);
    if store.initialize()? {
        info!(
            "Created {:?} with the starter events ({} layout)",
            store.path(),
            store.layout()
        );
    }
    if !config.admin_secret.is_configured() {
        warn!("ADMIN_PASSWORD is not set: the admin view will refuse every password");
    }
    let app = server::build_router(server::AppState::new(store, &config));

    let address = config.address();
    let listener = tokio::net::TcpListener::bind(address.as_str())
        .await
        .context(BindSnafu {
            address: address.clone(),
        })?;
    info!("Standings board listening on http://{}", address);
    axum::serve(listener, app).await.context(ServeSnafu {})?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_any_input() {
        let config =
            BoardConfig::resolve(&Args::default(), BoardSettings::default(), BoardEnv::default())
                .unwrap();
        assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
        assert_eq!(config.layout, Layout::Categorized);
        assert_eq!(config.address(), "127.0.0.1:8501");
        assert_eq!(config.title, DEFAULT_TITLE);
        assert_eq!(config.admin_secret, AdminSecret::new(None));
    }

    #[test]
    fn command_line_wins_over_settings_and_env() {
        let args = Args {
            layout: Some("flat".to_string()),
            port: Some(9000),
            ..Args::default()
        };
        let settings: BoardSettings = serde_json::from_str(
            r#"{"dataFile": "data/board.csv", "layout": "categorized", "port": 8000, "title": "Sports Day"}"#,
        )
        .unwrap();
        let env = BoardEnv {
            admin_password: Some("secret".to_string()),
            port: Some("7000".to_string()),
        };
        let config = BoardConfig::resolve(&args, settings, env).unwrap();
        assert_eq!(config.layout, Layout::Flat);
        assert_eq!(config.port, 9000);
        assert_eq!(config.data_file, PathBuf::from("data/board.csv"));
        assert_eq!(config.title, "Sports Day");
        assert_eq!(config.subtitle, DEFAULT_SUBTITLE);
        assert_eq!(config.admin_secret, AdminSecret::new(Some("secret".to_string())));
    }

    #[test]
    fn env_port_is_used_last() {
        let env = BoardEnv {
            admin_password: None,
            port: Some("7000".to_string()),
        };
        let config =
            BoardConfig::resolve(&Args::default(), BoardSettings::default(), env).unwrap();
        assert_eq!(config.port, 7000);
    }

    #[test]
    fn invalid_values_are_reported() {
        let args = Args {
            layout: Some("tree".to_string()),
            ..Args::default()
        };
        let res = BoardConfig::resolve(&args, BoardSettings::default(), BoardEnv::default());
        assert!(matches!(res, Err(BoardError::InvalidLayout { .. })));

        let env = BoardEnv {
            admin_password: None,
            port: Some("eighty".to_string()),
        };
        let res = BoardConfig::resolve(&Args::default(), BoardSettings::default(), env);
        assert!(matches!(res, Err(BoardError::InvalidPort { .. })));
    }

    #[test]
    fn settings_file_errors_carry_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("board.json");
        let p_str = p.display().to_string();
        assert!(matches!(
            read_settings(&p_str),
            Err(BoardError::OpeningJson { .. })
        ));
        fs::write(&p, "{ not json").unwrap();
        match read_settings(&p_str) {
            Err(e @ BoardError::ParsingJson { .. }) => assert!(e.to_string().contains(&p_str)),
            x => panic!("unexpected {:?}", x),
        }
    }
}
