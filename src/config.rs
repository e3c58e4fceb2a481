// Application configuration, loaded from environment variables and CLI flags.

use std::path::PathBuf;

use crate::engine::game::Limits;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TROOPS: u32 = 5;
pub const DEFAULT_FIELDS: u32 = 3;
/// Most combinations a game may enumerate.
pub const DEFAULT_MAX_COMBOS: u64 = 500;
/// Most battle evaluations one solve may perform; a few seconds of solver time.
pub const DEFAULT_MAX_WORK: u64 = 5_000_000_000;
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000";

/// Game service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Directory holding the browser frontend (index.html, script.js, styles.css).
    /// When set, files are served from it for any unmatched path.
    pub static_dir: Option<PathBuf>,
    /// Upper bound on combinations per game; larger /new_game requests are refused.
    pub max_combos: u64,
    /// Upper bound on solver battle evaluations per game; larger /new_game requests are refused.
    pub max_work: u64,
    /// Game held by the server before the first /new_game call.
    pub default_troops: u32,
    pub default_fields: u32,
}

impl Config {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// Environment variables:
    /// - `PORT` - HTTP server port (default: 8000)
    /// - `STATIC_DIR` - Path to the frontend directory for static file serving
    /// - `BLOTTO_MAX_COMBOS` - Combination cap per game (default: 500)
    /// - `BLOTTO_MAX_WORK` - Solver evaluation cap per game (default: 5e9)
    /// - `BLOTTO_DEFAULT_TROOPS` / `BLOTTO_DEFAULT_FIELDS` - Startup game (default: 5 / 3)
    ///
    /// CLI flags:
    /// - `--port <PORT>` - Override the port
    /// - `--static-dir <DIR>` - Override the static directory
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().collect();

        // Port: CLI flag --port takes precedence, then env var, then default
        let port = parse_cli_value(&args, "--port")
            .and_then(|v| v.parse().ok())
            .or_else(|| env_parsed("PORT"))
            .unwrap_or(DEFAULT_PORT);

        let static_dir = parse_cli_value(&args, "--static-dir")
            .or_else(|| std::env::var("STATIC_DIR").ok())
            .map(PathBuf::from);

        Config {
            port,
            static_dir,
            max_combos: env_parsed("BLOTTO_MAX_COMBOS").unwrap_or(DEFAULT_MAX_COMBOS),
            max_work: env_parsed("BLOTTO_MAX_WORK").unwrap_or(DEFAULT_MAX_WORK),
            default_troops: env_parsed("BLOTTO_DEFAULT_TROOPS").unwrap_or(DEFAULT_TROOPS),
            default_fields: env_parsed("BLOTTO_DEFAULT_FIELDS").unwrap_or(DEFAULT_FIELDS),
        }
    }
}

impl Config {
    pub fn limits(&self) -> Limits {
        Limits {
            max_combos: self.max_combos,
            max_work: self.max_work,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            static_dir: None,
            max_combos: DEFAULT_MAX_COMBOS,
            max_work: DEFAULT_MAX_WORK,
            default_troops: DEFAULT_TROOPS,
            default_fields: DEFAULT_FIELDS,
        }
    }
}

/// Terminal client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the game service.
    pub service_url: String,
}

impl ClientConfig {
    /// `--url <URL>` takes precedence over `BLOTTO_SERVICE_URL`.
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let service_url = parse_cli_value(&args, "--url")
            .or_else(|| std::env::var("BLOTTO_SERVICE_URL").ok())
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());
        ClientConfig { service_url }
    }
}

/// Parse a CLI flag value like `--port 8080`.
fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
    args.windows(2).find_map(|pair| {
        if pair[0] == flag {
            Some(pair[1].clone())
        } else {
            None
        }
    })
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
