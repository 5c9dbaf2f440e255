//! Configuration for rbxmon.
//!
//! All settings come from environment variables. The binary loads `.env`
//! files with `dotenvy` first, so the same names work in a file.
//!
//! # Environment Variables
//!
//! Required:
//! - `MONITORED_USERS`: comma separated usernames
//!
//! Optional:
//! - `GROUP_ID`: group used for rank enrichment
//! - `MONITORED_RANKS`: comma separated tracked ranks (default: 1,2,3)
//! - `CHECK_INTERVAL`: poll interval in seconds (default: 15)
//! - `NOTIFY_ON_OFFLINE`: report users going offline (default: false)
//! - `NOTIFY_ON_LEAVE`: report users leaving a game (default: true)
//! - `NOTIFY_GROUP_MEMBERS`: tag joins by non-tracked members (default: true)
//! - `PING_EVERYONE`: ping the chat on joins (default: true)
//! - `TARGET_PLACE_ID`, `TARGET_UNIVERSE_ID`: only report joins into this game
//! - `TARGET_GAME_NAME`: display name for the target game
//! - `ROBLOX_USERS_URLS`, `ROBLOX_PRESENCE_URLS`, `ROBLOX_GROUPS_URLS`,
//!   `ROBLOX_GAMES_URLS`, `ROBLOX_PLACES_URLS`: ordered base URL lists
//! - `ROBLOX_NO_FALLBACK`: only ever try the first base URL
//! - `ROBLOX_HTTP_TIMEOUT`: per request timeout in seconds (default: 10)
//! - `RBXMON_CONFIG_DIR`: override the config directory (default: ~/.rbxmon)

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use rbxmon_models::PresenceSnapshot;
use url::Url;

use crate::error::ConfigError;

/// Environment variable for a custom config directory.
pub const CONFIG_DIR_ENV: &str = "RBXMON_CONFIG_DIR";

/// Default config directory name under home.
const DEFAULT_CONFIG_DIR: &str = ".rbxmon";

/// Default poll interval in seconds.
pub const DEFAULT_CHECK_INTERVAL_SECS: u64 = 15;

/// Default request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Ranks tracked when `MONITORED_RANKS` is unset.
const DEFAULT_TRACKED_RANKS: [u32; 3] = [1, 2, 3];

const DEFAULT_USERS_URLS: [&str; 2] = ["https://users.roproxy.com", "https://users.roblox.com"];
const DEFAULT_PRESENCE_URLS: [&str; 2] =
    ["https://presence.roproxy.com", "https://presence.roblox.com"];
const DEFAULT_GROUPS_URLS: [&str; 2] = ["https://groups.roproxy.com", "https://groups.roblox.com"];
const DEFAULT_GAMES_URLS: [&str; 2] = ["https://games.roproxy.com", "https://games.roblox.com"];
const DEFAULT_PLACES_URLS: [&str; 2] = ["https://apis.roproxy.com", "https://apis.roblox.com"];

/// Get the rbxmon config directory.
///
/// `RBXMON_CONFIG_DIR` if set, else `~/.rbxmon`, else `.rbxmon` in the
/// current directory.
pub fn config_dir() -> PathBuf {
    std::env::var(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_CONFIG_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR))
        })
}

/// Get the environment file inside the config directory.
pub fn env_file() -> PathBuf {
    config_dir().join(".env")
}

/// An ordered list of base URLs for one upstream capability.
///
/// The first entry is the primary; the rest are tried in order when the
/// primary fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    bases: Vec<Url>,
}

impl Endpoints {
    /// Creates an endpoint list. Returns `None` if `bases` is empty.
    pub fn new(bases: Vec<Url>) -> Option<Self> {
        if bases.is_empty() {
            None
        } else {
            Some(Self { bases })
        }
    }

    /// Parses a comma separated list of URLs.
    pub fn parse(var: &'static str, raw: &str) -> Result<Self, ConfigError> {
        let bases = split_list(raw)
            .map(|s| Url::parse(s).map_err(|e| ConfigError::invalid(var, s, e)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(bases).ok_or_else(|| ConfigError::invalid(var, raw, "no URLs given"))
    }

    fn defaults(urls: &[&str]) -> Self {
        Self {
            bases: urls
                .iter()
                .filter_map(|u| Url::parse(u).ok())
                .collect(),
        }
    }

    /// All bases in the order they are tried.
    pub fn bases(&self) -> &[Url] {
        &self.bases
    }

    /// The primary base.
    pub fn primary(&self) -> &Url {
        &self.bases[0]
    }

    /// Keeps only the primary base.
    pub fn primary_only(mut self) -> Self {
        self.bases.truncate(1);
        self
    }
}

/// Upstream HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    /// Username to id resolution.
    pub users: Endpoints,
    /// Presence lookups.
    pub presence: Endpoints,
    /// Group membership lookups.
    pub groups: Endpoints,
    /// Game catalog lookups.
    pub games: Endpoints,
    /// Place to universe lookups.
    pub places: Endpoints,
    /// Whether only the primary base is ever tried.
    pub no_fallback: bool,
    /// Per request timeout.
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            users: Endpoints::defaults(&DEFAULT_USERS_URLS),
            presence: Endpoints::defaults(&DEFAULT_PRESENCE_URLS),
            groups: Endpoints::defaults(&DEFAULT_GROUPS_URLS),
            games: Endpoints::defaults(&DEFAULT_GAMES_URLS),
            places: Endpoints::defaults(&DEFAULT_PLACES_URLS),
            no_fallback: false,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl UpstreamConfig {
    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let overrides: [(&'static str, &mut Endpoints); 5] = [
            ("ROBLOX_USERS_URLS", &mut config.users),
            ("ROBLOX_PRESENCE_URLS", &mut config.presence),
            ("ROBLOX_GROUPS_URLS", &mut config.groups),
            ("ROBLOX_GAMES_URLS", &mut config.games),
            ("ROBLOX_PLACES_URLS", &mut config.places),
        ];
        for (var, slot) in overrides {
            if let Some(raw) = non_empty(lookup(var)) {
                *slot = Endpoints::parse(var, &raw)?;
            }
        }

        if let Some(secs) = parse_opt_u64(lookup, "ROBLOX_HTTP_TIMEOUT")? {
            if secs == 0 {
                return Err(ConfigError::invalid("ROBLOX_HTTP_TIMEOUT", "0", "must be positive"));
            }
            config.timeout = Duration::from_secs(secs);
        }

        let no_fallback = lookup("ROBLOX_NO_FALLBACK").is_some_and(|v| parse_bool(&v));
        Ok(if no_fallback {
            config.without_fallback()
        } else {
            config
        })
    }

    /// Trims every capability down to its primary base.
    pub fn without_fallback(self) -> Self {
        Self {
            users: self.users.primary_only(),
            presence: self.presence.primary_only(),
            groups: self.groups.primary_only(),
            games: self.games.primary_only(),
            places: self.places.primary_only(),
            no_fallback: true,
            timeout: self.timeout,
        }
    }
}

/// Narrows join reporting to one game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetFilter {
    /// Target place id.
    pub place_id: Option<u64>,
    /// Target universe id.
    pub universe_id: Option<u64>,
    /// Display name used instead of a catalog lookup when the target matches.
    pub display_name: Option<String>,
}

impl TargetFilter {
    /// Returns true when a place or universe is configured.
    pub fn is_active(&self) -> bool {
        self.place_id.is_some() || self.universe_id.is_some()
    }

    /// Whether the given ids identify the target game.
    pub fn matches_ids(&self, place_id: Option<&str>, universe_id: Option<u64>) -> bool {
        let place_hit = match (self.place_id, place_id) {
            (Some(target), Some(place)) => place.trim() == target.to_string(),
            _ => false,
        };
        let universe_hit = match (self.universe_id, universe_id) {
            (Some(target), Some(universe)) => target == universe,
            _ => false,
        };
        place_hit || universe_hit
    }

    /// Whether the snapshot is in the target game.
    pub fn matches(&self, snapshot: &PresenceSnapshot) -> bool {
        snapshot.in_game && self.matches_ids(snapshot.place_id.as_deref(), snapshot.universe_id)
    }
}

/// Complete monitor configuration.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Usernames polled every cycle, in order.
    pub users: Vec<String>,
    /// Group used for rank enrichment.
    pub group_id: Option<u64>,
    /// Ranks classified as tracked.
    pub tracked_ranks: BTreeSet<u32>,
    /// Time between poll cycles.
    pub poll_interval: Duration,
    /// Report users going offline.
    pub notify_on_offline: bool,
    /// Report users leaving a game.
    pub notify_on_leave: bool,
    /// Tag joins by members outside the tracked ranks.
    pub notify_group_members: bool,
    /// Ping the chat on joins.
    pub ping_everyone: bool,
    /// Optional target game.
    pub target: TargetFilter,
    /// Upstream HTTP settings.
    pub upstream: UpstreamConfig,
}

impl MonitorConfig {
    /// Creates a config for the given users with default settings.
    pub fn new<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            users: users.into_iter().map(Into::into).collect(),
            group_id: None,
            tracked_ranks: DEFAULT_TRACKED_RANKS.into_iter().collect(),
            poll_interval: Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS),
            notify_on_offline: false,
            notify_on_leave: true,
            notify_group_members: true,
            ping_everyone: true,
            target: TargetFilter::default(),
            upstream: UpstreamConfig::default(),
        }
    }

    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let users: Vec<String> = lookup("MONITORED_USERS")
            .map(|raw| split_list(&raw).map(str::to_string).collect())
            .unwrap_or_default();
        if users.is_empty() {
            return Err(ConfigError::Missing("MONITORED_USERS"));
        }

        let mut config = Self::new(users);
        config.group_id = parse_opt_u64(&lookup, "GROUP_ID")?;

        if let Some(raw) = non_empty(lookup("MONITORED_RANKS")) {
            config.tracked_ranks = split_list(&raw)
                .map(|r| {
                    r.parse::<u32>()
                        .map_err(|e| ConfigError::invalid("MONITORED_RANKS", r, e))
                })
                .collect::<Result<_, _>>()?;
        }

        if let Some(secs) = parse_opt_u64(&lookup, "CHECK_INTERVAL")? {
            if secs == 0 {
                return Err(ConfigError::invalid("CHECK_INTERVAL", "0", "must be positive"));
            }
            config.poll_interval = Duration::from_secs(secs);
        }

        config.notify_on_offline = parse_flag(&lookup, "NOTIFY_ON_OFFLINE", false);
        config.notify_on_leave = parse_flag(&lookup, "NOTIFY_ON_LEAVE", true);
        config.notify_group_members = parse_flag(&lookup, "NOTIFY_GROUP_MEMBERS", true);
        config.ping_everyone = parse_flag(&lookup, "PING_EVERYONE", true);

        config.target = TargetFilter {
            place_id: parse_opt_u64(&lookup, "TARGET_PLACE_ID")?,
            universe_id: parse_opt_u64(&lookup, "TARGET_UNIVERSE_ID")?,
            display_name: non_empty(lookup("TARGET_GAME_NAME")),
        };

        config.upstream = UpstreamConfig::from_lookup(&lookup)?;

        Ok(config)
    }

    /// Whether a rank is in the tracked set.
    pub fn is_tracked_rank(&self, rank: u32) -> bool {
        self.tracked_ranks.contains(&rank)
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Accepts `1`, `true`, `yes` and `y` in any case; everything else is false.
pub fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

fn parse_flag<F>(lookup: &F, var: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup(var))
        .map(|v| parse_bool(&v))
        .unwrap_or(default)
}

fn parse_opt_u64<F>(lookup: &F, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup(var))
        .map(|raw| {
            raw.parse::<u64>()
                .map_err(|e| ConfigError::invalid(var, &raw, e))
        })
        .transpose()
}
