pub mod client;
pub mod record;

use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::GameApiError;
use crate::signer::DEFAULT_BASE_URL;

/// Options passed into `GameApiClient::new()`.
///
/// Deserializable, so it can sit inside a larger config file. Only `game_id`
/// and `private_key` are required.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOptions {
    /// The ID of your game on Game Jolt.
    pub game_id: String,
    /// The private key of your game. Used to sign requests, never sent.
    pub private_key: String,
    /// Version of the game API. Current version is 1.
    #[serde(default = "default_api_version")]
    pub api_version: u32,
    /// API root, without the version segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whether the client should print debug statements to the console.
    #[serde(default)]
    pub verbose: bool,
    /// Connect timeout of the bundled HTTP transport, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("game_id", &self.game_id)
            .field("api_version", &self.api_version)
            .field("base_url", &self.base_url)
            .field("verbose", &self.verbose)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish_non_exhaustive()
    }
}

fn default_api_version() -> u32 {
    1
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    5
}

impl ClientOptions {
    pub fn new(game_id: &str, private_key: &str) -> Self {
        Self {
            game_id: game_id.to_string(),
            private_key: private_key.to_string(),
            api_version: default_api_version(),
            base_url: default_base_url(),
            verbose: false,
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }

    /// Reads options from `GAMEJOLT_*` environment variables.
    ///
    /// `GAMEJOLT_GAME_ID` and `GAMEJOLT_PRIVATE_KEY` are required;
    /// `GAMEJOLT_API_VERSION`, `GAMEJOLT_BASE_URL`, `GAMEJOLT_VERBOSE` and
    /// `GAMEJOLT_CONNECT_TIMEOUT` fall back to the defaults.
    pub fn from_env() -> Result<Self, GameApiError> {
        let game_id = required_var("GAMEJOLT_GAME_ID")?;
        let private_key = required_var("GAMEJOLT_PRIVATE_KEY")?;

        let mut options = Self::new(&game_id, &private_key);

        if let Ok(version) = env::var("GAMEJOLT_API_VERSION") {
            options.api_version = parse_var("GAMEJOLT_API_VERSION", &version)?;
        }
        if let Ok(base_url) = env::var("GAMEJOLT_BASE_URL") {
            options.base_url = base_url;
        }
        if let Ok(verbose) = env::var("GAMEJOLT_VERBOSE") {
            options.verbose = parse_var("GAMEJOLT_VERBOSE", &verbose)?;
        }
        if let Ok(timeout) = env::var("GAMEJOLT_CONNECT_TIMEOUT") {
            options.connect_timeout_secs = parse_var("GAMEJOLT_CONNECT_TIMEOUT", &timeout)?;
        }

        Ok(options)
    }

    pub(crate) fn validate(&self) -> Result<(), GameApiError> {
        if self.game_id.trim().is_empty() {
            return Err(GameApiError::InvalidGameId);
        }

        if self.private_key.is_empty() {
            return Err(GameApiError::InvalidPrivateKey);
        }

        if self.api_version == 0 {
            return Err(GameApiError::InvalidApiVersion);
        }

        Ok(())
    }
}

fn required_var(name: &str) -> Result<String, GameApiError> {
    env::var(name).map_err(|_| GameApiError::InvalidConfig(format!("{} is not set", name)))
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, GameApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| GameApiError::InvalidConfig(format!("{} has an invalid value", name)))
}

/// Verified identity of the player. Replaced as a whole on verification.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub username: String,
    /// The player's game token.
    #[serde(skip_serializing)]
    pub token: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Which trophies `fetch_trophies()` returns.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrophyFilter {
    /// Trophies the verified user has.
    Achieved,
    /// Trophies the verified user does not have yet.
    Unachieved,
    #[default]
    All,
}

impl TrophyFilter {
    /// Value of the `achieved` query parameter.
    pub fn as_param(&self) -> &'static str {
        match self {
            TrophyFilter::Achieved => "true",
            TrophyFilter::Unachieved => "false",
            TrophyFilter::All => "empty",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_defaults_from_json() {
        let options: ClientOptions =
            serde_json::from_str(r#"{"game_id": "42", "private_key": "secret"}"#).unwrap();

        assert_eq!(options, ClientOptions::new("42", "secret"));
        assert_eq!(options.api_version, 1);
        assert_eq!(options.base_url, "http://gamejolt.com/api/game");
        assert_eq!(options.connect_timeout_secs, 5);
    }

    #[test]
    fn options_from_env() {
        temp_env::with_vars(
            [
                ("GAMEJOLT_GAME_ID", Some("42")),
                ("GAMEJOLT_PRIVATE_KEY", Some("secret")),
                ("GAMEJOLT_API_VERSION", Some("2")),
                ("GAMEJOLT_VERBOSE", Some("true")),
                ("GAMEJOLT_BASE_URL", None),
                ("GAMEJOLT_CONNECT_TIMEOUT", None),
            ],
            || {
                let options = ClientOptions::from_env().unwrap();
                assert_eq!(options.game_id, "42");
                assert_eq!(options.api_version, 2);
                assert!(options.verbose);
                assert_eq!(options.base_url, DEFAULT_BASE_URL);
            },
        );

        temp_env::with_vars(
            [
                ("GAMEJOLT_GAME_ID", Some("42")),
                ("GAMEJOLT_PRIVATE_KEY", None),
            ],
            || {
                assert!(matches!(
                    ClientOptions::from_env(),
                    Err(GameApiError::InvalidConfig(_))
                ));
            },
        );

        temp_env::with_vars(
            [
                ("GAMEJOLT_GAME_ID", Some("42")),
                ("GAMEJOLT_PRIVATE_KEY", Some("secret")),
                ("GAMEJOLT_API_VERSION", Some("one")),
            ],
            || {
                assert!(matches!(
                    ClientOptions::from_env(),
                    Err(GameApiError::InvalidConfig(_))
                ));
            },
        );
    }

    #[test]
    fn options_validation() {
        assert_eq!(ClientOptions::new("42", "secret").validate(), Ok(()));
        assert_eq!(
            ClientOptions::new(" ", "secret").validate(),
            Err(GameApiError::InvalidGameId)
        );
        assert_eq!(
            ClientOptions::new("42", "").validate(),
            Err(GameApiError::InvalidPrivateKey)
        );

        let mut options = ClientOptions::new("42", "secret");
        options.api_version = 0;
        assert_eq!(options.validate(), Err(GameApiError::InvalidApiVersion));
    }

    #[test]
    fn filter_params() {
        assert_eq!(TrophyFilter::Achieved.as_param(), "true");
        assert_eq!(TrophyFilter::Unachieved.as_param(), "false");
        assert_eq!(TrophyFilter::default().as_param(), "empty");
    }

    #[test]
    fn secrets_stay_out_of_debug_output() {
        let session = Session {
            username: "alice".to_string(),
            token: "tok123".to_string(),
        };
        let debug = format!("{:?}", session);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("tok123"));

        let debug = format!("{:?}", ClientOptions::new("42", "secret"));
        assert!(debug.contains("42"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn session_never_serializes_its_token() {
        let session = Session {
            username: "alice".to_string(),
            token: "tok".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&session).unwrap(),
            r#"{"username":"alice"}"#
        );
    }
}
