use std::fmt;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

#[cfg(not(windows))]
use colorful::{Color, Colorful};

use super::record::{Trophy, User};
use super::{ClientOptions, Session, TrophyFilter};
use crate::decoder;
use crate::errors::GameApiError;
use crate::params::ParameterSet;
use crate::signer::RequestSigner;
use crate::transport::{redact, ReqwestTransport, Transport};

/// Game API client. Signs requests, sends them through its [`Transport`] and
/// decodes the responses.
///
/// The verified session is the only state shared between calls. It sits
/// behind a lock and is swapped as a whole by [`GameApiClient::verify_user`].
pub struct GameApiClient<T: Transport = ReqwestTransport> {
    signer: RequestSigner,
    /// Whether the client should print debug statements.
    verbose: bool,
    session: RwLock<Option<Session>>,
    transport: T,
}

// The transport may hold request URLs, and with them user tokens.
impl<T: Transport> fmt::Debug for GameApiClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameApiClient")
            .field("signer", &self.signer)
            .field("verbose", &self.verbose)
            .field("session", &self.session())
            .finish_non_exhaustive()
    }
}

impl GameApiClient<ReqwestTransport> {
    /// Creates a new client using the bundled blocking HTTP transport.
    pub fn new(options: ClientOptions) -> Result<Self, GameApiError> {
        let transport =
            ReqwestTransport::new(Duration::from_secs(options.connect_timeout_secs))?;
        Self::with_transport(options, transport)
    }
}

impl<T: Transport> GameApiClient<T> {
    /// Creates a new client on top of any transport.
    pub fn with_transport(options: ClientOptions, transport: T) -> Result<Self, GameApiError> {
        // Verify that all options passed are usable
        options.validate()?;

        Ok(Self {
            signer: RequestSigner::new(
                &options.base_url,
                options.api_version,
                &options.game_id,
                &options.private_key,
            ),
            verbose: options.verbose,
            session: RwLock::new(None),
            transport,
        })
    }

    pub fn set_version(&mut self, version: u32) -> Result<(), GameApiError> {
        if version == 0 {
            return Err(GameApiError::InvalidApiVersion);
        }
        self.signer.set_version(version);
        Ok(())
    }

    pub fn version(&self) -> u32 {
        self.signer.version()
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn is_verified(&self) -> bool {
        self.session().is_some()
    }

    /// Snapshot of the verified session, if any.
    pub fn session(&self) -> Option<Session> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Checks the player's credentials. On success the session is replaced,
    /// on any failure it is left as it was.
    pub fn verify_user(&self, username: &str, token: &str) -> Result<bool, GameApiError> {
        self.debug_print(&format!("Verifying {}...", username));

        let params = ParameterSet::new()
            .with("username", username)
            .with("user_token", token);

        let body = self.perform_signed_request("users/auth/", params, false)?;

        match decoder::decode_auth(&body) {
            Ok(true) => {
                let session = Session {
                    username: username.to_string(),
                    token: token.to_string(),
                };
                *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session);

                tracing::info!("Verified game user {}", username);
                self.debug_print(&format!("Successfully verified {}.", username));
                Ok(true)
            }
            Ok(false) | Err(GameApiError::RequestRejected) => {
                self.debug_print(&format!("Failed to verify {}: {}", username, body.trim()));
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Fetches the verified user. `None` when the API refuses to return it.
    pub fn fetch_verified_user(&self) -> Result<Option<User>, GameApiError> {
        let session = self.require_session()?;
        let params = ParameterSet::new().with("username", session.username.as_str());

        let body = self.perform_signed_request("users/", params, true)?;

        match decoder::decode_user(&body) {
            Ok(mut record) => {
                record.set("token", session.token);
                Ok(Some(User::from(record)))
            }
            Err(GameApiError::RequestRejected) => {
                self.debug_print(&format!("Could not get user {}.", session.username));
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Lists the game's trophies, filtered server side by `filter`.
    pub fn fetch_trophies(&self, filter: TrophyFilter) -> Result<Vec<Trophy>, GameApiError> {
        let params = ParameterSet::new().with("achieved", filter.as_param());
        let body = self.perform_signed_request("trophies/", params, true)?;

        match decoder::decode_trophies(&body) {
            Ok(records) => Ok(records.into_iter().map(Trophy::from).collect()),
            Err(GameApiError::RequestRejected) => {
                self.debug_print("Could not get the trophy list.");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    pub fn fetch_trophy(&self, trophy_id: &str) -> Result<Trophy, GameApiError> {
        let params = ParameterSet::new().with("trophy_id", trophy_id);
        let body = self.perform_signed_request("trophies/", params, true)?;

        match decoder::decode_trophy(&body) {
            Ok(record) => Ok(Trophy::from(record)),
            Err(GameApiError::RequestRejected) => {
                self.debug_print(&format!("Could not get trophy {}.", trophy_id));
                Err(GameApiError::NotFound(format!("trophy {}", trophy_id)))
            }
            Err(err) => Err(err),
        }
    }

    /// Gives the verified user the trophy. Returns whether the API accepted it.
    pub fn mark_achieved(&self, trophy_id: &str) -> Result<bool, GameApiError> {
        let params = ParameterSet::new().with("trophy_id", trophy_id);
        let body = self.perform_signed_request("trophies/add-achieved", params, true)?;

        let achieved = decoder::is_success(&body);
        if !achieved {
            self.debug_print(&format!(
                "Could not give trophy {} to the user: {}",
                trophy_id,
                body.trim()
            ));
        }

        Ok(achieved)
    }

    /// Raw request helper. `params_line` looks like `trophy_id=23&achieved=empty`.
    /// Needs a verified user.
    pub fn request(&self, method: &str, params_line: &str) -> Result<String, GameApiError> {
        self.perform_signed_request(method, ParameterSet::from_query_line(params_line), true)
    }

    /// Signs and sends a request, returning the raw response body.
    ///
    /// With `require_verified`, fails with [`GameApiError::NotVerified`]
    /// before touching the network when no user is verified, and otherwise
    /// adds the session's `user_token` and `username` to `params`.
    pub fn perform_signed_request(
        &self,
        method: &str,
        mut params: ParameterSet,
        require_verified: bool,
    ) -> Result<String, GameApiError> {
        if require_verified {
            let session = self.require_session()?;
            params.set("user_token", session.token);
            params.set("username", session.username);
        }

        let url = self.signer.signed_url(method, &params);

        tracing::debug!("Requesting {}", redact(&url));
        self.debug_print(&format!("urlString: {}", redact(&url)));

        let body = self.transport.fetch(&url)?;
        let body = String::from_utf8(body).map_err(|_| {
            GameApiError::MalformedResponse("response body is not valid UTF-8".to_string())
        })?;

        tracing::debug!("Response from {}: {} bytes", method, body.len());
        Ok(body)
    }

    fn require_session(&self) -> Result<Session, GameApiError> {
        self.session().ok_or_else(|| {
            self.debug_print("This call needs a verified user.");
            GameApiError::NotVerified
        })
    }

    fn debug_print(&self, message: &str) {
        if !self.verbose {
            return;
        }

        #[cfg(windows)]
        println!("[GAMEJOLT] {}", message);

        #[cfg(not(windows))]
        println!(
            "{} {}",
            "[GAMEJOLT]".gradient_with_color(Color::Cyan, Color::SpringGreen4),
            message
        );
    }
}
