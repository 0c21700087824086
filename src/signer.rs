use std::fmt;

use md5::{Digest, Md5};

use crate::params::ParameterSet;

/// Default API root. Methods are appended as `<root>/v<version>/<method>`.
pub const DEFAULT_BASE_URL: &str = "http://gamejolt.com/api/game";

const USER_TOKEN: &str = "user_token";
const SIGNATURE: &str = "signature";

/// Builds canonical request URLs and signs them.
///
/// The remote service recomputes the signature from the URL it receives, so
/// the canonical form has to be reproduced exactly:
///
/// ```text
/// <base>/v<version>/<method>?game_id=<id>&k1=v1&...&user_token=<token>
/// ```
///
/// Parameters are written in insertion order without any escaping, except
/// `user_token`, which is always moved to the very end (empty when absent).
#[derive(Clone)]
pub struct RequestSigner {
    base_url: String,
    version: u32,
    game_id: String,
    private_key: String,
}

impl fmt::Debug for RequestSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSigner")
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .field("game_id", &self.game_id)
            .finish_non_exhaustive()
    }
}

impl RequestSigner {
    pub fn new(base_url: &str, version: u32, game_id: &str, private_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            version,
            game_id: game_id.to_string(),
            private_key: private_key.to_string(),
        }
    }

    pub fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Builds the canonical URL string for `method` and `params`.
    pub fn canonicalize(&self, method: &str, params: &ParameterSet) -> String {
        debug_assert!(!method.is_empty(), "API method must not be empty");

        let mut url = format!(
            "{}/v{}/{}?game_id={}",
            self.base_url, self.version, method, self.game_id
        );

        for (key, value) in params.iter().filter(|(key, _)| *key != USER_TOKEN) {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(value);
        }

        url.push_str("&user_token=");
        url.push_str(params.get(USER_TOKEN).unwrap_or_default());

        url
    }

    /// Lowercase hex MD5 of the URL's UTF-8 bytes.
    pub fn sign(&self, url: &str) -> String {
        hex::encode(Md5::digest(url.as_bytes()))
    }

    /// Produces the URL actually sent to the API.
    ///
    /// The signature is computed over the canonical URL with the private key
    /// appended to the user token. The URL is then rebuilt with the plain
    /// token and the `signature` parameter. Any `signature` already present in
    /// `params` is dropped first.
    pub fn signed_url(&self, method: &str, params: &ParameterSet) -> String {
        let token = params.get(USER_TOKEN).unwrap_or_default().to_string();

        let mut signing: ParameterSet = params
            .iter()
            .filter(|(key, _)| *key != SIGNATURE)
            .collect();
        signing.set(USER_TOKEN, format!("{}{}", token, self.private_key));

        let signature = self.sign(&self.canonicalize(method, &signing));

        let mut sent = signing;
        sent.set(USER_TOKEN, token);
        sent.set(SIGNATURE, signature);

        self.canonicalize(method, &sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> RequestSigner {
        RequestSigner::new("http://gamejolt.com/api/game/", 1, "42", "secret")
    }

    #[test]
    fn token_is_moved_to_the_end() {
        let params = ParameterSet::new()
            .with("user_token", "tok")
            .with("username", "alice")
            .with("achieved", "true");

        let url = signer().canonicalize("trophies/", &params);

        assert_eq!(
            url,
            "http://gamejolt.com/api/game/v1/trophies/?game_id=42&username=alice&achieved=true&user_token=tok"
        );
        assert_eq!(url.matches("user_token=").count(), 1);
    }

    #[test]
    fn missing_token_is_empty() {
        let url = signer().canonicalize("users/", &ParameterSet::new().with("username", "bob"));
        assert!(url.ends_with("?game_id=42&username=bob&user_token="));
    }

    #[test]
    fn signature_is_md5_hex() {
        // md5("") is a well known constant
        assert_eq!(signer().sign(""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn signed_url_uses_private_key_only_for_the_signature() {
        let signer = signer();
        let params = ParameterSet::new()
            .with("username", "alice")
            .with("user_token", "tok123");

        let expected_signature = signer.sign(
            "http://gamejolt.com/api/game/v1/users/auth/?game_id=42&username=alice&user_token=tok123secret",
        );
        let url = signer.signed_url("users/auth/", &params);

        assert_eq!(
            url,
            format!(
                "http://gamejolt.com/api/game/v1/users/auth/?game_id=42&username=alice&signature={}&user_token=tok123",
                expected_signature
            )
        );
        assert!(!url.contains("secret"));
    }

    #[test]
    fn signing_is_deterministic_and_value_sensitive() {
        let signer = signer();
        let params = ParameterSet::new().with("trophy_id", "1").with("user_token", "t");

        let first = signer.signed_url("trophies/", &params);
        let second = signer.signed_url("trophies/", &params);
        assert_eq!(first, second);

        let changed = signer.signed_url("trophies/", &params.clone().with("trophy_id", "2"));
        let signature = |url: &str| {
            url.split('&')
                .find_map(|segment| segment.strip_prefix("signature="))
                .map(str::to_string)
        };
        assert_ne!(signature(&first), signature(&changed));

        let other_key = RequestSigner::new("http://gamejolt.com/api/game", 1, "42", "other");
        assert_ne!(
            signature(&first),
            signature(&other_key.signed_url("trophies/", &params))
        );
    }

    #[test]
    fn stale_signature_is_replaced() {
        let signer = signer();
        let params = ParameterSet::new().with("signature", "stale").with("user_token", "t");

        let url = signer.signed_url("trophies/", &params);
        assert_eq!(url.matches("signature=").count(), 1);
        assert!(!url.contains("stale"));
    }
}
