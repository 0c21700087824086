//! Client for the Game Jolt game API.
//!
//! Requests are signed with the game's private key, fetched through a
//! pluggable [`Transport`] and decoded from the API's `key:"value"` line
//! format into [`Record`]s.
//!
//! ```no_run
//! use gamejolt_client::{ClientOptions, GameApiClient, TrophyFilter};
//!
//! # fn example() -> Result<(), gamejolt_client::GameApiError> {
//! let client = GameApiClient::new(ClientOptions::new("12345", "private-key"))?;
//!
//! if client.verify_user("alice", "token")? {
//!     for trophy in client.fetch_trophies(TrophyFilter::Achieved)? {
//!         println!("{}", trophy);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod decoder;
pub mod errors;
mod ordered;
pub mod params;
pub mod signer;
pub mod structs;
pub mod transport;

pub use decoder::{DecodeMode, Decoded, ResponseDecoder};
pub use errors::GameApiError;
pub use params::ParameterSet;
pub use signer::RequestSigner;
pub use structs::client::GameApiClient;
pub use structs::record::{Record, Trophy, User};
pub use structs::{ClientOptions, Session, TrophyFilter};
pub use transport::{ReqwestTransport, Transport};
