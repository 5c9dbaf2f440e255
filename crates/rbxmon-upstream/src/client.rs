//! Raw Roblox HTTP calls.
//!
//! Each method targets one capability and walks that capability's base URL
//! list through [`first_success`]. Nothing here caches; see
//! [`crate::RobloxSource`] and [`crate::GameNameResolver`] for that.

use std::sync::Arc;

use async_trait::async_trait;
use rbxmon_core::UpstreamConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;
use url::Url;

use crate::error::{Result, UpstreamError};
use crate::fallback::{endpoint, first_success};
use crate::game_name::GameCatalog;
use crate::wire::{
    GamesResponse, GroupMembership, GroupRolesResponse, PlaceUniverseResponse, PresenceRequest,
    PresenceResponse, UserPresence, UsernameLookupRequest, UsernameLookupResponse,
};

/// User agent sent with every request.
const USER_AGENT: &str = concat!("rbxmon/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the Roblox web APIs.
#[derive(Clone)]
pub struct RobloxClient {
    http: reqwest::Client,
    config: Arc<UpstreamConfig>,
}

impl RobloxClient {
    /// Creates a client for the given endpoints.
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Returns the endpoint configuration.
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Resolves a username to its numeric id.
    pub async fn lookup_user_id(&self, username: &str) -> Result<u64> {
        let response: UsernameLookupResponse =
            first_success("users", &self.config.users, |base| {
                let http = self.http.clone();
                let username = username.to_string();
                async move {
                    let url = endpoint(&base, "v1/usernames/users")?;
                    let body = UsernameLookupRequest {
                        usernames: [username.as_str()],
                        exclude_banned_users: true,
                    };
                    post_json(&http, url, &body).await
                }
            })
            .await?;

        response
            .data
            .first()
            .map(|hit| hit.id)
            .ok_or_else(|| UpstreamError::UsernameNotFound(username.to_string()))
    }

    /// Fetches the presence of one user id.
    ///
    /// `None` means upstream returned no entry for the user.
    pub async fn presence(&self, user_id: u64) -> Result<Option<UserPresence>> {
        let response: PresenceResponse =
            first_success("presence", &self.config.presence, |base| {
                let http = self.http.clone();
                async move {
                    let url = endpoint(&base, "v1/presence/users")?;
                    post_json(&http, url, &PresenceRequest { user_ids: [user_id] }).await
                }
            })
            .await?;

        Ok(response.user_presences.into_iter().next())
    }

    /// Lists the groups a user belongs to, with their role in each.
    pub async fn group_roles(&self, user_id: u64) -> Result<Vec<GroupMembership>> {
        let response: GroupRolesResponse =
            first_success("groups", &self.config.groups, |base| {
                let http = self.http.clone();
                async move {
                    let url = endpoint(&base, &format!("v1/users/{}/groups/roles", user_id))?;
                    get_json(&http, url).await
                }
            })
            .await?;

        Ok(response.data)
    }
}

#[async_trait]
impl GameCatalog for RobloxClient {
    async fn universe_name(&self, universe_id: u64) -> Result<Option<String>> {
        let response: GamesResponse = first_success("games", &self.config.games, |base| {
            let http = self.http.clone();
            async move {
                let mut url = endpoint(&base, "v1/games")?;
                url.query_pairs_mut()
                    .append_pair("universeIds", &universe_id.to_string());
                get_json(&http, url).await
            }
        })
        .await?;

        Ok(response
            .data
            .into_iter()
            .next()
            .and_then(|game| game.name)
            .filter(|name| !name.is_empty()))
    }

    async fn place_universe(&self, place_id: &str) -> Result<Option<u64>> {
        let path = format!("universes/v1/places/{}/universe", place_id);
        let response: PlaceUniverseResponse =
            first_success("places", &self.config.places, |base| {
                let http = self.http.clone();
                let path = path.clone();
                async move {
                    let url = endpoint(&base, &path)?;
                    get_json(&http, url).await
                }
            })
            .await?;

        Ok(response.universe_id)
    }
}

async fn get_json<T: DeserializeOwned>(http: &reqwest::Client, url: Url) -> Result<T> {
    trace!(url = %url, "GET");
    let response = http.get(url).send().await?.error_for_status()?;
    Ok(response.json().await?)
}

async fn post_json<T, B>(http: &reqwest::Client, url: Url, body: &B) -> Result<T>
where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
{
    trace!(url = %url, "POST");
    let response = http
        .post(url)
        .json(body)
        .send()
        .await?
        .error_for_status()?;
    Ok(response.json().await?)
}
