//! HTTP [`Directory`] implementation.

use std::sync::Arc;

use common::operations::{By, Select};
use derive_more::Debug;
use secrecy::{ExposeSecret as _, SecretString};
use serde::{de::IgnoredAny, Deserialize};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{integration, member, user, Integration, User},
    infra::{
        directory::{self, Cursor, Page},
        Directory,
    },
};

/// [`Http`] directory configuration.
#[derive(Debug)]
pub struct Config {
    /// Base URL of the users endpoint.
    pub url: String,

    /// API key sent as a bearer token.
    pub key: SecretString,

    /// Number of users requested per page.
    pub page_limit: u16,
}

/// [`Directory`] client talking to the directory's REST API.
#[derive(Clone, Debug)]
pub struct Http {
    /// Underlying HTTP client.
    #[debug(skip)]
    client: reqwest::Client,

    /// [`Config`] of this [`Http`] client.
    config: Arc<Config>,
}

impl Http {
    /// Creates a new [`Http`] directory client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the underlying HTTP client fails to initialize.
    pub fn new(config: Config) -> Result<Self, Traced<directory::Error>> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("guildsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(directory::Error::from)
            .map_err(tracerr::wrap!())?;
        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Performs an authorized `GET` request and decodes its JSON body.
    async fn get<T>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, directory::Error>
    where
        T: for<'de> Deserialize<'de>,
    {
        request
            .bearer_auth(self.config.key.expose_secret())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(Into::into)
    }
}

impl Directory<Select<By<Page, Option<Cursor>>>> for Http {
    type Ok = Page;
    type Err = Traced<directory::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Page, Option<Cursor>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let request = match by.into_inner() {
            Some(cursor) => self.client.get(String::from(cursor)),
            None => self
                .client
                .get(&self.config.url)
                .query(&[("limit", self.config.page_limit)]),
        };

        let ListResponse { users, next_page } =
            self.get(request).await.map_err(tracerr::wrap!())?;
        let listed = users.len();
        let users = users
            .into_iter()
            .filter_map(Record::valid)
            .map(User::from)
            .collect::<Vec<_>>();
        if users.len() < listed {
            log::warn!(
                "skipped {} malformed directory user records",
                listed - users.len(),
            );
        }
        log::debug!(
            "fetched {} directory users, next page: {next_page:?}",
            users.len(),
        );

        Ok(Page::new(
            users,
            next_page.filter(|p| !p.is_empty()).map(Cursor::from),
        ))
    }
}

impl Directory<Select<By<Option<User>, user::Id>>> for Http {
    type Ok = Option<User>;
    type Err = Traced<directory::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let url = format!("{}/{id}", self.config.url.trim_end_matches('/'));

        let details: DetailsResponse = self
            .get(self.client.get(url))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(details.exists.then(|| User {
            id,
            username: details.username.unwrap_or_default().into(),
            groups: details.groups.into_iter().map(|g| g.name.into()).collect(),
            integrations: details
                .integrations
                .into_iter()
                .filter_map(Record::valid)
                .map(Integration::from)
                .collect(),
            discord_id: details.discord_id.and_then(Snowflake::into_member_id),
        }))
    }
}

impl From<reqwest::Error> for directory::Error {
    fn from(e: reqwest::Error) -> Self {
        Self {
            status: e.status().map(|s| s.as_u16()),
            message: e.without_url().to_string(),
        }
    }
}

/// Response of the users listing endpoint.
#[derive(Debug, Deserialize)]
struct ListResponse {
    /// Users on the requested page.
    #[serde(default)]
    users: Vec<Record<UserResponse>>,

    /// URL of the next page, if any.
    #[serde(default)]
    next_page: Option<String>,
}

/// [`User`] as returned by the listing endpoint.
#[derive(Debug, Deserialize)]
struct UserResponse {
    id: u64,
    username: String,
    #[serde(default)]
    groups: Vec<GroupResponse>,
    #[serde(default)]
    integrations: Vec<Record<IntegrationResponse>>,
    #[serde(default)]
    discord_id: Option<Snowflake>,
}

impl From<UserResponse> for User {
    fn from(u: UserResponse) -> Self {
        Self {
            id: u.id.into(),
            username: u.username.into(),
            groups: u.groups.into_iter().map(|g| g.name.into()).collect(),
            integrations: u
                .integrations
                .into_iter()
                .filter_map(Record::valid)
                .map(Integration::from)
                .collect(),
            discord_id: u.discord_id.and_then(Snowflake::into_member_id),
        }
    }
}

/// Response of the single user endpoint.
#[derive(Debug, Deserialize)]
struct DetailsResponse {
    exists: bool,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    discord_id: Option<Snowflake>,
    #[serde(default)]
    integrations: Vec<Record<IntegrationResponse>>,
    #[serde(default)]
    groups: Vec<GroupResponse>,
}

#[derive(Debug, Deserialize)]
struct GroupResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct IntegrationResponse {
    integration: String,

    /// Absent for an integration that hasn't been linked yet.
    #[serde(default)]
    identifier: Option<String>,

    #[serde(default)]
    verified: bool,
}

impl From<IntegrationResponse> for Integration {
    fn from(i: IntegrationResponse) -> Self {
        Self {
            kind: integration::Kind::from(i.integration),
            identifier: i.identifier.unwrap_or_default(),
            verified: i.verified,
        }
    }
}

/// Listed record decoded on its own, so a malformed one is skipped instead
/// of failing the whole response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Record<T> {
    Valid(T),
    Malformed(IgnoredAny),
}

impl<T> Record<T> {
    /// Returns the decoded value, if this [`Record`] isn't malformed.
    fn valid(self) -> Option<T> {
        match self {
            Self::Valid(v) => Some(v),
            Self::Malformed(IgnoredAny) => None,
        }
    }
}

/// Chat ID recorded directly on a user, encoded either as a string or as a
/// number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Snowflake {
    Text(String),
    Number(u64),
}

impl Snowflake {
    /// Converts this [`Snowflake`] into a [`member::Id`], treating an empty
    /// one as absent.
    fn into_member_id(self) -> Option<member::Id> {
        let id = match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        };
        (!id.is_empty()).then(|| id.into())
    }
}

#[cfg(test)]
mod spec {
    use crate::domain::{integration, member, User};

    use super::{DetailsResponse, ListResponse, Record, Snowflake};

    #[test]
    fn decodes_listing() {
        let ListResponse { users, next_page } = serde_json::from_str(
            r#"{
                "users": [{
                    "id": 3,
                    "username": "Steve",
                    "groups": [{"id": 2, "name": "vip"}],
                    "integrations": [{
                        "integration": "Discord",
                        "identifier": "123456789",
                        "username": "steve_dc",
                        "verified": true
                    }]
                }],
                "next_page": "https://example.com/api/users?page=2"
            }"#,
        )
        .unwrap();

        assert_eq!(
            next_page.as_deref(),
            Some("https://example.com/api/users?page=2"),
        );
        let users = users
            .into_iter()
            .filter_map(Record::valid)
            .map(User::from)
            .collect::<Vec<_>>();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username.to_string(), "Steve");
        assert_eq!(users[0].groups, vec!["vip".into()]);
        assert_eq!(
            users[0]
                .chat_identity(&integration::Kind::default())
                .map(|i| i.member),
            Some(member::Id::from("123456789")),
        );
    }

    #[test]
    fn skips_malformed_records() {
        let ListResponse { users, .. } = serde_json::from_str(
            r#"{
                "users": [{
                    "id": 3,
                    "username": "Steve",
                    "integrations": [{
                        "integration": "Minecraft",
                        "identifier": null,
                        "verified": false
                    }, {
                        "integration": null,
                        "identifier": "1"
                    }, {
                        "integration": "Discord",
                        "identifier": "123456789",
                        "verified": true
                    }]
                }, {
                    "id": "four",
                    "username": "Alex"
                }, {
                    "id": 5,
                    "username": null
                }],
                "next_page": null
            }"#,
        )
        .unwrap();

        let users = users
            .into_iter()
            .filter_map(Record::valid)
            .map(User::from)
            .collect::<Vec<_>>();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].integrations.len(), 2);
        assert_eq!(
            users[0]
                .chat_identity(&integration::Kind::default())
                .map(|i| i.member),
            Some(member::Id::from("123456789")),
        );
    }

    #[test]
    fn decodes_last_page() {
        let ListResponse { users, next_page } =
            serde_json::from_str(r#"{"users": [], "next_page": null}"#)
                .unwrap();

        assert!(users.is_empty());
        assert!(next_page.is_none());
    }

    #[test]
    fn decodes_details() {
        let details: DetailsResponse = serde_json::from_str(
            r#"{
                "exists": true,
                "discord_id": 987654321,
                "integrations": [],
                "groups": [{"name": "admin"}]
            }"#,
        )
        .unwrap();

        assert!(details.exists);
        assert_eq!(
            details.discord_id.and_then(Snowflake::into_member_id),
            Some(member::Id::from("987654321")),
        );

        let missing: DetailsResponse =
            serde_json::from_str(r#"{"exists": false}"#).unwrap();
        assert!(!missing.exists);
    }

    #[test]
    fn empty_snowflake_is_absent() {
        assert_eq!(Snowflake::Text(String::new()).into_member_id(), None);
    }
}
