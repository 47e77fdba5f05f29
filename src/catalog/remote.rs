//! GraphQL-over-HTTP catalog client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::state::Item;

use super::{CatalogClient, CatalogPage};

const CHARACTERS_QUERY: &str = "\
query Characters($page: Int!) {
  characters(page: $page) {
    info { count pages }
    results {
      id
      name
      status
      species
      gender
      origin { name }
      location { name }
      image
      episode { id }
    }
  }
}";

/// Catalog client speaking the characters GraphQL schema.
pub struct RemoteCatalog {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteCatalog {
    pub fn new(
        endpoint: impl Into<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl CatalogClient for RemoteCatalog {
    async fn fetch_page(&self, page: usize) -> Result<CatalogPage, ActionError> {
        if page == 0 {
            return Err(ActionError::Invariant("catalog pages are 1-based".into()));
        }

        let request = GraphQlRequest {
            query: CHARACTERS_QUERY,
            variables: Variables { page: page as u64 },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let body: GraphQlResponse = response
            .json()
            .await
            .map_err(|err| ActionError::Validation(format!("invalid JSON payload: {err}")))?;

        decode_page(body)
    }
}

/// Map a decoded GraphQL body onto a catalog page.
fn decode_page(body: GraphQlResponse) -> Result<CatalogPage, ActionError> {
    if let Some(error) = body.errors.first() {
        return Err(ActionError::Validation(format!(
            "graphql error: {}",
            error.message
        )));
    }

    let characters = body
        .data
        .and_then(|data| data.characters)
        .ok_or_else(|| ActionError::Validation("response carried no character data".into()))?;

    let items = characters
        .results
        .into_iter()
        .map(into_item)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CatalogPage {
        items,
        total_count: characters.info.count,
        total_pages: characters.info.pages,
    })
}

fn into_item(character: Character) -> Result<Item, ActionError> {
    let id = character.id.parse::<u64>().map_err(|_| {
        ActionError::Validation(format!("non-numeric item id '{}'", character.id))
    })?;

    Ok(Item {
        id,
        title: character.name,
        status: or_unknown(character.status),
        species: or_unknown(character.species),
        gender: or_unknown(character.gender),
        origin: or_unknown(character.origin.and_then(|place| place.name)),
        location: or_unknown(character.location.and_then(|place| place.name)),
        episode_count: character.episode.len(),
        image_url: character.image.unwrap_or_default(),
    })
}

fn or_unknown(value: Option<String>) -> String {
    match value {
        Some(value) if !value.is_empty() => value,
        _ => "Unknown".to_string(),
    }
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Variables,
}

#[derive(Serialize)]
struct Variables {
    page: u64,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<Data>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct Data {
    characters: Option<Characters>,
}

#[derive(Deserialize)]
struct Characters {
    info: PageInfo,
    #[serde(default)]
    results: Vec<Character>,
}

#[derive(Deserialize)]
struct PageInfo {
    count: usize,
    pages: usize,
}

#[derive(Deserialize)]
struct Character {
    id: String,
    name: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    species: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    origin: Option<Place>,
    #[serde(default)]
    location: Option<Place>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    episode: Vec<EpisodeRef>,
}

#[derive(Deserialize)]
struct Place {
    name: Option<String>,
}

// Only the episode count matters; the payload fields are ignored.
#[derive(Deserialize)]
struct EpisodeRef {}
