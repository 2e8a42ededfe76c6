//! Wire types for the Rick and Morty REST API.
//!
//! Field names mirror the API's JSON exactly. Every field the backend may
//! omit carries a serde default so a sparse record still deserializes; the
//! translation into domain entities lives here too, next to the shapes it
//! reads from.

use serde::{Deserialize, Serialize};

use crate::domain::entity::{Character, Location, Origin};

// ============================================================================
// Wire Types
// ============================================================================

/// Paging envelope returned by the `/character` list endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CharacterPageDto {
    pub info: PageInfoDto,
    #[serde(default)]
    pub results: Vec<CharacterDto>,
}

/// Page metadata. Paging only consults the presence of `next`/`prev`;
/// the URLs themselves are never followed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PageInfoDto {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

/// One character record as the API serves it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CharacterDto {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub species: String,
    /// The wire field is `type`, which is a keyword here.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub origin: OriginDto,
    #[serde(default)]
    pub location: LocationDto,
    #[serde(default)]
    pub image: String,
    /// Episode URLs. The array occasionally carries explicit nulls.
    #[serde(default)]
    pub episode: Vec<Option<String>>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct OriginDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LocationDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

// ============================================================================
// Translation Layer
// ============================================================================

impl From<CharacterDto> for Character {
    fn from(dto: CharacterDto) -> Self {
        Character {
            id: dto.id,
            name: dto.name,
            status: dto.status,
            species: dto.species,
            kind: dto.kind,
            gender: dto.gender,
            origin: dto.origin.into(),
            location: dto.location.into(),
            image: dto.image,
            // Null entries name no episode; drop them.
            episodes: dto.episode.into_iter().flatten().collect(),
            url: dto.url,
            created: dto.created,
        }
    }
}

impl From<OriginDto> for Origin {
    fn from(dto: OriginDto) -> Self {
        Origin {
            name: dto.name,
            url: dto.url,
        }
    }
}

impl From<LocationDto> for Location {
    fn from(dto: LocationDto) -> Self {
        Location {
            name: dto.name,
            url: dto.url,
        }
    }
}
