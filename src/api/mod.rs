pub mod client;
pub mod types;

pub use client::{ApiError, CharacterApi, DEFAULT_BASE_URL};
pub use types::{CharacterDto, CharacterPageDto, LocationDto, OriginDto, PageInfoDto};
