pub mod entity;
pub mod error;
pub mod feed;
pub mod paging;
pub mod repository;
pub mod usecase;

pub use entity::{Character, Location, Origin};
pub use error::{CharacterError, ErrorKind};
pub use feed::{CharacterFeed, FeedRequest, LoadState};
pub use paging::{CharacterPage, FIRST_PAGE, PageSource};
pub use repository::CharacterRepository;
pub use usecase::{GetCharacterById, GetCharacters, PAGE_SIZE};
