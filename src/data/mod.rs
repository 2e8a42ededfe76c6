pub mod paging;
pub mod repository;

pub use paging::HttpPageSource;
pub use repository::HttpCharacterRepository;
