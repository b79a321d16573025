pub mod movie;
pub mod rating;
pub mod search;
pub mod summary;
pub mod watched;

pub use movie::MovieDetail;
pub use rating::{RatingError, UserRating};
pub use search::SearchResult;
pub use summary::WatchedSummary;
pub use watched::{Runtime, WatchedEntry};
