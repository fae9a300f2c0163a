pub mod comments;
pub mod posts;
pub mod replies;
pub mod tags;
pub mod votes;
pub mod wiki;
