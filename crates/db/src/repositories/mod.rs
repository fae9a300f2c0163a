//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-statement writes run in a
//! single transaction.

pub mod comment_repo;
pub mod main_post_repo;
pub mod page_repo;
pub mod reply_post_repo;
pub mod revision_repo;
pub mod tag_repo;
pub mod vote_repo;

pub use comment_repo::PageCommentRepo;
pub use main_post_repo::MainPostRepo;
pub use page_repo::PageRepo;
pub use reply_post_repo::ReplyPostRepo;
pub use revision_repo::RevisionRepo;
pub use tag_repo::TagRepo;
pub use vote_repo::VoteRepo;
