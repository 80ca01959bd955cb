pub mod repository_traits;

pub use repository_traits::{ProjectRepository, VoteRepository, VoucherRepository};
