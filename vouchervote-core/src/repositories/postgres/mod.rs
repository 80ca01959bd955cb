// src/repositories/postgres/mod.rs

pub mod projects;
pub mod vouchers;
pub mod votes;

pub use projects::{PostgresProjectRepository, recompute_tally};
pub use vouchers::{PostgresVoucherRepository, redeem_voucher};
pub use votes::PostgresVoteRepository;
