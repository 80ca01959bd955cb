// src/repositories/mod.rs

pub use vouchervote_common::traits::repository_traits::{
    ProjectRepository,
    VoteRepository,
    VoucherRepository,
};

pub use postgres::{
    PostgresProjectRepository,
    PostgresVoteRepository,
    PostgresVoucherRepository,
};

pub mod postgres;
