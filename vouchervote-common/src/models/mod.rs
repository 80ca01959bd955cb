// File: vouchervote-common/src/models/mod.rs
pub mod project;
pub mod voucher;

pub use project::{NewProject, Project, ProjectVotes};
pub use voucher::{LoadSummary, NewVoucher, VoteReceipt, Voucher, VoucherCode};
