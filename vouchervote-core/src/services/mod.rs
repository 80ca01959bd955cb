pub mod voting_service;
pub mod voucher_loader;

pub use voting_service::VotingService;
pub use voucher_loader::{VoucherLoader, parse_codes};
