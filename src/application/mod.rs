pub mod coordinator;
pub mod enrollment;
pub mod identity;
pub mod ledger;
pub mod progress;
pub mod rating;
