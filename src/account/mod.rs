//! Account entity and persistence layer

pub mod model;
pub mod store;

pub use model::{Account, AccountRole};
pub use store::{AccountStore, StoreError};
