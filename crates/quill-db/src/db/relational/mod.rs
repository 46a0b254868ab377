mod account;
mod game;

pub use account::{hash_secret, AccountRepository};
pub use game::GameRepository;
