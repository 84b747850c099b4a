pub mod game;
pub mod health;

pub use game::{create_game, delete_game, get_game, reset_game, submit_action};
pub use health::health;
