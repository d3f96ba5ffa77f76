pub mod errors;
pub mod history_repository;
pub mod match_repository;
pub mod player_repository;
