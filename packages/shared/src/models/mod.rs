pub mod auth;
pub mod history;
pub mod match_session;
pub mod matches;
pub mod player;
pub mod settlement;
