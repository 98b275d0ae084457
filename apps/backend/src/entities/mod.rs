pub mod game_players;
pub mod games;
pub mod moves;
pub mod rounds;
pub mod users;
