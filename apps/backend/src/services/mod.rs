pub mod rooms;
pub mod users;
