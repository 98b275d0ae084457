pub mod games;
pub mod memberships;
pub mod moves;
pub mod rounds;
pub mod users;
