pub mod cast_member;
pub mod cinema;
pub mod genre;
pub mod hall;
pub mod movie;
pub mod movie_cast;
pub mod movie_genre;
pub mod position;
pub mod session;
