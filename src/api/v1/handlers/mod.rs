pub mod actors;
pub mod health;
pub mod index;
pub mod movies;
