mod analytics;
mod custom_seats;
mod identity;
mod persistence;
mod voting;
