pub mod categories;
pub mod exclusions;
pub mod health;
pub mod months;
pub mod projections;
pub mod recurring;
pub mod transactions;
pub mod users;
