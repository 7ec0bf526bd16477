pub mod cards;
pub mod catalog;
pub mod health;
pub mod portfolio;
pub mod reports;
