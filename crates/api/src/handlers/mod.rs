pub mod animal;
pub mod health;
