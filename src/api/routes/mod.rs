pub mod health;
pub mod submit;
pub mod forms;
pub mod validations;
pub mod integrations;
pub mod settings;
