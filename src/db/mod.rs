pub mod connection;
pub mod schema;
pub mod accounts;
pub mod forms;
pub mod validations;
pub mod integrations;
pub mod logs;

pub use connection::Database;
pub use accounts::AccountRow;
pub use forms::FormRow;
pub use validations::NewValidation;
