pub use super::user::Entity as User;
pub use super::webhook::Entity as Webhook;
