//! Notification sender adapters.

pub mod mock_adapter;
pub mod sendgrid;

pub use mock_adapter::MockMailAdapter;
pub use sendgrid::SendGridAdapter;
