//! Contact form messages.

mod message;
mod service;

pub use message::{ContactMessage, NewContactMessage};
pub use service::ContactService;
