pub mod finder;

pub use crate::domain::model::{Ticket, TicketSearch};
pub use crate::domain::ports::BusTicketApi;
pub use crate::utils::error::Result;
pub use finder::TicketFinder;
