//! Domain ports defining the edges of the hexagon.
//!
//! [`ContactRelay`] is the driving port the HTTP adapter calls;
//! [`MailSender`] is the driven port the SMTP adapter implements. Errors are
//! strongly typed so adapters map provider failures into predictable
//! variants.

mod contact_relay;
mod mail_sender;

#[cfg(test)]
pub use contact_relay::MockContactRelay;
pub use contact_relay::{ContactRelay, RelayReceipt};
#[cfg(test)]
pub use mail_sender::MockMailSender;
pub use mail_sender::{DeliveryReceipt, FixtureMailSender, MailSender, MailSenderError};
