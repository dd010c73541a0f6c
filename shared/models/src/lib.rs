//! # Mailshot Core Domain Models
//!
//! Data shared by every stage of a dispatch run.
//!
//! ## Key Models
//!
//! - **SenderConfig**: transport credentials and sender identity, immutable for a run
//! - **RecipientEntry**: one recipient's loosely typed variables
//! - **RecipientList**: the decoded recipient-data resource
//! - **EffectiveVariables**: the string-only mapping a template is rendered against
//! - **RenderedMessage**: the bytes handed to the transport for one recipient
//! - **DeliveryReport**: summary of a run that reached every recipient

pub mod sender;
pub mod recipient;
pub mod email;


pub use sender::*;
pub use recipient::*;
pub use email::*;
