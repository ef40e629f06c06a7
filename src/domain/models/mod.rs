pub mod message;
pub mod outcome;
pub mod recipient;
pub mod token;

pub use message::{EncodedMessage, Message, MessageBody, MessageKind};
pub use outcome::{BatchProgress, BatchReport, DeliveryOutcome};
pub use recipient::{ReceiveIdType, Recipient, ResolvedRecipient, UserIdType};
pub use token::{AccessToken, Credentials, IssuedToken};
