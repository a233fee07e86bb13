/*!
Identity artifacts: accounts, certificates, tickets and signs, with DER
and JSON persistence.
*/

mod certificate;
mod ids;
mod marshaller;
mod sign;
mod ticket;

pub use self::certificate::{Account, Certificate};
pub use self::ids::{AccountId, CertificateId, SignId, TicketId};
pub use self::marshaller::{Artifact, Asn1DataMarshaller, DataMarshaller, JsonDataMarshaller};
pub use self::sign::{ArtifactSigner, Sign};
pub use self::ticket::{
    Ticket, TicketData, UserIdTicket, UserIdType, UserInfoTicket, USER_AGE_MAX, USER_AGE_MIN,
};
