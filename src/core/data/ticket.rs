/*!
Identity tickets.

A [`Ticket`] is an identity claim bound to a certificate. Its payload is
one of a closed set of kinds ([`TicketData`]); callers view a ticket as a
specific kind with `as_*` (returns `Option`) or `try_*` (returns a
`DynamicTypeKind` error) instead of casting.

```text
Ticket ::= SEQUENCE {
    id    TicketId,
    data  CHOICE {
        userId    [0] SEQUENCE { userId UTF8String, userIdType INTEGER },
        userInfo  [1] SEQUENCE { firstName UTF8String, lastName UTF8String,
                                 age INTEGER (1..144) } } }
```
*/

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::asn1::{Asn1Compatible, Asn1Reader, Asn1Writer};
use crate::core::error::{Error, Result};
use super::ids::TicketId;

const USER_ID_TAG: u8 = 0;
const USER_INFO_TAG: u8 = 1;

/// Youngest accepted age
pub const USER_AGE_MIN: u32 = 1;
/// Oldest accepted age
pub const USER_AGE_MAX: u32 = 144;

/// Kind of identifier carried by a [`UserIdTicket`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserIdType {
    Email,
    Phone,
    Fax,
    Domain,
    MacAddress,
    Application,
}

impl UserIdType {
    pub const fn code(&self) -> u8 {
        match self {
            UserIdType::Email => 0,
            UserIdType::Phone => 1,
            UserIdType::Fax => 2,
            UserIdType::Domain => 3,
            UserIdType::MacAddress => 4,
            UserIdType::Application => 5,
        }
    }

    pub fn from_code(code: u64) -> Result<Self> {
        match code {
            0 => Ok(UserIdType::Email),
            1 => Ok(UserIdType::Phone),
            2 => Ok(UserIdType::Fax),
            3 => Ok(UserIdType::Domain),
            4 => Ok(UserIdType::MacAddress),
            5 => Ok(UserIdType::Application),
            _ => crate::encoding_err!("unknown user id type code {}", code),
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            UserIdType::Email => "email",
            UserIdType::Phone => "phone",
            UserIdType::Fax => "fax",
            UserIdType::Domain => "domain",
            UserIdType::MacAddress => "mac_address",
            UserIdType::Application => "application",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "email" => Ok(UserIdType::Email),
            "phone" => Ok(UserIdType::Phone),
            "fax" => Ok(UserIdType::Fax),
            "domain" => Ok(UserIdType::Domain),
            "mac_address" => Ok(UserIdType::MacAddress),
            "application" => Ok(UserIdType::Application),
            _ => crate::encoding_err!("unknown user id type name '{}'", name),
        }
    }
}

impl fmt::Display for UserIdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Claim that the holder owns an identifier (email, phone, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdTicket {
    pub user_id: String,
    pub user_id_type: UserIdType,
}

impl UserIdTicket {
    pub fn new(user_id: impl Into<String>, user_id_type: UserIdType) -> Self {
        Self {
            user_id: user_id.into(),
            user_id_type,
        }
    }
}

/// Profile information about the holder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfoTicket {
    #[serde(rename = "user_first_name")]
    first_name: String,
    #[serde(rename = "user_last_name")]
    last_name: String,
    #[serde(rename = "user_age")]
    age: u32,
}

impl UserInfoTicket {
    /// Fails with `ArgumentRange` unless `age` is within 1..=144
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, age: u32) -> Result<Self> {
        let ticket = Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            age,
        };
        ticket.validate()?;
        Ok(ticket)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(USER_AGE_MIN..=USER_AGE_MAX).contains(&self.age) {
            return crate::argument_range_err!(
                "user age {} is outside {}..={}",
                self.age,
                USER_AGE_MIN,
                USER_AGE_MAX
            );
        }
        Ok(())
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn age(&self) -> u32 {
        self.age
    }
}

/// Payload of a ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketData {
    UserId(UserIdTicket),
    UserInfo(UserInfoTicket),
}

impl TicketData {
    /// Wire name of the kind
    pub const fn kind(&self) -> &'static str {
        match self {
            TicketData::UserId(_) => USER_ID_KIND,
            TicketData::UserInfo(_) => USER_INFO_KIND,
        }
    }
}

pub(crate) const USER_ID_KIND: &str = "user_id_ticket";
pub(crate) const USER_INFO_KIND: &str = "user_info_ticket";

/// Identity claim bound to a certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TicketJson", try_from = "TicketJson")]
pub struct Ticket {
    pub id: TicketId,
    pub data: TicketData,
}

impl Ticket {
    pub fn new(id: TicketId, data: TicketData) -> Self {
        Self { id, data }
    }

    pub fn is_user_id(&self) -> bool {
        matches!(self.data, TicketData::UserId(_))
    }

    pub fn is_user_info(&self) -> bool {
        matches!(self.data, TicketData::UserInfo(_))
    }

    pub fn as_user_id(&self) -> Option<&UserIdTicket> {
        match &self.data {
            TicketData::UserId(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_user_info(&self) -> Option<&UserInfoTicket> {
        match &self.data {
            TicketData::UserInfo(t) => Some(t),
            _ => None,
        }
    }

    /// View as a user id ticket or fail with `DynamicTypeKind`
    pub fn try_user_id(&self) -> Result<&UserIdTicket> {
        self.as_user_id().ok_or_else(|| Error::DynamicTypeKind {
            expected: USER_ID_KIND.to_string(),
            actual: self.data.kind().to_string(),
        })
    }

    /// View as a user info ticket or fail with `DynamicTypeKind`
    pub fn try_user_info(&self) -> Result<&UserInfoTicket> {
        self.as_user_info().ok_or_else(|| Error::DynamicTypeKind {
            expected: USER_INFO_KIND.to_string(),
            actual: self.data.kind().to_string(),
        })
    }
}

impl Asn1Compatible for Ticket {
    fn asn1_write(&self, writer: &mut Asn1Writer) -> Result<usize> {
        let (tag, mut data_len) = match &self.data {
            TicketData::UserId(t) => {
                let mut len = writer.write_integer(u64::from(t.user_id_type.code()));
                len += writer.write_utf8_string(&t.user_id);
                (USER_ID_TAG, len)
            }
            TicketData::UserInfo(t) => {
                let mut len = writer.write_integer(u64::from(t.age));
                len += writer.write_utf8_string(&t.last_name);
                len += writer.write_utf8_string(&t.first_name);
                (USER_INFO_TAG, len)
            }
        };
        data_len += writer.write_sequence(data_len);
        data_len += writer.write_context_tag(tag, data_len);
        let len = data_len + self.id.asn1_write(writer)?;
        Ok(len + writer.write_sequence(len))
    }

    fn asn1_read(reader: &mut Asn1Reader<'_>) -> Result<Self> {
        let mut seq = reader.read_sequence()?;
        let id = TicketId::asn1_read(&mut seq)?;
        let data = if let Some(mut choice) = seq.read_context_tag(USER_ID_TAG)? {
            let mut fields = choice.read_sequence()?;
            let user_id = fields.read_utf8_string()?;
            let user_id_type = UserIdType::from_code(fields.read_integer()?)?;
            fields.finish()?;
            choice.finish()?;
            TicketData::UserId(UserIdTicket { user_id, user_id_type })
        } else if let Some(mut choice) = seq.read_context_tag(USER_INFO_TAG)? {
            let mut fields = choice.read_sequence()?;
            let first_name = fields.read_utf8_string()?;
            let last_name = fields.read_utf8_string()?;
            let age = u32::try_from(fields.read_integer()?)
                .map_err(|_| Error::ArgumentRange("user age does not fit in 32 bits".into()))?;
            fields.finish()?;
            choice.finish()?;
            TicketData::UserInfo(UserInfoTicket::new(first_name, last_name, age)?)
        } else {
            return crate::encoding_err!("ticket type was not recognized");
        };
        seq.finish()?;
        Ok(Self { id, data })
    }
}

/// JSON shape: `{"id": {...}, "type": "user_id_ticket", "data": {...}}`
#[derive(Serialize, Deserialize)]
struct TicketJson {
    id: TicketId,
    #[serde(rename = "type")]
    kind: String,
    data: serde_json::Value,
}

impl From<Ticket> for TicketJson {
    fn from(ticket: Ticket) -> Self {
        let kind = ticket.data.kind().to_string();
        let data = match ticket.data {
            TicketData::UserId(t) => serde_json::to_value(t),
            TicketData::UserInfo(t) => serde_json::to_value(t),
        }
        .unwrap_or(serde_json::Value::Null);
        Self { id: ticket.id, kind, data }
    }
}

impl TryFrom<TicketJson> for Ticket {
    type Error = Error;

    fn try_from(json: TicketJson) -> Result<Self> {
        let data = match json.kind.as_str() {
            USER_ID_KIND => TicketData::UserId(serde_json::from_value(json.data)?),
            USER_INFO_KIND => {
                let info: UserInfoTicket = serde_json::from_value(json.data)?;
                info.validate()?;
                TicketData::UserInfo(info)
            }
            other => return crate::encoding_err!("unknown ticket type '{}'", other),
        };
        Ok(Self { id: json.id, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> TicketId {
        TicketId {
            account_id: "account".into(),
            certificate_id: "certificate".into(),
            ticket_id: "ticket".into(),
        }
    }

    #[test]
    fn test_views() {
        let ticket = Ticket::new(
            id(),
            TicketData::UserId(UserIdTicket::new("user@example.com", UserIdType::Email)),
        );
        assert!(ticket.is_user_id());
        assert!(ticket.as_user_id().is_some());
        assert!(ticket.as_user_info().is_none());
        assert_eq!(ticket.try_user_id().unwrap().user_id, "user@example.com");
        match ticket.try_user_info() {
            Err(Error::DynamicTypeKind { expected, actual }) => {
                assert_eq!(expected, "user_info_ticket");
                assert_eq!(actual, "user_id_ticket");
            }
            other => panic!("Expected DynamicTypeKind error, got {:?}", other),
        }
    }

    #[test]
    fn test_age_range() {
        assert!(UserInfoTicket::new("A", "B", 1).is_ok());
        assert!(UserInfoTicket::new("A", "B", 144).is_ok());
        assert!(matches!(UserInfoTicket::new("A", "B", 0), Err(Error::ArgumentRange(_))));
        assert!(matches!(UserInfoTicket::new("A", "B", 145), Err(Error::ArgumentRange(_))));
    }

    #[test]
    fn test_user_id_type_names() {
        for code in 0..6u64 {
            let kind = UserIdType::from_code(code).unwrap();
            assert_eq!(u64::from(kind.code()), code);
            assert_eq!(UserIdType::from_name(kind.name()).unwrap(), kind);
        }
        assert!(UserIdType::from_code(6).is_err());
        assert!(UserIdType::from_name("pager").is_err());
    }

    #[test]
    fn test_asn1_user_info() -> Result<()> {
        let ticket = Ticket::new(id(), TicketData::UserInfo(UserInfoTicket::new("Ada", "Lovelace", 36)?));
        let der = ticket.to_asn1()?;
        let parsed = Ticket::from_asn1(&der)?;
        assert_eq!(parsed, ticket);
        assert_eq!(parsed.try_user_info()?.age(), 36);
        Ok(())
    }

    #[test]
    fn test_asn1_unknown_choice() -> Result<()> {
        let mut w = Asn1Writer::new();
        let mut len = w.write_null();
        len += w.write_context_tag(4, len);
        len += id().asn1_write(&mut w)?;
        w.write_sequence(len);
        assert!(matches!(Ticket::from_asn1(&w.finish()), Err(Error::Encoding(_))));
        Ok(())
    }

    #[test]
    fn test_asn1_extra_field_in_choice() -> Result<()> {
        let mut w = Asn1Writer::new();
        let mut len = w.write_null();
        len += w.write_integer(u64::from(UserIdType::MacAddress.code()));
        len += w.write_utf8_string("+100200300");
        len += w.write_sequence(len);
        len += w.write_context_tag(USER_ID_TAG, len);
        len += id().asn1_write(&mut w)?;
        w.write_sequence(len);
        assert!(matches!(Ticket::from_asn1(&w.finish()), Err(Error::Encoding(_))));
        Ok(())
    }

    #[test]
    fn test_json_shape() -> Result<()> {
        let ticket = Ticket::new(
            id(),
            TicketData::UserId(UserIdTicket::new("+100200300", UserIdType::MacAddress)),
        );
        let value = serde_json::to_value(&ticket)?;
        assert_eq!(value["type"], "user_id_ticket");
        assert_eq!(value["data"]["user_id_type"], "mac_address");
        assert_eq!(value["id"]["ticket_id"], "ticket");
        assert_eq!(serde_json::from_value::<Ticket>(value)?, ticket);
        Ok(())
    }

    #[test]
    fn test_json_rejects_bad_age() {
        let json = serde_json::json!({
            "id": {"account_id": "a", "certificate_id": "c", "ticket_id": "t"},
            "type": "user_info_ticket",
            "data": {"user_first_name": "A", "user_last_name": "B", "user_age": 200}
        });
        assert!(serde_json::from_value::<Ticket>(json).is_err());
    }
}
