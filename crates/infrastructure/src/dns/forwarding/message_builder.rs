//! DNS Message Builder
//!
//! Constructs query messages in wire format using `hickory-proto`. Probe
//! queries are class IN with recursion desired; cache statistics are read
//! with class CHAOS TXT queries that leave RD clear.

use super::record_type_map::RecordTypeMapper;
use dns_sidecar_domain::{DomainError, RecordType};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType as HickoryRecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;

/// A serialized query and the transaction ID it carries.
#[derive(Debug, Clone)]
pub struct BuiltQuery {
    pub id: u16,
    pub bytes: Vec<u8>,
}

pub struct MessageBuilder;

impl MessageBuilder {
    /// Class IN query with a random ID and the RD flag set.
    pub fn build_query_with_id(
        domain: &str,
        record_type: &RecordType,
    ) -> Result<BuiltQuery, DomainError> {
        Self::build(
            domain,
            RecordTypeMapper::to_hickory(record_type),
            DNSClass::IN,
            true,
        )
    }

    /// Class CHAOS TXT query, e.g. `hits.bind.`.
    pub fn build_chaos_txt_query(name: &str) -> Result<BuiltQuery, DomainError> {
        Self::build(name, HickoryRecordType::TXT, DNSClass::CH, false)
    }

    fn build(
        domain: &str,
        record_type: HickoryRecordType,
        class: DNSClass,
        recursion_desired: bool,
    ) -> Result<BuiltQuery, DomainError> {
        let name = Name::from_str(domain).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", domain, e))
        })?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(record_type);
        query.set_query_class(class);

        let id = fastrand::u16(..);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(recursion_desired);
        message.add_query(query);

        let bytes = Self::serialize_message(&message)?;
        Ok(BuiltQuery { id, bytes })
    }

    fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDomainName(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
