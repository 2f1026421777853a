use dns_sidecar_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RData;
use tracing::debug;

const HEADER_LEN: usize = 12;
/// QTYPE and QCLASS trailing the question name.
const QUESTION_FIXED_LEN: usize = 4;

#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub rcode: ResponseCode,

    pub truncated: bool,

    pub message: Message,
}

impl DnsResponse {
    /// Character strings of every TXT answer, in answer order. Any other
    /// record type in the answer section is rejected.
    pub fn txt_strings(&self) -> Result<Vec<String>, DomainError> {
        let mut strings = Vec::new();
        for record in self.message.answers() {
            match record.data() {
                RData::TXT(txt) => {
                    strings.extend(
                        txt.txt_data()
                            .iter()
                            .map(|s| String::from_utf8_lossy(s).into_owned()),
                    );
                }
                other => {
                    return Err(DomainError::UnexpectedTxtAnswer(format!(
                        "answer of type {} in place of TXT",
                        other.record_type()
                    )));
                }
            }
        }
        Ok(strings)
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let rcode = message.response_code();
        let truncated = message.truncated();

        debug!(
            rcode = ?rcode,
            answers = message.answers().len(),
            truncated,
            "DNS response parsed"
        );

        Ok(DnsResponse {
            rcode,
            truncated,
            message,
        })
    }

    /// Checks that the response echoes the single question of `query`.
    ///
    /// Works on the wire bytes: the question is the first thing after the
    /// header in both messages, so it can never be compressed. Names compare
    /// case-insensitively, type and class exactly.
    pub fn validate_question(query: &[u8], response: &[u8]) -> Result<(), DomainError> {
        if query.len() < HEADER_LEN + QUESTION_FIXED_LEN {
            return Err(DomainError::InvalidDnsResponse(
                "query too short to carry a question".to_string(),
            ));
        }

        let question = &query[HEADER_LEN..];
        let qdcount = match response.get(4..6) {
            Some(count) => u16::from_be_bytes([count[0], count[1]]),
            None => 0,
        };
        let echoed = response.get(HEADER_LEN..HEADER_LEN + question.len());

        let matches = match echoed {
            Some(echoed) if qdcount == 1 => {
                let split = question.len() - QUESTION_FIXED_LEN;
                echoed[..split].eq_ignore_ascii_case(&question[..split])
                    && echoed[split..] == question[split..]
            }
            _ => false,
        };

        if matches {
            Ok(())
        } else {
            Err(DomainError::QuestionMismatch(Self::describe_question(question)))
        }
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }

    /// Dotted name of a wire-format question, for error messages.
    fn describe_question(question: &[u8]) -> String {
        let mut labels = Vec::new();
        let mut pos = 0;
        while let Some(&len) = question.get(pos) {
            if len == 0 {
                break;
            }
            let start = pos + 1;
            let end = start + len as usize;
            match question.get(start..end) {
                Some(label) => labels.push(String::from_utf8_lossy(label).into_owned()),
                None => break,
            }
            pos = end;
        }
        format!("{}.", labels.join("."))
    }
}
