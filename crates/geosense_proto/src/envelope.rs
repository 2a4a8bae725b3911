use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::sensor_kind::{MessageKind, SensorKind};
use crate::wire_error::WireError;

pub const WIRE_VERSION: u32 = 1;
pub const WIRE_ENCODING_CBOR: &str = "cbor";

/// Tagged container around one per-sensor message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireEnvelope {
    pub version: u32,
    pub sensor: SensorKind,
    pub message: MessageKind,
    #[serde(with = "serde_bytes")]
    pub body: Vec<u8>,
    pub body_hash: String,
}

impl WireEnvelope {
    pub fn tag(&self) -> (SensorKind, MessageKind) {
        (self.sensor, self.message)
    }
}

pub fn body_hash_hex(body: &[u8]) -> String {
    blake3::hash(body).to_hex().to_string()
}

pub fn encode_message<T: Serialize>(
    sensor: SensorKind,
    message: MessageKind,
    body: &T,
) -> Result<Vec<u8>, WireError> {
    let body = serde_cbor::to_vec(body).map_err(|err| WireError::Encode {
        reason: format!("{sensor} {message} body: {err}"),
    })?;
    let envelope = WireEnvelope {
        version: WIRE_VERSION,
        sensor,
        message,
        body_hash: body_hash_hex(&body),
        body,
    };
    serde_cbor::to_vec(&envelope).map_err(|err| WireError::Encode {
        reason: format!("{sensor} {message} envelope: {err}"),
    })
}

/// Parses and checks the envelope without touching the body schema.
pub fn open_envelope(bytes: &[u8]) -> Result<WireEnvelope, WireError> {
    let envelope: WireEnvelope = serde_cbor::from_slice(bytes)
        .map_err(|err| WireError::malformed(format!("envelope: {err}")))?;
    if envelope.version != WIRE_VERSION {
        return Err(WireError::malformed(format!(
            "unsupported wire version: expected={} actual={}",
            WIRE_VERSION, envelope.version
        )));
    }
    let actual_hash = body_hash_hex(&envelope.body);
    if actual_hash != envelope.body_hash {
        return Err(WireError::malformed(format!(
            "body hash mismatch: expected={} actual={}",
            envelope.body_hash, actual_hash
        )));
    }
    Ok(envelope)
}

pub fn decode_message<T: DeserializeOwned>(
    bytes: &[u8],
    sensor: SensorKind,
    message: MessageKind,
) -> Result<T, WireError> {
    let envelope = open_envelope(bytes)?;
    if envelope.tag() != (sensor, message) {
        return Err(WireError::malformed(format!(
            "unexpected message tag: expected={sensor}/{message} actual={}/{}",
            envelope.sensor, envelope.message
        )));
    }
    serde_cbor::from_slice(&envelope.body)
        .map_err(|err| WireError::malformed(format!("{sensor} {message} body: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::encode_vector;
    use crate::messages::{SensorParamsMessage, SensorResultsMessage};
    use nalgebra::DVector;

    fn params_bytes() -> Vec<u8> {
        encode_message(
            SensorKind::Gravity,
            MessageKind::Params,
            &SensorParamsMessage {
                returnsensordata: true,
            },
        )
        .expect("encode params")
    }

    #[test]
    fn envelope_carries_tag_and_version() {
        let envelope = open_envelope(&params_bytes()).expect("open");
        assert_eq!(envelope.version, WIRE_VERSION);
        assert_eq!(envelope.tag(), (SensorKind::Gravity, MessageKind::Params));

        let decoded: SensorParamsMessage =
            decode_message(&params_bytes(), SensorKind::Gravity, MessageKind::Params)
                .expect("decode");
        assert!(decoded.returnsensordata);
    }

    #[test]
    fn tag_mismatch_is_malformed() {
        let err = decode_message::<SensorParamsMessage>(
            &params_bytes(),
            SensorKind::Magnetism,
            MessageKind::Params,
        )
        .expect_err("wrong sensor");
        assert!(err.is_malformed_payload());
        assert!(err.to_string().contains("gravity/params"));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut envelope = open_envelope(&params_bytes()).expect("open");
        envelope.version = WIRE_VERSION + 1;
        let bytes = serde_cbor::to_vec(&envelope).expect("re-encode");
        let err = open_envelope(&bytes).expect_err("future version");
        assert!(err.to_string().contains("unsupported wire version"));
    }

    #[test]
    fn tampered_body_is_rejected() {
        let mut envelope = open_envelope(&params_bytes()).expect("open");
        envelope.body = serde_cbor::to_vec(&SensorParamsMessage {
            returnsensordata: false,
        })
        .expect("encode replacement");
        let bytes = serde_cbor::to_vec(&envelope).expect("re-encode");
        let err = open_envelope(&bytes).expect_err("hash mismatch");
        assert!(err.to_string().contains("body hash mismatch"));
    }

    #[test]
    fn matrix_payloads_travel_as_byte_strings() {
        let readings = DVector::from_fn(1000, |row, _| row as f64 * 0.5);
        let raw = encode_vector(&readings);
        let bytes = encode_message(
            SensorKind::Gravity,
            MessageKind::Results,
            &SensorResultsMessage {
                likelihood: 0.0,
                numreadings: Some(1000),
                readings: Some(raw.clone()),
            },
        )
        .expect("encode results");
        assert!(
            bytes.len() < raw.len() + 256,
            "wire={} raw={}",
            bytes.len(),
            raw.len()
        );

        let decoded: SensorResultsMessage =
            decode_message(&bytes, SensorKind::Gravity, MessageKind::Results).expect("decode");
        assert_eq!(decoded.readings, Some(raw));
    }

    #[test]
    fn garbage_is_malformed() {
        let err = open_envelope(b"not cbor at all").expect_err("garbage");
        assert!(err.is_malformed_payload());
        assert!(open_envelope(&[]).is_err());
    }
}
