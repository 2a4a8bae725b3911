pub mod envelope;
pub mod matrix;
pub mod messages;
pub mod sensor_kind;
pub mod wire_error;

pub use envelope::{
    body_hash_hex, decode_message, encode_message, open_envelope, WireEnvelope,
    WIRE_ENCODING_CBOR, WIRE_VERSION,
};
pub use matrix::{
    decode_matrix, decode_vector, encode_matrix, encode_vector, ShapeMismatch, BYTES_PER_ELEMENT,
};
pub use sensor_kind::{MessageKind, SensorKind};
pub use wire_error::WireError;
