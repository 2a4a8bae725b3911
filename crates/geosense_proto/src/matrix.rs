//! Flat byte encoding for numeric matrices carried inside wire messages.
//!
//! Elements are written row-major as little-endian `f64`, with no header.
//! Shape travels next to the bytes: the row count as an explicit message
//! field, the column count fixed by whoever decodes.

use std::fmt;

use nalgebra::{DMatrix, DVector};

pub const BYTES_PER_ELEMENT: usize = std::mem::size_of::<f64>();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMismatch {
    pub rows: usize,
    pub cols: usize,
    pub byte_len: usize,
}

impl fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "matrix shape mismatch: rows={} cols={} cannot be decoded from {} bytes",
            self.rows, self.cols, self.byte_len
        )
    }
}

impl std::error::Error for ShapeMismatch {}

pub fn encode_matrix(matrix: &DMatrix<f64>) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(matrix.len() * BYTES_PER_ELEMENT);
    for row in matrix.row_iter() {
        for value in row.iter() {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
    }
    bytes
}

pub fn decode_matrix(
    bytes: &[u8],
    rows: usize,
    cols: usize,
) -> Result<DMatrix<f64>, ShapeMismatch> {
    let values = decode_elements(bytes, rows, cols)?;
    Ok(DMatrix::from_row_slice(rows, cols, &values))
}

pub fn encode_vector(vector: &DVector<f64>) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vector.len() * BYTES_PER_ELEMENT);
    for value in vector.iter() {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

pub fn decode_vector(bytes: &[u8], len: usize) -> Result<DVector<f64>, ShapeMismatch> {
    let values = decode_elements(bytes, len, 1)?;
    Ok(DVector::from_vec(values))
}

fn decode_elements(bytes: &[u8], rows: usize, cols: usize) -> Result<Vec<f64>, ShapeMismatch> {
    let mismatch = ShapeMismatch {
        rows,
        cols,
        byte_len: bytes.len(),
    };
    let expected_len = rows
        .checked_mul(cols)
        .and_then(|count| count.checked_mul(BYTES_PER_ELEMENT))
        .ok_or(mismatch)?;
    if expected_len != bytes.len() {
        return Err(mismatch);
    }

    let values = bytes
        .chunks_exact(BYTES_PER_ELEMENT)
        .map(|chunk| {
            let mut element = [0u8; BYTES_PER_ELEMENT];
            element.copy_from_slice(chunk);
            f64::from_le_bytes(element)
        })
        .collect();
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn encoding_is_row_major() {
        let matrix = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let bytes = encode_matrix(&matrix);
        assert_eq!(bytes.len(), 6 * BYTES_PER_ELEMENT);
        assert_eq!(&bytes[..8], &1.0f64.to_le_bytes());
        assert_eq!(&bytes[8..16], &2.0f64.to_le_bytes());
        assert_eq!(&bytes[24..32], &4.0f64.to_le_bytes());
    }

    #[test]
    fn empty_matrix_keeps_column_count() {
        let empty = DMatrix::<f64>::zeros(0, 3);
        let bytes = encode_matrix(&empty);
        assert!(bytes.is_empty());

        let decoded = decode_matrix(&bytes, 0, 3).expect("decode empty");
        assert_eq!(decoded.nrows(), 0);
        assert_eq!(decoded.ncols(), 3);
    }

    #[test]
    fn row_count_disagreeing_with_length_is_rejected() {
        let matrix = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let bytes = encode_matrix(&matrix);

        let err = decode_matrix(&bytes, 3, 3).expect_err("row count too large");
        assert_eq!(
            err,
            ShapeMismatch {
                rows: 3,
                cols: 3,
                byte_len: 48
            }
        );
        assert!(decode_matrix(&bytes[..47], 2, 3).is_err());
        assert!(decode_matrix(&[], 1, 3).is_err());
        assert!(decode_matrix(&bytes, 0, 3).is_err());
    }

    #[test]
    fn oversized_shape_does_not_overflow() {
        assert!(decode_matrix(&[], usize::MAX, 3).is_err());
    }

    #[test]
    fn vector_preserves_special_values_bitwise() {
        let vector = DVector::from_vec(vec![-0.0, f64::MIN_POSITIVE, f64::MAX, 1.0 / 3.0]);
        let decoded = decode_vector(&encode_vector(&vector), 4).expect("decode vector");
        for (left, right) in vector.iter().zip(decoded.iter()) {
            assert_eq!(left.to_bits(), right.to_bits());
        }
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(
            rows in 0usize..12,
            cols in 1usize..5,
            seed in proptest::collection::vec(any::<f64>(), 60),
        ) {
            let matrix = DMatrix::from_fn(rows, cols, |row, col| seed[row * cols + col]);
            let decoded = decode_matrix(&encode_matrix(&matrix), rows, cols).expect("decode");
            prop_assert_eq!(decoded.shape(), matrix.shape());
            for (left, right) in matrix.iter().zip(decoded.iter()) {
                prop_assert_eq!(left.to_bits(), right.to_bits());
            }
        }
    }
}
