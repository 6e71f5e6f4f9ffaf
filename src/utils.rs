//! Big-endian integer codecs shared by every hashed structure.

/// Converts the value of `value` to `out.len()` bytes in big-endian byte order.
///
/// Only the low `8 * out.len()` bits of `value` are kept; `out` may be at most
/// 8 bytes long.
pub fn ull_to_bytes(out: &mut [u8], value: u64) {
    assert!(out.len() <= 8, "ull_to_bytes: at most 8 output bytes");
    let mut value = value;
    for byte in out.iter_mut().rev() {
        *byte = (value & 0xff) as u8;
        value >>= 8;
    }
}

pub fn u32_to_bytes(value: u32) -> [u8; 4] {
    value.to_be_bytes()
}

pub fn u64_to_bytes(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Converts the bytes of `input` from big-endian byte order to an integer.
///
/// `input` may be at most 8 bytes long.
pub fn bytes_to_ull(input: &[u8]) -> u64 {
    assert!(input.len() <= 8, "bytes_to_ull: at most 8 input bytes");
    input
        .iter()
        .fold(0_u64, |acc, &byte| (acc << 8) | u64::from(byte))
}

pub fn bytes_to_u32(bytes: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*bytes)
}

pub(crate) fn set_byte_at(array: &mut [u8], value: u8, index: usize) {
    array[index] = value;
}

pub(crate) fn set_u32_at(array: &mut [u8], value: u32, start_index: usize) {
    array[start_index..start_index + 4].copy_from_slice(&u32_to_bytes(value));
}

pub(crate) fn set_u64_at(array: &mut [u8], value: u64, start_index: usize) {
    array[start_index..start_index + 8].copy_from_slice(&u64_to_bytes(value));
}

pub(crate) fn get_u32_at(array: &[u8], start_index: usize) -> u32 {
    bytes_to_ull(&array[start_index..start_index + 4]) as u32
}

pub(crate) fn get_u64_at(array: &[u8], start_index: usize) -> u64 {
    bytes_to_ull(&array[start_index..start_index + 8])
}

macro_rules! array_struct {
    ($type: ident, $size: expr) => {
        /// Securely holds data, using a `u8` array as an internal field.
        /// This struct implements `Zeroize`, ensuring the data is wiped from memory when dropped
        /// (`#[zeroize(drop)]`).
        /// Cloning is supported but should be done cautiously, as it duplicates sensitive
        /// information in memory.
        /// It also provide serialization via the `serialization` feature.
        #[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
        #[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
        pub struct $type(
            #[cfg_attr(feature = "serialization", serde(with = "BigArray"))] [u8; $size],
        );

        impl AsRef<[u8; $size]> for $type {
            fn as_ref(&self) -> &[u8; $size] {
                &self.0
            }
        }

        impl From<[u8; $size]> for $type {
            fn from(value: [u8; $size]) -> Self {
                Self(value)
            }
        }

        impl TryFrom<&[u8]> for $type {
            type Error = Error;
            fn try_from(data: &[u8]) -> Result<$type, Error> {
                if data.len() != $size {
                    Err(Error::BadLength($size, data.len()))
                } else {
                    let mut array = [0u8; $size];
                    array.copy_from_slice(data);
                    Ok($type(array))
                }
            }
        }

        impl PartialEq for $type {
            /// By no means constant time comparison
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }

        impl Eq for $type {}
    };
}

pub(crate) use array_struct;
