//! Value payloads: the owned byte buffers behind a variable's value.

use smallvec::SmallVec;

/// Bytes stored inline before a payload spills to the heap.
///
/// Most RIVL members are addresses, ports, and flags well under this size.
const INLINE_BYTES: usize = 16;

/// One element of a variable's value.
///
/// The bytes are opaque to the store; their meaning comes from the
/// variable's element type and is interpreted by the evaluator.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValuePayload {
    bytes: SmallVec<[u8; INLINE_BYTES]>,
}

impl ValuePayload {
    /// An empty payload, as allocated for a freshly declared variable.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slice(bytes: &[u8]) -> Self {
        ValuePayload {
            bytes: SmallVec::from_slice(bytes),
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Replace the contents, reusing the existing allocation where possible.
    pub fn set(&mut self, bytes: &[u8]) {
        self.bytes.clear();
        self.bytes.extend_from_slice(bytes);
    }
}

impl From<Vec<u8>> for ValuePayload {
    fn from(bytes: Vec<u8>) -> Self {
        ValuePayload {
            bytes: SmallVec::from_vec(bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload() {
        let payload = ValuePayload::new();
        assert!(payload.is_empty());
        assert_eq!(payload.len(), 0);
        assert!(!payload.bytes.spilled());
    }

    #[test]
    fn test_set_replaces_contents() {
        let mut payload = ValuePayload::from_slice(&[1, 2, 3, 4]);
        payload.set(&[9, 8]);
        assert_eq!(payload.as_bytes(), &[9, 8]);
    }

    #[test]
    fn test_large_payload_spills() {
        let payload = ValuePayload::from(vec![0xAB; 64]);
        assert_eq!(payload.len(), 64);
        assert!(payload.bytes.spilled());
    }
}
