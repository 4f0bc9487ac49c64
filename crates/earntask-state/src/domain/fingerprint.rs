//! # Proof Fingerprint
//!
//! Cheap duplicate-detection key for submitted proof images.
//!
//! The key is the declared byte size paired with a fixed-offset slice of the
//! payload. Two byte-identical uploads always collide; a resized or re-shot
//! screenshot almost never does. This is a heuristic, not real deduplication:
//! unrelated images can collide by size-and-slice coincidence, and a trivial
//! edit defeats it. A stronger design would digest the full payload.

use serde::{Deserialize, Serialize};

/// Byte range of the payload that feeds the fingerprint.
const SLICE_START: usize = 100;
const SLICE_END: usize = 200;

/// Duplicate-detection key: declared size + fixed-offset payload slice.
///
/// Compared for exact equality across all submissions, regardless of task or
/// user, so a screenshot reused on a different task is still caught.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProofFingerprint {
    declared_size: u64,
    slice: Vec<u8>,
}

impl ProofFingerprint {
    /// Derive the fingerprint from a proof payload and its declared size.
    ///
    /// The slice window is clamped to the payload length, so short payloads
    /// still produce a stable (possibly empty) key.
    pub fn derive(declared_size: u64, payload: &[u8]) -> Self {
        let start = SLICE_START.min(payload.len());
        let end = SLICE_END.min(payload.len());
        Self {
            declared_size,
            slice: payload[start..end].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_payloads_collide() {
        let payload = vec![0xAB; 4096];
        let a = ProofFingerprint::derive(4096, &payload);
        let b = ProofFingerprint::derive(4096, &payload);
        assert_eq!(a, b);
    }

    #[test]
    fn test_size_distinguishes_payloads_with_equal_slice() {
        let payload = vec![0xAB; 4096];
        let a = ProofFingerprint::derive(4096, &payload);
        let b = ProofFingerprint::derive(4097, &payload);
        assert_ne!(a, b);
    }

    #[test]
    fn test_bytes_outside_window_are_ignored() {
        let mut payload = vec![0u8; 4096];
        let a = ProofFingerprint::derive(4096, &payload);
        payload[0] = 0xFF;
        payload[4000] = 0xFF;
        let b = ProofFingerprint::derive(4096, &payload);
        assert_eq!(a, b, "only bytes 100..200 feed the key");
        payload[150] = 0xFF;
        let c = ProofFingerprint::derive(4096, &payload);
        assert_ne!(a, c);
    }

    #[test]
    fn test_short_payload_clamps_window() {
        let a = ProofFingerprint::derive(50, &[1u8; 50]);
        let b = ProofFingerprint::derive(50, &[2u8; 50]);
        // Window is empty below offset 100; only the size differentiates.
        assert_eq!(a, b);
        let c = ProofFingerprint::derive(150, &[1u8; 150]);
        let d = ProofFingerprint::derive(150, &[2u8; 150]);
        assert_ne!(c, d);
    }
}
