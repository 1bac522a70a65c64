//! Persisted group descriptor

use frostgen_core::Curve;
use serde::{Deserialize, Serialize};

use crate::error::{DkgError, DkgResult};

/// Public description of an accepted group key
///
/// `gkx` is the x-coordinate as a `0x`-prefixed, minimal even-length hex
/// integer and `gkyp` the parity of the y-coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrostGroup {
    pub gkx: String,
    pub gkyp: u8,
}

impl FrostGroup {
    /// Build from a compressed group key
    pub fn from_group_key(group_key: &[u8]) -> DkgResult<Self> {
        let (prefix, x) = match group_key.split_first() {
            Some((prefix, x)) if !x.is_empty() && (prefix & 0xfe) == 0x02 => (prefix, x),
            _ => {
                return Err(DkgError::Serialization(format!(
                    "group key is not a compressed point ({} bytes)",
                    group_key.len()
                )))
            }
        };

        Ok(Self {
            gkx: minimal_hex(x),
            gkyp: prefix & 1,
        })
    }

    /// Recover the compressed encoding, validating it as a point of `C`
    pub fn to_compressed<C: Curve>(&self) -> DkgResult<Vec<u8>> {
        if self.gkyp > 1 {
            return Err(DkgError::Deserialization(format!(
                "gkyp must be 0 or 1, got {}",
                self.gkyp
            )));
        }

        let digits = self
            .gkx
            .strip_prefix("0x")
            .ok_or_else(|| DkgError::Deserialization("gkx is missing its 0x prefix".to_string()))?;
        let x = hex::decode(digits)
            .map_err(|e| DkgError::Deserialization(format!("gkx is not hex: {}", e)))?;

        let width = C::POINT_SIZE - 1;
        let significant = x.iter().skip_while(|b| **b == 0).count();
        if significant > width {
            return Err(DkgError::Deserialization(format!(
                "gkx does not fit in {} bytes",
                width
            )));
        }

        let mut encoded = vec![0u8; C::POINT_SIZE];
        encoded[0] = 0x02 | self.gkyp;
        encoded[C::POINT_SIZE - significant..].copy_from_slice(&x[x.len() - significant..]);

        C::decode_point(&encoded)?;
        Ok(encoded)
    }

    /// JSON text of the descriptor
    pub fn to_json(&self) -> DkgResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// `0x` followed by the big-endian bytes with leading zero bytes removed
fn minimal_hex(bytes: &[u8]) -> String {
    let start = bytes
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(bytes.len());

    if start == bytes.len() {
        return "0x00".to_string();
    }
    format!("0x{}", hex::encode(&bytes[start..]))
}
