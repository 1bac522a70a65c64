//! Console report of a generated group
//!
//! Downstream tooling parses these lines, so field names and ordering are
//! fixed:
//!
//! ```text
//!
//! VALIDATOR 1
//! FROST_UUID=1
//! FROST_PUBKEY=<hex>
//! FROST_PKEY=<hex>
//! ...
//!
//! FROST_GKEY=<hex>
//! FROST_UUIDS=1,2,3
//! FROST_PUBKEYS=<hex>,<hex>,<hex>
//! FROST_THRESHOLD=2
//! ```

use std::io::{self, Write};

use frostgen_core::Curve;
use frostgen_dkg::{GeneratedKeys, KeyPair};

/// Block for one validator, preceded by a blank line
pub fn render_validator<C: Curve>(key_pair: &KeyPair<C>) -> String {
    format!(
        "\nVALIDATOR {index}\nFROST_UUID={index}\nFROST_PUBKEY={pubkey}\nFROST_PKEY={pkey}",
        index = key_pair.index,
        pubkey = hex::encode(key_pair.public_key_share_bytes()),
        pkey = key_pair.secret_key_share_hex(),
    )
}

/// Group summary, preceded by a blank line
pub fn render_summary<C: Curve>(keys: &GeneratedKeys<C>) -> String {
    format!(
        "\nFROST_GKEY={}\nFROST_UUIDS={}\nFROST_PUBKEYS={}\nFROST_THRESHOLD={}",
        keys.group_public_key_hex(),
        keys.uuids().join(","),
        keys.public_key_shares_hex().join(","),
        keys.params.threshold(),
    )
}

/// Write every validator block followed by the summary
pub fn write_report<C: Curve, W: Write>(out: &mut W, keys: &GeneratedKeys<C>) -> io::Result<()> {
    for key_pair in &keys.key_pairs {
        writeln!(out, "{}", render_validator(key_pair))?;
    }
    writeln!(out, "{}", render_summary(keys))?;
    out.flush()
}
