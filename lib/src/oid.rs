// Copyright 2026 The gitlit Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Object identifiers: 20-byte SHA-1 digests rendered as lowercase hex.

use std::fmt;

use thiserror::Error;

pub const OID_BYTE_LEN: usize = 20;
pub const OID_HEX_LEN: usize = OID_BYTE_LEN * 2;

/// A SHA-1 object id.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oid([u8; OID_BYTE_LEN]);

#[derive(Debug, Error)]
#[error("{0:?} is not a valid object id")]
pub struct InvalidOid(String);

impl Oid {
    /// The all-zero id used as a sentinel for "no object" in diff preambles.
    pub const NULL: Self = Self([0; OID_BYTE_LEN]);

    pub fn from_bytes(bytes: [u8; OID_BYTE_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; OID_BYTE_LEN] {
        &self.0
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, InvalidOid> {
        let bytes = hex::decode(hex_str).map_err(|_| InvalidOid(hex_str.to_owned()))?;
        let bytes: [u8; OID_BYTE_LEN] = bytes
            .try_into()
            .map_err(|_| InvalidOid(hex_str.to_owned()))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }

    /// First 6 hex chars, for display only (never used for lookups).
    pub fn short(self) -> String {
        self.to_hex()[..6].to_owned()
    }

    pub fn is_null(self) -> bool {
        self == Self::NULL
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self.to_hex())
    }
}
