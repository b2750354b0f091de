// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

/// The order in which the bytes of a multi-byte value are laid out in byte storage.
///
/// Every byte view carries its own byte order. A freshly created byte buffer uses
/// [`ByteOrder::BigEndian`], the network byte order.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ByteOrder {
    /// The most significant byte comes first.
    #[default]
    BigEndian,

    /// The least significant byte comes first.
    LittleEndian,
}

impl ByteOrder {
    /// The byte order of the platform this code is running on.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::BigEndian
        } else {
            Self::LittleEndian
        }
    }

    /// The other byte order.
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::BigEndian => Self::LittleEndian,
            Self::LittleEndian => Self::BigEndian,
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BigEndian => f.write_str("BIG_ENDIAN"),
            Self::LittleEndian => f.write_str("LITTLE_ENDIAN"),
        }
    }
}
