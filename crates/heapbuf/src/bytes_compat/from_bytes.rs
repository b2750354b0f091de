// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use bytes::Bytes;

use crate::Buffer;

impl From<Bytes> for Buffer<u8> {
    /// Converts a [`Bytes`] instance into a writable byte buffer over its contents.
    ///
    /// This is zero-copy if the `Bytes` is the unique owner of a vector allocation, otherwise the
    /// contents are copied.
    fn from(bytes: Bytes) -> Self {
        Self::wrap(Vec::from(bytes))
    }
}
