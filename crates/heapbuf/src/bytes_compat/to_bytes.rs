// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use bytes::Bytes;
use nm::Event;

use crate::Buffer;

impl Buffer<u8> {
    /// Returns a `bytes::Bytes` that contains a copy of the remaining bytes.
    ///
    /// The position does not move.
    ///
    /// # Example
    ///
    /// ```
    /// use bytes::Buf;
    /// use heapbuf::Buffer;
    ///
    /// let mut buf = Buffer::wrap(b"\x00\x12\x34\x56\x78".to_vec());
    /// buf.set_position(1)?;
    ///
    /// let mut bytes = buf.to_bytes();
    ///
    /// // Consume the data using the bytes crate's Buf trait.
    /// assert_eq!(bytes.get_u16(), 0x1234);
    /// assert_eq!(bytes.get_u16(), 0x5678);
    /// assert!(!bytes.has_remaining());
    /// # Ok::<(), heapbuf::Error>(())
    /// ```
    ///
    /// # Performance
    ///
    /// This always copies: buffer storage may be written through other buffers at any time, so
    /// it cannot be handed out as an immutable `Bytes`.
    ///
    /// # Why is this not `.into()`?
    ///
    /// The `.to_bytes()` function must always be explicitly called to make the copy more obvious
    /// and easier to catch in reviews.
    #[must_use]
    pub fn to_bytes(&self) -> Bytes {
        let len = self.remaining();
        TO_BYTES_COPIED.with(|x| x.observe(len));

        Bytes::from(self.to_vec())
    }
}

thread_local! {
    static TO_BYTES_COPIED: Event = Event::builder()
        .name("heapbuf_to_bytes_copied")
        .build();
}
