// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use num_traits::{FromBytes, ToBytes};

use crate::{Buffer, ByteOrder, Element, Result, Storage};

/// A number that can be encoded into and decoded from byte storage in either [`ByteOrder`].
///
/// This is implemented for every [`Element`] that `num_traits` knows how to convert to and from
/// bytes: the integers up to 64 bits, `f32` and `f64`.
pub trait ByteCodec: Element {
    /// The number of bytes in the encoded form.
    const WIDTH: usize;

    /// The encoded form, a byte array of length [`WIDTH`][Self::WIDTH].
    type Raw: AsRef<[u8]> + AsMut<[u8]> + Default;

    /// Decodes a value from its encoded form.
    fn from_raw(raw: &Self::Raw, order: ByteOrder) -> Self;

    /// Encodes a value.
    fn to_raw(self, order: ByteOrder) -> Self::Raw;
}

impl<T> ByteCodec for T
where
    T: Element + FromBytes + ToBytes<Bytes = <T as FromBytes>::Bytes>,
    <T as FromBytes>::Bytes: Sized + Default,
{
    const WIDTH: usize = size_of::<T>();

    type Raw = <T as FromBytes>::Bytes;

    #[inline]
    fn from_raw(raw: &Self::Raw, order: ByteOrder) -> Self {
        match order {
            ByteOrder::BigEndian => <T as FromBytes>::from_be_bytes(raw),
            ByteOrder::LittleEndian => <T as FromBytes>::from_le_bytes(raw),
        }
    }

    #[inline]
    fn to_raw(self, order: ByteOrder) -> Self::Raw {
        match order {
            ByteOrder::BigEndian => <T as ToBytes>::to_be_bytes(&self),
            ByteOrder::LittleEndian => <T as ToBytes>::to_le_bytes(&self),
        }
    }
}

/// Decodes the value whose first byte is at the absolute storage index `index`.
///
/// The caller has validated that `N::WIDTH` bytes are available.
pub(crate) fn decode<N: ByteCodec>(storage: &Storage<u8>, index: usize, order: ByteOrder) -> N {
    let mut raw = N::Raw::default();
    storage.read_into(index, AsMut::<[u8]>::as_mut(&mut raw));
    N::from_raw(&raw, order)
}

/// Encodes `value` into `N::WIDTH` bytes starting at the absolute storage index `index`.
pub(crate) fn encode<N: ByteCodec>(storage: &Storage<u8>, index: usize, value: N, order: ByteOrder) {
    let raw = value.to_raw(order);
    storage.write_from(index, AsRef::<[u8]>::as_ref(&raw));
}

impl Buffer<u8> {
    /// The byte order used by the multi-byte accessors of this buffer.
    ///
    /// A newly created byte buffer is [`ByteOrder::BigEndian`]. Views derived from this buffer
    /// inherit its byte order at the time they are created.
    #[must_use]
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Changes the byte order used by the multi-byte accessors of this buffer.
    ///
    /// Only this buffer is affected, not other buffers that share its storage.
    pub fn set_order(&mut self, order: ByteOrder) -> &mut Self {
        self.order = order;
        self
    }

    /// Reads a number from the position and advances the position by its width.
    ///
    /// ```
    /// use heapbuf::{Buffer, ByteOrder};
    ///
    /// let mut buf = Buffer::wrap(vec![0x12, 0x34, 0x12, 0x34]);
    ///
    /// assert_eq!(buf.get_num::<u16>()?, 0x1234);
    ///
    /// buf.set_order(ByteOrder::LittleEndian);
    /// assert_eq!(buf.get_num::<u16>()?, 0x3412);
    /// # Ok::<(), heapbuf::Error>(())
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::BufferUnderflow`][crate::Error::BufferUnderflow] if fewer than `N::WIDTH` bytes
    /// remain.
    pub fn get_num<N: ByteCodec>(&mut self) -> Result<N> {
        let position = self.cursor.ensure_readable(N::WIDTH)?;
        let value = decode(&self.storage, self.ix(position), self.order);
        self.cursor.advance(N::WIDTH);
        Ok(value)
    }

    /// Writes a number at the position and advances the position by its width.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyBuffer`][crate::Error::ReadOnlyBuffer] if the buffer is read-only,
    /// otherwise [`Error::BufferOverflow`][crate::Error::BufferOverflow] if fewer than `N::WIDTH`
    /// bytes of space remain.
    pub fn put_num<N: ByteCodec>(&mut self, value: N) -> Result<&mut Self> {
        self.ensure_mutable()?;
        let position = self.cursor.ensure_writable(N::WIDTH)?;
        encode(&self.storage, self.ix(position), value, self.order);
        self.cursor.advance(N::WIDTH);
        Ok(self)
    }

    /// Reads the number whose first byte is at `index`. The position does not move.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`][crate::Error::IndexOutOfBounds] unless
    /// `index + N::WIDTH <= limit`.
    pub fn get_num_at<N: ByteCodec>(&self, index: usize) -> Result<N> {
        self.cursor.check_range(index, N::WIDTH)?;
        Ok(decode(&self.storage, self.ix(index), self.order))
    }

    /// Writes a number with its first byte at `index`. The position does not move.
    ///
    /// # Errors
    ///
    /// [`Error::ReadOnlyBuffer`][crate::Error::ReadOnlyBuffer] if the buffer is read-only,
    /// otherwise [`Error::IndexOutOfBounds`][crate::Error::IndexOutOfBounds] unless
    /// `index + N::WIDTH <= limit`.
    pub fn put_num_at<N: ByteCodec>(&mut self, index: usize, value: N) -> Result<&mut Self> {
        self.ensure_mutable()?;
        self.cursor.check_range(index, N::WIDTH)?;
        encode(&self.storage, self.ix(index), value, self.order);
        Ok(self)
    }
}
