// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Exchanging data between `heapbuf` and the `bytes` crate.
//!
//! 1. We receive a message as `bytes::Bytes` and wrap it in a byte buffer.
//! 2. We decode a length-prefixed header from it and view the payload as 32-bit integers.
//! 3. We encode a reply into a new byte buffer and hand it back as `bytes::Bytes`.

use bytes::{BufMut, Bytes, BytesMut};
use heapbuf::{Buffer, Error};

fn main() -> Result<(), Error> {
    let message = receive_message();

    let mut buf = Buffer::from(message);

    let count = usize::from(buf.get_num::<u16>()?);
    let values = buf.as_num_view::<u32>();

    println!("Message has {count} values, the view covers {}.", values.capacity());

    let sum: u64 = values.to_vec().iter().map(|&v| u64::from(v)).sum();
    println!("The sum of all values is {sum}.");

    let reply = encode_reply(sum)?;
    println!("Reply is {} bytes long.", reply.len());

    Ok(())
}

fn receive_message() -> Bytes {
    let mut bytes = BytesMut::new();

    bytes.put_u16(4);
    for value in [10_u32, 20, 30, 40] {
        bytes.put_u32(value);
    }

    bytes.freeze()
}

fn encode_reply(sum: u64) -> Result<Bytes, Error> {
    let mut buf = Buffer::<u8>::allocate(10);

    buf.put_num(8_u16)?.put_num(sum)?;
    buf.flip();

    Ok(buf.to_bytes())
}
