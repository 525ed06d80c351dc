//! A fixed-capacity byte buffer with a cursor, a movable read/write limit, and typed get/put
//! operations for integers, floating-point values and fixed-length character sequences.
//!
//! Byte order is explicit: every [`ByteBuffer`] carries a [`ByteOrder`], and the [`codec`]
//! functions take one as an argument, so big- and little-endian formats can be produced and
//! consumed on any host.
//!
//! ```
//! use cursor_buffer::{ByteBuffer, ByteOrder};
//!
//! let mut buf = ByteBuffer::with_order(16, ByteOrder::Big);
//! buf.put_i32(-131072);
//! buf.flip();
//! assert_eq!(buf.get_i32(), -131072);
//! ```

#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![forbid(unsafe_code)]
#![forbid(unused_must_use)]
#![warn(missing_docs)]

extern crate alloc;

mod buffer;
pub mod codec;


pub use buffer::{BufferError, ByteBuffer, CommitCallback, Result};
pub use codec::{native_byte_order, ByteOrder};
