use alloc::borrow::ToOwned;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use zerocopy::{FromBytes, Immutable, IntoBytes};

use crate::codec::{self, ByteOrder};

/// Defines the sequential, absolute and checked get/put methods for one multi-byte scalar type.
macro_rules! scalar_accessors {
    (
        $ty:ty, $n:literal, $to_wire:ident, $from_wire:ident,
        $get:ident, $get_at:ident, $try_get:ident,
        $put:ident, $put_at:ident, $try_put:ident
    ) => {
        #[doc = concat!("Reads a `", stringify!($ty), "` in the buffer's byte order and advances the cursor by ", stringify!($n), ".")]
        ///
        /// Bytes past the bound are read as zero.
        pub fn $get(&mut self) -> $ty {
            let bytes = self.get_array::<$n>();
            codec::$from_wire(bytes, self.order)
        }

        #[doc = concat!("Moves the cursor to `position`, then reads a `", stringify!($ty), "`.")]
        pub fn $get_at(&mut self, position: usize) -> $ty {
            self.set_position(position);
            self.$get()
        }

        #[doc = concat!("Checked form of [`", stringify!($get), "`](Self::", stringify!($get), ").")]
        pub fn $try_get(&mut self) -> Result<$ty> {
            self.check_remaining($n, BufferError::NeedsMoreData)?;
            Ok(self.$get())
        }

        #[doc = concat!("Writes a `", stringify!($ty), "` in the buffer's byte order and advances the cursor by ", stringify!($n), ".")]
        ///
        /// Bytes that do not fit are dropped, so the value may be partially written.
        pub fn $put(&mut self, value: $ty) {
            self.put_array(codec::$to_wire(value, self.order));
        }

        #[doc = concat!("Moves the cursor to `position`, then writes a `", stringify!($ty), "`.")]
        pub fn $put_at(&mut self, position: usize, value: $ty) {
            self.set_position(position);
            self.$put(value);
        }

        #[doc = concat!("Checked form of [`", stringify!($put), "`](Self::", stringify!($put), ").")]
        pub fn $try_put(&mut self, value: $ty) -> Result<()> {
            self.check_remaining($n, BufferError::InsufficientSpace)?;
            self.$put(value);
            Ok(())
        }
    };
}

/// Result type for the checked operations of [`ByteBuffer`].
pub type Result<T> = core::result::Result<T, BufferError>;

/// Hook stored by a [`ByteBuffer`] and run by its owner through [`ByteBuffer::commit`].
pub type CommitCallback = Box<dyn FnMut()>;

/// A fixed-capacity byte buffer with a read/write cursor and a movable limit.
///
/// The buffer tracks three positions, which always satisfy `position <= bound <= capacity`:
///
/// * `capacity` is the length of the storage. It never changes.
/// * `bound` is the current limit. Bytes at or past `bound` cannot be read or written until the
///   bound is raised again.
/// * `position` is where the next get or put happens. Every get or put advances it by the width
///   of the value.
///
/// The usual cycle is to fill the buffer with `put_*` calls, call [`flip`](Self::flip) so that
/// the written prefix becomes the readable range, read it back with `get_*` calls, and finally
/// call [`clear`](Self::clear) to start writing again. No mode is stored; the buffer does not
/// stop you from reading while "writing" or the other way around.
///
/// Multi-byte values are encoded in the buffer's [`ByteOrder`]. Single bytes and character
/// sequences are not affected by it.
///
/// # Failure policy
///
/// The plain accessors never fail and never panic. A position or bound outside the legal range
/// is ignored, a read past `bound` yields `0` without moving the cursor, and a write past `bound`
/// is dropped. A multi-byte read that runs out of data therefore assembles the missing bytes as
/// zero, and a multi-byte write that runs out of room is partially written. Check
/// [`remaining`](Self::remaining) first, or use the `try_*` methods, which check the whole width
/// up front and leave the buffer untouched when they return an error.
pub struct ByteBuffer {
    storage: Box<[u8]>,
    bound: usize,
    index: usize,
    order: ByteOrder,
    commit: Option<CommitCallback>,
}

impl ByteBuffer {
    /// Creates a zero-filled buffer of `capacity` bytes that encodes values in the host's native
    /// byte order.
    pub fn new(capacity: usize) -> Self {
        Self::with_order(capacity, ByteOrder::native())
    }

    /// Creates a zero-filled buffer of `capacity` bytes that encodes values in `order`.
    pub fn with_order(capacity: usize, order: ByteOrder) -> Self {
        Self::from_storage(vec![0u8; capacity].into_boxed_slice(), order)
    }

    /// Like [`new`](Self::new), but reports allocation failure instead of aborting.
    pub fn try_new(capacity: usize) -> Result<Self> {
        Self::try_with_order(capacity, ByteOrder::native())
    }

    /// Like [`with_order`](Self::with_order), but reports allocation failure instead of
    /// aborting.
    pub fn try_with_order(capacity: usize, order: ByteOrder) -> Result<Self> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| BufferError::AllocFailed)?;
        storage.resize(capacity, 0);
        Ok(Self::from_storage(storage.into_boxed_slice(), order))
    }

    fn from_storage(storage: Box<[u8]>, order: ByteOrder) -> Self {
        Self {
            bound: storage.len(),
            index: 0,
            storage,
            order,
            commit: None,
        }
    }

    /// Attaches a commit hook. See [`commit`](Self::commit).
    pub fn with_commit_callback(mut self, callback: CommitCallback) -> Self {
        self.commit = Some(callback);
        self
    }

    /// Replaces (or removes) the commit hook.
    pub fn set_commit_callback(&mut self, callback: Option<CommitCallback>) {
        self.commit = callback;
    }

    /// Runs the commit hook, if there is one.
    ///
    /// The buffer never calls this by itself. It is up to the owner to decide when a commit point
    /// has been reached, e.g. when the buffer is full.
    pub fn commit(&mut self) {
        if let Some(callback) = self.commit.as_mut() {
            callback();
        }
    }

    /// Consumes the buffer and returns its storage.
    pub fn into_inner(self) -> Box<[u8]> {
        self.storage
    }

    /// Read-only view of the storage up to `bound`.
    ///
    /// This ignores the cursor, so it shows bytes on both sides of `position`.
    pub fn backing(&self) -> &[u8] {
        &self.storage[..self.bound]
    }

    /// The byte order used for multi-byte values.
    #[inline(always)]
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Changes the byte order used for multi-byte values. Bytes already in the buffer are not
    /// touched.
    pub fn set_order(&mut self, order: ByteOrder) {
        self.order = order;
    }

    /// Size of the storage in bytes. Fixed for the life of the buffer.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// The current limit for reads and writes.
    #[inline(always)]
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// The cursor.
    #[inline(always)]
    pub fn position(&self) -> usize {
        self.index
    }

    /// Number of bytes between the cursor and the bound.
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.bound - self.index
    }

    /// Whether at least one byte remains before the bound.
    #[inline(always)]
    pub fn has_more(&self) -> bool {
        self.bound > self.index
    }

    /// Moves the bound. Ignored if `bound` is greater than the capacity.
    ///
    /// If the cursor is past the new bound, it is pulled back to it.
    pub fn set_bound(&mut self, bound: usize) {
        if bound > self.capacity() {
            return;
        }
        self.bound = bound;
        if self.index > bound {
            self.index = bound;
        }
    }

    /// Checked form of [`set_bound`](Self::set_bound).
    pub fn try_set_bound(&mut self, bound: usize) -> Result<()> {
        if bound > self.capacity() {
            return Err(BufferError::OutOfRange);
        }
        self.set_bound(bound);
        Ok(())
    }

    /// Moves the cursor. Ignored if `position` is greater than the bound.
    pub fn set_position(&mut self, position: usize) {
        if position <= self.bound {
            self.index = position;
        }
    }

    /// Checked form of [`set_position`](Self::set_position).
    pub fn try_set_position(&mut self, position: usize) -> Result<()> {
        if position > self.bound {
            return Err(BufferError::OutOfRange);
        }
        self.index = position;
        Ok(())
    }

    /// Makes the whole storage available again: `bound = capacity`, `position = 0`.
    ///
    /// The contents are not erased.
    pub fn clear(&mut self) {
        self.bound = self.capacity();
        self.index = 0;
    }

    /// Same as [`clear`](Self::clear).
    pub fn reset(&mut self) {
        self.clear();
    }

    /// Moves the cursor back to the start without touching the bound.
    pub fn rewind(&mut self) {
        self.index = 0;
    }

    /// Switches from writing to reading: whatever was written before the cursor becomes the
    /// readable range, and the cursor goes back to the start.
    pub fn flip(&mut self) {
        self.bound = self.index;
        self.index = 0;
    }

    /// Same as [`flip`](Self::flip).
    pub fn trip(&mut self) {
        self.flip();
    }

    fn check_remaining(&self, len: usize, error: BufferError) -> Result<()> {
        if self.remaining() < len {
            Err(error)
        } else {
            Ok(())
        }
    }

    /// Reads one byte. Returns `0`, and does not move the cursor, if nothing remains.
    #[inline(always)]
    pub fn get_u8(&mut self) -> u8 {
        if !self.has_more() {
            return 0;
        }
        let value = self.storage[self.index];
        self.index += 1;
        value
    }

    /// Moves the cursor to `position`, then reads one byte.
    pub fn get_u8_at(&mut self, position: usize) -> u8 {
        self.set_position(position);
        self.get_u8()
    }

    /// Checked form of [`get_u8`](Self::get_u8).
    pub fn try_get_u8(&mut self) -> Result<u8> {
        self.check_remaining(1, BufferError::NeedsMoreData)?;
        Ok(self.get_u8())
    }

    /// Writes one byte. Dropped, and the cursor does not move, if no room remains.
    #[inline(always)]
    pub fn put_u8(&mut self, value: u8) {
        if self.remaining() == 0 {
            return;
        }
        self.storage[self.index] = value;
        self.index += 1;
    }

    /// Moves the cursor to `position`, then writes one byte.
    pub fn put_u8_at(&mut self, position: usize, value: u8) {
        self.set_position(position);
        self.put_u8(value);
    }

    /// Checked form of [`put_u8`](Self::put_u8).
    pub fn try_put_u8(&mut self, value: u8) -> Result<()> {
        self.check_remaining(1, BufferError::InsufficientSpace)?;
        self.put_u8(value);
        Ok(())
    }

    /// Reads one byte as an `i8`.
    pub fn get_i8(&mut self) -> i8 {
        self.get_u8() as i8
    }

    /// Moves the cursor to `position`, then reads an `i8`.
    pub fn get_i8_at(&mut self, position: usize) -> i8 {
        self.get_u8_at(position) as i8
    }

    /// Writes an `i8` as one byte.
    pub fn put_i8(&mut self, value: i8) {
        self.put_u8(value as u8)
    }

    /// Moves the cursor to `position`, then writes an `i8`.
    pub fn put_i8_at(&mut self, position: usize, value: i8) {
        self.put_u8_at(position, value as u8)
    }

    /// Reads `N` bytes one at a time, in storage order. Bytes past the bound come back as zero.
    fn get_array<const N: usize>(&mut self) -> [u8; N] {
        let mut bytes = [0u8; N];
        for b in bytes.iter_mut() {
            *b = self.get_u8();
        }
        bytes
    }

    fn put_array<const N: usize>(&mut self, bytes: [u8; N]) {
        for b in bytes {
            self.put_u8(b);
        }
    }

    scalar_accessors!(u16, 2, to_wire_u16, from_wire_u16,
        get_u16, get_u16_at, try_get_u16, put_u16, put_u16_at, try_put_u16);
    scalar_accessors!(i16, 2, to_wire_i16, from_wire_i16,
        get_i16, get_i16_at, try_get_i16, put_i16, put_i16_at, try_put_i16);
    scalar_accessors!(u32, 4, to_wire_u32, from_wire_u32,
        get_u32, get_u32_at, try_get_u32, put_u32, put_u32_at, try_put_u32);
    scalar_accessors!(i32, 4, to_wire_i32, from_wire_i32,
        get_i32, get_i32_at, try_get_i32, put_i32, put_i32_at, try_put_i32);
    scalar_accessors!(u64, 8, to_wire_u64, from_wire_u64,
        get_u64, get_u64_at, try_get_u64, put_u64, put_u64_at, try_put_u64);
    scalar_accessors!(i64, 8, to_wire_i64, from_wire_i64,
        get_i64, get_i64_at, try_get_i64, put_i64, put_i64_at, try_put_i64);
    scalar_accessors!(f32, 4, to_wire_f32, from_wire_f32,
        get_f32, get_f32_at, try_get_f32, put_f32, put_f32_at, try_put_f32);
    scalar_accessors!(f64, 8, to_wire_f64, from_wire_f64,
        get_f64, get_f64_at, try_get_f64, put_f64, put_f64_at, try_put_f64);

    /// Reads `len` bytes as an owned character sequence.
    ///
    /// The result is always exactly `len` bytes long. If fewer than `len` bytes remain, the
    /// missing bytes are zero.
    ///
    /// If `len` bytes cannot be allocated, this returns an empty sequence and the cursor does not
    /// move.
    pub fn get_varchar(&mut self, len: usize) -> Vec<u8> {
        let mut bytes = Vec::new();
        if bytes.try_reserve_exact(len).is_err() {
            return bytes;
        }
        bytes.extend((0..len).map(|_| self.get_u8()));
        bytes
    }

    /// Moves the cursor to `position`, then reads `len` bytes as a character sequence.
    pub fn get_varchar_at(&mut self, position: usize, len: usize) -> Vec<u8> {
        self.set_position(position);
        self.get_varchar(len)
    }

    /// Checked form of [`get_varchar`](Self::get_varchar).
    pub fn try_get_varchar(&mut self, len: usize) -> Result<Vec<u8>> {
        Ok(self.try_get_bytes(len)?.to_owned())
    }

    /// Reads `len` bytes and decodes them as UTF-8, replacing invalid sequences with the Unicode
    /// replacement character.
    pub fn get_varchar_lossy(&mut self, len: usize) -> String {
        let bytes = self.get_varchar(len);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Reads `len` bytes as a `bstr::BString`. No UTF-8 validation is done.
    #[cfg(feature = "bstr")]
    pub fn get_varchar_bstring(&mut self, len: usize) -> bstr::BString {
        bstr::BString::from(self.get_varchar(len))
    }

    /// Writes the bytes of `value` up to, but not including, the first NUL byte.
    ///
    /// Bytes that do not fit are dropped.
    pub fn put_varchar(&mut self, value: impl AsRef<[u8]>) {
        for &b in value.as_ref().iter().take_while(|&&b| b != 0) {
            self.put_u8(b);
        }
    }

    /// Moves the cursor to `position`, then writes a character sequence.
    pub fn put_varchar_at(&mut self, position: usize, value: impl AsRef<[u8]>) {
        self.set_position(position);
        self.put_varchar(value);
    }

    /// Reads a slice of bytes whose length is `len`. This returns a reference into the buffer;
    /// it does not copy.
    pub fn try_get_bytes(&mut self, len: usize) -> Result<&[u8]> {
        self.check_remaining(len, BufferError::NeedsMoreData)?;
        let start = self.index;
        self.index += len;
        Ok(&self.storage[start..self.index])
    }

    /// Writes all of `bytes`, or nothing if they do not fit.
    pub fn try_put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.check_remaining(bytes.len(), BufferError::InsufficientSpace)?;
        let start = self.index;
        self.index += bytes.len();
        self.storage[start..self.index].copy_from_slice(bytes);
        Ok(())
    }

    /// Reads a fixed-layout record by copying `size_of::<T>()` bytes out of the buffer.
    ///
    /// The buffer's byte order does not apply; `T`'s own field types decide how its bytes are
    /// interpreted, e.g. `zerocopy::byteorder::U32<BE>`.
    pub fn try_get_record<T: FromBytes>(&mut self) -> Result<T> {
        let bytes = self.try_get_bytes(core::mem::size_of::<T>())?;
        T::read_from_bytes(bytes).map_err(|_| BufferError::NeedsMoreData)
    }

    /// Writes the in-memory bytes of a fixed-layout record.
    pub fn try_put_record<T: IntoBytes + Immutable>(&mut self, value: &T) -> Result<()> {
        self.try_put_bytes(value.as_bytes())
    }

    /// Copies bytes from `src` into `self`, starting at both cursors, until `self` is full.
    ///
    /// Nothing is copied if `src` has fewer bytes remaining than `self` has room for; this does
    /// not truncate.
    pub fn duplicate_from(&mut self, src: &mut ByteBuffer) {
        let _ = self.try_duplicate_from(src);
    }

    /// Checked form of [`duplicate_from`](Self::duplicate_from).
    pub fn try_duplicate_from(&mut self, src: &mut ByteBuffer) -> Result<()> {
        let len = self.remaining();
        src.check_remaining(len, BufferError::NeedsMoreData)?;
        self.transfer_from(src, len);
        Ok(())
    }

    /// Moves the cursor of `src` to `position`, then does a
    /// [`duplicate_from`](Self::duplicate_from).
    ///
    /// Neither buffer is touched if `position` is past the bound of `src` or the duplicate would
    /// be rejected.
    pub fn copy_at(&mut self, src: &mut ByteBuffer, position: usize) {
        let _ = self.try_copy_at(src, position);
    }

    /// Checked form of [`copy_at`](Self::copy_at).
    pub fn try_copy_at(&mut self, src: &mut ByteBuffer, position: usize) -> Result<()> {
        if position > src.bound {
            return Err(BufferError::OutOfRange);
        }
        let len = self.remaining();
        if src.bound - position < len {
            return Err(BufferError::NeedsMoreData);
        }
        src.index = position;
        self.transfer_from(src, len);
        Ok(())
    }

    /// Copies exactly `len` bytes starting at offset `position` of `src` into `self`.
    ///
    /// All or nothing: if `position` is past the bound of `src`, or either buffer has fewer than
    /// `len` bytes remaining (counting from `position` for `src`), neither buffer changes.
    /// Otherwise both cursors end up advanced by `len`.
    pub fn copy_from(&mut self, src: &mut ByteBuffer, position: usize, len: usize) {
        let _ = self.try_copy_from(src, position, len);
    }

    /// Checked form of [`copy_from`](Self::copy_from).
    pub fn try_copy_from(&mut self, src: &mut ByteBuffer, position: usize, len: usize) -> Result<()> {
        if position > src.bound {
            return Err(BufferError::OutOfRange);
        }
        if src.bound - position < len {
            return Err(BufferError::NeedsMoreData);
        }
        self.check_remaining(len, BufferError::InsufficientSpace)?;
        src.index = position;
        self.transfer_from(src, len);
        Ok(())
    }

    // Callers have checked that both sides have at least `len` bytes remaining.
    fn transfer_from(&mut self, src: &mut ByteBuffer, len: usize) {
        self.storage[self.index..self.index + len]
            .copy_from_slice(&src.storage[src.index..src.index + len]);
        self.index += len;
        src.index += len;
    }
}

impl fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("capacity", &self.capacity())
            .field("bound", &self.bound)
            .field("position", &self.index)
            .field("order", &self.order)
            .field("commit_callback", &self.commit.is_some())
            .finish()
    }
}

/// Error type for the checked (`try_*`) operations of [`ByteBuffer`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum BufferError {
    /// A read needs more bytes than remain before the bound. The cursor has not moved.
    NeedsMoreData,

    /// A write needs more room than remains before the bound. Nothing has been written.
    InsufficientSpace,

    /// A position or bound is outside the legal range.
    OutOfRange,

    /// The storage for a new buffer could not be allocated.
    AllocFailed,
}

impl core::error::Error for BufferError {}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeedsMoreData => f.write_str("Not enough data remains in the buffer"),
            Self::InsufficientSpace => f.write_str("Not enough room remains in the buffer"),
            Self::OutOfRange => f.write_str("The position is outside the buffer's bound"),
            Self::AllocFailed => f.write_str("The buffer storage could not be allocated"),
        }
    }
}
