//! Conversion between scalar values and their byte representations.
//!
//! Everything in this module is a pure function over fixed-width values. Multi-byte values are
//! (dis)assembled in *least-significant-first* order: element `i` of a byte array carries bits
//! `[8 * i, 8 * i + 8)` of the value. [`ByteOrder::arrange`] converts between that order and the
//! order in which the bytes appear on the wire.

/// The order in which the bytes of a multi-byte value are laid out in a buffer.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ByteOrder {
    /// Most significant byte first ("network order").
    Big,
    /// Least significant byte first.
    Little,
}

impl ByteOrder {
    /// The byte order of the host, as reported by [`native_byte_order`].
    ///
    /// Every target Rust supports is either big- or little-endian, so the fallback to
    /// [`ByteOrder::Little`] is never taken in practice.
    pub fn native() -> Self {
        native_byte_order().unwrap_or(ByteOrder::Little)
    }

    /// Converts between wire order and least-significant-first order.
    ///
    /// The conversion is its own inverse, so the same call is used on the way in and on the way
    /// out.
    #[inline(always)]
    pub fn arrange<const N: usize>(self, mut bytes: [u8; N]) -> [u8; N] {
        if self == ByteOrder::Big {
            bytes.reverse();
        }
        bytes
    }
}

/// Probes the memory layout of the host.
///
/// Stores a known 32-bit pattern and looks at which byte lands first. Returns `None` if neither
/// end of the pattern is found there.
pub fn native_byte_order() -> Option<ByteOrder> {
    const PROBE: u32 = 0x0100_0004;
    match PROBE.to_ne_bytes()[0] {
        0x01 => Some(ByteOrder::Big),
        0x04 => Some(ByteOrder::Little),
        _ => None,
    }
}

macro_rules! unsigned_codec {
    ($assemble:ident, $disassemble:ident, $ty:ty, $n:literal) => {
        #[doc = concat!("Assembles a `", stringify!($ty), "` from bytes in least-significant-first order.")]
        #[inline(always)]
        pub fn $assemble(bytes: [u8; $n]) -> $ty {
            let mut value: $ty = 0;
            for (i, &b) in bytes.iter().enumerate() {
                value |= (b as $ty) << (8 * i);
            }
            value
        }

        #[doc = concat!("Splits a `", stringify!($ty), "` into bytes in least-significant-first order.")]
        #[inline(always)]
        pub fn $disassemble(value: $ty) -> [u8; $n] {
            let mut bytes = [0u8; $n];
            for (i, b) in bytes.iter_mut().enumerate() {
                let mask: $ty = 0xff << (8 * i);
                *b = ((value & mask) >> (8 * i)) as u8;
            }
            bytes
        }
    };
}

unsigned_codec!(assemble_u16, disassemble_u16, u16, 2);
unsigned_codec!(assemble_u32, disassemble_u32, u32, 4);
unsigned_codec!(assemble_u64, disassemble_u64, u64, 8);

// Bit-pattern reinterpretation. None of these change the bits; they only relabel the type.

/// Reinterprets the bits of an `f32` as a `u32`.
#[inline(always)]
pub fn f32_to_bits(value: f32) -> u32 {
    value.to_bits()
}

/// Reinterprets a `u32` as the `f32` with the same bits.
#[inline(always)]
pub fn bits_to_f32(bits: u32) -> f32 {
    f32::from_bits(bits)
}

/// Reinterprets the bits of an `f64` as a `u64`.
#[inline(always)]
pub fn f64_to_bits(value: f64) -> u64 {
    value.to_bits()
}

/// Reinterprets a `u64` as the `f64` with the same bits.
#[inline(always)]
pub fn bits_to_f64(bits: u64) -> f64 {
    f64::from_bits(bits)
}

/// Reinterprets a two's-complement `i16` as the `u16` with the same bits.
#[inline(always)]
pub fn i16_to_u16(value: i16) -> u16 {
    value as u16
}

/// Reinterprets a `u16` as the two's-complement `i16` with the same bits.
#[inline(always)]
pub fn u16_to_i16(value: u16) -> i16 {
    value as i16
}

/// Reinterprets a two's-complement `i32` as the `u32` with the same bits.
#[inline(always)]
pub fn i32_to_u32(value: i32) -> u32 {
    value as u32
}

/// Reinterprets a `u32` as the two's-complement `i32` with the same bits.
#[inline(always)]
pub fn u32_to_i32(value: u32) -> i32 {
    value as i32
}

/// Reinterprets a two's-complement `i64` as the `u64` with the same bits.
#[inline(always)]
pub fn i64_to_u64(value: i64) -> u64 {
    value as u64
}

/// Reinterprets a `u64` as the two's-complement `i64` with the same bits.
#[inline(always)]
pub fn u64_to_i64(value: u64) -> i64 {
    value as i64
}

/// Assembles an `i16` from bytes in least-significant-first order.
#[inline(always)]
pub fn assemble_i16(bytes: [u8; 2]) -> i16 {
    u16_to_i16(assemble_u16(bytes))
}

/// Assembles an `i32` from bytes in least-significant-first order.
#[inline(always)]
pub fn assemble_i32(bytes: [u8; 4]) -> i32 {
    u32_to_i32(assemble_u32(bytes))
}

/// Assembles an `i64` from bytes in least-significant-first order.
#[inline(always)]
pub fn assemble_i64(bytes: [u8; 8]) -> i64 {
    u64_to_i64(assemble_u64(bytes))
}

/// Assembles an `f32` from the bytes of its bit pattern, least significant first.
#[inline(always)]
pub fn assemble_f32(bytes: [u8; 4]) -> f32 {
    bits_to_f32(assemble_u32(bytes))
}

/// Assembles an `f64` from the bytes of its bit pattern, least significant first.
#[inline(always)]
pub fn assemble_f64(bytes: [u8; 8]) -> f64 {
    bits_to_f64(assemble_u64(bytes))
}

/// Splits an `i16` into bytes in least-significant-first order.
#[inline(always)]
pub fn disassemble_i16(value: i16) -> [u8; 2] {
    disassemble_u16(i16_to_u16(value))
}

/// Splits an `i32` into bytes in least-significant-first order.
#[inline(always)]
pub fn disassemble_i32(value: i32) -> [u8; 4] {
    disassemble_u32(i32_to_u32(value))
}

/// Splits an `i64` into bytes in least-significant-first order.
#[inline(always)]
pub fn disassemble_i64(value: i64) -> [u8; 8] {
    disassemble_u64(i64_to_u64(value))
}

/// Splits the bit pattern of an `f32` into bytes, least significant first.
#[inline(always)]
pub fn disassemble_f32(value: f32) -> [u8; 4] {
    disassemble_u32(f32_to_bits(value))
}

/// Splits the bit pattern of an `f64` into bytes, least significant first.
#[inline(always)]
pub fn disassemble_f64(value: f64) -> [u8; 8] {
    disassemble_u64(f64_to_bits(value))
}

macro_rules! wire_codec {
    ($to_wire:ident, $from_wire:ident, $disassemble:ident, $assemble:ident, $ty:ty, $n:literal) => {
        #[doc = concat!("Encodes a `", stringify!($ty), "` as bytes in the given wire order.")]
        #[inline(always)]
        pub fn $to_wire(value: $ty, order: ByteOrder) -> [u8; $n] {
            order.arrange($disassemble(value))
        }

        #[doc = concat!("Decodes a `", stringify!($ty), "` from bytes in the given wire order.")]
        #[inline(always)]
        pub fn $from_wire(bytes: [u8; $n], order: ByteOrder) -> $ty {
            $assemble(order.arrange(bytes))
        }
    };
}

wire_codec!(to_wire_u16, from_wire_u16, disassemble_u16, assemble_u16, u16, 2);
wire_codec!(to_wire_u32, from_wire_u32, disassemble_u32, assemble_u32, u32, 4);
wire_codec!(to_wire_u64, from_wire_u64, disassemble_u64, assemble_u64, u64, 8);
wire_codec!(to_wire_i16, from_wire_i16, disassemble_i16, assemble_i16, i16, 2);
wire_codec!(to_wire_i32, from_wire_i32, disassemble_i32, assemble_i32, i32, 4);
wire_codec!(to_wire_i64, from_wire_i64, disassemble_i64, assemble_i64, i64, 8);
wire_codec!(to_wire_f32, from_wire_f32, disassemble_f32, assemble_f32, f32, 4);
wire_codec!(to_wire_f64, from_wire_f64, disassemble_f64, assemble_f64, f64, 8);
