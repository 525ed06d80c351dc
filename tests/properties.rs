//! Property-based tests for the cursor and the typed get/put operations.

use proptest::prelude::*;

use cursor_buffer::codec::{f32_to_bits, f64_to_bits};
use cursor_buffer::{ByteBuffer, ByteOrder};

fn byte_order() -> impl Strategy<Value = ByteOrder> {
    prop_oneof![Just(ByteOrder::Big), Just(ByteOrder::Little)]
}

#[derive(Clone, Debug)]
enum Move {
    Bound(usize),
    Position(usize),
    Flip,
    Clear,
    Rewind,
    Get,
    Put(u8),
}

fn moves(capacity: usize) -> impl Strategy<Value = Vec<Move>> {
    let limit = capacity + 4;
    prop::collection::vec(
        prop_oneof![
            (0..limit).prop_map(Move::Bound),
            (0..limit).prop_map(Move::Position),
            Just(Move::Flip),
            Just(Move::Clear),
            Just(Move::Rewind),
            Just(Move::Get),
            any::<u8>().prop_map(Move::Put),
        ],
        0..64,
    )
}

proptest! {
    #[test]
    fn integers_round_trip(
        order in byte_order(),
        a in any::<u16>(),
        b in any::<i16>(),
        c in any::<u32>(),
        d in any::<i32>(),
        e in any::<u64>(),
        f in any::<i64>(),
    ) {
        let mut buf = ByteBuffer::with_order(28, order);
        buf.put_u16(a);
        buf.put_i16(b);
        buf.put_u32(c);
        buf.put_i32(d);
        buf.put_u64(e);
        buf.put_i64(f);
        buf.flip();
        prop_assert_eq!(buf.remaining(), 28);
        prop_assert_eq!(buf.get_u16(), a);
        prop_assert_eq!(buf.get_i16(), b);
        prop_assert_eq!(buf.get_u32(), c);
        prop_assert_eq!(buf.get_i32(), d);
        prop_assert_eq!(buf.get_u64(), e);
        prop_assert_eq!(buf.get_i64(), f);
    }

    #[test]
    fn floats_round_trip_bit_exact(order in byte_order(), x in any::<u32>(), y in any::<u64>()) {
        // Built from raw bits so that every NaN payload is covered.
        let x = f32::from_bits(x);
        let y = f64::from_bits(y);
        let mut buf = ByteBuffer::with_order(12, order);
        buf.put_f32(x);
        buf.put_f64(y);
        buf.flip();
        prop_assert_eq!(f32_to_bits(buf.get_f32()), f32_to_bits(x));
        prop_assert_eq!(f64_to_bits(buf.get_f64()), f64_to_bits(y));
    }

    #[test]
    fn wire_bytes_match_std(value in any::<u64>()) {
        let mut big = ByteBuffer::with_order(8, ByteOrder::Big);
        let mut little = ByteBuffer::with_order(8, ByteOrder::Little);
        big.put_u64(value);
        little.put_u64(value);
        prop_assert_eq!(big.backing(), value.to_be_bytes());
        prop_assert_eq!(little.backing(), value.to_le_bytes());
    }

    #[test]
    fn cursor_advances_by_width(capacity in 0usize..24, start in 0usize..24, value in any::<u32>()) {
        let mut buf = ByteBuffer::new(capacity);
        buf.set_position(start);
        let before = buf.position();
        let room = buf.remaining();
        buf.put_u32(value);
        prop_assert_eq!(buf.position(), before + room.min(4));

        buf.set_position(before);
        buf.get_u32();
        prop_assert_eq!(buf.position(), before + room.min(4));
    }

    #[test]
    fn checked_ops_are_all_or_nothing(capacity in 0usize..12, start in 0usize..12, value in any::<u64>()) {
        let mut buf = ByteBuffer::new(capacity);
        buf.set_position(start);
        let before = buf.position();
        let snapshot = buf.backing().to_vec();
        if buf.try_put_u64(value).is_err() {
            prop_assert!(capacity - before < 8);
            prop_assert_eq!(buf.position(), before);
            prop_assert_eq!(buf.backing(), &snapshot[..]);
        } else {
            prop_assert_eq!(buf.position(), before + 8);
        }
    }

    #[test]
    fn positions_stay_ordered(capacity in 0usize..32, script in moves(32)) {
        let mut buf = ByteBuffer::new(capacity);
        for m in script {
            match m {
                Move::Bound(n) => buf.set_bound(n),
                Move::Position(n) => buf.set_position(n),
                Move::Flip => buf.flip(),
                Move::Clear => buf.clear(),
                Move::Rewind => buf.rewind(),
                Move::Get => {
                    let _ = buf.get_u8();
                }
                Move::Put(b) => buf.put_u8(b),
            }
            prop_assert!(buf.position() <= buf.bound());
            prop_assert!(buf.bound() <= buf.capacity());
            prop_assert_eq!(buf.capacity(), capacity);
            prop_assert_eq!(buf.remaining(), buf.bound() - buf.position());
        }
    }

    #[test]
    fn flip_exposes_written_prefix(data in prop::collection::vec(any::<u8>(), 0..32)) {
        let mut buf = ByteBuffer::new(32);
        for &b in &data {
            buf.put_u8(b);
        }
        buf.flip();
        prop_assert_eq!(buf.bound(), data.len());
        prop_assert_eq!(buf.position(), 0);
        prop_assert_eq!(buf.remaining(), data.len());
        prop_assert_eq!(buf.backing(), &data[..]);
    }

    #[test]
    fn copy_is_all_or_nothing(
        src_data in prop::collection::vec(any::<u8>(), 0..24),
        dst_capacity in 0usize..24,
        dst_start in 0usize..24,
        offset in 0usize..28,
        len in 0usize..28,
    ) {
        let mut src = ByteBuffer::new(src_data.len());
        for &b in &src_data {
            src.put_u8(b);
        }
        src.flip();
        let mut dst = ByteBuffer::new(dst_capacity);
        dst.set_position(dst_start);

        let dst_before = dst.position();
        let dst_room = dst.remaining();
        let dst_snapshot = dst.backing().to_vec();
        dst.copy_from(&mut src, offset, len);

        let fits = offset <= src_data.len() && src_data.len() - offset >= len && dst_room >= len;
        if fits {
            prop_assert_eq!(src.position(), offset + len);
            prop_assert_eq!(dst.position(), dst_before + len);
            prop_assert_eq!(
                &dst.backing()[dst_before..dst_before + len],
                &src_data[offset..offset + len]
            );
        } else {
            prop_assert_eq!(src.position(), 0);
            prop_assert_eq!(dst.position(), dst_before);
            prop_assert_eq!(dst.backing(), &dst_snapshot[..]);
        }
    }
}
