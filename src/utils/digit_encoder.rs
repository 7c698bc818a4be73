//! digit_encoder.rs
//! Copyright © 2026 Sean Springer
//! [This program is licensed under the "MIT License"]
//! Please see the file LICENSE in the source distribution of this software for license terms.
//!
//! The digit_encoder module splits the displayed number into base-10 digits and scatters the
//! 4 BCD bits of a digit onto whichever port bits the decoder chip is wired to. Both functions
//! are pure and are called once per multiplexing step by the scheduler.

/// Powers of ten for the three display positions (plus one for the modulo).
const POWERS_OF_TEN: [u32; 4] = [1, 10, 100, 1000];

/// PUBLIC
/// Return the base-10 digit of `number` at `position` (0 = units, 2 = hundreds).
/// Positions past the hundreds place have no digit to show and yield 0.
pub fn decode_digit(number: u8, position: usize) -> u8 {
    match (POWERS_OF_TEN.get(position), POWERS_OF_TEN.get(position + 1)) {
        (Some(&low), Some(&high)) => ((number as u32 % high) / low) as u8,
        _ => 0,
    }
}

/// PUBLIC
/// Translocate the low 4 bits of `digit` onto the set bits of `mapper`.
///
/// The set bits of `mapper`, taken in ascending order, are the targets for bit 0, 1, 2 and 3
/// of `digit`. A target bit is set in the result only when the matching source bit is 1.
/// `mapper` is wiring configuration and must carry at least 4 set bits; with fewer, only the
/// available targets are filled.
pub fn encode(digit: u8, mapper: u8) -> u8 {
    let mut out = 0u8;
    let mut targets = mapper;

    for source_bit in 0..4 {
        if targets == 0 {
            break;
        }
        let target = targets & targets.wrapping_neg(); // lowest set bit
        targets &= !target;

        if digit & (1 << source_bit) != 0 {
            out |= target;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: u8 = 0b0000_1111;

    #[test]
    fn decode_splits_all_bytes() {
        for n in 0..=255u8 {
            assert_eq!(decode_digit(n, 0), n % 10);
            assert_eq!(decode_digit(n, 1), (n / 10) % 10);
            assert_eq!(decode_digit(n, 2), n / 100);
        }
    }

    #[test]
    fn decode_example() {
        assert_eq!(decode_digit(247, 0), 7);
        assert_eq!(decode_digit(247, 1), 4);
        assert_eq!(decode_digit(247, 2), 2);
    }

    #[test]
    fn decode_out_of_range_position() {
        assert_eq!(decode_digit(247, 3), 0);
        assert_eq!(decode_digit(247, 42), 0);
    }

    #[test]
    fn encode_identity_mapper_is_noop() {
        for digit in 0..=15u8 {
            assert_eq!(encode(digit, IDENTITY), digit);
        }
    }

    #[test]
    fn encode_ignores_high_bits() {
        assert_eq!(encode(0b1111_0101, IDENTITY), 0b0101);
    }

    #[test]
    fn encode_scatters_onto_board_mask() {
        // decoder inputs wired to bits 0, 1, 2 and 6
        let mask = 0b0100_0111;
        assert_eq!(encode(0, mask), 0);
        assert_eq!(encode(1, mask), 0b0000_0001);
        assert_eq!(encode(7, mask), 0b0000_0111);
        assert_eq!(encode(8, mask), 0b0100_0000);
        assert_eq!(encode(9, mask), 0b0100_0001);
    }

    #[test]
    fn encode_never_leaves_the_mask() {
        let mask = 0b1010_1010;
        for digit in 0..=15u8 {
            assert_eq!(encode(digit, mask) & !mask, 0);
        }
    }

    #[test]
    fn encode_short_mapper_fills_what_it_can() {
        assert_eq!(encode(0b1111, 0b0000_0011), 0b0000_0011);
        assert_eq!(encode(0b1111, 0), 0);
    }
}
