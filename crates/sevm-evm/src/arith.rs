//! 256-bit word arithmetic
//!
//! Every operation is total: results wrap modulo 2^256 and division by
//! zero yields zero. Signed variants read their operands as two's-complement.

use sevm_primitives::U256;

/// Bit width of a machine word
pub const WORD_BITS: usize = 256;

/// Word from a boolean flag
pub fn u256_from_bool(flag: bool) -> U256 {
    if flag {
        U256::one()
    } else {
        U256::zero()
    }
}

/// Try to convert a word to usize (None on overflow)
pub fn u256_to_usize(value: &U256) -> Option<usize> {
    if value.bits() > 64 {
        return None;
    }
    usize::try_from(value.low_u64()).ok()
}

/// Wrapping addition
pub fn u256_add(a: &U256, b: &U256) -> U256 {
    a.overflowing_add(*b).0
}

/// Wrapping subtraction
pub fn u256_sub(a: &U256, b: &U256) -> U256 {
    a.overflowing_sub(*b).0
}

/// Wrapping multiplication
pub fn u256_mul(a: &U256, b: &U256) -> U256 {
    a.overflowing_mul(*b).0
}

/// Unsigned division, 0 on div by zero
pub fn u256_div(a: &U256, b: &U256) -> U256 {
    if b.is_zero() {
        return U256::zero();
    }
    *a / *b
}

/// Unsigned modulo, 0 on mod by zero
pub fn u256_mod(a: &U256, b: &U256) -> U256 {
    if b.is_zero() {
        return U256::zero();
    }
    *a % *b
}

/// Signed division (two's complement)
///
/// `-2^255 / -1` overflows back to `-2^255`.
pub fn u256_sdiv(a: &U256, b: &U256) -> U256 {
    if b.is_zero() {
        return U256::zero();
    }
    let a_neg = is_negative(a);
    let b_neg = is_negative(b);
    let quotient = abs(a) / abs(b);
    if a_neg != b_neg {
        twos_complement(quotient)
    } else {
        quotient
    }
}

/// Signed modulo, result takes the sign of the dividend
pub fn u256_smod(a: &U256, b: &U256) -> U256 {
    if b.is_zero() {
        return U256::zero();
    }
    let remainder = abs(a) % abs(b);
    if is_negative(a) {
        twos_complement(remainder)
    } else {
        remainder
    }
}

/// (a + b) % n without truncating the intermediate sum
pub fn u256_addmod(a: &U256, b: &U256, n: &U256) -> U256 {
    if n.is_zero() {
        return U256::zero();
    }
    add_reduced(*a % *n, *b % *n, *n)
}

/// (a * b) % n without truncating the intermediate product
pub fn u256_mulmod(a: &U256, b: &U256, n: &U256) -> U256 {
    if n.is_zero() {
        return U256::zero();
    }
    // Double-and-add keeps every partial result below n
    let mut result = U256::zero();
    let mut addend = *a % *n;
    let mut multiplier = *b;
    while !multiplier.is_zero() {
        if multiplier.bit(0) {
            result = add_reduced(result, addend, *n);
        }
        addend = add_reduced(addend, addend, *n);
        multiplier = multiplier >> 1;
    }
    result
}

/// base^exponent mod 2^256
pub fn u256_exp(base: &U256, exponent: &U256) -> U256 {
    let mut base = *base;
    let mut exponent = *exponent;
    let mut result = U256::one();
    while !exponent.is_zero() {
        if exponent.bit(0) {
            result = result.overflowing_mul(base).0;
        }
        base = base.overflowing_mul(base).0;
        exponent = exponent >> 1;
    }
    result
}

/// Sign-extend `x` from byte `b` (0 = least significant)
pub fn u256_signextend(b: &U256, x: &U256) -> U256 {
    if *b >= U256::from(31) {
        return *x;
    }
    let sign_bit = b.low_u64() as usize * 8 + 7;
    let mask = (U256::one() << (sign_bit + 1)) - U256::one();
    if x.bit(sign_bit) {
        *x | !mask
    } else {
        *x & mask
    }
}

/// Byte `i` of `x` counting from the most significant end
pub fn u256_byte(i: &U256, x: &U256) -> U256 {
    if *i >= U256::from(32) {
        return U256::zero();
    }
    U256::from(x.byte(31 - i.low_u64() as usize))
}

/// Logical shift left
pub fn u256_shl(shift: &U256, value: &U256) -> U256 {
    if *shift >= U256::from(WORD_BITS as u64) {
        return U256::zero();
    }
    *value << shift.low_u64() as usize
}

/// Logical shift right
pub fn u256_shr(shift: &U256, value: &U256) -> U256 {
    if *shift >= U256::from(WORD_BITS as u64) {
        return U256::zero();
    }
    *value >> shift.low_u64() as usize
}

/// Arithmetic shift right, filling with the sign bit
pub fn u256_sar(shift: &U256, value: &U256) -> U256 {
    let negative = is_negative(value);
    if *shift >= U256::from(WORD_BITS as u64) {
        return if negative { U256::MAX } else { U256::zero() };
    }
    let shift = shift.low_u64() as usize;
    if negative {
        !(!*value >> shift)
    } else {
        *value >> shift
    }
}

/// Signed less than
pub fn u256_slt(a: &U256, b: &U256) -> bool {
    match (is_negative(a), is_negative(b)) {
        (true, false) => true,
        (false, true) => false,
        _ => a < b,
    }
}

/// Signed greater than
pub fn u256_sgt(a: &U256, b: &U256) -> bool {
    u256_slt(b, a)
}

/// Check if a value is negative in two's complement
pub fn is_negative(v: &U256) -> bool {
    v.bit(WORD_BITS - 1)
}

/// Two's complement negation: ~v + 1
pub fn twos_complement(v: U256) -> U256 {
    (!v).overflowing_add(U256::one()).0
}

fn abs(v: &U256) -> U256 {
    if is_negative(v) {
        twos_complement(*v)
    } else {
        *v
    }
}

// a, b < n
fn add_reduced(a: U256, b: U256, n: U256) -> U256 {
    let (sum, overflow) = a.overflowing_add(b);
    if overflow || sum >= n {
        sum.overflowing_sub(n).0
    } else {
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neg(v: u64) -> U256 {
        twos_complement(U256::from(v))
    }

    fn min_signed() -> U256 {
        U256::one() << 255
    }

    #[test]
    fn test_add_sub_wrap() {
        assert_eq!(u256_add(&U256::MAX, &U256::one()), U256::zero());
        assert_eq!(u256_sub(&U256::zero(), &U256::one()), U256::MAX);
        assert_eq!(u256_add(&U256::from(3), &U256::from(4)), U256::from(7));
    }

    #[test]
    fn test_mul_wraps() {
        assert_eq!(u256_mul(&U256::MAX, &U256::from(2)), U256::MAX - 1);
        assert_eq!(u256_mul(&U256::from(6), &U256::from(7)), U256::from(42));
    }

    #[test]
    fn test_div_mod_by_zero() {
        assert_eq!(u256_div(&U256::from(10), &U256::zero()), U256::zero());
        assert_eq!(u256_mod(&U256::from(10), &U256::zero()), U256::zero());
        assert_eq!(u256_sdiv(&U256::from(10), &U256::zero()), U256::zero());
        assert_eq!(u256_smod(&U256::from(10), &U256::zero()), U256::zero());
        assert_eq!(u256_addmod(&U256::one(), &U256::one(), &U256::zero()), U256::zero());
        assert_eq!(u256_mulmod(&U256::one(), &U256::one(), &U256::zero()), U256::zero());
    }

    #[test]
    fn test_sdiv() {
        assert_eq!(u256_sdiv(&U256::from(10), &neg(2)), neg(5));
        assert_eq!(u256_sdiv(&neg(10), &neg(2)), U256::from(5));
        assert_eq!(u256_sdiv(&neg(7), &U256::from(2)), neg(3));
    }

    #[test]
    fn test_sdiv_min_by_minus_one() {
        assert_eq!(u256_sdiv(&min_signed(), &U256::MAX), min_signed());
    }

    #[test]
    fn test_smod_sign_follows_dividend() {
        assert_eq!(u256_smod(&neg(8), &U256::from(3)), neg(2));
        assert_eq!(u256_smod(&U256::from(8), &neg(3)), U256::from(2));
    }

    #[test]
    fn test_addmod_wide_intermediate() {
        // (2^256 - 1) * 2 = 2^257 - 2, and 2^257 - 2 mod 8 = 6
        assert_eq!(u256_addmod(&U256::MAX, &U256::MAX, &U256::from(8)), U256::from(6));
        assert_eq!(u256_addmod(&U256::MAX, &U256::from(2), &U256::MAX), U256::from(2));
    }

    #[test]
    fn test_mulmod_wide_intermediate() {
        // (2^256 - 1)^2 mod 12 = 9
        assert_eq!(u256_mulmod(&U256::MAX, &U256::MAX, &U256::from(12)), U256::from(9));
        assert_eq!(u256_mulmod(&U256::from(10), &U256::from(10), &U256::from(8)), U256::from(4));
    }

    #[test]
    fn test_exp() {
        assert_eq!(u256_exp(&U256::from(2), &U256::from(10)), U256::from(1024));
        assert_eq!(u256_exp(&U256::from(2), &U256::from(256)), U256::zero());
        assert_eq!(u256_exp(&U256::zero(), &U256::zero()), U256::one());
        assert_eq!(u256_exp(&U256::from(3), &U256::from(2)), U256::from(9));
    }

    #[test]
    fn test_signextend() {
        assert_eq!(u256_signextend(&U256::zero(), &U256::from(0xff)), U256::MAX);
        assert_eq!(u256_signextend(&U256::zero(), &U256::from(0x7f)), U256::from(0x7f));
        assert_eq!(u256_signextend(&U256::zero(), &U256::from(0x1ff)), U256::MAX);
        assert_eq!(u256_signextend(&U256::one(), &U256::from(0x12_7fff)), U256::from(0x7fff));
        assert_eq!(u256_signextend(&U256::from(31), &U256::from(0xff)), U256::from(0xff));
        assert_eq!(u256_signextend(&U256::MAX, &U256::from(0xff)), U256::from(0xff));
    }

    #[test]
    fn test_byte() {
        let x = U256::from(0x12) << 248 | U256::from(0x34);
        assert_eq!(u256_byte(&U256::zero(), &x), U256::from(0x12));
        assert_eq!(u256_byte(&U256::from(31), &x), U256::from(0x34));
        assert_eq!(u256_byte(&U256::from(32), &x), U256::zero());
        assert_eq!(u256_byte(&U256::MAX, &x), U256::zero());
    }

    #[test]
    fn test_shifts_saturate() {
        let big = U256::from(256);
        assert_eq!(u256_shl(&big, &U256::MAX), U256::zero());
        assert_eq!(u256_shr(&big, &U256::MAX), U256::zero());
        assert_eq!(u256_sar(&big, &U256::MAX), U256::MAX);
        assert_eq!(u256_sar(&big, &U256::from(5)), U256::zero());
        assert_eq!(u256_sar(&U256::MAX, &min_signed()), U256::MAX);
    }

    #[test]
    fn test_shifts() {
        assert_eq!(u256_shl(&U256::one(), &U256::one()), U256::from(2));
        assert_eq!(u256_shl(&U256::from(255), &U256::one()), min_signed());
        assert_eq!(u256_shr(&U256::one(), &U256::from(2)), U256::one());
        assert_eq!(u256_shr(&U256::from(255), &min_signed()), U256::one());
    }

    #[test]
    fn test_sar() {
        assert_eq!(u256_sar(&U256::zero(), &U256::one()), U256::one());
        assert_eq!(u256_sar(&U256::one(), &U256::one()), U256::zero());
        assert_eq!(u256_sar(&U256::one(), &neg(16)), neg(8));
        assert_eq!(u256_sar(&U256::from(255), &min_signed()), U256::MAX);
        // 0xc000...00
        assert_eq!(u256_sar(&U256::one(), &min_signed()), U256::from(3) << 254);
    }

    #[test]
    fn test_signed_comparison() {
        assert!(u256_slt(&neg(1), &U256::zero()));
        assert!(!u256_slt(&U256::zero(), &neg(1)));
        assert!(u256_slt(&neg(2), &neg(1)));
        assert!(u256_sgt(&U256::one(), &neg(1)));
        assert!(!u256_sgt(&U256::one(), &U256::one()));
    }

    #[test]
    fn test_u256_to_usize() {
        assert_eq!(u256_to_usize(&U256::from(42)), Some(42));
        assert_eq!(u256_to_usize(&(U256::one() << 64)), None);
        assert_eq!(u256_to_usize(&U256::MAX), None);
    }
}
