//! Width-aware arithmetic.
//!
//! All inputs are truncated to the operative width first. Results carry
//! the flags the caller needs; N and Z are derived by the caller from
//! `value`.

use emu_core::Width;

/// Result of an add or subtract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluResult {
    pub value: u64,
    pub carry: bool,
    pub overflow: bool,
}

/// A + B + carry, binary or packed BCD.
#[must_use]
pub fn add(a: u64, b: u64, carry: bool, width: Width, decimal: bool) -> AluResult {
    let a = width.truncate(a);
    let b = width.truncate(b);
    let (value, carry) = if decimal {
        bcd_add(a, b, carry, width)
    } else {
        binary_add(a, b, carry, width)
    };
    AluResult {
        value,
        carry,
        overflow: overflow(a, b, value, width),
    }
}

/// A - B - !carry, binary or packed BCD. Carry out means no borrow.
#[must_use]
pub fn sub(a: u64, b: u64, carry: bool, width: Width, decimal: bool) -> AluResult {
    let a = width.truncate(a);
    let inverted = width.truncate(!b);
    let (value, carry) = if decimal {
        bcd_sub(a, width.truncate(b), carry, width)
    } else {
        binary_add(a, inverted, carry, width)
    };
    AluResult {
        value,
        carry,
        overflow: overflow(a, inverted, value, width),
    }
}

/// Register minus operand for CMP/CPX/CPY. Returns (difference, carry)
/// where carry is set when no borrow occurred.
#[must_use]
pub fn compare(reg: u64, data: u64, width: Width) -> (u64, bool) {
    let reg = width.truncate(reg);
    let data = width.truncate(data);
    (width.truncate(reg.wrapping_sub(data)), reg >= data)
}

fn binary_add(a: u64, b: u64, carry: bool, width: Width) -> (u64, bool) {
    let wide = u128::from(a) + u128::from(b) + u128::from(carry);
    (width.truncate(wide as u64), wide >> width.bits() != 0)
}

/// Signed overflow: operands agree in sign and the result does not.
fn overflow(a: u64, b: u64, value: u64, width: Width) -> bool {
    !(a ^ b) & (a ^ value) & width.sign_bit() != 0
}

/// Nibble-serial decimal add, least significant nibble first. A nibble
/// above 9 is corrected by 6 before its carry moves on.
fn bcd_add(a: u64, b: u64, carry: bool, width: Width) -> (u64, bool) {
    let mut result = 0;
    let mut carry = u64::from(carry);
    for nibble in 0..width.nibbles() {
        let shift = nibble * 4;
        let mut digit = ((a >> shift) & 0xF) + ((b >> shift) & 0xF) + carry;
        if digit > 9 {
            digit += 6;
        }
        carry = u64::from(digit > 0xF);
        result |= (digit & 0xF) << shift;
    }
    (result, carry != 0)
}

/// Nibble-serial decimal subtract. A nibble that goes negative borrows ten
/// from the next one.
fn bcd_sub(a: u64, b: u64, carry: bool, width: Width) -> (u64, bool) {
    let mut result = 0;
    let mut borrow = i64::from(!carry);
    for nibble in 0..width.nibbles() {
        let shift = nibble * 4;
        let mut digit = ((a >> shift) & 0xF) as i64 - ((b >> shift) & 0xF) as i64 - borrow;
        borrow = i64::from(digit < 0);
        if digit < 0 {
            digit += 10;
        }
        result |= (digit as u64 & 0xF) << shift;
    }
    (result, borrow == 0)
}
