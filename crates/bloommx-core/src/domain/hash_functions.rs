//! Hash functions for the Bloom filter
//!
//! FNV-1a carried in four 16-bit lanes (the 64-bit FNV offset basis and
//! prime), folded over the UTF-16 code units of the input. The two 32-bit
//! halves of the state seed a Kirsch-Mitzenmacher probe sequence.
//!
//! Builder and runtime both call [`probe_positions`]; any change here changes
//! which bits an artifact sets and invalidates every artifact built before it.

/// Low 16 bits of the FNV prime. The `2^40` term is applied as a `<< 8` carry
/// into the lane two positions up.
const FNV_PRIME: u32 = 0x01b3;

/// 64-bit FNV offset basis, least significant lane first
const FNV_OFFSET_LANES: [u32; 4] = [0x2325, 0x8422, 0x9ce4, 0xcbf2];

const LANE_MASK: u32 = 0xffff;

/// Hash a string into two signed 32-bit values `(a, b)`
///
/// `a` is the high half of the state and `b` the low half. Both are signed so
/// that [`reduce`] applies the same negative-remainder correction to them.
pub fn fnv1a(value: &str) -> (i32, i32) {
    let [mut v0, mut v1, mut v2, mut v3] = FNV_OFFSET_LANES;

    for unit in value.encode_utf16() {
        v0 ^= u32::from(unit);
        let t0 = v0.wrapping_mul(FNV_PRIME);
        let mut t1 = v1.wrapping_mul(FNV_PRIME);
        let mut t2 = v2.wrapping_mul(FNV_PRIME);
        let mut t3 = v3.wrapping_mul(FNV_PRIME);
        t2 = t2.wrapping_add(v0 << 8);
        t3 = t3.wrapping_add(v1 << 8);
        t1 = t1.wrapping_add(t0 >> 16);
        v0 = t0 & LANE_MASK;
        t2 = t2.wrapping_add(t1 >> 16);
        v1 = t1 & LANE_MASK;
        v3 = t3.wrapping_add(t2 >> 16) & LANE_MASK;
        v2 = t2 & LANE_MASK;
    }

    (((v3 << 16) | v2) as i32, ((v1 << 16) | v0) as i32)
}

/// Reduce a signed hash into `[0, m)`
pub fn reduce(hash: i32, m: usize) -> usize {
    i64::from(hash).rem_euclid(m as i64) as usize
}

/// Probe indices for one value
///
/// Round 0 yields `a0`; every later round `i` advances
/// `a = (a + b) mod m` then `b = (b + i) mod m` and yields the new `a`.
#[derive(Clone, Debug)]
pub struct ProbeSequence {
    a: usize,
    b: usize,
    m: usize,
    round: usize,
    k: usize,
}

impl Iterator for ProbeSequence {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.round >= self.k {
            return None;
        }
        if self.round > 0 {
            self.a = (self.a + self.b) % self.m;
            self.b = (self.b + self.round) % self.m;
        }
        self.round += 1;
        Some(self.a)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.k.saturating_sub(self.round);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}

/// Lazily compute the `k` probe positions of `value` in an `m`-bit array
///
/// # Panics
/// Panics if `m` is zero.
pub fn probe_positions(value: &str, k: usize, m: usize) -> ProbeSequence {
    assert!(m > 0, "probe sequence requires a non-empty bit array");
    let (a, b) = fnv1a(value);
    ProbeSequence {
        a: reduce(a, m),
        b: reduce(b, m),
        m,
        round: 0,
        k,
    }
}
