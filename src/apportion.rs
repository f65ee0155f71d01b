//! Integer pixel widths for the stacked language bar.
//!
//! Widths are allocated with the largest-remainder method so that the
//! segments add up to the bar width exactly, while every language with a
//! non-zero share stays visible with at least one pixel.
//!
//! All arithmetic is done on exact rationals sharing the denominator
//! `sum(weights)`, so the result only depends on the weight ratios.

/// Split `width` pixels between `weights`.
///
/// The returned vector has one entry per weight, in the same order. When all
/// weights are zero every width is zero. The only case where the sum differs
/// from `width` is when there are more non-zero weights than the minimum of
/// one pixel each can absorb; the surplus is then left in place.
pub fn apportion(weights: &[u64], width: u32) -> Vec<u32> {
    let total: u128 = weights.iter().map(|&w| w as u128).sum();
    if total == 0 {
        return vec![0; weights.len()];
    }

    let mut widths = Vec::with_capacity(weights.len());
    // Numerator of `raw - width` over `total`, per segment.
    let mut remainders = Vec::with_capacity(weights.len());

    for &weight in weights {
        let scaled = weight as u128 * width as u128;
        let mut pixels = round_half_even(scaled, total);
        if weight > 0 && scaled > 0 && pixels == 0 {
            pixels = 1;
        }
        widths.push(pixels as u32);
        remainders.push(scaled as i128 - pixels as i128 * total as i128);
    }

    let assigned: i64 = widths.iter().map(|&w| w as i64).sum();
    let mut diff = width as i64 - assigned;
    let step = total as i128;

    while diff > 0 {
        let Some(i) = pick(&remainders, |i| weights[i] > 0, |a, b| a > b) else {
            break;
        };
        widths[i] += 1;
        remainders[i] -= step;
        diff -= 1;
    }

    while diff < 0 {
        let Some(i) = pick(&remainders, |i| widths[i] > 1, |a, b| a < b) else {
            break;
        };
        widths[i] -= 1;
        remainders[i] += step;
        diff += 1;
    }

    widths
}

/// Index of the eligible remainder that `better` prefers; ties keep the
/// lowest index.
fn pick(
    remainders: &[i128],
    eligible: impl Fn(usize) -> bool,
    better: impl Fn(i128, i128) -> bool,
) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &rem) in remainders.iter().enumerate() {
        if !eligible(i) {
            continue;
        }
        match best {
            Some(b) if !better(rem, remainders[b]) => {}
            _ => best = Some(i),
        }
    }
    best
}

/// `numerator / denominator` rounded to the nearest integer, halves to even.
fn round_half_even(numerator: u128, denominator: u128) -> u128 {
    let quotient = numerator / denominator;
    let twice_rem = (numerator % denominator) * 2;
    if twice_rem > denominator || (twice_rem == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}
