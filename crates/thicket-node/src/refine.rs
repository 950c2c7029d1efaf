//! Parent-to-child coordinate refinement.

use thicket_core::{ElementCoords, NodeExtractors};

/// Coordinates of child `l` of an element at `parent`.
///
/// On every axis, takes `num_bits` bits of `l` starting at
/// `acc_offset`, moves them to `start`, and ORs them onto the parent's
/// coordinate. Shifts of 32 or more yield zero rather than wrapping.
pub fn refine_coordinates(
    parent: &ElementCoords,
    extractors: &NodeExtractors,
    l: u32,
) -> ElementCoords {
    let mut child = ElementCoords::ORIGIN;
    for ((out, &base), ex) in child
        .at
        .iter_mut()
        .zip(&parent.at)
        .zip(&extractors.extractors)
    {
        let bits = l.checked_shr(ex.acc_offset).unwrap_or(0) & low_mask(ex.num_bits);
        let addition = bits.checked_shl(ex.start).unwrap_or(0);
        *out = base | addition as i32;
    }
    child
}

#[inline]
fn low_mask(num_bits: u32) -> u32 {
    u32::MAX.checked_shr(u32::BITS - num_bits.min(u32::BITS)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use thicket_core::AxisExtractor;

    #[test]
    fn two_bits_shifted_to_start() {
        let parent = ElementCoords::ORIGIN;
        let ex = NodeExtractors::IDENTITY.with_axis(0, AxisExtractor::new(3, 2, 0));
        let child = refine_coordinates(&parent, &ex, 0b11);
        assert_eq!(child.at[0], 0b11000);
        assert_eq!(child.at[1], 0);
    }

    #[test]
    fn parent_bits_are_kept() {
        let parent = ElementCoords::from_axes(&[0b100, 0b1]);
        let ex = NodeExtractors::IDENTITY
            .with_axis(0, AxisExtractor::new(0, 2, 0))
            .with_axis(1, AxisExtractor::new(1, 1, 2));
        // l = 0b110: axis 0 takes bits 0..2 (0b10), axis 1 takes bit 2 (1).
        let child = refine_coordinates(&parent, &ex, 0b110);
        assert_eq!(child.at[0], 0b110);
        assert_eq!(child.at[1], 0b11);
    }

    #[test]
    fn zero_width_axis_is_unchanged() {
        let parent = ElementCoords::from_axes(&[5, 9]);
        let child = refine_coordinates(&parent, &NodeExtractors::IDENTITY, u32::MAX);
        assert_eq!(child, parent);
    }

    #[test]
    fn low_mask_edges() {
        assert_eq!(low_mask(0), 0);
        assert_eq!(low_mask(1), 1);
        assert_eq!(low_mask(31), 0x7FFF_FFFF);
        assert_eq!(low_mask(32), u32::MAX);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn refined_bits_land_in_their_window(
                start in 0u32..24,
                num_bits in 0u32..8,
                acc_offset in 0u32..24,
                l in any::<u32>(),
            ) {
                let ex = NodeExtractors::IDENTITY
                    .with_axis(0, AxisExtractor::new(start, num_bits, acc_offset));
                let child = refine_coordinates(&ElementCoords::ORIGIN, &ex, l);
                let expected = ((l >> acc_offset) & ((1u32 << num_bits) - 1)) << start;
                prop_assert_eq!(child.at[0] as u32, expected);
                prop_assert!(child.at[1..].iter().all(|&v| v == 0));
            }
        }
    }
}
