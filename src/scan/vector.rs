use crate::band::{BandGeometry, BandGrids};
use crate::r#const::LANES;
use crate::score::ScoreProfile;
use crate::simd::Vector;

/// Scores the band one lane group of diagonals at a time.
///
/// Each lane runs `v = (v +sat score + bias) -sat bias` along its diagonal, so the running
/// score is floored at zero by saturation alone. Every `block_len` columns the block
/// maximum is written out and reset; the running score carries over.
///
/// # Safety
///
/// Caller must ensure `V::is_available()`
#[inline(always)]
pub(crate) unsafe fn scan_cols<V: Vector>(
    profile: &ScoreProfile,
    subject: &[u8],
    geometry: &BandGeometry,
    grids: &mut BandGrids,
) {
    let (j, j_end, bl) = (geometry.j_begin, geometry.j_end, geometry.block_len);
    let bias = unsafe { V::splat_u8(profile.bias()) };

    for o in (0..geometry.band()).step_by(LANES) {
        let i2 = geometry.i_begin + o as i32;
        // first column where the top lane enters the query, last where the bottom one leaves
        let j2_begin = (-(i2 - j + LANES as i32 - 1)).max(j);
        let j2_end = (geometry.query_len - (i2 - j)).min(j_end);

        unsafe {
            let mut v = V::zero();
            let mut max = V::zero();
            let mut global_max = V::zero();

            let mut col = j2_begin - j;
            for j2 in j2_begin..j2_end {
                let scores = V::load_unaligned(
                    profile.lanes(subject[j2 as usize], j2 + i2 - j).as_ptr(),
                );
                v = v.adds_u8(scores).subs_u8(bias);
                max = max.max_u8(v);
                v.store_unaligned(grids.score_buf.lanes_mut(o, col as usize).as_mut_ptr());

                if col % bl == bl - 1 {
                    global_max = global_max.max_u8(max);
                    max.store_unaligned(
                        grids.local_max.lanes_mut(o, (col / bl) as usize).as_mut_ptr(),
                    );
                    max = V::zero();
                }
                col += 1;
            }

            if j2_begin < j2_end && col % bl != 0 {
                global_max = global_max.max_u8(max);
                max.store_unaligned(grids.local_max.lanes_mut(o, (col / bl) as usize).as_mut_ptr());
            }

            global_max.store_unaligned(grids.sv_max[o..o + LANES].as_mut_ptr());
        }
    }
}
