use std::arch::x86_64::*;

#[derive(Debug, Clone, Copy)]
pub struct SSEVector(__m128i);

impl super::Vector for SSEVector {
    #[inline]
    fn is_available() -> bool {
        raw_cpuid::CpuId::new()
            .get_feature_info()
            .is_some_and(|info| info.has_sse2())
    }

    #[inline(always)]
    unsafe fn zero() -> Self {
        Self(_mm_setzero_si128())
    }

    #[inline(always)]
    unsafe fn splat_u8(value: u8) -> Self {
        Self(_mm_set1_epi8(value as i8))
    }

    #[inline(always)]
    unsafe fn load_unaligned(data: *const u8) -> Self {
        Self(unsafe { _mm_loadu_si128(data as *const __m128i) })
    }

    #[inline(always)]
    unsafe fn store_unaligned(self, data: *mut u8) {
        unsafe { _mm_storeu_si128(data as *mut __m128i, self.0) }
    }

    #[inline(always)]
    unsafe fn adds_u8(self, other: Self) -> Self {
        Self(_mm_adds_epu8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn subs_u8(self, other: Self) -> Self {
        Self(_mm_subs_epu8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn max_u8(self, other: Self) -> Self {
        Self(_mm_max_epu8(self.0, other.0))
    }
}
