/// Array-backed lanes for targets without a vector implementation
#[derive(Debug, Clone, Copy)]
pub struct PortableVector([u8; 16]);

impl PortableVector {
    #[inline(always)]
    fn map2(self, other: Self, f: impl Fn(u8, u8) -> u8) -> Self {
        Self(std::array::from_fn(|i| f(self.0[i], other.0[i])))
    }
}

impl super::Vector for PortableVector {
    #[inline]
    fn is_available() -> bool {
        true
    }

    #[inline(always)]
    unsafe fn zero() -> Self {
        Self([0; 16])
    }

    #[inline(always)]
    unsafe fn splat_u8(value: u8) -> Self {
        Self([value; 16])
    }

    #[inline(always)]
    unsafe fn load_unaligned(data: *const u8) -> Self {
        Self(unsafe { (data as *const [u8; 16]).read_unaligned() })
    }

    #[inline(always)]
    unsafe fn store_unaligned(self, data: *mut u8) {
        unsafe { (data as *mut [u8; 16]).write_unaligned(self.0) }
    }

    #[inline(always)]
    unsafe fn adds_u8(self, other: Self) -> Self {
        self.map2(other, u8::saturating_add)
    }

    #[inline(always)]
    unsafe fn subs_u8(self, other: Self) -> Self {
        self.map2(other, u8::saturating_sub)
    }

    #[inline(always)]
    unsafe fn max_u8(self, other: Self) -> Self {
        self.map2(other, u8::max)
    }
}
