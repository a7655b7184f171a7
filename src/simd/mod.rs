#[cfg(target_arch = "x86_64")]
mod sse;
mod portable;

pub use portable::PortableVector;
#[cfg(target_arch = "x86_64")]
pub use sse::SSEVector;

/// 16 lanes of unsigned bytes, the accumulator of the column scanner
pub trait Vector: Copy + core::fmt::Debug {
    fn is_available() -> bool;

    /// Create a vector with zeros in all lanes.
    unsafe fn zero() -> Self;
    /// Create a vector with the given byte repeated into each lane.
    unsafe fn splat_u8(value: u8) -> Self;

    /// Read a vector-size number of bytes from the given pointer. The pointer
    /// does not need to be aligned.
    ///
    /// # Safety
    ///
    /// Callers must guarantee that at least 16 bytes are readable from `data`.
    unsafe fn load_unaligned(data: *const u8) -> Self;

    /// Write all lanes to the given pointer. The pointer does not need to be aligned.
    ///
    /// # Safety
    ///
    /// Callers must guarantee that at least 16 bytes are writable at `data`.
    unsafe fn store_unaligned(self, data: *mut u8);

    unsafe fn adds_u8(self, other: Self) -> Self;
    unsafe fn subs_u8(self, other: Self) -> Self;
    unsafe fn max_u8(self, other: Self) -> Self;
}
