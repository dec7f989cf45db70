//! C ABI for `stdi`.
//!
//! Exposes the standard-input readers with their classic C signatures. Lines
//! come back as `malloc`-allocated, NUL-terminated strings that the caller
//! releases with `free` (or [`free_line`]). Every failure, allocation or
//! read, is a null pointer.
#![cfg(unix)]

use core::{ffi::c_char, ptr};

use stdi::{Line, LineReader, ReadError, Stdin};

/// Reads up to `size` bytes from standard input into `buffer`.
///
/// Returns the byte count, `0` at end-of-stream, `-1` on failure.
///
/// # Safety
///
/// `buffer` must be valid for writes of `size` bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn fread_line(buffer: *mut c_char, size: usize) -> isize {
    // SAFETY: upheld by the caller.
    unsafe { libc::read(libc::STDIN_FILENO, buffer.cast(), size) }
}

/// Reads one byte from standard input, `0` at end-of-stream or on failure.
#[unsafe(no_mangle)]
pub extern "C" fn read_char() -> c_char {
    LineReader::new(Stdin).read_char() as c_char
}

/// Reads one line from standard input, chunk by chunk.
///
/// Returns a `malloc`-allocated string without the newline, or null.
#[unsafe(no_mangle)]
pub extern "C" fn read_line() -> *mut c_char {
    into_malloced(LineReader::new(Stdin).read_line())
}

/// Reads one line from standard input, one byte per read.
///
/// Returns a `malloc`-allocated string without the newline, or null.
#[unsafe(no_mangle)]
#[allow(deprecated)]
pub extern "C" fn raw_read_line() -> *mut c_char {
    into_malloced(LineReader::new(Stdin).raw_read_line())
}

/// Releases a line returned by [`read_line`] or [`raw_read_line`].
///
/// # Safety
///
/// `line` must be null or a pointer returned by one of those functions that
/// has not been freed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn free_line(line: *mut c_char) {
    // SAFETY: upheld by the caller; `free(NULL)` is a no-op.
    unsafe { libc::free(line.cast()) }
}

/// Copies a line and its terminator into a fresh `malloc` allocation.
fn into_malloced(line: Result<Line, ReadError>) -> *mut c_char {
    let Ok(line) = line else {
        return ptr::null_mut();
    };
    let bytes = line.as_bytes_with_nul();

    // SAFETY: plain allocation, checked for null below.
    let out = unsafe { libc::malloc(bytes.len()) }.cast::<u8>();
    if out.is_null() {
        return ptr::null_mut();
    }
    // SAFETY: `out` has room for `bytes.len()` bytes and is a new allocation.
    unsafe { ptr::copy_nonoverlapping(bytes.as_ptr(), out, bytes.len()) };
    out.cast()
}
