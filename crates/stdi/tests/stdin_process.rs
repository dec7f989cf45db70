//! Exercises the real standard input descriptor through a pipe.
//!
//! Standard input is process-wide, so everything runs inside one test.
#![cfg(unix)]
#![allow(missing_docs, deprecated)]

use std::{fs::File, io::Write, os::fd::FromRawFd};

use stdi::{LineEnding, LineReader, ReadErrorKind, ReaderOptions, Stdin};

/// Replaces fd 0 with the read end of a pipe already holding `input`.
fn redirect_stdin(input: &[u8]) {
    let mut fds = [0; 2];
    // SAFETY: `fds` has room for the two descriptors.
    assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
    // SAFETY: the write end is ours and closed when `writer` drops.
    let mut writer = unsafe { File::from_raw_fd(fds[1]) };
    writer.write_all(input).unwrap();
    drop(writer);
    // SAFETY: both descriptors are valid; the original read end is closed
    // once duplicated onto fd 0.
    unsafe {
        assert!(libc::dup2(fds[0], libc::STDIN_FILENO) >= 0);
        libc::close(fds[0]);
    }
}

#[test]
fn reads_from_standard_input() {
    redirect_stdin(b"xy");
    assert_eq!(stdi::read_char(), b'x');
    assert_eq!(stdi::read_char(), b'y');
    assert_eq!(stdi::read_char(), 0);

    // One pipe read returns both lines; the second is lost with the reader.
    redirect_stdin(b"hello\nworld\n");
    assert_eq!(stdi::read_line().unwrap(), "hello");
    let rest = stdi::read_line().unwrap();
    assert!(rest.is_empty());
    assert_eq!(rest.ending(), LineEnding::EndOfStream);

    redirect_stdin(b"first\nsecond\n");
    assert_eq!(stdi::raw_read_line().unwrap(), "first");
    assert_eq!(stdi::raw_read_line().unwrap(), "second");
    assert!(stdi::raw_read_line().unwrap().is_empty());

    redirect_stdin(b"a\nb\nc");
    let options = ReaderOptions::default().with_retain_overread(true);
    let mut reader = LineReader::with_options(Stdin, options);
    let lines: Vec<Vec<u8>> = reader.lines().map(|l| l.unwrap().into_bytes()).collect();
    assert_eq!(lines, [b"a", b"b", b"c"]);

    redirect_stdin(b"abc");
    let mut buf = [0u8; 8];
    assert_eq!(stdi::raw_read(&mut buf, 2), 2);
    assert_eq!(&buf[..2], b"ab");
    assert_eq!(stdi::raw_read(&mut buf, 100), 1);
    assert_eq!(buf[0], b'c');
    assert_eq!(stdi::raw_read(&mut buf, 8), 0);

    // SAFETY: fd 0 is the pipe installed above.
    unsafe { libc::close(libc::STDIN_FILENO) };
    assert!(stdi::raw_read(&mut buf, 1) < 0);
    let err = stdi::read_line().unwrap_err();
    assert_eq!(err.kind(), ReadErrorKind::Io);
    let stdi::ReadError::Io(inner) = err else {
        unreachable!()
    };
    assert_eq!(inner.raw_os_error(), Some(libc::EBADF));
    assert_eq!(stdi::read_char(), 0);
}
