use std::io::{self, ErrorKind, Read, Write};

/// Reads until `buf` is full, restarting after interrupts.
///
/// Returns the number of bytes read, which is less than `buf.len()` only
/// when the source ends first. Callers decide whether a short count is a
/// clean end of input or a truncation.
pub(crate) fn read_full(r: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match r.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Writes all of `buf`, restarting after interrupts.
pub(crate) fn write_full(w: &mut impl Write, buf: &[u8]) -> io::Result<()> {
    let mut total = 0;
    while total < buf.len() {
        match w.write(&buf[total..]) {
            Ok(0) => return Err(ErrorKind::WriteZero.into()),
            Ok(n) => total += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Swaps adjacent bytes across `buf`, used for 16-bit samples produced by a
/// host of the opposite byte order. A trailing odd byte is left alone.
pub(crate) fn swap_pairs(buf: &mut [u8]) {
    for pair in buf.chunks_exact_mut(2) {
        pair.swap(0, 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Yields one byte at a time and fails with `Interrupted` before each.
    struct Choppy<'a> {
        data: &'a [u8],
        interrupt_next: bool,
    }

    impl Read for Choppy<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.interrupt_next {
                self.interrupt_next = false;
                return Err(ErrorKind::Interrupted.into());
            }
            self.interrupt_next = true;
            match self.data.split_first() {
                Some((first, rest)) => {
                    self.data = rest;
                    buf[0] = *first;
                    Ok(1)
                }
                None => Ok(0),
            }
        }
    }

    #[test]
    fn read_full_retries_interrupts() {
        let mut src = Choppy {
            data: &[1, 2, 3, 4],
            interrupt_next: true,
        };
        let mut buf = [0u8; 4];
        assert_eq!(read_full(&mut src, &mut buf).unwrap(), 4);
        assert_eq!(buf, [1, 2, 3, 4]);
    }

    #[test]
    fn read_full_reports_short_input() {
        let mut src = Choppy {
            data: &[7, 8],
            interrupt_next: false,
        };
        let mut buf = [0u8; 5];
        assert_eq!(read_full(&mut src, &mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[7, 8]);
    }

    #[test]
    fn write_full_retries_interrupts() {
        struct ChoppySink {
            written: Vec<u8>,
            interrupt_next: bool,
        }
        impl Write for ChoppySink {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                if self.interrupt_next {
                    self.interrupt_next = false;
                    return Err(ErrorKind::Interrupted.into());
                }
                self.interrupt_next = true;
                self.written.push(buf[0]);
                Ok(1)
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let mut sink = ChoppySink {
            written: Vec::new(),
            interrupt_next: true,
        };
        write_full(&mut sink, &[9, 8, 7]).unwrap();
        assert_eq!(sink.written, vec![9, 8, 7]);
    }

    #[test]
    fn swap_pairs_flips_adjacent_bytes() {
        let mut even = [0x11, 0x22, 0x33, 0x44];
        swap_pairs(&mut even);
        assert_eq!(even, [0x22, 0x11, 0x44, 0x33]);

        let mut odd = [0xaa, 0xbb, 0xcc];
        swap_pairs(&mut odd);
        assert_eq!(odd, [0xbb, 0xaa, 0xcc]);

        let mut twice = [0x11, 0x22, 0x33, 0x44];
        swap_pairs(&mut twice);
        swap_pairs(&mut twice);
        assert_eq!(twice, [0x11, 0x22, 0x33, 0x44]);
    }
}
