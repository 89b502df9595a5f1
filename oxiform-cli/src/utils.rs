//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

/// Create a progress bar with standard styling, counting bytes.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise each `-v` raises the level one step
/// from `warn`.
pub fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Fill `buf` from `reader`, stopping early only at end of input.
///
/// Returns the number of bytes read. Chunk boundaries on encode and decode
/// must line up, so short reads from the OS are not allowed to shrink a
/// chunk.
pub fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hands out at most three bytes per read.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(3).min(self.0.len());
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_read_chunk_fills_buffer() {
        let data = [7u8; 20];
        let mut reader = Trickle(&data);
        let mut buf = [0u8; 8];

        assert_eq!(read_chunk(&mut reader, &mut buf).unwrap(), 8);
        assert_eq!(read_chunk(&mut reader, &mut buf).unwrap(), 8);
        assert_eq!(read_chunk(&mut reader, &mut buf).unwrap(), 4);
        assert_eq!(read_chunk(&mut reader, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_hidden_progress_bar() {
        let pb = create_progress_bar(100, false);
        assert!(pb.is_hidden());
    }
}
