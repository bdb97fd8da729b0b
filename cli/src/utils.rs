use std::fs;
use std::io::{self, Read};

use crate::error::Result;

/// Read input from a file or stdin
///
/// If `file` is `Some`, reads from the specified file path.
/// If `file` is `None`, reads from stdin.
pub(crate) fn read_input(file: Option<&str>) -> Result<Vec<u8>> {
    match file {
        Some(path) => Ok(fs::read(path)?),
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Format bytes as colon separated uppercase hex, e.g. `10:01`.
pub(crate) fn format_hex_colon(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hex_colon() {
        assert_eq!("10:01", format_hex_colon(&[0x10, 0x01]));
        assert_eq!("07", format_hex_colon(&[0x07]));
        assert_eq!("", format_hex_colon(&[]));
    }
}
