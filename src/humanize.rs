//! Human-readable byte sizes for log lines

use std::fmt;

/// Byte count that prints as `512B`, `3.4MB`, ...
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ByteSize(pub u64);

impl ByteSize {
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn to_human_readable(&self) -> String {
        const UNITS: &[(&str, u64)] = &[
            ("B", 1),
            ("KB", 1024),
            ("MB", 1024 * 1024),
            ("GB", 1024 * 1024 * 1024),
        ];

        for &(unit, divisor) in UNITS.iter().rev() {
            if self.0 >= divisor {
                let value = self.0 / divisor;
                let decimal = (self.0 % divisor) * 10 / divisor;
                if divisor == 1 || decimal == 0 {
                    return format!("{}{}", value, unit);
                }
                return format!("{}.{}{}", value, decimal, unit);
            }
        }

        "0B".to_string()
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_human_readable())
    }
}

impl From<u64> for ByteSize {
    fn from(value: u64) -> Self {
        ByteSize(value)
    }
}
