/// Size formatting utilities: human-readable byte counts.
///
/// All internal sizes are `u64` bytes. Formatting only happens at the
/// display boundary and uses integer arithmetic throughout.
use std::fmt;
use std::str::FromStr;

const IEC_SUFFIXES: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];
const SI_SUFFIXES: &[&str] = &["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// How byte counts are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteFormat {
    /// Plain byte count, no unit.
    Bytes,
    /// Binary units, step 1024 (KiB, MiB, ...).
    #[default]
    Iec,
    /// Decimal units, step 1000 (kB, MB, ...).
    Si,
}

impl fmt::Display for ByteFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bytes => "bytes",
            Self::Iec => "iec",
            Self::Si => "si",
        })
    }
}

impl FromStr for ByteFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bytes" | "b" => Ok(Self::Bytes),
            "iec" | "binary" => Ok(Self::Iec),
            "si" | "decimal" => Ok(Self::Si),
            other => Err(format!(
                "unknown byte format '{other}' (expected bytes, iec or si)"
            )),
        }
    }
}

/// Format a byte count in the requested representation.
///
/// The unit chosen is the largest one strictly below `bytes`, so exact unit
/// boundaries stay in the smaller unit (`1024` is `"1024 B"`, not
/// `"1.0 KiB"`). One decimal digit is shown, truncated rather than rounded.
pub fn format_size(bytes: u64, format: ByteFormat) -> String {
    let (step, suffixes) = match format {
        ByteFormat::Bytes => return bytes.to_string(),
        ByteFormat::Iec => (1024u64, IEC_SUFFIXES),
        ByteFormat::Si => (1000u64, SI_SUFFIXES),
    };

    let mut index = 0;
    let mut unit: u64 = 1;
    while index + 1 < suffixes.len() {
        match unit.checked_mul(step) {
            Some(next) if next < bytes => {
                unit = next;
                index += 1;
            }
            _ => break,
        }
    }

    if index == 0 {
        return format!("{bytes} B");
    }

    let whole = bytes / unit;
    // remainder < unit <= 1024^6, so the multiplication cannot overflow.
    let tenth = (bytes % unit) * 10 / unit;
    format!("{whole}.{tenth} {}", suffixes[index])
}

/// Format a count with thousand separators.
pub fn format_count(count: u64) -> String {
    let s = count.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result
}
