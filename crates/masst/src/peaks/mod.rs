pub mod mgf;
pub mod parse;
pub use parse::{format_float, format_peak_lines, parse_peak_line, parse_peak_text};
pub mod reduce;
pub use reduce::{reduce_peak_text, reduce_peaks, validate_cap};
pub mod structs;
pub use structs::*;
