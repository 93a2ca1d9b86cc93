pub mod formatter;

pub use formatter::{
    format_delta, format_lines, format_match_result, format_placement_result, format_standings,
    should_use_colors,
};
