//! Department × decade heatmap of gift ratio.
//!
//! Each cell is two characters wide. Shading runs from `..` (ratio 0) to `@@`
//! (ratio 1); a blank cell means the department had no accessions that decade.

use std::collections::{BTreeMap, HashMap};

use crate::aggregate::decades;
use crate::domain::AggregateRow;
use crate::report::truncate;

const LABEL_WIDTH: usize = 28;

/// Shades from lowest to highest ratio.
const RAMP: &[u8] = b".:-=+*#%@";

pub(crate) fn shade(ratio: f64) -> char {
    let idx = (ratio.clamp(0.0, 1.0) * (RAMP.len() - 1) as f64).round() as usize;
    RAMP[idx] as char
}

/// Render the heatmap with a two-digit decade header (`50` for the 1950s).
pub fn render_gift_ratio_heatmap(rows: &[AggregateRow]) -> String {
    let cols = decades(rows);
    let mut cells: BTreeMap<&str, HashMap<i64, f64>> = BTreeMap::new();
    for r in rows {
        cells
            .entry(r.department.as_str())
            .or_default()
            .insert(r.decade, r.gift_ratio);
    }

    let mut out = String::new();
    if let (Some(first), Some(last)) = (cols.first(), cols.last()) {
        out.push_str(&format!("decades {first}..{last}\n"));
    }

    let header: String = cols
        .iter()
        .map(|d| format!("{:02}", d.rem_euclid(100)))
        .collect();
    out.push_str(format!("{:<LABEL_WIDTH$} {header}", "").trim_end());
    out.push('\n');

    for (dept, by_decade) in cells {
        let line: String = cols
            .iter()
            .map(|d| match by_decade.get(d) {
                Some(&ratio) => {
                    let ch = shade(ratio);
                    format!("{ch}{ch}")
                }
                None => "  ".to_string(),
            })
            .collect();
        out.push_str(&format!("{:<LABEL_WIDTH$} {line}", truncate(dept, LABEL_WIDTH)));
        out.push('\n');
    }

    out.push_str(&format!(
        "  scale: {} (0.0) .. {} (1.0), blank = no accessions\n",
        RAMP[0] as char,
        RAMP[RAMP.len() - 1] as char
    ));
    out
}
