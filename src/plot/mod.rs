//! Terminal visualizations.
//!
//! Six charts, all rendered to plain strings:
//!
//! 1. acquisition-type distribution (`bars`)
//! 2. acquisition type by department (`bars`)
//! 3. accessions per decade (`bars`)
//! 4. gift-ratio trend by department (`ascii`)
//! 5. gift-ratio box plot by department (`boxplot`)
//! 6. department × decade gift-ratio heatmap (`heatmap`)
//!
//! Charts only borrow the classified records and the aggregate table.

pub mod ascii;
pub mod bars;
pub mod boxplot;
pub mod heatmap;

pub use ascii::render_gift_ratio_trend;
pub use bars::*;
pub use boxplot::*;
pub use heatmap::*;

use crate::domain::{AggregateRow, ClassifiedRecord};

/// Render all six charts with titles.
pub fn render_all(records: &[ClassifiedRecord], rows: &[AggregateRow], width: usize, height: usize) -> String {
    let sections = [
        ("Acquisition types", render_type_distribution(records, width / 2)),
        ("Acquisition type by department", render_type_by_department(records, width / 2)),
        ("Accessions per decade", render_decade_histogram(records, width / 2)),
        ("Gift ratio by decade", render_gift_ratio_trend(rows, width, height)),
        ("Gift ratio by department", render_gift_ratio_boxplot(rows, width / 2)),
        ("Gift ratio heatmap (department x decade)", render_gift_ratio_heatmap(rows)),
    ];

    let mut out = String::new();
    for (i, (title, body)) in sections.iter().enumerate() {
        out.push_str(&format!("[{}/{}] {title}\n", i + 1, sections.len()));
        out.push_str(body);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AcquisitionType, NormalizedRecord};

    #[test]
    fn render_all_has_six_sections() {
        let records: Vec<ClassifiedRecord> = [(1950, AcquisitionType::Philanthropy), (1961, AcquisitionType::Purchase)]
            .into_iter()
            .map(|(year, label)| ClassifiedRecord {
                record: NormalizedRecord {
                    object_id: year.to_string(),
                    department: "Prints".to_string(),
                    credit_line: String::new(),
                    accession_year: year,
                },
                acquisition_type: label,
                decade: crate::transform::decade_of(year),
            })
            .collect();
        let rows = crate::aggregate::aggregate(&records);

        let txt = render_all(&records, &rows, 40, 8);
        for i in 1..=6 {
            assert!(txt.contains(&format!("[{i}/6]")), "missing section {i}");
        }
    }
}
