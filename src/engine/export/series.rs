//! Chart-ready series derived from a result list. Rendering is left to
//! whatever consumes the written table.

use std::io::Write;

use indexmap::IndexMap;

use crate::engine::errors::ExportError;
use crate::engine::rank::ResultList;
use crate::engine::types::Amount;

/// Labelled points, in first-seen label order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub value: String,
    pub points: Vec<(String, String)>,
}

/// Sums `sum` over entries grouped by their `descriptive` field.
///
/// Entries lacking the descriptive field are grouped under an empty label;
/// entries lacking the sum are ignored.
pub fn total_by(list: &ResultList, descriptive: &str, sum: &str) -> Result<Series, ExportError> {
    let mut totals: IndexMap<String, Amount> = IndexMap::new();
    for entry in list {
        let Some(amount) = entry.sum(sum) else {
            continue;
        };
        let label = entry.descriptive(descriptive).unwrap_or_default().to_string();
        let slot = totals
            .entry(label)
            .or_insert_with(|| Amount::zero(amount.scale()));
        *slot = slot.checked_add(amount).ok_or_else(|| {
            ExportError::Overflow(format!("{sum} by {descriptive}"))
        })?;
    }
    Ok(Series {
        label: descriptive.to_string(),
        value: format!("total_{sum}"),
        points: totals
            .into_iter()
            .map(|(label, total)| (label, total.to_string()))
            .collect(),
    })
}

/// Entry counts per group key, in list order.
pub fn count_by_key(list: &ResultList, label: &str) -> Series {
    Series {
        label: label.to_string(),
        value: "count".to_string(),
        points: list
            .iter()
            .map(|entry| (entry.key.to_string(), entry.count.to_string()))
            .collect(),
    }
}

pub fn write_series_csv<W: Write>(output: W, series: &Series) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record([series.label.as_str(), series.value.as_str()])?;
    for (label, value) in &series.points {
        writer.write_record([label, value])?;
    }
    writer.flush()?;
    Ok(())
}
