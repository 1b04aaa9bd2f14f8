use crate::error::{ProfileError, Result};
use crate::table::{HourlyTable, SUMMARY_COLUMNS, TIMESTAMP};
use polars::prelude::*;
use std::collections::{BTreeSet, HashSet};

/// Sum a batch of hourly tables cell by cell.
///
/// Rows and columns are the union of the inputs; a cell missing from one
/// input counts as zero. Summary columns are summed like everything else.
pub fn combine(tables: &[HourlyTable]) -> Result<HourlyTable> {
    let (first, rest) = tables.split_first().ok_or(ProfileError::EmptyInput)?;
    rest.iter().try_fold(first.clone(), |acc, table| acc.add(table))
}

impl HourlyTable {
    /// Element-wise sum with zero fill on both the row and column axes.
    pub fn add(&self, other: &HourlyTable) -> Result<HourlyTable> {
        let columns = union_columns(self, other);
        let stacked = aligned(self, &columns)?.vstack(&aligned(other, &columns)?)?;

        let sums: Vec<Expr> = columns.iter().map(|c| col(c.as_str()).sum()).collect();
        let frame = stacked
            .lazy()
            .group_by([col(TIMESTAMP)])
            .agg(sums)
            .sort_by_exprs([col(TIMESTAMP)], SortMultipleOptions::default())
            .collect()?;

        Ok(HourlyTable::from_frame(frame))
    }
}

/// Summary columns first, then every energy column of either table in
/// lexicographic order, so `a + b` and `b + a` share a layout.
fn union_columns(left: &HourlyTable, right: &HourlyTable) -> Vec<String> {
    let energy: BTreeSet<String> = left
        .energy_columns()
        .into_iter()
        .chain(right.energy_columns())
        .collect();

    SUMMARY_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(energy)
        .collect()
}

fn aligned(table: &HourlyTable, columns: &[String]) -> Result<DataFrame> {
    let present: HashSet<String> = table.column_names().into_iter().collect();

    let mut selection = vec![col(TIMESTAMP)];
    for name in columns {
        if present.contains(name) {
            selection.push(col(name.as_str()).cast(DataType::Float64));
        } else {
            selection.push(lit(0.0).cast(DataType::Float64).alias(name.as_str()));
        }
    }

    Ok(table.frame().clone().lazy().select(selection).collect()?)
}
