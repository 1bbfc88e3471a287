use crate::sweep::LoadCurve;
use anyhow::{Result, bail};
use csv::Writer;
use std::fs::File;
use std::path::Path;

/// Writes a family of curves sharing one x axis as a wide CSV:
/// first column is x, then one load column per curve.
pub struct CurveLogger {
    writer: Writer<File>,
}

impl CurveLogger {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let writer = Writer::from_path(path)?;
        Ok(Self { writer })
    }

    pub fn log_curves(&mut self, x_label: &str, column_prefix: &str, curves: &[LoadCurve]) -> Result<()> {
        let Some(first) = curves.first() else {
            bail!("No curves to log");
        };
        if let Some(odd) = curves.iter().find(|c| c.xs != first.xs || c.loads.len() != first.len()) {
            bail!("Curve '{}' does not share the x axis of '{}'", odd.label, first.label);
        }

        let mut header = vec![x_label.to_string()];
        header.extend(curves.iter().map(|c| format!("{}{}", column_prefix, c.parameter)));
        self.writer.write_record(&header)?;

        for (i, x) in first.xs.iter().enumerate() {
            let mut row = Vec::with_capacity(curves.len() + 1);
            row.push(x.to_string());
            row.extend(curves.iter().map(|c| c.loads[i].to_string()));
            self.writer.write_record(&row)?;
        }

        self.writer.flush()?;
        Ok(())
    }
}
