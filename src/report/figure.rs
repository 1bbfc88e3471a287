use crate::sweep::{LoadCurve, SweepResults};
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

pub const SIZE_TITLE: &str = "Load vs Size for Different Loss Rates";
pub const LOSS_RATE_TITLE: &str = "Load vs Loss Rate for Different Sizes";

/// Standalone pgfplots document: load vs size on the left, load vs loss rate on
/// the right, both log x with a grid and a legend. Data is read from the two CSVs
/// written by [`super::logger::CurveLogger`], named relative to the .tex file.
pub fn render_latex_figure(results: &SweepResults, sizes_csv: &str, loss_rates_csv: &str) -> String {
    let mut tex = String::new();

    tex.push_str("% Full size sweep is large, compile with lualatex\n");
    tex.push_str("\\documentclass{standalone}\n");
    tex.push_str("\\usepackage{pgfplots}\n");
    tex.push_str("\\usepgfplotslibrary{groupplots}\n");
    tex.push_str("\\pgfplotsset{compat=1.17}\n");
    tex.push_str("\\begin{document}\n");
    tex.push_str("\\begin{tikzpicture}\n");
    tex.push_str("\\begin{groupplot}[\n");
    tex.push_str("    group style={group size=2 by 1, horizontal sep=2cm},\n");
    tex.push_str("    width=9cm, height=7cm,\n");
    tex.push_str("    xmode=log, grid=major,\n");
    tex.push_str("    legend pos=north east, legend style={font=\\small},\n");
    tex.push_str("]\n");

    push_panel(&mut tex, SIZE_TITLE, "UDP Packet size (Bytes)", sizes_csv, &results.size_curves);
    push_panel(&mut tex, LOSS_RATE_TITLE, "Loss Rate", loss_rates_csv, &results.loss_rate_curves);

    tex.push_str("\\end{groupplot}\n");
    tex.push_str("\\end{tikzpicture}\n");
    tex.push_str("\\end{document}\n");

    tex
}

fn push_panel(tex: &mut String, title: &str, xlabel: &str, csv: &str, curves: &[LoadCurve]) {
    // writing into a String never fails
    let _ = writeln!(tex, "\\nextgroupplot[title={{{}}}, xlabel={{{}}}, ylabel={{Load}}]", title, xlabel);
    for (i, curve) in curves.iter().enumerate() {
        let _ = writeln!(
            tex,
            "\\addplot+[no marks] table[x index=0, y index={}, col sep=comma] {{{}}};",
            i + 1,
            csv
        );
        let _ = writeln!(tex, "\\addlegendentry{{{}}}", curve.label);
    }
}

pub fn export_latex_figure(
    results: &SweepResults,
    sizes_csv: &str,
    loss_rates_csv: &str,
    output: impl AsRef<Path>,
) -> Result<()> {
    std::fs::write(output, render_latex_figure(results, sizes_csv, loss_rates_csv))?;
    Ok(())
}
