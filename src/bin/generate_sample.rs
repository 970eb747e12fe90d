use std::path::PathBuf;

use anyhow::Context;

use penguin_dash::data::export::export_view;
use penguin_dash::data::filter::{compute_view, select_all};
use penguin_dash::data::sample::bundled_dataset;

/// Write the bundled dataset to a file (format from the extension) so it can
/// be edited and loaded back through `data_path` or File → Open.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let output_path: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("penguins.parquet"));

    let dataset = bundled_dataset();
    let view = compute_view(&dataset, &select_all(), &select_all());
    export_view(&view, &output_path)
        .with_context(|| format!("writing {}", output_path.display()))?;

    println!("Wrote {} penguins to {}", view.len(), output_path.display());
    Ok(())
}
