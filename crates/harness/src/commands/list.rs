//! `harness list` - show the known scenarios

use anyhow::Result;
use comfy_table::Table;

pub async fn run() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Scenario", "Description"]);
    for scenario in harness::SCENARIOS {
        table.add_row(vec![scenario.name, scenario.description]);
    }
    println!("{table}");
    Ok(())
}
