/// Quickstart example - flatten a query result into a table
use asterix_interpreter::{FlattenConfig, JsonFlattener, Table};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    println!("=== Flattening Quick Start ===\n");

    // Step 1: Tuples as the query endpoint returns them
    let tuples = vec![
        json!({
            "id": 1,
            "name": "Alice",
            "address": {"city": "Irvine", "zip": "92697"},
            "tags": ["admin", "ops"]
        }),
        json!({
            "id": 2,
            "name": "Bob",
            "address": {"city": "Riverside"}
        }),
    ];

    println!("Original JSON:");
    println!("{}\n", serde_json::to_string_pretty(&tuples)?);

    // Step 2: Flatten every tuple and collect the header
    let flattener = JsonFlattener::new(FlattenConfig::default());
    let table = Table::from_tuples(&tuples, &flattener)?;

    println!("Columns ({}):", table.keys().len());
    for key in table.keys().iter() {
        println!("  • {}", key);
    }

    // Step 3: Render as tab-separated text
    println!("\nTable:");
    print!("{}", table.to_tsv());

    Ok(())
}
