//! Output formatting utilities for CLI commands
//!
//! Provides consistent formatting for:
//! - Tables with column alignment
//! - File sizes (human-readable)
//! - Deploy receipts

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use gigadeploy::DeployReceipt;

/// Format a file size in human-readable form
///
/// Examples:
/// - 500 -> "500 B"
/// - 1024 -> "1.0 KB"
/// - 1536000 -> "1.5 MB"
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Print a table with headers
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    println!("{}", build_table(headers, rows));
}

fn build_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        table.add_row(row);
    }
    table
}

/// Print what a deploy wrote, as a table or JSON.
pub fn print_receipt(receipt: &DeployReceipt, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(receipt)?);
        return Ok(());
    }

    let verb = if receipt.dry_run { "Would write" } else { "Wrote" };
    let mut title = format!("{} {}", verb, receipt.command);
    if let Some(platform) = &receipt.platform {
        title.push_str(&format!(" ({})", platform));
    }
    if let Some(id) = &receipt.reload_id {
        title.push_str(&format!(" id {}", id));
        if receipt.provisional_id {
            title.push_str(" (provisional: the real run draws its own id)");
        }
    }
    println!("{}", title);

    let rows = receipt
        .files
        .iter()
        .map(|f| {
            vec![
                f.role.clone(),
                f.destination.display().to_string(),
                format_size(f.bytes),
            ]
        })
        .collect();
    print_table(&["File", "Destination", "Size"], rows);

    if !receipt.dry_run {
        println!(
            "✓ {} files, {} into {}",
            receipt.files.len(),
            format_size(receipt.total_bytes()),
            receipt.plugins_dir.display()
        );
    }
    Ok(())
}
