mod error;
mod inventory;

use std::fs::{self, File};
use std::time::Duration;

use datagrid::{BoundaryOutcome, FaultBoundary, SelectionMode, Table, TableConfig};
use simplelog::{Config, LevelFilter, WriteLogger};
use tokio::sync::mpsc;

use crate::error::DemoError;
use crate::inventory::{Asset, Source};

/// How long the demo keeps listening for auto-refresh ticks.
const REFRESH_WINDOW: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), DemoError> {
    let log_file = File::create("datagrid-demo.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;

    let mut args = std::env::args().skip(1);
    let source = args.next().map(Source::File).unwrap_or(Source::Bundled);
    let config = match args.next() {
        Some(path) => TableConfig::from_json(&fs::read_to_string(path)?)?,
        None => TableConfig::default()
            .with_page_size_options(vec![5, 10, 20])
            .with_page_size(5)
            .with_selection(SelectionMode::Multi),
    };
    log::info!("Starting demo with {:?}", source);

    let (refresh_tx, mut refresh_rx) = mpsc::unbounded_channel();
    let mut table = Table::builder(inventory::columns())
        .rows(source.fetch()?)
        .config(config)
        .on_selection_change(|keys| log::info!("Selection changed: {} assets", keys.len()))
        .on_row_click(|asset: &Asset| println!("Clicked {} ({})", asset.serial, asset.model))
        .on_refresh(move || {
            let _ = refresh_tx.send(());
        })
        .build()?;

    let mut boundary = FaultBoundary::new().with_reload(|| log::warn!("Reloading the view"));
    show(&mut boundary, &table, "Inventory");

    table.toggle_sort("purchased_at");
    table.toggle_sort("purchased_at");
    show(&mut boundary, &table, "Newest purchases first");

    table.set_global_filter("asignado");
    show(&mut boundary, &table, "Assigned assets");

    table.toggle_all_rows_selected();
    println!("{} assets selected", table.selected_keys().len());
    for asset in table.selected_rows().take(3) {
        println!("  {} -> {}", asset.serial, asset.assignee.as_deref().unwrap_or("-"));
    }

    if let Some(&size) = table.page_size_options().get(1) {
        table.set_page_size(size);
    }
    if table.can_next_page() {
        table.next_page();
    }
    show(&mut boundary, &table, "Next page");

    let first_key = table.visible_rows().next().map(|a| a.id);
    if let Some(key) = first_key {
        table.click_row(&key);
    }

    table.set_refresh_interval_secs(1);
    table.set_auto_refresh(true);
    let deadline = tokio::time::sleep(REFRESH_WINDOW);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            Some(()) = refresh_rx.recv() => {
                table.set_rows(source.fetch()?);
                log::info!("Refreshed, {} rows after filtering", table.filtered_count());
                let page = table.page_info();
                println!(
                    "Refreshed: page {} of {}, {} rows",
                    page.page_index + 1,
                    page.page_count,
                    page.filtered_count
                );
            }
            _ = &mut deadline => break,
        }
    }
    table.set_auto_refresh(false);

    Ok(())
}

fn show(boundary: &mut FaultBoundary, table: &Table<Asset>, title: &str) {
    match boundary.render(|| table.render().to_text()) {
        BoundaryOutcome::Rendered(text) => println!("== {} ==\n{}", title, text),
        BoundaryOutcome::Faulted(fault) => {
            eprintln!("{}", fault);
            boundary.retry();
            if !boundary.render(|| table.render().to_text()).is_rendered() {
                boundary.reload();
            }
        }
    }
}
