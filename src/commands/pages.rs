// Pages command for previewing pagination links

use crate::config::Settings;
use crate::constants;
use crate::pagination::{current_page, page_count, visible_pages};
use crate::ui;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct PagesOutput {
    schema_version: u32,
    page_count: u32,
    current_page: u32,
    pages: Vec<u32>,
}

pub struct PagesArgs {
    pub page_count: Option<u32>,
    pub count: Option<u64>,
    pub per_page: Option<u64>,
    pub current: Option<String>,
    pub show: Option<u32>,
    pub json: bool,
}

pub fn pages(args: PagesArgs) -> anyhow::Result<()> {
    let total = match (args.page_count, args.count, args.per_page) {
        (Some(total), _, _) => total.max(1),
        (None, Some(count), Some(per_page)) => page_count(count, per_page),
        _ => anyhow::bail!("Either --page-count or --count with --per-page is required"),
    };

    let show = match args.show {
        Some(show) => show,
        None => Settings::load_or_default()?.show_pages,
    };
    let current = current_page(args.current.as_deref());

    let output = PagesOutput {
        schema_version: constants::SCHEMA_VERSION,
        page_count: total,
        current_page: current,
        pages: visible_pages(total, current, show),
    };

    if args.json {
        return ui::json(&output);
    }

    let line = output
        .pages
        .iter()
        .map(|page| {
            if *page == current {
                format!("[{}]", page)
            } else {
                page.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    ui::plain(&line);
    Ok(())
}
