// Pagination module for computing which page links to show

/// Parse a `page` query value; anything unusable means page 1
pub fn current_page(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 1;
    };

    // Leading digits count, like "3abc"
    let trimmed = raw.trim();
    let digits_end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());

    match trimmed[..digits_end].parse::<u32>() {
        Ok(page) if page >= 1 => page,
        _ => 1,
    }
}

pub fn page_count(count: u64, per_page: u64) -> u32 {
    if per_page == 0 {
        return 1;
    }
    let pages = count.div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Window of `show_pages` page numbers around the current page
///
/// # Examples
/// ```ignore
/// assert_eq!(visible_pages(30, 1, 7), vec![1, 2, 3, 4, 5, 6, 7]);
/// assert_eq!(visible_pages(30, 15, 7), vec![12, 13, 14, 15, 16, 17, 18]);
/// ```
pub fn visible_pages(page_count: u32, current_page: u32, show_pages: u32) -> Vec<u32> {
    if show_pages == 0 {
        return Vec::new();
    }
    if page_count <= show_pages {
        return (1..=page_count).collect();
    }

    let (count, current, show) = (
        i64::from(page_count),
        i64::from(current_page.max(1)),
        i64::from(show_pages),
    );
    let extra = show / 2;
    let start = (current - extra).max(1);
    let end = (current + extra).min(count);

    // Short on the right: anchor on the end. Otherwise anchor on the start,
    // which also keeps even widths from gaining a page.
    let (first, last) = if end - current < extra {
        (end - show + 1, end)
    } else {
        (start, start + show - 1)
    };

    (first.max(1)..=last.min(count))
        .filter_map(|page| u32::try_from(page).ok())
        .collect()
}
