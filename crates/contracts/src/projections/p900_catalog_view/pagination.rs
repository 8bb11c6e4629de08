/// Элемент строки навигации по страницам
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
    Page(u32),
    /// Пропуск между несмежными номерами ("···")
    Gap,
}

/// Число страниц; 0 при пустой выборке
pub fn total_pages(total_count: usize, items_per_page: u32) -> usize {
    if items_per_page == 0 {
        return 0;
    }
    total_count.div_ceil(items_per_page as usize)
}

/// Текущая страница, приведённая к диапазону `1..=total_pages`
pub fn clamp_page(current_page: u32, total_pages: usize) -> u32 {
    let last = u32::try_from(total_pages).unwrap_or(u32::MAX).max(1);
    current_page.clamp(1, last)
}

/// Номера для навигации: первая, последняя и соседи текущей, с пропусками между ними
pub fn visible_pages(current_page: u32, total_pages: u32) -> Vec<PageSlot> {
    let mut slots = Vec::new();
    let mut previous: Option<u32> = None;

    for page in 1..=total_pages {
        let near_current = page.abs_diff(current_page) <= 1;
        if !(near_current || page == 1 || page == total_pages) {
            continue;
        }
        if let Some(prev) = previous {
            if prev + 1 != page {
                slots.push(PageSlot::Gap);
            }
        }
        slots.push(PageSlot::Page(page));
        previous = Some(page);
    }

    slots
}

/// Подпись вида "13-24 of 40 items"
pub fn range_label(current_page: u32, items_per_page: u32, total_count: usize) -> String {
    if total_count == 0 {
        return "0 of 0 items".to_string();
    }
    let size = items_per_page as usize;
    let start = (current_page.max(1) as usize - 1) * size;
    if start >= total_count {
        return format!("0 of {} items", total_count);
    }
    let end = (start + size).min(total_count);
    format!("{}-{} of {} items", start + 1, end, total_count)
}
