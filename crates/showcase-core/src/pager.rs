use crate::models::Page;

/// Page size of the vinyl grid
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// `ceil(count / page_size)`, but never less than one page
pub fn total_pages(count: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    ((count + page_size - 1) / page_size).max(1)
}

/// Cut one page out of `items`. Out-of-range page numbers are clamped
/// rather than rejected; a page size of 0 is treated as 1.
pub fn paginate<T: Clone>(items: &[T], page_number: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(items.len(), page_size);
    let page_number = page_number.clamp(1, total_pages);

    let start = (page_number - 1) * page_size;
    let end = (start + page_size).min(items.len());
    let slice = items.get(start..end).unwrap_or(&[]);

    Page {
        items: slice.to_vec(),
        page_number,
        page_size,
        total_pages,
        total_items: items.len(),
    }
}
