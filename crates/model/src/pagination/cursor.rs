use std::collections::VecDeque;

/// Read position of a paged iteration.
///
/// Tracks how many elements were consumed from earlier pages (`base_index`)
/// and how far into the current page the reader is (`buffer_index`).
/// `base_index + buffer_index` is always the number of elements handed out.
#[derive(Debug, Clone)]
pub struct PageCursor<T> {
    /// Elements consumed from all pages before the current one.
    base_index: usize,

    /// Unread part of the current page. `None` until the first page is installed.
    buffer: Option<VecDeque<T>>,

    /// Length of the current page as returned by the source.
    page_len: usize,

    /// Position of the next unread element within the current page.
    buffer_index: usize,
}

impl<T> Default for PageCursor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PageCursor<T> {
    pub fn new() -> Self {
        PageCursor {
            base_index: 0,
            buffer: None,
            page_len: 0,
            buffer_index: 0,
        }
    }

    /// Number of elements already returned to the caller.
    pub fn consumed(&self) -> usize {
        self.base_index + self.buffer_index
    }

    /// True before the first page or once the current page is fully read.
    pub fn needs_page(&self) -> bool {
        match &self.buffer {
            None => true,
            Some(_) => self.buffer_index >= self.page_len,
        }
    }

    /// Offset the next page must start at.
    pub fn next_offset(&self) -> usize {
        self.base_index + self.page_len
    }

    /// Replaces the current page, moving `base_index` past the previous one.
    pub fn install_page(&mut self, page: Vec<T>) {
        self.base_index = self.next_offset();
        self.page_len = page.len();
        self.buffer = Some(VecDeque::from(page));
        self.buffer_index = 0;
    }

    /// Hands out the next buffered element, if any.
    pub fn take_next(&mut self) -> Option<T> {
        let next = self.buffer.as_mut()?.pop_front()?;
        self.buffer_index += 1;
        Some(next)
    }
}
