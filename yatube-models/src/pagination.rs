use crate::Result;

/// A 1-indexed page number, as requested by a client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    page: i32,
}

impl Default for Page {
    fn default() -> Self {
        Page::first()
    }
}

impl Page {
    pub fn first() -> Page {
        Page { page: 1 }
    }

    pub fn new(page: i32) -> Page {
        Page { page: page.max(1) }
    }

    /// Reads the `page` query value. Missing or garbage values mean the first page.
    pub fn from_query(value: Option<&str>) -> Page {
        value
            .and_then(|v| v.trim().parse::<i32>().ok())
            .map(Page::new)
            .unwrap_or_default()
    }

    pub fn number(self) -> i32 {
        self.page
    }
}

fn total_pages(count: i64, page_size: i32) -> i32 {
    let size = i64::from(page_size);
    ((count + size - 1) / size) as i32
}

// saturates instead of overflowing on absurd page numbers
fn window(page: i32, page_size: i32) -> (i32, i32) {
    (
        (page - 1).saturating_mul(page_size),
        page.saturating_mul(page_size),
    )
}

/// One page of an ordered sequence, with the metadata needed to navigate it.
#[derive(Clone, Debug, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// `0` for an empty sequence
    pub total_pages: i32,
    /// Always in `1..=max(total_pages, 1)`
    pub current_page: i32,
}

impl<T> Paginated<T> {
    /// Slices an already loaded sequence.
    ///
    /// Page sizes below 1 are treated as 1. Pages before the first one clamp to
    /// the first page, pages after the last one clamp to the last page.
    pub fn paginate(sequence: Vec<T>, page_size: i32, page: i32) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_pages(sequence.len() as i64, page_size);
        let current_page = page.max(1).min(total_pages.max(1));
        let (min, max) = window(current_page, page_size);
        let items = sequence
            .into_iter()
            .skip(min as usize)
            .take((max - min) as usize)
            .collect();
        Paginated {
            items,
            total_pages,
            current_page,
        }
    }

    /// Counts first, then loads only the `(min, max)` window of the clamped page.
    pub fn from_count<F>(count: i64, page_size: i32, page: i32, loader: F) -> Result<Self>
    where
        F: FnOnce((i32, i32)) -> Result<Vec<T>>,
    {
        let page_size = page_size.max(1);
        let total_pages = total_pages(count, page_size);
        let current_page = page.max(1).min(total_pages.max(1));
        let items = if count == 0 {
            vec![]
        } else {
            loader(window(current_page, page_size))?
        };
        Ok(Paginated {
            items,
            total_pages,
            current_page,
        })
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Converts every item, keeping the navigation data.
    pub fn to_api<U, E, F>(self, f: F) -> std::result::Result<yatube_api::PageData<U>, E>
    where
        F: FnMut(T) -> std::result::Result<U, E>,
    {
        Ok(yatube_api::PageData {
            has_next: self.has_next(),
            has_previous: self.has_previous(),
            total_pages: self.total_pages,
            current_page: self.current_page,
            items: self
                .items
                .into_iter()
                .map(f)
                .collect::<std::result::Result<Vec<U>, E>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_items() {
        let seq = (1..=13).collect::<Vec<i32>>();

        let first = Paginated::paginate(seq.clone(), 10, 1);
        assert_eq!(first.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.current_page, 1);
        assert!(first.has_next());
        assert!(!first.has_previous());

        let second = Paginated::paginate(seq, 10, 2);
        assert_eq!(second.items, vec![11, 12, 13]);
        assert_eq!(second.current_page, 2);
        assert!(!second.has_next());
        assert!(second.has_previous());
    }

    #[test]
    fn empty_sequence() {
        let page = Paginated::paginate(Vec::<i32>::new(), 10, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
        assert!(!page.has_next());

        let page = Paginated::paginate(Vec::<i32>::new(), 10, 7);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn out_of_range_pages_clamp() {
        let seq = (1..=25).collect::<Vec<i32>>();
        assert_eq!(Paginated::paginate(seq.clone(), 10, 0).current_page, 1);
        assert_eq!(Paginated::paginate(seq.clone(), 10, -3).items.len(), 10);

        let last = Paginated::paginate(seq, 10, 99);
        assert_eq!(last.current_page, 3);
        assert_eq!(last.items, (21..=25).collect::<Vec<_>>());
    }

    #[test]
    fn tiny_page_size() {
        let page = Paginated::paginate(vec!['a', 'b', 'c'], 0, 2);
        assert_eq!(page.items, vec!['b']);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn from_count_matches_paginate() {
        let seq = (1..=13).collect::<Vec<i32>>();
        for requested in -1..5 {
            let counted = Paginated::from_count(seq.len() as i64, 10, requested, |(min, max)| {
                Ok(seq[min as usize..(max as usize).min(seq.len())].to_vec())
            })
            .unwrap();
            assert_eq!(counted, Paginated::paginate(seq.clone(), 10, requested));
        }
    }

    #[test]
    fn from_count_skips_loader_when_empty() {
        let page = Paginated::<i32>::from_count(0, 10, 1, |_| panic!("nothing to load")).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn api_conversion() {
        let data = Paginated::paginate(vec![1, 2, 3], 2, 2)
            .to_api(|i| Ok::<_, ()>(i.to_string()))
            .unwrap();
        assert_eq!(data.items, vec!["3".to_owned()]);
        assert!(data.has_previous);
        assert!(!data.has_next);

        let failed = Paginated::paginate(vec![1, 2], 2, 1).to_api(|i| if i == 2 { Err(i) } else { Ok(i) });
        assert_eq!(failed.err(), Some(2));
    }

    #[test]
    fn page_from_query() {
        assert_eq!(Page::from_query(None), Page::first());
        assert_eq!(Page::from_query(Some("3")).number(), 3);
        assert_eq!(Page::from_query(Some("abc")), Page::first());
        assert_eq!(Page::from_query(Some("-2")), Page::first());
        assert_eq!(Page::from_query(Some("2147483647")).number(), i32::MAX);
    }

    #[test]
    fn huge_page_numbers() {
        let page = Paginated::paginate((1..=13).collect::<Vec<i32>>(), 10, i32::MAX);
        assert_eq!(page.current_page, 2);
        assert_eq!(window(i32::MAX, 10), (i32::MAX, i32::MAX));

        let page = Paginated::from_count(13, 10, i32::MAX, |(min, max)| {
            assert_eq!((min, max), (10, 20));
            Ok(vec![11, 12, 13])
        })
        .unwrap();
        assert_eq!(page.current_page, 2);
    }
}
