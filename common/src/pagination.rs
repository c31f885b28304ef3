//! Abstractions for cursor-based pagination.

/// A single page of a cursor-paginated listing.
///
/// The listing is exhausted once a [`Page`] has no items or no `next`
/// cursor, whichever comes first.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Page<C, I> {
    /// Items on this [`Page`], in listing order.
    pub items: Vec<I>,

    /// Cursor pointing to the next [`Page`], if any.
    pub next: Option<C>,
}

impl<C, I> Page<C, I> {
    /// Creates a new [`Page`] from the provided items and `next` cursor.
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = I>, next: Option<C>) -> Self {
        Self {
            items: items.into_iter().collect(),
            next,
        }
    }

    /// Creates the terminal empty [`Page`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next: None,
        }
    }

    /// Number of items on this [`Page`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Indicates whether this [`Page`] has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Splits this [`Page`] into its items and the cursor to continue with.
    ///
    /// The returned cursor is [`None`] if this [`Page`] is the last one.
    #[must_use]
    pub fn into_parts(self) -> (Vec<I>, Option<C>) {
        let Self { items, next } = self;
        let next = if items.is_empty() { None } else { next };
        (items, next)
    }
}
