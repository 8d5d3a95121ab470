//! Append-only page registry

use heapless::Vec;

use super::descriptor::PageDescriptor;
use crate::error::MenuError;

/// Default number of page slots
pub const MAX_PAGES: usize = 16;

/// Ordered collection of page descriptors
///
/// Indices are assigned in insertion order and stay stable until
/// [`PageRegistry::clear`].
pub struct PageRegistry<'a, const P: usize = MAX_PAGES> {
    pages: Vec<PageDescriptor<'a>, P>,
    last_touched: Option<usize>,
}

impl<'a, const P: usize> Default for PageRegistry<'a, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, const P: usize> PageRegistry<'a, P> {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            pages: Vec::new(),
            last_touched: None,
        }
    }

    /// Append a page, returning its index
    ///
    /// The new page becomes the last touched one.
    pub fn insert_at_end(&mut self, page: PageDescriptor<'a>) -> Result<usize, MenuError> {
        let index = self.pages.len();
        self.pages
            .push(page)
            .map_err(|_| MenuError::AllocationExhausted)?;
        self.last_touched = Some(index);
        Ok(index)
    }

    /// Page at `index`
    pub fn get(&self, index: usize) -> Result<&PageDescriptor<'a>, MenuError> {
        self.pages.get(index).ok_or(MenuError::IndexOutOfRange)
    }

    /// Mutable page at `index`
    pub fn get_mut(&mut self, index: usize) -> Result<&mut PageDescriptor<'a>, MenuError> {
        self.pages.get_mut(index).ok_or(MenuError::IndexOutOfRange)
    }

    /// Record `index` as the most recently accessed page
    pub fn touch(&mut self, index: usize) -> Result<(), MenuError> {
        if index >= self.pages.len() {
            return Err(MenuError::IndexOutOfRange);
        }
        self.last_touched = Some(index);
        Ok(())
    }

    /// Index of the most recently touched page
    pub fn last_touched(&self) -> Option<usize> {
        self.last_touched
    }

    /// Most recently touched page
    pub fn last_touched_mut(&mut self) -> Option<&mut PageDescriptor<'a>> {
        let index = self.last_touched?;
        self.pages.get_mut(index)
    }

    /// Number of registered pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if no page is registered
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Check if every slot is taken
    pub fn is_full(&self) -> bool {
        self.pages.is_full()
    }

    /// Pages in index order
    pub fn iter(&self) -> impl Iterator<Item = &PageDescriptor<'a>> {
        self.pages.iter()
    }

    /// Drop every page
    pub fn clear(&mut self) {
        self.pages.clear();
        self.last_touched = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::page::{ContentSource, PageBuffer, PageType};

    fn page(arena: &mut Arena<64>) -> PageDescriptor<'static> {
        let handle = arena.allocate(8).unwrap();
        PageDescriptor::new(PageType::User, false, ContentSource::None, PageBuffer::Arena(handle))
    }

    #[test]
    fn test_indices_follow_insertion_order() {
        let mut arena: Arena<64> = Arena::new();
        let mut registry: PageRegistry<'_, 4> = PageRegistry::new();

        for expected in 0..3 {
            assert_eq!(registry.insert_at_end(page(&mut arena)).unwrap(), expected);
        }
        assert_eq!(registry.len(), 3);
        assert!(registry.get(2).is_ok());
        assert_eq!(registry.get(3).err(), Some(MenuError::IndexOutOfRange));
    }

    #[test]
    fn test_full_registry() {
        let mut arena: Arena<64> = Arena::new();
        let mut registry: PageRegistry<'_, 2> = PageRegistry::new();
        registry.insert_at_end(page(&mut arena)).unwrap();
        registry.insert_at_end(page(&mut arena)).unwrap();
        assert!(registry.is_full());
        assert_eq!(
            registry.insert_at_end(page(&mut arena)).err(),
            Some(MenuError::AllocationExhausted)
        );
    }

    #[test]
    fn test_touch() {
        let mut arena: Arena<64> = Arena::new();
        let mut registry: PageRegistry<'_, 4> = PageRegistry::new();
        assert!(registry.last_touched_mut().is_none());

        registry.insert_at_end(page(&mut arena)).unwrap();
        registry.insert_at_end(page(&mut arena)).unwrap();
        assert_eq!(registry.last_touched(), Some(1));
        registry.touch(0).unwrap();
        assert_eq!(registry.last_touched(), Some(0));
        registry.touch(1).unwrap();
        assert_eq!(registry.last_touched(), Some(1));
        assert_eq!(registry.touch(5), Err(MenuError::IndexOutOfRange));
        assert_eq!(registry.last_touched(), Some(1));

        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.last_touched(), None);
    }
}
