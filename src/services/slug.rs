use crate::db::Store;
use crate::error::{AppError, AppResult};

/// Character set for generating slugs.
pub const ALPHABET_CHARS: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm',
    'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Draws random slugs until one is free in the store.
#[derive(Debug, Clone)]
pub struct SlugAllocator {
    length: usize,
    max_attempts: u32,
}

impl SlugAllocator {
    pub fn new(length: usize, max_attempts: u32) -> Self {
        Self { length, max_attempts }
    }

    /// A candidate slug; each character is drawn uniformly from [`ALPHABET_CHARS`].
    pub fn generate(&self) -> String {
        let length = self.length;
        nanoid::nanoid!(length, ALPHABET_CHARS)
    }

    /// Generate a slug that doesn't already exist in the store.
    ///
    /// The slug is not reserved. Two callers may be handed the same free slug;
    /// the store's unique constraint rejects the second insert.
    ///
    /// # Errors
    ///
    /// Returns `AppError::SlugAllocationExhausted` if every one of the
    /// `max_attempts` candidates was taken, or the store error if a lookup fails.
    pub async fn allocate(&self, store: &dyn Store) -> AppResult<String> {
        for attempt in 1..=self.max_attempts {
            let slug = self.generate();

            if !store.slug_exists(&slug).await? {
                return Ok(slug);
            }

            tracing::debug!(slug = %slug, attempt, "Slug candidate already taken");
        }

        Err(AppError::SlugAllocationExhausted(self.max_attempts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MockStore;
    use regex::Regex;

    #[test]
    fn test_alphabet_chars_const() {
        // 0-9, a-z
        assert_eq!(ALPHABET_CHARS.len(), 36);
    }

    #[test]
    fn test_alphabet_chars_unique() {
        let unique: std::collections::HashSet<_> = ALPHABET_CHARS.iter().collect();
        assert_eq!(unique.len(), ALPHABET_CHARS.len());
    }

    #[test]
    fn test_generated_slug_shape() {
        let allocator = SlugAllocator::new(6, 100);
        let pattern = Regex::new(r"^[0-9a-z]{6}$").unwrap();

        for _ in 0..500 {
            let slug = allocator.generate();
            assert!(pattern.is_match(&slug), "unexpected slug {}", slug);
        }
    }

    #[tokio::test]
    async fn test_allocate_first_free_candidate() {
        let mut store = MockStore::new();
        store.expect_slug_exists().times(1).returning(|_| Ok(false));

        let slug = SlugAllocator::new(6, 100).allocate(&store).await.unwrap();

        assert_eq!(slug.len(), 6);
    }

    #[tokio::test]
    async fn test_allocate_retries_on_collision() {
        let mut store = MockStore::new();
        let mut calls = 0;
        store.expect_slug_exists().times(3).returning(move |_| {
            calls += 1;
            Ok(calls < 3)
        });

        let result = SlugAllocator::new(6, 100).allocate(&store).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_allocate_gives_up_after_max_attempts() {
        let mut store = MockStore::new();
        store.expect_slug_exists().times(5).returning(|_| Ok(true));

        let result = SlugAllocator::new(6, 5).allocate(&store).await;

        assert!(matches!(result, Err(AppError::SlugAllocationExhausted(5))));
    }

    #[tokio::test]
    async fn test_allocate_propagates_store_error() {
        let mut store = MockStore::new();
        store
            .expect_slug_exists()
            .times(1)
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let result = SlugAllocator::new(6, 100).allocate(&store).await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
