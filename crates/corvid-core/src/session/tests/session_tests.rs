use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::session::error::SessionError;
use crate::session::{HttpSessionCache, OnceResource};

#[tokio::test]
async fn test_once_resource_creates_exactly_once() {
    let resource: OnceResource<Arc<String>> = OnceResource::new();
    let constructions = AtomicUsize::new(0);

    assert!(!resource.is_created());

    let first = resource
        .get_or_try_create(|| async {
            constructions.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new("session".to_string()))
        })
        .await
        .unwrap();

    let second = resource
        .get_or_try_create(|| async {
            constructions.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new("other".to_string()))
        })
        .await
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(constructions.load(Ordering::SeqCst), 1);
    assert!(resource.is_created());
}

#[tokio::test]
async fn test_once_resource_concurrent_first_calls_share_instance() {
    let resource: Arc<OnceResource<Arc<u32>>> = Arc::new(OnceResource::new());
    let constructions = Arc::new(AtomicUsize::new(0));

    let mut futures = Vec::new();
    for _ in 0..16 {
        let resource = resource.clone();
        let constructions = constructions.clone();
        futures.push(async move {
            resource
                .get_or_try_create(|| async move {
                    constructions.fetch_add(1, Ordering::SeqCst);
                    // Yield so racing callers pile up on the cell
                    tokio::task::yield_now().await;
                    Ok(Arc::new(7u32))
                })
                .await
                .unwrap()
        });
    }

    let values = futures::future::join_all(futures).await;

    assert_eq!(constructions.load(Ordering::SeqCst), 1);
    for value in &values {
        assert!(Arc::ptr_eq(value, &values[0]));
    }
}

#[tokio::test]
async fn test_once_resource_close_releases_and_blocks_recreation() {
    let mut resource: OnceResource<Arc<u8>> = OnceResource::new();

    let value = resource
        .get_or_try_create(|| async { Ok(Arc::new(1u8)) })
        .await
        .unwrap();
    drop(value);

    assert!(resource.close().is_some());
    assert!(!resource.is_created());

    let result = resource
        .get_or_try_create(|| async { Ok(Arc::new(2u8)) })
        .await;
    assert!(matches!(result, Err(SessionError::Closed)));
}

#[tokio::test]
async fn test_once_resource_close_without_creation() {
    let mut resource: OnceResource<Arc<u8>> = OnceResource::new();
    assert!(resource.close().is_none());
}

#[tokio::test]
async fn test_http_session_cache_acquire_and_close() {
    let mut cache = HttpSessionCache::new();
    assert!(!cache.is_created());

    let first = cache.acquire().await.unwrap();
    assert!(cache.is_created());

    // Repeat acquisition succeeds and the cache still holds a single session
    let _second = cache.acquire().await.unwrap();
    drop(first);

    cache.close();
    assert!(!cache.is_created());
    assert!(matches!(cache.acquire().await, Err(SessionError::Closed)));
}
