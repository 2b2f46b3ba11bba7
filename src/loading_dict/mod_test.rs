//! Exercises the key concurrent properties of the loading dictionary:
//! single-flight loading, cancellation retaining the cell, fault-then-
//! retry, and an unresponsive loader that ignores cancellation but
//! still returns the caller promptly.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use tokio_util::sync::CancellationToken;

    use super::super::LoadingDictionaryBuilder;
    use crate::error::DictError;
    use crate::loader::FnDeferredLoader;

    #[tokio::test]
    async fn ten_concurrent_callers_share_a_single_load() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let loader = {
            let invocations = invocations.clone();
            FnDeferredLoader::new(move |key: String, _cancel| {
                let invocations = invocations.clone();
                async move {
                    invocations.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, anyhow::Error>(key)
                }
            })
        };
        let dict = Arc::new(LoadingDictionaryBuilder::new(loader).build().unwrap());

        let mut handles = Vec::new();
        for _ in 0..10 {
            let dict = dict.clone();
            handles.push(tokio::spawn(async move {
                dict.get("K".to_string(), CancellationToken::new()).await
            }));
        }
        for h in handles {
            assert_eq!(h.await.unwrap().unwrap(), "K");
        }
        assert_eq!(invocations.load(Ordering::SeqCst), 1);
        assert_eq!(dict.keys(), vec!["K".to_string()]);
    }

    #[tokio::test]
    async fn faulting_loader_is_retried_on_the_next_access() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let loader = {
            let invocations = invocations.clone();
            FnDeferredLoader::new(move |_key: String, _cancel| {
                let invocations = invocations.clone();
                async move {
                    invocations.fetch_add(1, Ordering::SeqCst);
                    Err::<String, _>(anyhow::anyhow!("boom"))
                }
            })
        };
        let dict = LoadingDictionaryBuilder::new(loader).build().unwrap();

        let err1 = dict.get("K".to_string(), CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err1, DictError::KeyNotFound { .. }));
        assert!(!dict.contains(&"K".to_string()));

        let err2 = dict.get("K".to_string(), CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err2, DictError::KeyNotFound { .. }));
        assert_eq!(invocations.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn caller_cancellation_does_not_remove_the_cell_and_later_caller_shares_the_result() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let loader = {
            let invocations = invocations.clone();
            FnDeferredLoader::new(move |key: String, _cancel| {
                let invocations = invocations.clone();
                async move {
                    invocations.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(150)).await;
                    Ok::<_, anyhow::Error>(key)
                }
            })
        };
        let dict = Arc::new(LoadingDictionaryBuilder::new(loader).build().unwrap());

        let caller_a = {
            let dict = dict.clone();
            tokio::spawn(async move {
                let cancel = CancellationToken::new();
                let cancel_clone = cancel.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    cancel_clone.cancel();
                });
                dict.get("K".to_string(), cancel).await
            })
        };

        tokio::time::sleep(Duration::from_millis(40)).await;
        let caller_b = {
            let dict = dict.clone();
            tokio::spawn(async move { dict.get("K".to_string(), CancellationToken::new()).await })
        };

        assert!(matches!(caller_a.await.unwrap(), Err(DictError::Cancelled)));
        assert_eq!(caller_b.await.unwrap().unwrap(), "K");
        assert_eq!(invocations.load(Ordering::SeqCst), 1, "loader must only run once");
        assert!(dict.contains(&"K".to_string()), "cancellation must not remove the cell");
    }

    #[tokio::test]
    async fn unresponsive_loader_still_returns_the_caller_promptly() {
        let loader = FnDeferredLoader::new(|_key: String, _cancel: CancellationToken| async move {
            // Never observes cancellation; just sleeps far longer than
            // the caller is willing to wait.
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, anyhow::Error>("late".to_string())
        });
        let dict = LoadingDictionaryBuilder::new(loader).build().unwrap();

        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancel_clone.cancel();
        });

        let start = Instant::now();
        let result = dict.get("K".to_string(), cancel).await;
        assert!(matches!(result, Err(DictError::Cancelled)));
        assert!(start.elapsed() < Duration::from_millis(500));
    }
}
