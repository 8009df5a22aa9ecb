use std::time::{Duration, Instant};

/// Runs `f` and returns its output together with the wall-clock time it took.
#[inline]
pub fn measure<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

/// Async counterpart of [`measure`]: the clock spans every poll until completion,
/// including the time the future spends suspended.
pub async fn measure_async<F: Future>(f: F) -> (F::Output, Duration) {
    let start = Instant::now();
    let out = f.await;
    (out, start.elapsed())
}

#[cfg(test)]
mod clock_test {
    use super::*;

    #[test]
    fn test_measure_covers_region() {
        let nap = Duration::from_millis(5);
        let (out, elapsed) = measure(|| {
            std::thread::sleep(nap);
            7
        });
        assert_eq!(out, 7);
        assert!(elapsed >= nap);
    }

    #[tokio::test]
    async fn test_measure_async_covers_suspension() {
        let nap = Duration::from_millis(5);
        let ((), elapsed) = measure_async(async {
            tokio::task::yield_now().await;
            std::thread::sleep(nap);
        })
        .await;
        assert!(elapsed >= nap);
    }
}
