// ── Menu view streams ──
//
// Subscription handle for renderers. Each processed event that changes
// the menu publishes a new `MenuView` through a `watch` channel.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::state::MenuView;

/// A subscription to published menu views.
///
/// Offers the view captured at subscription time, the latest one, and
/// change notification either through [`changed`](Self::changed) or as a
/// `Stream`.
pub struct ViewStream {
    current: Arc<MenuView>,
    receiver: watch::Receiver<Arc<MenuView>>,
}

impl ViewStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<MenuView>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// View captured at creation or at the last `changed()`.
    pub fn current(&self) -> &Arc<MenuView> {
        &self.current
    }

    pub fn latest(&self) -> Arc<MenuView> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next published view.
    /// Returns `None` once every engine handle has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<MenuView>> {
        self.receiver.changed().await.ok()?;
        let view = self.receiver.borrow_and_update().clone();
        self.current = view.clone();
        Some(view)
    }

    /// Convert into a `Stream`. Yields the current view first.
    pub fn into_stream(self) -> ViewWatchStream {
        ViewWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by the view `watch::Receiver`.
pub struct ViewWatchStream {
    inner: WatchStream<Arc<MenuView>>,
}

impl Stream for ViewWatchStream {
    type Item = Arc<MenuView>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
