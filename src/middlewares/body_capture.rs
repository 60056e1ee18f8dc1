// Start of file: /src/middlewares/body_capture.rs

use std::{
    pin::Pin,
    sync::{Arc, Mutex},
    task::{Context, Poll},
};

use axum::{
    body::{Body, Bytes},
    extract::Request,
};
use http_body::{Body as HttpBody, Frame, SizeHint};

/// Shared handle onto the bytes a [`CapturedBody`] has recorded so far.
///
/// The handle is cloned into the request extensions when the body is
/// wrapped, so the logging middleware can read back whatever the handler
/// actually consumed. All state is per-request; nothing is shared across
/// exchanges.
#[derive(Clone, Debug)]
pub struct CaptureHandle {
    state: Arc<Mutex<CaptureState>>,
}

#[derive(Debug)]
struct CaptureState {
    buf: Vec<u8>,
    limit: usize,
}

impl CaptureHandle {
    pub fn new(limit: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(CaptureState {
                buf: Vec::new(),
                limit,
            })),
        }
    }

    /// Bytes read from the wrapped body so far, capped at the limit.
    pub fn captured(&self) -> Vec<u8> {
        self.state.lock().expect("capture lock poisoned").buf.clone()
    }

    pub fn len(&self) -> usize {
        self.state.lock().expect("capture lock poisoned").buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when both handles point at the same underlying buffer.
    pub fn same_buffer(&self, other: &CaptureHandle) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    // Records a chunk, silently dropping bytes past the limit.
    fn record(&self, chunk: &[u8]) {
        let mut state = self.state.lock().expect("capture lock poisoned");
        let room: usize = state.limit.saturating_sub(state.buf.len());
        if room > 0 {
            let take: usize = room.min(chunk.len());
            state.buf.extend_from_slice(&chunk[..take]);
        }
    }
}

/// Bounded tee over a request body.
///
/// Frames pass through untouched, so the handler sees the full stream;
/// only the first `limit` bytes are mirrored into the [`CaptureHandle`].
pub struct CapturedBody {
    inner: Body,
    handle: CaptureHandle,
}

impl HttpBody for CapturedBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();
        let poll = Pin::new(&mut this.inner).poll_frame(cx);

        if let Poll::Ready(Some(Ok(frame))) = &poll {
            if let Some(data) = frame.data_ref() {
                this.handle.record(data);
            }
        }

        poll
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

/// Wraps the request body in a [`CapturedBody`] and stashes the handle in
/// the request extensions.
///
/// Idempotent: a request that already carries a [`CaptureHandle`] is
/// returned as-is with the existing handle, never wrapped twice.
pub fn wrap_request(req: Request, limit: usize) -> (Request, CaptureHandle) {
    if let Some(existing) = req.extensions().get::<CaptureHandle>() {
        let handle: CaptureHandle = existing.clone();
        return (req, handle);
    }

    let handle: CaptureHandle = CaptureHandle::new(limit);
    let (mut parts, body) = req.into_parts();
    parts.extensions.insert(handle.clone());

    let body: Body = Body::new(CapturedBody {
        inner: body,
        handle: handle.clone(),
    });

    (Request::from_parts(parts, body), handle)
}


// End of file: /src/middlewares/body_capture.rs
