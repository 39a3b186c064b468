use std::sync::{Arc, Mutex};
use std::thread;

use image::GrayImage;
use log::{info, warn};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::display::{encode_png, DisplayError, ImageDisplay};

const VIEWER_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>autoencoder demo</title></head>
<body style="background:#222;display:flex;justify-content:center;align-items:center;height:100vh;margin:0">
<img id="frame" src="/frame.png" width="280" height="280" style="image-rendering:pixelated">
<script>
setInterval(function () {
  document.getElementById("frame").src = "/frame.png?t=" + Date.now();
}, 100);
</script>
</body>
</html>
"#;

type LatestFrame = Arc<Mutex<Option<Vec<u8>>>>;

/// Serves the most recent frame over HTTP.
///
/// `GET /` returns a page that polls `GET /frame.png`. Requests are handled
/// on a background thread; `on_frame_update` only swaps the stored PNG.
pub struct HttpFrameDisplay {
    addr: String,
    latest: LatestFrame,
}

impl HttpFrameDisplay {
    pub fn bind(addr: &str) -> Result<HttpFrameDisplay, DisplayError> {
        let server = Server::http(addr).map_err(|e| DisplayError::Server(e.to_string()))?;
        let latest: LatestFrame = Arc::new(Mutex::new(None));
        let shared = latest.clone();
        thread::spawn(move || {
            for request in server.incoming_requests() {
                serve(request, &shared);
            }
        });
        info!("Frame viewer listening on http://{}", addr);
        Ok(HttpFrameDisplay {
            addr: addr.to_owned(),
            latest,
        })
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl ImageDisplay for HttpFrameDisplay {
    fn on_frame_update(&mut self, image: &GrayImage, _duration_hint_millis: u64) -> Result<(), DisplayError> {
        let png = encode_png(image)?;
        let mut slot = self
            .latest
            .lock()
            .map_err(|_| DisplayError::Server("frame store poisoned".into()))?;
        *slot = Some(png);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Request handling
// ---------------------------------------------------------------------------

fn serve(request: Request, latest: &Mutex<Option<Vec<u8>>>) {
    let path = request.url().split('?').next().unwrap_or("").to_owned();
    let frame = match latest.lock() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    };

    let response = match (request.method(), path.as_str()) {
        (Method::Get, "/") => respond(200, "text/html; charset=utf-8", VIEWER_PAGE.as_bytes().to_vec()),
        (Method::Get, "/frame.png") => match frame {
            Some(png) => respond(200, "image/png", png),
            None => respond(404, "text/plain", b"no frame yet".to_vec()),
        },
        _ => respond(404, "text/plain", b"404 Not Found".to_vec()),
    };

    if let Err(e) = request.respond(response) {
        warn!("Failed to answer viewer request: {}", e);
    }
}

fn respond(status: u16, content_type: &str, body: Vec<u8>) -> Response<std::io::Cursor<Vec<u8>>> {
    let mut response = Response::from_data(body).with_status_code(StatusCode(status));
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
        response.add_header(header);
    }
    if let Ok(header) = Header::from_bytes(&b"Cache-Control"[..], &b"no-store"[..]) {
        response.add_header(header);
    }
    response
}
