//! PDF flipbook viewer embedded in case study pages.
//!
//! The viewer is a self-contained document placed in an iframe `srcdoc`.
//! The PDF location is injected as a script constant, and the parent page
//! handles downloads through the download proxy so cross-origin PDFs are
//! saved as attachments.

use quill_core::constants::DOWNLOAD_PROXY_ROUTE_PREFIX;

use crate::escape::{escape_attr, escape_js_string};

pub const FLIPBOOK_IFRAME_ID: &str = "my-flipbook-container";

const VIEWER_SHELL: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>PDF Flipbook</title>
    <script src="https://cdnjs.cloudflare.com/ajax/libs/pdf.js/3.11.174/pdf.min.js"></script>
    <script src="https://cdn.jsdelivr.net/npm/page-flip@2.0.7/dist/js/page-flip.browser.min.js"></script>
    <style>
        html, body { margin: 0; height: 100%; background: #1a1a1a; overflow: hidden; font-family: system-ui, sans-serif; }
        #book { margin: 0 auto; }
        .toolbar { position: fixed; bottom: 12px; left: 50%; transform: translateX(-50%); display: flex; gap: 8px; z-index: 10; }
        .toolbar button { background: rgba(255,255,255,0.15); color: #fff; border: none; border-radius: 6px; padding: 6px 12px; cursor: pointer; }
        .status { color: #ccc; position: absolute; top: 50%; width: 100%; text-align: center; }
    </style>
</head>
<body>
    <div class="status" id="status">Loading document...</div>
    <div id="book"></div>
    <div class="toolbar">
        <button id="prev" type="button">&#8592;</button>
        <button id="fullscreen" type="button">Fullscreen</button>
        <button id="download" type="button">Download</button>
        <button id="next" type="button">&#8594;</button>
    </div>
    <script>
        var pdfUrl = new URLSearchParams(window.location.search).get('pdf');
        if (!pdfUrl && typeof INJECTED_PDF_URL !== 'undefined') {
            pdfUrl = INJECTED_PDF_URL;
        }
        var flip = null;
        function fileName(url) {
            return (url ? url.split('/').pop().split('?')[0] : '') || 'document.pdf';
        }
        function requestDownload() {
            window.parent.postMessage({ type: 'download', pdfUrl: pdfUrl, filename: fileName(pdfUrl) }, '*');
        }
        function toggleFullscreen() {
            if (document.fullscreenElement) {
                document.exitFullscreen();
            } else {
                document.documentElement.requestFullscreen();
            }
        }
        async function initPDF() {
            var status = document.getElementById('status');
            if (!pdfUrl) {
                status.textContent = 'No document to display.';
                return;
            }
            pdfjsLib.GlobalWorkerOptions.workerSrc = 'https://cdnjs.cloudflare.com/ajax/libs/pdf.js/3.11.174/pdf.worker.min.js';
            try {
                var pdf = await pdfjsLib.getDocument(pdfUrl).promise;
                var pages = [];
                for (var i = 1; i <= pdf.numPages; i++) {
                    var page = await pdf.getPage(i);
                    var viewport = page.getViewport({ scale: 1.5 });
                    var canvas = document.createElement('canvas');
                    canvas.width = viewport.width;
                    canvas.height = viewport.height;
                    await page.render({ canvasContext: canvas.getContext('2d'), viewport: viewport }).promise;
                    pages.push(canvas.toDataURL('image/jpeg', 0.85));
                }
                status.remove();
                var first = await pdf.getPage(1);
                var size = first.getViewport({ scale: 1 });
                flip = new St.PageFlip(document.getElementById('book'), {
                    width: size.width,
                    height: size.height,
                    size: 'stretch',
                    maxShadowOpacity: 0.5,
                    showCover: true,
                    mobileScrollSupport: false
                });
                flip.loadFromImages(pages);
            } catch (err) {
                status.textContent = 'Unable to load document.';
                console.error('Flipbook error:', err);
            }
        }
        document.getElementById('prev').addEventListener('click', function () { if (flip) flip.flipPrev(); });
        document.getElementById('next').addEventListener('click', function () { if (flip) flip.flipNext(); });
        document.getElementById('fullscreen').addEventListener('click', toggleFullscreen);
        document.getElementById('download').addEventListener('click', requestDownload);
        window.addEventListener('message', function (event) {
            var data = event.data || {};
            if (data.type === 'prevPage' && flip) flip.flipPrev();
            if (data.type === 'nextPage' && flip) flip.flipNext();
            if (data.type === 'toggleFullscreen') toggleFullscreen();
        });
        initPDF();
    </script>
</body>
</html>
"#;

/// ## Summary
/// Returns the viewer document with `pdf_url` injected as the
/// `INJECTED_PDF_URL` constant ahead of the first script.
#[must_use]
pub fn viewer_document(pdf_url: &str) -> String {
    let injection = format!(
        "<script>\n        const INJECTED_PDF_URL = '{}';\n    </script>\n    ",
        escape_js_string(pdf_url)
    );
    VIEWER_SHELL.replacen("<script", &format!("{injection}<script"), 1)
}

/// ## Summary
/// Renders the iframe carrying the viewer in `srcdoc`, followed by the parent
/// script that forwards keyboard navigation and routes downloads through the
/// download proxy.
#[must_use]
pub fn render_flipbook(pdf_url: &str) -> String {
    let srcdoc = escape_attr(&viewer_document(pdf_url));

    format!(
        r#"<iframe
                id="{FLIPBOOK_IFRAME_ID}"
                class="w-full max-w-[52rem]"
                title="PDF Flipbook Viewer - Interactive document viewer"
                allow="clipboard-write"
                sandbox="allow-scripts allow-same-origin allow-forms allow-popups allow-downloads"
                allowfullscreen="true"
                style="border:none;overflow:hidden;border-radius:8px;background-color:#000;height:100%;width:100%;"
                srcdoc="{srcdoc}"
              ></iframe>
              <script>
                (function () {{
                  var iframeEl = document.getElementById('{FLIPBOOK_IFRAME_ID}');
                  function triggerDownload(url, filename) {{
                    var safeName = filename || (url ? url.split('/').pop() : 'document.pdf') || 'document.pdf';
                    var proxiedUrl = window.location.origin + '{DOWNLOAD_PROXY_ROUTE_PREFIX}?pdf=' + encodeURIComponent(url) + '&filename=' + encodeURIComponent(safeName);
                    var a = document.createElement('a');
                    a.href = proxiedUrl;
                    a.download = safeName;
                    a.style.display = 'none';
                    document.body.appendChild(a);
                    a.click();
                    document.body.removeChild(a);
                  }}
                  window.addEventListener('message', function (event) {{
                    if (!iframeEl || event.source !== iframeEl.contentWindow) return;
                    var data = event.data || {{}};
                    var type = data.type || data.action;
                    if (type === 'download' || type === 'downloadResponse') {{
                      triggerDownload(data.pdfUrl, data.filename);
                    }}
                  }});
                  document.addEventListener('keydown', function (e) {{
                    if (!iframeEl || !iframeEl.contentWindow) return;
                    if (e.target && (e.target.tagName === 'INPUT' || e.target.tagName === 'TEXTAREA' || e.target.isContentEditable)) return;
                    if (e.key === 'ArrowLeft') {{
                      e.preventDefault();
                      iframeEl.contentWindow.postMessage({{ type: 'prevPage' }}, '*');
                    }} else if (e.key === 'ArrowRight') {{
                      e.preventDefault();
                      iframeEl.contentWindow.postMessage({{ type: 'nextPage' }}, '*');
                    }} else if (e.key === 'f' || e.key === 'F') {{
                      e.preventDefault();
                      iframeEl.contentWindow.postMessage({{ type: 'toggleFullscreen' }}, '*');
                    }}
                  }});
                }})();
              </script>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_injected_before_first_script() {
        let document = viewer_document("https://cdn.example.com/deck.pdf");

        let injected = document
            .find("const INJECTED_PDF_URL = 'https://cdn.example.com/deck.pdf';")
            .unwrap();
        let library = document.find("pdf.min.js").unwrap();
        assert!(injected < library);
        assert_eq!(document.matches("INJECTED_PDF_URL = ").count(), 1);
    }

    #[test]
    fn srcdoc_is_attribute_escaped() {
        let html = render_flipbook("https://cdn.example.com/deck.pdf");
        let start = html.find("srcdoc=\"").unwrap() + "srcdoc=\"".len();
        let end = start + html[start..].find('"').unwrap();
        let srcdoc = &html[start..end];

        assert!(srcdoc.starts_with("&lt;!DOCTYPE html&gt;"));
        assert!(srcdoc.contains("INJECTED_PDF_URL = &#39;https://cdn.example.com/deck.pdf&#39;"));
        assert!(!srcdoc.contains('<'));
        assert!(html.contains("'/download_proxy?pdf='"));
    }

    #[test]
    fn hostile_url_stays_inside_the_literal() {
        let document = viewer_document("x'; alert(1); //</script><script>alert(2)");

        assert!(document.contains(
            r"const INJECTED_PDF_URL = 'x\'; alert(1); //\u003c/script\u003e\u003cscript\u003ealert(2)';"
        ));
        assert_eq!(document.matches("</script>").count(), 4);
    }
}
