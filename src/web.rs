//! Browser binding: exposes the editor to the host page through `wasm-bindgen`.
//!
//! Every event method returns the engine's actions as a JS array of tagged
//! objects (`{ type: "placement_created", ... }`). The page re-reads
//! [`Editor::overlays`] whenever it sees `render_needed`.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use gloo_net::http::Request;
use image::DynamicImage;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::asset::Generation;
use crate::compositor::{self, AssetError, AssetSource, ExportError, ExportedImage};
use crate::config::EditorConfig;
use crate::engine::{Action, EngineCore};
use crate::geometry::Point;
use crate::input::{Button, Key};
use crate::render;
use crate::session::App;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
    }
}

/// Fetches overlay PNGs from the page's origin.
struct HttpAssetSource;

#[async_trait(?Send)]
impl AssetSource for HttpAssetSource {
    async fn load(&self, url: &str) -> Result<DynamicImage, AssetError> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|e| AssetError::Fetch { url: url.to_string(), message: e.to_string() })?;
        let status = response.status();
        if status == 404 {
            return Err(AssetError::NotFound(url.to_string()));
        }
        if !(200..300).contains(&status) {
            return Err(AssetError::Status { url: url.to_string(), status });
        }
        let bytes = response
            .binary()
            .await
            .map_err(|e| AssetError::Fetch { url: url.to_string(), message: e.to_string() })?;
        compositor::decode_asset(url, &bytes)
    }
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn actions_to_js(actions: &[Action]) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(actions).map_err(js_error)?;
    js_sys::JSON::parse(&json)
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| js_error("no window"))
}

fn viewport_size() -> Result<(f64, f64), JsValue> {
    let window = window()?;
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((width, height))
}

/// Save the PNG through a temporary object URL and anchor click.
fn trigger_download(image: &ExportedImage) -> Result<(), JsValue> {
    let document = window()?.document().ok_or_else(|| js_error("no document"))?;
    let body = document.body().ok_or_else(|| js_error("no body"))?;

    let bytes = js_sys::Uint8Array::from(image.png.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("image/png");
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(JsValue::from)?;
    anchor.set_href(&url);
    anchor.set_download(&image.filename);
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;
    web_sys::Url::revoke_object_url(&url)
}

#[derive(serde::Serialize)]
struct GenerationEntry {
    label: &'static str,
    tag: &'static str,
}

/// The editor handle owned by the page.
#[wasm_bindgen]
pub struct Editor {
    app: Rc<RefCell<App>>,
}

#[wasm_bindgen]
impl Editor {
    /// Create an editor. `config_json` may be omitted or partial.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<Editor, JsValue> {
        let config = match config_json {
            Some(raw) => EditorConfig::from_json(&raw).map_err(js_error)?,
            None => EditorConfig::default(),
        };
        Ok(Self { app: Rc::new(RefCell::new(App::new(config))) })
    }

    /// `true` while the editor screen is showing.
    #[wasm_bindgen(js_name = isEditing)]
    pub fn is_editing(&self) -> Result<bool, JsValue> {
        let app = self.app.try_borrow().map_err(js_error)?;
        Ok(app.editor().is_some())
    }

    /// Open the editor on an uploaded `data:` URI.
    pub fn upload(&self, data_uri: &str) -> Result<JsValue, JsValue> {
        let (width, height) = viewport_size()?;
        let mut app = self.app.try_borrow_mut().map_err(js_error)?;
        let actions = app.upload_data_uri(data_uri, width, height).map_err(js_error)?;
        actions_to_js(&actions)
    }

    /// Return to the upload screen.
    pub fn reset(&self) -> Result<JsValue, JsValue> {
        let mut app = self.app.try_borrow_mut().map_err(js_error)?;
        let actions = app.reset().map_err(js_error)?;
        actions_to_js(&actions)
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&self, x: f64, y: f64, button: i16) -> Result<JsValue, JsValue> {
        self.with_engine(|engine| engine.on_pointer_down(Point::new(x, y), Button::from_dom(button)))
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        self.with_engine(|engine| engine.on_pointer_move(Point::new(x, y)))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&self, x: f64, y: f64, button: i16) -> Result<JsValue, JsValue> {
        self.with_engine(|engine| engine.on_pointer_up(Point::new(x, y), Button::from_dom(button)))
    }

    pub fn click(&self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        self.with_engine(|engine| engine.on_click(Point::new(x, y)))
    }

    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&self, key: String) -> Result<JsValue, JsValue> {
        let key = Key(key);
        self.with_engine(|engine| engine.on_key_down(&key))
    }

    #[wasm_bindgen(js_name = canSubmit)]
    pub fn can_submit(identifier: &str) -> bool {
        EngineCore::can_submit(identifier)
    }

    #[wasm_bindgen(js_name = confirmOverlay)]
    pub fn confirm_overlay(&self, identifier: &str) -> Result<JsValue, JsValue> {
        let mut app = self.app.try_borrow_mut().map_err(js_error)?;
        let session = app.require_editor().map_err(js_error)?;
        let actions = session.engine.confirm_overlay(identifier).map_err(js_error)?;
        actions_to_js(&actions)
    }

    #[wasm_bindgen(js_name = cancelOverlay)]
    pub fn cancel_overlay(&self) -> Result<JsValue, JsValue> {
        self.with_engine(EngineCore::cancel_overlay)
    }

    #[wasm_bindgen(js_name = deletePlacement)]
    pub fn delete_placement(&self, index: usize) -> Result<JsValue, JsValue> {
        self.with_engine(|engine| engine.delete_placement(index))
    }

    /// Record a window resize; it is applied by a later [`Editor::tick`].
    #[wasm_bindgen(js_name = viewportResized)]
    pub fn viewport_resized(&self) -> Result<(), JsValue> {
        let (width, height) = viewport_size()?;
        let now = js_sys::Date::now();
        let mut app = self.app.try_borrow_mut().map_err(js_error)?;
        if let Some(session) = app.editor_mut() {
            session.engine.on_viewport_resize(width, height, now);
        }
        Ok(())
    }

    /// Apply a debounced resize if its quiet period has passed.
    pub fn tick(&self) -> Result<JsValue, JsValue> {
        let now = js_sys::Date::now();
        self.with_engine(|engine| engine.tick(now))
    }

    /// Current overlay layer, as an array of view objects.
    pub fn overlays(&self) -> Result<JsValue, JsValue> {
        let app = self.app.try_borrow().map_err(js_error)?;
        let views = match app.editor() {
            Some(session) => render::overlay_views(&session.engine.store, &session.engine.geometry),
            None => Vec::new(),
        };
        let json = serde_json::to_string(&views).map_err(js_error)?;
        js_sys::JSON::parse(&json)
    }

    /// Display geometry as `{ calculatedWidth, calculatedHeight, aspectRatio }`.
    pub fn geometry(&self) -> Result<JsValue, JsValue> {
        let app = self.app.try_borrow().map_err(js_error)?;
        let Some(session) = app.editor() else {
            return Ok(JsValue::NULL);
        };
        let json = serde_json::to_string(&session.engine.geometry).map_err(js_error)?;
        js_sys::JSON::parse(&json)
    }

    /// Overlay indices in on-screen paint order, selected last.
    #[wasm_bindgen(js_name = paintOrder)]
    pub fn paint_order(&self) -> Result<Vec<usize>, JsValue> {
        let app = self.app.try_borrow().map_err(js_error)?;
        Ok(app.editor().map(|s| render::paint_order(&s.engine.store)).unwrap_or_default())
    }

    /// Photo size in native pixels as `[width, height]`, or empty before upload.
    #[wasm_bindgen(js_name = nativeSize)]
    pub fn native_size(&self) -> Result<Vec<u32>, JsValue> {
        let app = self.app.try_borrow().map_err(js_error)?;
        Ok(app.editor().map(|s| s.native_size()).map_or_else(Vec::new, |(w, h)| vec![w, h]))
    }

    /// `true` while an export is running; the page disables its controls.
    #[wasm_bindgen(js_name = isExporting)]
    pub fn is_exporting(&self) -> Result<bool, JsValue> {
        let app = self.app.try_borrow().map_err(js_error)?;
        Ok(app.is_exporting())
    }

    /// Generation picker entries as `[{ label, tag }]`, in picker order.
    pub fn generations() -> Result<JsValue, JsValue> {
        let entries: Vec<GenerationEntry> =
            Generation::all().iter().map(|g| GenerationEntry { label: g.label(), tag: g.tag() }).collect();
        let json = serde_json::to_string(&entries).map_err(js_error)?;
        js_sys::JSON::parse(&json)
    }

    pub fn cursor(&self) -> Result<String, JsValue> {
        let app = self.app.try_borrow().map_err(js_error)?;
        Ok(app.editor().map_or("default", |s| s.engine.cursor()).to_string())
    }

    /// Composite, encode and download. Resolves to the resulting actions.
    ///
    /// The app is not borrowed while overlays load, so input keeps working.
    pub fn export(&self) -> js_sys::Promise {
        let app = Rc::clone(&self.app);
        wasm_bindgen_futures::future_to_promise(async move {
            let (source, request) = {
                let mut app = app.try_borrow_mut().map_err(js_error)?;
                let session = app.require_editor().map_err(js_error)?;
                session.begin_export().map_err(js_error)?
            };

            let outcome = match compositor::export(&source, &request, &HttpAssetSource).await {
                Ok(image) => match trigger_download(&image) {
                    Ok(()) => Ok(image),
                    Err(err) => Err(ExportError::Download(format!("{err:?}"))),
                },
                Err(err) => Err(err),
            };

            let actions = {
                let mut app = app.try_borrow_mut().map_err(js_error)?;
                match app.editor_mut() {
                    Some(session) => session.finish_export(&outcome),
                    None => Vec::new(),
                }
            };
            for action in &actions {
                if let Action::ExportFailed { message, .. } = action {
                    window()?.alert_with_message(message)?;
                }
            }
            actions_to_js(&actions)
        })
    }
}

impl Editor {
    fn with_engine<F>(&self, f: F) -> Result<JsValue, JsValue>
    where
        F: FnOnce(&mut EngineCore) -> Vec<Action>,
    {
        let mut app = self.app.try_borrow_mut().map_err(js_error)?;
        let actions = match app.editor_mut() {
            Some(session) => f(&mut session.engine),
            None => Vec::new(),
        };
        actions_to_js(&actions)
    }
}
