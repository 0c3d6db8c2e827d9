//! ブラウザ上での画像縮小（canvas）
//!
//! 短辺244px（拡大しない）・JPEG品質80%でData URLに変換する。
//! EXIFの向きは画像要素の描画時にブラウザが補正する。

use crate::api::js_error;
use futures::channel::oneshot;
use match_review_common::{target_size, JPEG_QUALITY_PERCENT};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, File, HtmlCanvasElement, HtmlImageElement, Url};

/// ドロップを受け付けるMIMEタイプ
pub const SUPPORTED_TYPES: &[&str] = &["image/png", "image/jpeg", "image/webp"];

/// input要素の accept 属性値
pub const ACCEPT_ATTR: &str = "image/png,image/jpeg,image/webp";

pub fn is_supported_file(file: &File) -> bool {
    SUPPORTED_TYPES.contains(&file.type_().as_str())
}

/// 画像ファイルを縮小してJPEGのData URLにする
pub async fn optimize_image(file: &File) -> Result<String, String> {
    let object_url = Url::create_object_url_with_blob(file).map_err(js_error)?;
    let loaded = load_image(&object_url).await;
    let _ = Url::revoke_object_url(&object_url);
    let image = loaded?;

    let (width, height) = target_size(image.natural_width(), image.natural_height());
    if width == 0 || height == 0 {
        return Err("画像サイズを取得できません".to_string());
    }

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("documentが取得できません")?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(js_error)?
        .dyn_into()
        .map_err(|_| "canvasを作成できません".to_string())?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(js_error)?
        .ok_or("2Dコンテキストを取得できません")?
        .dyn_into()
        .map_err(|_| "2Dコンテキストを取得できません".to_string())?;
    context
        .draw_image_with_html_image_element_and_dw_and_dh(
            &image,
            0.0,
            0.0,
            width as f64,
            height as f64,
        )
        .map_err(js_error)?;

    let quality = JsValue::from_f64(JPEG_QUALITY_PERCENT as f64 / 100.0);
    let data_url = canvas
        .to_data_url_with_type_and_encoder_options("image/jpeg", &quality)
        .map_err(js_error)?;

    gloo::console::debug!(format!(
        "圧縮完了: {} {:.2}KB -> {}x{} {:.2}KB",
        file.name(),
        file.size() / 1024.0,
        width,
        height,
        data_url.len() as f64 * 0.75 / 1024.0
    ));

    Ok(data_url)
}

/// 画像要素に読み込み、load / error を待つ
async fn load_image(src: &str) -> Result<HtmlImageElement, String> {
    let image = HtmlImageElement::new().map_err(js_error)?;
    let (tx, rx) = oneshot::channel::<Result<(), String>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let on_load = {
        let tx = Rc::clone(&tx);
        Closure::wrap(Box::new(move |_: web_sys::Event| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Ok(()));
            }
        }) as Box<dyn FnMut(_)>)
    };
    let on_error = {
        let tx = Rc::clone(&tx);
        Closure::wrap(Box::new(move |_: web_sys::Event| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err("画像を読み込めません".to_string()));
            }
        }) as Box<dyn FnMut(_)>)
    };

    image.set_onload(Some(on_load.as_ref().unchecked_ref()));
    image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
    image.set_src(src);

    let result = rx.await.map_err(|_| "画像の読み込みが中断されました".to_string());

    image.set_onload(None);
    image.set_onerror(None);
    drop(on_load);
    drop(on_error);

    result??;
    Ok(image)
}
