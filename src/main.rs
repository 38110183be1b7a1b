// src/main.rs
//
// Calculatrice à lignes — point d’entrée NATIF + WEB (WASM)
// ---------------------------------------------------------
// - NATIF (Linux/Windows/macOS) : traces (RUST_LOG) + réglages TOML + eframe::run_native
// - WEB  (wasm32)              : eframe::WebRunner sur <canvas id="the_canvas_id">,
//                                réglages par défaut (pas de fichier)

#![cfg_attr(target_arch = "wasm32", allow(unused_imports))]

use eframe::egui;

mod app;
mod noyau;

use app::AppCalc;
use noyau::Reglages;

const TITRE_APP: &str = "Calculatrice à lignes";

/* ------------------------------ Natif ------------------------------ */

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let reglages = Reglages::charger();
    tracing::info!(?reglages, "démarrage");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(TITRE_APP)
            .with_inner_size([640.0, 720.0])
            .with_min_inner_size([480.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        TITRE_APP,
        options,
        Box::new(move |_cc| Ok(Box::new(AppCalc::new(reglages)))),
    )
}

/* ---------------------------- Web (wasm32) ---------------------------- */

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{AppCalc, Reglages, TITRE_APP};

    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::HtmlCanvasElement;

    const ID_CANEVAS: &str = "the_canvas_id";

    /// Lancé par wasm_bindgen au chargement : titre de l’onglet puis WebRunner sur le canevas.
    #[wasm_bindgen::prelude::wasm_bindgen(start)]
    pub async fn demarrer() -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("pas de document"))?;
        document.set_title(TITRE_APP);

        let canevas = document
            .get_element_by_id(ID_CANEVAS)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| JsValue::from_str(&format!("<canvas id=\"{ID_CANEVAS}\"> absent")))?;

        eframe::WebRunner::new()
            .start(
                canevas,
                eframe::WebOptions::default(),
                Box::new(|_cc| Ok(Box::new(AppCalc::new(Reglages::default())))),
            )
            .await
    }
}
