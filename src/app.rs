// src/app.rs
//
// Calculatrice à lignes — module App (racine)
// -------------------------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + vue.rs)
// - Ré-exporter AppCalc (pour main.rs: use crate::app::AppCalc;)
// - Fournir l’impl eframe::App (compatible NATIF + WEB)
//
// Enter et les flèches sont gérés dans vue.rs, quand un champ a le focus.

pub mod etat;
pub mod vue;

pub use etat::AppCalc;

use eframe::egui;

impl eframe::App for AppCalc {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ESC = annule une demande "Tout effacer" en attente.
        if self.confirmer_effacement && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.confirmer_effacement = false;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui(ui);
        });
    }
}
