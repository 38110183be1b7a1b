// src/app/vue.rs
//
// Vue (UI egui) — natif + web
// ---------------------------
// Objectifs :
// - Une ligne = une expression + son forçage radix + sa réponse (ou "? message")
// - Toute édition relance un recalcul complet de la liste (un Contexte neuf par passe)
// - Clavier : Enter passe à la ligne suivante (créée si besoin), flèches haut/bas naviguent
// - Réglages d’affichage éditables, sauvegardés à chaque modification
//
// Note :
// - PAS de Key::NumEnter (n’existe pas dans egui 0.33.x)

use eframe::egui;

use super::etat::AppCalc;
use crate::noyau::biblio::FONCTIONS;
use crate::noyau::{recalculer, ModeRadix};

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        ui.heading("Calculatrice à lignes");
        ui.add_space(6.0);

        self.ui_barre(ui);

        ui.add_space(6.0);
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .max_height((ui.available_height() - 160.0).max(120.0))
            .show(ui, |ui| {
                self.ui_lignes(ui);
            });

        ui.separator();
        self.ui_reglages(ui);
        self.ui_fonctions(ui);

        // Un seul recalcul par frame, après toutes les éditions.
        if self.a_recalculer {
            self.recalcul_via_noyau();
        }
    }

    fn ui_barre(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            let i = self.selection;

            if bouton(ui, "Insérer", "Nouvelle ligne sous la sélection") {
                self.inserer_apres(i);
            }
            if bouton(ui, "Supprimer", "Supprime la ligne sélectionnée") {
                self.supprimer(i);
            }
            if bouton(ui, "Monter", "Échange avec la ligne du dessus") {
                self.monter(i);
            }
            if bouton(ui, "Descendre", "Échange avec la ligne du dessous") {
                self.descendre(i);
            }

            ui.separator();

            if bouton(ui, "Copier tout", "Copie « expression = réponse » pour chaque ligne") {
                ui.ctx().copy_text(self.texte_tout());
            }

            if self.confirmer_effacement {
                ui.colored_label(ui.visuals().warn_fg_color, "Tout effacer ?");
                if bouton(ui, "Oui", "Efface toutes les lignes") {
                    self.tout_effacer();
                }
                if bouton(ui, "Non", "Annule") {
                    self.confirmer_effacement = false;
                }
            } else if bouton(ui, "Tout effacer", "Efface toutes les lignes (confirmation)") {
                self.confirmer_effacement = true;
            }
        });
    }

    fn ui_lignes(&mut self, ui: &mut egui::Ui) {
        let mut suivante: Option<usize> = None;
        let mut aller_a: Option<usize> = None;

        egui::Grid::new("lignes_calc")
            .num_columns(4)
            .spacing([8.0, 4.0])
            .striped(true)
            .show(ui, |ui| {
                for i in 0..self.lignes.len() {
                    let selectionnee = i == self.selection;
                    ui.label(egui::RichText::new(format!("{}", i + 1)).weak().strong_if(selectionnee));

                    // IMPORTANT : id stable par index + focus contrôlé
                    let resp = ui.add(
                        egui::TextEdit::singleline(&mut self.lignes[i].expression)
                            .id_salt(("ligne_expr", i))
                            .desired_width(260.0)
                            .hint_text("Ex: x = 0x1F + 1, rgb(255, 128, 0)")
                            .code_editor(),
                    );

                    if self.focus == Some(i) {
                        resp.request_focus();
                        self.focus = None;
                    }
                    if resp.gained_focus() {
                        self.selection = i;
                    }
                    if resp.changed() {
                        self.a_recalculer = true;
                    }

                    // singleline : Enter fait perdre le focus
                    if resp.lost_focus() && ui.input(|inp| inp.key_pressed(egui::Key::Enter)) {
                        suivante = Some(i);
                    }
                    if resp.has_focus() {
                        if ui.input(|inp| inp.key_pressed(egui::Key::ArrowUp)) && i > 0 {
                            aller_a = Some(i - 1);
                        }
                        if ui.input(|inp| inp.key_pressed(egui::Key::ArrowDown)) {
                            aller_a = Some(i + 1);
                        }
                    }

                    let mut mode = self.lignes[i].mode;
                    egui::ComboBox::from_id_salt(("ligne_mode", i))
                        .width(60.0)
                        .selected_text(mode.libelle())
                        .show_ui(ui, |ui| {
                            for m in ModeRadix::TOUS {
                                ui.selectable_value(&mut mode, m, m.libelle());
                            }
                        });
                    if mode != self.lignes[i].mode {
                        self.lignes[i].mode = mode;
                        self.a_recalculer = true;
                    }

                    let ligne = &self.lignes[i];
                    if ligne.en_erreur {
                        let resp = ui.colored_label(ui.visuals().error_fg_color, &ligne.reponse);
                        if let Some(p) = ligne.pos_erreur {
                            resp.on_hover_text(repere(&ligne.expression, p));
                        }
                    } else {
                        ui.monospace(&ligne.reponse);
                    }
                    ui.end_row();
                }
            });

        if let Some(i) = suivante {
            self.ligne_suivante(i);
        } else if let Some(i) = aller_a {
            self.selectionner(i);
        }
    }

    fn ui_reglages(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Réglages")
            .default_open(false)
            .show(ui, |ui| {
                let r = &mut self.reglages;
                let mut change = false;

                ui.horizontal(|ui| {
                    ui.label("Décimales max :");
                    change |= ui
                        .add(egui::DragValue::new(&mut r.longueur_decimale_max).speed(1).range(0..=30))
                        .changed();
                });

                change |= ui.checkbox(&mut r.scientifique, "Notation scientifique").changed();

                ui.add_enabled_ui(r.scientifique, |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Exposant positif min :");
                        change |= ui
                            .add(egui::DragValue::new(&mut r.exposant_positif_min).speed(1).range(1..=100))
                            .changed();
                    });
                    ui.horizontal(|ui| {
                        ui.label("Exposant négatif max :");
                        change |= ui
                            .add(egui::DragValue::new(&mut r.exposant_negatif_max).speed(1).range(1..=100))
                            .changed();
                    });
                    change |= ui
                        .checkbox(&mut r.alignement_scientifique, "Exposant multiple de 3")
                        .changed();
                });

                if change {
                    if let Err(e) = r.sauver() {
                        tracing::warn!(erreur = %e, "réglages non sauvegardés");
                    }
                    self.a_recalculer = true;
                }
            });
    }

    fn ui_fonctions(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Fonctions")
            .default_open(false)
            .show(ui, |ui| {
                egui::Grid::new("aide_fonctions").num_columns(2).show(ui, |ui| {
                    for f in FONCTIONS {
                        ui.monospace(f.signature());
                        ui.label(f.aide);
                        ui.end_row();
                    }
                });
            });
    }

    /// Recalcule toutes les lignes via le noyau, puis dépose les réponses dans l’état UI.
    fn recalcul_via_noyau(&mut self) {
        let resultats = recalculer(&self.entrees(), &self.reglages);
        self.deposer_resultats(resultats);
    }
}

/// Expression + caret sous l’octet fautif (police mono dans l’infobulle).
fn repere(expression: &str, pos: usize) -> egui::RichText {
    let colonne = expression
        .char_indices()
        .take_while(|(i, _)| *i < pos)
        .count();
    egui::RichText::new(format!("{expression}\n{}^", " ".repeat(colonne))).monospace()
}

fn bouton(ui: &mut egui::Ui, label: &str, tip: &str) -> bool {
    ui.add(egui::Button::new(label)).on_hover_text(tip).clicked()
}

/// Mise en avant de la ligne sélectionnée.
trait RichTextExt {
    fn strong_if(self, fort: bool) -> Self;
}

impl RichTextExt for egui::RichText {
    fn strong_if(self, fort: bool) -> Self {
        if fort {
            self.strong()
        } else {
            self
        }
    }
}
