//! src/app/etat.rs
//!
//! État UI (sans vue, sans noyau).
//!
//! Rôle : contenir la liste des lignes (expression, forçage radix, réponse) et les réglages,
//! et offrir les opérations de liste (insérer, supprimer, monter, descendre, tout effacer, copier).
//!
//! Contrats :
//! - Aucune évaluation ici (pas de parsing) : la vue recalcule via le noyau et dépose les résultats.
//! - Toujours au moins une ligne.
//! - `selection` reste un index valide.

use crate::noyau::{ModeRadix, Reglages, Resultat};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ligne {
    pub expression: String,
    pub mode: ModeRadix,
    // --- sortie du dernier recalcul ---
    pub reponse: String,
    pub en_erreur: bool,
    /// Octet fautif de l’expression (erreurs d’analyse).
    pub pos_erreur: Option<usize>,
}

impl Ligne {
    #[cfg(test)]
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppCalc {
    pub lignes: Vec<Ligne>,
    pub selection: usize,

    pub reglages: Reglages,

    // --- UX ---
    /// Ligne qui doit prendre le focus à la prochaine frame.
    pub focus: Option<usize>,
    /// "Tout effacer" demandé, en attente de confirmation.
    pub confirmer_effacement: bool,
    /// Une édition a eu lieu depuis le dernier recalcul.
    pub a_recalculer: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self::new(Reglages::default())
    }
}

impl AppCalc {
    pub fn new(reglages: Reglages) -> Self {
        Self {
            lignes: vec![Ligne::default()],
            selection: 0,
            reglages,
            focus: Some(0), // au lancement, on veut pouvoir taper tout de suite
            confirmer_effacement: false,
            a_recalculer: true,
        }
    }

    pub fn selectionner(&mut self, i: usize) {
        self.selection = i.min(self.lignes.len() - 1);
        self.focus = Some(self.selection);
    }

    /* ------------------------ Opérations de liste ------------------------ */

    /// Insère une ligne vide après `i` et la sélectionne.
    pub fn inserer_apres(&mut self, i: usize) {
        let pos = (i + 1).min(self.lignes.len());
        self.lignes.insert(pos, Ligne::default());
        self.selectionner(pos);
        self.a_recalculer = true;
    }

    /// Passe à la ligne suivante (créée si `i` est la dernière).
    pub fn ligne_suivante(&mut self, i: usize) {
        if i + 1 >= self.lignes.len() {
            self.inserer_apres(i);
        } else {
            self.selectionner(i + 1);
        }
    }

    pub fn supprimer(&mut self, i: usize) {
        if i >= self.lignes.len() {
            return;
        }
        self.lignes.remove(i);
        if self.lignes.is_empty() {
            self.lignes.push(Ligne::default());
        }
        // la ligne qui prend la place, ou la dernière
        self.selectionner(i);
        self.a_recalculer = true;
    }

    pub fn monter(&mut self, i: usize) {
        if i == 0 || i >= self.lignes.len() {
            return;
        }
        self.lignes.swap(i - 1, i);
        self.selectionner(i - 1);
        self.a_recalculer = true;
    }

    pub fn descendre(&mut self, i: usize) {
        if i + 1 >= self.lignes.len() {
            return;
        }
        self.lignes.swap(i, i + 1);
        self.selectionner(i + 1);
        self.a_recalculer = true;
    }

    /// Tout effacer (après confirmation) : une seule ligne vide.
    pub fn tout_effacer(&mut self) {
        self.lignes = vec![Ligne::default()];
        self.confirmer_effacement = false;
        self.selectionner(0);
        self.a_recalculer = true;
    }

    /// Texte "expression = réponse" de chaque ligne non vide (copie presse-papiers).
    pub fn texte_tout(&self) -> String {
        self.lignes
            .iter()
            .filter(|l| !l.expression.trim().is_empty())
            .map(|l| format!("{} = {}", l.expression.trim(), l.reponse))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /* ------------------------ Recalcul ------------------------ */

    /// Entrées du recalcul, dans l’ordre des lignes.
    pub fn entrees(&self) -> Vec<(String, ModeRadix)> {
        self.lignes
            .iter()
            .map(|l| (l.expression.clone(), l.mode))
            .collect()
    }

    /// Dépose les résultats d’une passe (même ordre que `entrees`).
    pub fn deposer_resultats(&mut self, resultats: Vec<Resultat>) {
        for (ligne, r) in self.lignes.iter_mut().zip(resultats) {
            ligne.reponse = r.texte();
            ligne.en_erreur = r.est_erreur();
            ligne.pos_erreur = r.position();
        }
        self.a_recalculer = false;
    }
}
